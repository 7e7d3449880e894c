//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection, with
//! backface culling: triangles are one-sided and only visible from the side
//! their face normal points to.

use raypixel_math::{Interval, Ray, Vec3, Vec3Ext, EPSILON};

/// Result of a successful ray-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub t: f64,
    /// World-space hit point
    pub point: Vec3,
    /// Barycentric coordinates `(u, v, 1 - u - v)`
    pub barycentric: Vec3,
}

/// A triangle primitive. Derived fields are computed once and never change.
#[derive(Debug, Clone)]
pub struct Triangle<M> {
    /// Vertices
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    /// `p2 - p1`
    edge1: Vec3,
    /// `p3 - p1`
    edge2: Vec3,
    /// Raw `edge1 × edge2` (length is twice the area)
    face_normal: Vec3,
    /// Unit face normal
    normal: Vec3,
    /// Material
    material: M,
}

impl<M> Triangle<M> {
    /// Create a new triangle from three vertices.
    ///
    /// The front face is the one from which the vertices appear
    /// counter-clockwise.
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3, material: M) -> Self {
        let edge1 = p2 - p1;
        let edge2 = p3 - p1;
        let face_normal = edge1.cross(edge2);

        Self {
            p1,
            p2,
            p3,
            edge1,
            edge2,
            face_normal,
            normal: face_normal.normalize_or_self(),
            material,
        }
    }

    /// The three vertices.
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Unit face normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Unnormalized face normal.
    pub fn face_normal(&self) -> Vec3 {
        self.face_normal
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Vec3 {
        (self.p1 + self.p2 + self.p3) / 3.0
    }

    pub fn material(&self) -> &M {
        &self.material
    }

    /// Möller-Trumbore intersection.
    ///
    /// Determinants at or below [`EPSILON`] are rejected. That covers
    /// back-facing triangles, rays parallel to the plane and degenerate
    /// (zero-area) triangles, none of which may produce an unstable `1/det`.
    /// Edges and vertices count as inside.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let det = -ray.direction.dot(self.face_normal);
        if det <= EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let a0 = ray.origin - self.p1;
        let da0 = a0.cross(ray.direction);

        let u = self.edge2.dot(da0) * inv_det;
        let v = -self.edge1.dot(da0) * inv_det;
        let t = a0.dot(self.face_normal) * inv_det;

        if !Interval::FORWARD.contains(t) || u < 0.0 || v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(Intersection {
            t,
            point: ray.at(t),
            barycentric: Vec3::new(u, v, 1.0 - u - v),
        })
    }
}
