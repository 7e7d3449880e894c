//! Scene: an ordered list of triangles and the nearest-hit search.

use crate::{Intersection, Material, Triangle};
use raypixel_math::{Ray, Vec3};

/// Nearest intersection found in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    /// Index of the hit triangle, stable for the duration of a frame
    pub index: usize,
    /// Distance from the ray origin
    pub distance: f64,
    pub intersection: Intersection,
}

/// Ordered triangle list. Read-only while a frame renders.
#[derive(Debug, Clone)]
pub struct Scene<M = Material> {
    triangles: Vec<Triangle<M>>,
}

impl<M> Scene<M> {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    /// Add a triangle. Its index is the current length.
    pub fn push(&mut self, triangle: Triangle<M>) -> usize {
        self.triangles.push(triangle);
        self.triangles.len() - 1
    }

    /// Swap in a whole new mesh, e.g. after the model was transformed.
    pub fn replace(&mut self, triangles: Vec<Triangle<M>>) {
        log::debug!(
            "Replacing scene: {} -> {} triangles",
            self.triangles.len(),
            triangles.len()
        );
        self.triangles = triangles;
    }

    /// Get the number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle<M>] {
        &self.triangles
    }

    pub fn get(&self, index: usize) -> Option<&Triangle<M>> {
        self.triangles.get(index)
    }

    /// Linear scan for the closest triangle hit by `ray`, skipping `exclude`
    /// (the surface the ray is leaving).
    ///
    /// Only a strictly closer hit replaces the current best, so on exactly
    /// equal distances the triangle earliest in scan order wins.
    pub fn nearest_hit(&self, ray: &Ray, exclude: Option<usize>) -> Option<SceneHit> {
        let mut nearest: Option<SceneHit> = None;

        for (index, triangle) in self.triangles.iter().enumerate() {
            if Some(index) == exclude {
                continue;
            }

            let Some(intersection) = triangle.intersect(ray) else {
                continue;
            };

            let distance = intersection.point.distance(ray.origin);
            if nearest.map_or(true, |best| distance < best.distance) {
                nearest = Some(SceneHit {
                    index,
                    distance,
                    intersection,
                });
            }
        }

        nearest
    }
}

impl<M: Clone> Scene<M> {
    /// Build a scene from a flat indexed mesh sharing one material.
    ///
    /// Every three indices form a triangle. Triangles referencing missing
    /// vertices are skipped.
    pub fn from_mesh(positions: &[Vec3], indices: &[u32], material: M) -> Self {
        let mut scene = Self::new();

        for face in indices.chunks_exact(3) {
            let corner = |i: u32| positions.get(i as usize).copied();
            match (corner(face[0]), corner(face[1]), corner(face[2])) {
                (Some(p1), Some(p2), Some(p3)) => {
                    scene.push(Triangle::new(p1, p2, p3, material.clone()));
                }
                _ => {
                    log::warn!(
                        "Skipping face {:?}: index out of range ({} vertices)",
                        face,
                        positions.len()
                    );
                }
            }
        }

        if indices.len() % 3 != 0 {
            log::warn!(
                "Ignoring {} trailing indices that do not form a triangle",
                indices.len() % 3
            );
        }

        scene
    }
}

impl<M> Default for Scene<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> FromIterator<Triangle<M>> for Scene<M> {
    fn from_iter<I: IntoIterator<Item = Triangle<M>>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}
