// Geometry helpers for DVec3
//
// glam covers the arithmetic (add/sub/scale, dot, cross, distance, lerp).
// The operations below have tracer-specific semantics that differ from, or
// are missing in, glam.

use crate::Vec3;

/// Magnitudes below this are treated as zero.
pub const EPSILON: f64 = 1e-6;

/// One full turn in radians.
pub const TAU: f64 = std::f64::consts::TAU;

/// Convert degrees to radians.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Extension trait for Vec3 with the tracer's geometric primitives.
pub trait Vec3Ext {
    /// Normalize, returning the input unchanged when its length is below
    /// [`EPSILON`] instead of producing Inf/NaN.
    fn normalize_or_self(self) -> Vec3;

    /// Rotate about a unit-length `axis` by `angle` radians (Rodrigues).
    /// The axis is not renormalized.
    fn rotate_about(self, axis: Vec3, angle: f64) -> Vec3;

    /// Axis permutation `(y, z, x)`. Not guaranteed orthogonal to `self`;
    /// only good enough to seed a scatter cone away from the normal.
    fn cheap_perpendicular(self) -> Vec3;

    /// Mirror `self` about a unit-length `normal`: `v - 2(v·n)n`.
    fn reflect_about(self, normal: Vec3) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn normalize_or_self(self) -> Vec3 {
        let len = self.length();
        if len > EPSILON {
            self / len
        } else {
            self
        }
    }

    fn rotate_about(self, axis: Vec3, angle: f64) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * (axis.dot(self) * (1.0 - cos))
    }

    #[inline]
    fn cheap_perpendicular(self) -> Vec3 {
        Vec3::new(self.y, self.z, self.x)
    }

    #[inline]
    fn reflect_about(self, normal: Vec3) -> Vec3 {
        self - normal * (2.0 * self.dot(normal))
    }
}
