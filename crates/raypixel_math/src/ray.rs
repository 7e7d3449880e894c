use crate::{Vec3, Vec3Ext};

/// A ray in 3D space with an origin and a direction.
///
/// Rays are created once per cast and never mutated; a bounce produces a
/// new ray. The direction is expected to be unit length so that the ray
/// parameter `t` equals distance from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray, normalizing the direction (degenerate directions are
    /// passed through untouched).
    pub fn towards(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction.normalize_or_self())
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Y,
        }
    }
}
