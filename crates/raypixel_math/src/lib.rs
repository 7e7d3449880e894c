// Re-export glam for convenience
pub use glam::{DVec2, DVec3};

/// Double precision 3D vector used for all geometry.
pub type Vec3 = DVec3;
/// Double precision 2D vector, used for pixel-plane offsets.
pub type Vec2 = DVec2;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{to_radians, Vec3Ext, EPSILON, TAU};
