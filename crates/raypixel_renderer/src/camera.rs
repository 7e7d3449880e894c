//! Pinhole camera for primary ray generation.
//!
//! View space is Z-up: the camera looks along +Y, screen X maps to +X and
//! screen Y (downwards) maps to -Z.

use crate::RenderConfig;
use raypixel_math::{to_radians, Ray, Vec2, Vec3, Vec3Ext};

/// Camera for generating rays into the scene.
///
/// Mutable between frames (e.g. orbiting), read-only during a frame. Field
/// of view and resolution come from the [`RenderConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space ray origin
    pub position: Vec3,
    /// Euler angles in radians, applied Y first, then X, then Z
    pub rotation: Vec3,
}

impl Camera {
    /// Create a camera at `position` with no rotation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Set camera rotation.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Unrotated direction through a pixel position.
    ///
    /// The pixel offset from the image center is divided by half the image
    /// height, so the vertical extent spans `config.fov`. Fractional pixel
    /// coordinates are allowed (used for jittered sampling).
    pub fn view_direction(&self, pixel: Vec2, config: &RenderConfig) -> Vec3 {
        let size = Vec2::new(f64::from(config.width), f64::from(config.height));
        let offset = (pixel - size / 2.0) / (size.y * 0.5);

        Vec3::new(offset.x, focal_scale(config.fov), -offset.y).normalize_or_self()
    }

    /// Generate the world-space ray through a pixel position.
    pub fn get_ray(&self, pixel: Vec2, config: &RenderConfig) -> Ray {
        let direction = self
            .view_direction(pixel, config)
            .rotate_about(Vec3::Y, self.rotation.y)
            .rotate_about(Vec3::X, self.rotation.x)
            .rotate_about(Vec3::Z, self.rotation.z);

        Ray::new(self.position, direction)
    }

    /// Orbit around `target` in the horizontal plane, keeping the distance
    /// and facing the target.
    pub fn orbit(&mut self, target: Vec3, angle: f64) {
        let arm = self.position - target;
        self.position = target + arm.rotate_about(Vec3::Z, angle);
        self.rotation.z += angle;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// Distance of the image plane, in half-heights: `tan(90° - fov/2)`.
fn focal_scale(fov: f64) -> f64 {
    to_radians(90.0 - fov * 0.5).tan()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-9
    }

    fn square(size: u32, fov: f64) -> RenderConfig {
        RenderConfig {
            fov,
            ..RenderConfig::default().with_resolution(size, size)
        }
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let ray = camera.get_ray(Vec2::new(4.0, 4.0), &square(8, 50.0));

        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert!(approx_eq(ray.direction, Vec3::Y));
    }

    #[test]
    fn test_vertical_extent_matches_fov() {
        let camera = Camera::default();
        // Top edge of a 10 pixel tall image sits 45 degrees above the axis
        let dir = camera.view_direction(Vec2::new(5.0, 0.0), &square(10, 90.0));
        assert!(approx_eq(dir, Vec3::new(0.0, 1.0, 1.0).normalize()));
    }

    #[test]
    fn test_wider_fov_spreads_edge_rays() {
        let camera = Camera::default();
        let edge = Vec2::new(5.0, 0.0);
        let narrow = camera.view_direction(edge, &square(10, 20.0));
        let wide = camera.view_direction(edge, &square(10, 120.0));

        assert!((narrow.z.atan2(narrow.y).to_degrees() - 10.0).abs() < 1e-9);
        assert!((wide.z.atan2(wide.y).to_degrees() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_axes() {
        let camera = Camera::default();
        let config = square(8, 50.0);
        let right = camera.view_direction(Vec2::new(7.0, 4.0), &config);
        let below = camera.view_direction(Vec2::new(4.0, 7.0), &config);

        assert!(right.x > 0.0);
        assert!(below.z < 0.0);
        assert!((right.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_about_z_turns_view() {
        let camera = Camera::default().with_rotation(Vec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
        let ray = camera.get_ray(Vec2::new(4.0, 4.0), &square(8, 50.0));
        // +Y rotated a quarter turn about Z faces -X
        assert!(approx_eq(ray.direction, -Vec3::X));
    }

    #[test]
    fn test_orbit_keeps_target_centered() {
        let target = Vec3::new(0.0, 10.0, 0.0);
        let mut camera = Camera::default();
        camera.orbit(target, 1.0);

        assert!(((camera.position - target).length() - 10.0).abs() < 1e-9);
        let ray = camera.get_ray(Vec2::new(4.0, 4.0), &square(8, 50.0));
        let to_target = (target - camera.position).normalize();
        assert!(approx_eq(ray.direction, to_target));
    }
}
