//! Recursive light transport.
//!
//! A ray either escapes to the sky, stops at a surface once the bounce
//! budget is spent, or hands off to the surface material, which calls back
//! into [`cast`] for every secondary ray it spawns.

use crate::{gen_f64, Bsdf, Camera, Color, RenderConfig, Scene, SurfaceHit};
use raypixel_math::{Ray, Vec2, Vec3};
use rand::RngCore;

/// Compute the color seen along a ray.
///
/// `depth` is the number of bounces already taken and `exclude` the triangle
/// the ray starts on. Recursion is bounded by `config.max_bounces`: a hit at
/// `depth == max_bounces - 1` returns the surface color without scattering.
pub fn cast<M: Bsdf>(
    scene: &Scene<M>,
    ray: &Ray,
    depth: u32,
    exclude: Option<usize>,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(hit) = scene.nearest_hit(ray, exclude) else {
        return sky_color(ray);
    };

    let triangle = &scene.triangles()[hit.index];
    let material = triangle.material();

    if depth + 1 >= config.max_bounces {
        return material.surface_color();
    }

    let surface = SurfaceHit {
        point: hit.intersection.point,
        normal: triangle.normal(),
        barycentric: hit.intersection.barycentric,
        distance: hit.distance,
    };

    material.scatter(ray, &surface, rng, &mut |next: Ray, rng: &mut dyn RngCore| {
        cast(scene, &next, depth + 1, Some(hit.index), config, rng)
    })
}

/// Ambient light for rays that leave the scene: a gray ramp on the Z
/// component of the direction, black below `z = -0.5`.
pub fn sky_color(ray: &Ray) -> Color {
    let factor = ray.direction.dot(Vec3::Z) + 0.5;
    if factor > 0.0 {
        Color::splat(factor)
    } else {
        Color::ZERO
    }
}

/// Render a single pixel for one frame.
///
/// With one sample the ray goes through the exact pixel coordinate. With
/// more, each ray is jittered by up to half a pixel and the results are
/// averaged.
pub fn render_pixel<M: Bsdf>(
    scene: &Scene<M>,
    camera: &Camera,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let pixel = Vec2::new(f64::from(x), f64::from(y));

    if config.samples_per_pixel <= 1 {
        let ray = camera.get_ray(pixel, config);
        return cast(scene, &ray, 0, None, config, rng);
    }

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let jitter = Vec2::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5);
        let ray = camera.get_ray(pixel + jitter, config);
        pixel_color += cast(scene, &ray, 0, None, config, rng);
    }

    pixel_color / f64::from(config.samples_per_pixel)
}
