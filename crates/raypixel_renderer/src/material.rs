//! Material trait and the weighted diffuse/metallic/emissive mixture.

use crate::{gen_f64, Color};
use raypixel_math::{Ray, Vec3, Vec3Ext, EPSILON, TAU};
use rand::RngCore;

/// Surface information handed to a material at a ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Point of intersection
    pub point: Vec3,
    /// Unit face normal (front-facing, since back faces are culled)
    pub normal: Vec3,
    /// Barycentric coordinates of the hit
    pub barycentric: Vec3,
    /// Distance from the ray origin
    pub distance: f64,
}

/// Trait for materials that describe how light leaves a surface.
pub trait Bsdf: Send + Sync {
    /// Color returned when the bounce budget is exhausted.
    fn surface_color(&self) -> Color;

    /// Shade a hit.
    ///
    /// `bounce` traces a secondary ray one level deeper, leaving the hit
    /// surface out of the search, and returns the light arriving along it.
    fn scatter(
        &self,
        ray_in: &Ray,
        hit: &SurfaceHit,
        rng: &mut dyn RngCore,
        bounce: &mut dyn FnMut(Ray, &mut dyn RngCore) -> Color,
    ) -> Color;
}

/// Weighted mixture of diffuse, metallic and emissive response.
///
/// Each term is active only if its weight exceeds [`EPSILON`]. The result is
/// the weighted average of the active terms, not their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub surface_color: Color,
    pub diffuse: f64,
    pub metallic: f64,
    pub emissive: f64,
}

impl Material {
    pub fn new(surface_color: Color, diffuse: f64, metallic: f64, emissive: f64) -> Self {
        Self {
            surface_color,
            diffuse,
            metallic,
            emissive,
        }
    }

    /// Pure diffuse surface.
    pub fn diffuse(surface_color: Color) -> Self {
        Self::new(surface_color, 1.0, 0.0, 0.0)
    }

    /// Pure mirror. The surface color is only seen once bounces run out.
    pub fn metallic(surface_color: Color) -> Self {
        Self::new(surface_color, 0.0, 1.0, 0.0)
    }

    /// Light source.
    pub fn emissive(surface_color: Color, strength: f64) -> Self {
        Self::new(surface_color, 0.0, 0.0, strength)
    }

    /// Sum of the active weights; zero means the material renders black.
    pub fn active_weight(&self) -> f64 {
        [self.diffuse, self.metallic, self.emissive]
            .into_iter()
            .filter(|w| *w > EPSILON)
            .sum()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Color::splat(0.5))
    }
}

impl Bsdf for Material {
    fn surface_color(&self) -> Color {
        self.surface_color
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        hit: &SurfaceHit,
        rng: &mut dyn RngCore,
        bounce: &mut dyn FnMut(Ray, &mut dyn RngCore) -> Color,
    ) -> Color {
        let mut color = Color::ZERO;
        let mut total = 0.0;

        if self.diffuse > EPSILON {
            let ray = diffuse_ray(hit, rng);
            color += self.surface_color * bounce(ray, rng) * self.diffuse;
            total += self.diffuse;
        }

        // Mirror term is untinted
        if self.metallic > EPSILON {
            let ray = metallic_ray(ray_in, hit);
            color += bounce(ray, rng) * self.metallic;
            total += self.metallic;
        }

        if self.emissive > EPSILON {
            color += self.surface_color * self.emissive;
            total += self.emissive;
        }

        if total > 0.0 {
            color / total
        } else {
            Color::ZERO
        }
    }
}

/// Scatter direction for the diffuse term.
///
/// Starts from the permuted "perpendicular" of the normal, slides it towards
/// the normal by a uniform amount and spins it around the normal by a uniform
/// angle. This is biased and not a cosine-weighted hemisphere sample.
pub fn diffuse_direction(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let lean = gen_f64(rng);
    let spin = gen_f64(rng) * TAU;

    normal
        .cheap_perpendicular()
        .lerp(normal, lean)
        .rotate_about(normal, spin)
        .normalize_or_self()
}

fn diffuse_ray(hit: &SurfaceHit, rng: &mut dyn RngCore) -> Ray {
    Ray::new(hit.point, diffuse_direction(hit.normal, rng))
}

fn metallic_ray(ray_in: &Ray, hit: &SurfaceHit) -> Ray {
    Ray::new(
        hit.point,
        ray_in.direction.reflect_about(hit.normal).normalize_or_self(),
    )
}
