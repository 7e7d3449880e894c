//! RayPixel renderer - real-time progressive CPU path tracing
//!
//! Traces triangle scenes with a weighted diffuse/metallic/emissive material
//! model and averages successive frames to reduce noise.
//!
//! # Example
//!
//! ```ignore
//! use raypixel_renderer::*;
//!
//! let config = RenderConfig::default().with_resolution(320, 240);
//! let mut state = RenderState::new(config)?;
//! let mut frame = FrameBuffer::new(320, 240);
//! loop {
//!     state.render_frame(&scene, &camera, &mut frame)?;
//!     present(&frame);
//! }
//! ```

mod accumulator;
mod camera;
mod color;
mod config;
mod frame;
mod material;
mod random;
mod renderer;
mod scene;
mod triangle;

pub use accumulator::{FrameStats, RenderState};
pub use camera::Camera;
pub use color::{channel_to_u8, color_to_rgba, sanitize, Color};
pub use config::{Accumulation, ConfigError, RenderConfig, RenderError};
pub use frame::FrameBuffer;
pub use material::{diffuse_direction, Bsdf, Material, SurfaceHit};
pub use random::{gen_f64, Lcg};
pub use renderer::{cast, render_pixel, sky_color};
pub use scene::{Scene, SceneHit};
pub use triangle::{Intersection, Triangle};

/// Re-export Vec3 and common math types from raypixel_math
pub use raypixel_math::{Interval, Ray, Vec2, Vec3, Vec3Ext};
