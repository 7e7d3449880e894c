//! Render configuration and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How successive frames are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accumulation {
    /// Average every sample since the last reset
    Cumulative,
    /// Average only the most recent `depth` samples
    Window { depth: usize },
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov: f64,
    /// Bounce budget; a hit at depth `max_bounces - 1` returns its surface color
    pub max_bounces: u32,
    /// Jittered camera rays averaged per pixel each frame
    pub samples_per_pixel: u32,
    /// Trace one pixel per `sample_step × sample_step` block and copy it to
    /// the rest of the block
    pub sample_step: u32,
    pub accumulation: Accumulation,
    /// Base seed for the per-scanline random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov: 50.0,
            max_bounces: 8,
            samples_per_pixel: 1,
            sample_step: 1,
            accumulation: Accumulation::Cumulative,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Set output resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set bounce budget and samples per pixel.
    pub fn with_quality(mut self, max_bounces: u32, samples_per_pixel: u32) -> Self {
        self.max_bounces = max_bounces;
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    /// Check the configuration can drive a render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyResolution {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov));
        }
        if self.max_bounces == 0 {
            return Err(ConfigError::ZeroBounces);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.sample_step == 0 {
            return Err(ConfigError::ZeroSampleStep);
        }
        if self.accumulation == (Accumulation::Window { depth: 0 }) {
            return Err(ConfigError::EmptyWindow);
        }
        Ok(())
    }

    /// Size of the traced grid: one cell per `sample_step` block, rounded up.
    pub fn grid_size(&self) -> (u32, u32) {
        let step = self.sample_step.max(1);
        (self.width.div_ceil(step), self.height.div_ceil(step))
    }
}

/// Invalid render configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Resolution must be non-zero, got {width}x{height}")]
    EmptyResolution { width: u32, height: u32 },

    #[error("Field of view must be between 0 and 180 degrees, got {0}")]
    FieldOfView(f64),

    #[error("Bounce budget must be at least 1")]
    ZeroBounces,

    #[error("At least one sample per pixel is required")]
    ZeroSamples,

    #[error("Sample step must be at least 1")]
    ZeroSampleStep,

    #[error("Accumulation window depth must be at least 1")]
    EmptyWindow,
}

/// Errors from the render entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Frame buffer is {actual_width}x{actual_height}, expected {width}x{height}")]
    FrameSize {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}
