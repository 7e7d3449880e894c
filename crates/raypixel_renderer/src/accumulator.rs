//! Progressive frame accumulation with row-parallel dispatch.
//!
//! Each frame traces one sample per grid cell and folds it into a history
//! that persists across frames, so noise drops while the view is static.
//! Rows are rendered in parallel using rayon. Every task owns one grid row of
//! history, the matching block of output scanlines and its own random
//! stream, so no locking is needed.

use crate::{
    color_to_rgba, render_pixel, sanitize, Accumulation, Bsdf, Camera, Color, FrameBuffer, Lcg,
    RenderConfig, RenderError, Scene,
};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Timing and progress of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Index of the frame since the state was created
    pub frame_index: u64,
    /// Samples per cell accumulated so far, this frame included
    pub samples: u64,
    /// Wall time of the parallel pass
    pub elapsed: Duration,
}

impl FrameStats {
    /// Frames per second at this frame's speed.
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            1.0 / secs
        } else {
            f64::INFINITY
        }
    }
}

/// History for one grid row.
#[derive(Debug, Clone)]
struct AccumRow {
    /// Running sums (cumulative mode)
    sums: Vec<Color>,
    /// Ring buffers, `depth` slots per cell (window mode)
    history: Vec<Color>,
    /// Displayed average per cell
    averages: Vec<Color>,
}

impl AccumRow {
    fn new(width: usize, accumulation: Accumulation) -> Self {
        let history = match accumulation {
            Accumulation::Cumulative => Vec::new(),
            Accumulation::Window { depth } => vec![Color::ZERO; width * depth],
        };

        Self {
            sums: vec![Color::ZERO; width],
            history,
            averages: vec![Color::ZERO; width],
        }
    }

    fn clear(&mut self) {
        self.sums.fill(Color::ZERO);
        self.history.fill(Color::ZERO);
        self.averages.fill(Color::ZERO);
    }

    /// Fold sample number `samples` (1-based) into cell `x` and return the
    /// new average.
    fn accumulate(&mut self, x: usize, sample: Color, samples: u64, mode: Accumulation) -> Color {
        let average = match mode {
            Accumulation::Cumulative => {
                self.sums[x] += sample;
                self.sums[x] / samples as f64
            }
            Accumulation::Window { depth } => {
                let ring = &mut self.history[x * depth..(x + 1) * depth];
                ring[((samples - 1) % depth as u64) as usize] = sample;

                let filled = samples.min(depth as u64) as usize;
                ring[..filled].iter().sum::<Color>() / filled as f64
            }
        };

        self.averages[x] = average;
        average
    }
}

/// Accumulation state threaded through successive frames.
///
/// Allocated once for a fixed resolution. Call [`RenderState::reset`] when
/// the camera or scene changes; otherwise old samples ghost into the image.
#[derive(Debug, Clone)]
pub struct RenderState {
    config: RenderConfig,
    grid_width: u32,
    grid_height: u32,
    rows: Vec<AccumRow>,
    sample_count: u64,
    frame_index: u64,
}

impl RenderState {
    /// Validate the configuration and allocate the accumulation buffer.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;

        let (grid_width, grid_height) = config.grid_size();
        let rows = (0..grid_height)
            .map(|_| AccumRow::new(grid_width as usize, config.accumulation))
            .collect();

        log::info!(
            "Render state: {}x{} output, {}x{} sample grid, {} bounces, {:?}",
            config.width,
            config.height,
            grid_width,
            grid_height,
            config.max_bounces,
            config.accumulation
        );

        Ok(Self {
            config,
            grid_width,
            grid_height,
            rows,
            sample_count: 0,
            frame_index: 0,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Size of the traced grid.
    pub fn grid_size(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    /// Samples accumulated per cell since the last reset.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Frames rendered since creation. Not affected by resets.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Current averaged color of a grid cell.
    pub fn average(&self, gx: u32, gy: u32) -> Option<Color> {
        self.rows
            .get(gy as usize)
            .and_then(|row| row.averages.get(gx as usize))
            .copied()
    }

    /// Drop all accumulated history.
    pub fn reset(&mut self) {
        log::info!("Resetting accumulation after {} samples", self.sample_count);
        for row in &mut self.rows {
            row.clear();
        }
        self.sample_count = 0;
    }

    /// Render one frame into `frame` and fold it into the history.
    ///
    /// Returns once every row task has finished.
    pub fn render_frame<M: Bsdf>(
        &mut self,
        scene: &Scene<M>,
        camera: &Camera,
        frame: &mut FrameBuffer,
    ) -> Result<FrameStats, RenderError> {
        let config = &self.config;
        let expected = config.width as usize * config.height as usize;
        if frame.width != config.width
            || frame.height != config.height
            || frame.pixels.len() != expected
        {
            return Err(RenderError::FrameSize {
                width: config.width,
                height: config.height,
                actual_width: frame.width,
                actual_height: frame.height,
            });
        }

        let start = Instant::now();
        self.sample_count += 1;

        let samples = self.sample_count;
        let frame_index = self.frame_index;
        let grid_width = self.grid_width;
        let step = config.sample_step;
        let width = config.width as usize;
        let mode = config.accumulation;

        self.rows
            .par_iter_mut()
            .zip(frame.pixels.par_chunks_mut(width * step as usize))
            .enumerate()
            .for_each(|(gy, (row, block))| {
                let mut rng = Lcg::for_row(config.seed, frame_index, gy as u32);
                let y = gy as u32 * step;

                for gx in 0..grid_width {
                    let x = gx * step;
                    let sample = sanitize(render_pixel(scene, camera, x, y, config, &mut rng));
                    let average = row.accumulate(gx as usize, sample, samples, mode);
                    let rgba = color_to_rgba(average);

                    // Replicate into the rest of the block
                    let x = x as usize;
                    let x_end = (x + step as usize).min(width);
                    for line in block.chunks_mut(width) {
                        line[x..x_end].fill(rgba);
                    }
                }
            });

        self.frame_index += 1;

        let stats = FrameStats {
            frame_index,
            samples,
            elapsed: start.elapsed(),
        };
        log::debug!(
            "Frame {} ({} samples) rendered in {:?} ({:.1} fps)",
            stats.frame_index,
            stats.samples,
            stats.elapsed,
            stats.fps()
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Triangle};
    use raypixel_math::Vec3;

    fn sky_only(config: &RenderConfig) -> (RenderState, FrameBuffer) {
        let state = RenderState::new(config.clone()).unwrap();
        let frame = FrameBuffer::new(config.width, config.height);
        (state, frame)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RenderConfig::default().with_resolution(0, 0);
        assert!(matches!(
            RenderState::new(config),
            Err(RenderError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_mismatched_frame() {
        let config = RenderConfig::default().with_resolution(4, 4);
        let mut state = RenderState::new(config).unwrap();
        let mut frame = FrameBuffer::new(5, 4);

        let err = state
            .render_frame(&Scene::<Material>::new(), &Camera::default(), &mut frame)
            .unwrap_err();
        assert!(matches!(err, RenderError::FrameSize { actual_width: 5, .. }));
        assert_eq!(state.sample_count(), 0);
    }

    #[test]
    fn test_rejects_resized_frame_fields() {
        let config = RenderConfig::default().with_resolution(4, 4);
        let mut state = RenderState::new(config).unwrap();
        let mut frame = FrameBuffer::new(2, 2);
        frame.width = 4;
        frame.height = 4;

        let err = state
            .render_frame(&Scene::<Material>::new(), &Camera::default(), &mut frame)
            .unwrap_err();
        assert!(matches!(err, RenderError::FrameSize { actual_width: 4, actual_height: 4, .. }));
        assert_eq!(state.sample_count(), 0);
    }

    #[test]
    fn test_counters_and_reset() {
        let config = RenderConfig::default().with_resolution(4, 4);
        let (mut state, mut frame) = sky_only(&config);
        let scene: Scene = Scene::new();

        for i in 0..3 {
            let stats = state.render_frame(&scene, &Camera::default(), &mut frame).unwrap();
            assert_eq!(stats.frame_index, i);
            assert_eq!(stats.samples, i + 1);
        }

        state.reset();
        assert_eq!(state.sample_count(), 0);
        assert_eq!(state.frame_index(), 3);
        assert_eq!(state.average(0, 0), Some(Color::ZERO));
        assert_eq!(state.average(4, 0), None);
    }

    #[test]
    fn test_static_sky_is_stable() {
        let config = RenderConfig::default().with_resolution(6, 4);
        let (mut state, mut frame) = sky_only(&config);
        let scene: Scene = Scene::new();
        let camera = Camera::default();

        state.render_frame(&scene, &camera, &mut frame).unwrap();
        let first = frame.clone();
        state.render_frame(&scene, &camera, &mut frame).unwrap();

        assert_eq!(frame, first);
        let ray = camera.get_ray(raypixel_math::Vec2::new(2.0, 1.0), &config);
        let expected = crate::sky_color(&ray);
        let average = state.average(2, 1).unwrap();
        assert!((average - expected).length() < 1e-12);
    }

    #[test]
    fn test_sample_step_replicates_blocks() {
        let config = RenderConfig {
            sample_step: 3,
            ..RenderConfig::default().with_resolution(7, 5)
        };
        let (mut state, mut frame) = sky_only(&config);
        assert_eq!(state.grid_size(), (3, 2));

        let camera = Camera::default();
        state
            .render_frame(&Scene::<Material>::new(), &camera, &mut frame)
            .unwrap();

        for y in 0..5 {
            for x in 0..7 {
                let (gx, gy) = (x / 3, y / 3);
                let traced = frame.get_pixel(gx * 3, gy * 3);
                assert_eq!(frame.get_pixel(x, y), traced, "pixel {},{}", x, y);
            }
        }
        // Rows 0 and 3 are traced at different heights, so they differ
        assert_ne!(frame.get_pixel(0, 0), frame.get_pixel(0, 3));
    }

    #[test]
    fn test_window_forgets_old_samples() {
        let mut row = AccumRow::new(1, Accumulation::Window { depth: 2 });
        let mode = Accumulation::Window { depth: 2 };

        assert_eq!(row.accumulate(0, Color::splat(1.0), 1, mode), Color::splat(1.0));
        assert_eq!(row.accumulate(0, Color::splat(3.0), 2, mode), Color::splat(2.0));
        assert_eq!(row.accumulate(0, Color::splat(5.0), 3, mode), Color::splat(4.0));
        assert_eq!(row.accumulate(0, Color::splat(5.0), 4, mode), Color::splat(5.0));
    }

    #[test]
    fn test_cumulative_average() {
        let mut row = AccumRow::new(2, Accumulation::Cumulative);
        let mode = Accumulation::Cumulative;

        row.accumulate(1, Color::splat(1.0), 1, mode);
        row.accumulate(1, Color::splat(2.0), 2, mode);
        let avg = row.accumulate(1, Color::splat(6.0), 3, mode);

        assert_eq!(avg, Color::splat(3.0));
        assert_eq!(row.averages[0], Color::ZERO);
    }

    #[test]
    fn test_frames_are_deterministic() {
        let mut scene = Scene::new();
        scene.push(Triangle::new(
            Vec3::new(-50.0, -50.0, -1.0),
            Vec3::new(50.0, -50.0, -1.0),
            Vec3::new(0.0, 50.0, -1.0),
            Material::diffuse(Color::splat(0.8)),
        ));
        let config = RenderConfig::default().with_resolution(16, 12).with_quality(4, 1);

        let render = || {
            let (mut state, mut frame) = sky_only(&config);
            for _ in 0..3 {
                state.render_frame(&scene, &Camera::default(), &mut frame).unwrap();
            }
            frame
        };

        assert_eq!(render(), render());
    }
}
