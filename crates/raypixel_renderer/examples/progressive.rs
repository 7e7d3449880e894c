//! Progressive render example.
//!
//! Stands in for a windowed viewer: builds a small room, renders frames into
//! a frame buffer the way a presentation loop would, and saves the final
//! accumulated image as PNG.
//!
//! Usage: `cargo run --release --example progressive [config.json] [frames]`

use anyhow::{Context, Result};
use raypixel_renderer::{
    Camera, Color, FrameBuffer, Material, RenderConfig, RenderState, Scene, Triangle, Vec3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path))?
        }
        None => RenderConfig::default().with_resolution(320, 240),
    };
    let frames: u32 = match args.next() {
        Some(n) => n.parse().context("frame count must be a number")?,
        None => 64,
    };

    let scene = build_scene();
    log::info!("Scene has {} triangles", scene.len());

    let camera = Camera::new(Vec3::new(0.0, -6.0, 1.0));
    let mut state = RenderState::new(config.clone())?;
    let mut frame = FrameBuffer::new(config.width, config.height);

    let start = std::time::Instant::now();
    for _ in 0..frames {
        let stats = state.render_frame(&scene, &camera, &mut frame)?;
        if stats.frame_index % 16 == 0 {
            log::info!(
                "Frame {}: {:.1} fps, {} samples",
                stats.frame_index,
                stats.fps(),
                stats.samples
            );
        }
    }
    log::info!("Rendered {} frames in {:?}", frames, start.elapsed());

    let filename = "progressive.png";
    frame.to_image().save(filename)?;
    log::info!("Saved to {}", filename);

    Ok(())
}

/// Axis-aligned quad as two triangles, wound so the front faces `facing`.
fn quad(
    scene: &mut Scene,
    corner: Vec3,
    a: Vec3,
    b: Vec3,
    facing: Vec3,
    material: Material,
) {
    let (a, b) = if a.cross(b).dot(facing) > 0.0 { (a, b) } else { (b, a) };
    scene.push(Triangle::new(corner, corner + a, corner + a + b, material));
    scene.push(Triangle::new(corner, corner + a + b, corner + b, material));
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();
    let white = Material::diffuse(Color::new(0.8, 0.8, 0.8));
    let red = Material::diffuse(Color::new(0.8, 0.2, 0.2));
    let green = Material::diffuse(Color::new(0.2, 0.8, 0.2));
    let mirror = Material::new(Color::new(0.9, 0.9, 0.9), 0.2, 0.8, 0.0);
    let light = Material::emissive(Color::new(1.0, 0.95, 0.8), 1.0);

    let (w, d, h) = (Vec3::X * 4.0, Vec3::Y * 4.0, Vec3::Z * 4.0);
    let origin = Vec3::new(-2.0, -2.0, -1.0);

    // Floor and back wall
    quad(&mut scene, origin, w, d, Vec3::Z, white);
    quad(&mut scene, origin + d, w, h, -Vec3::Y, white);
    // Side walls
    quad(&mut scene, origin, d, h, Vec3::X, red);
    quad(&mut scene, origin + w, d, h, -Vec3::X, green);
    // Ceiling light
    quad(
        &mut scene,
        Vec3::new(-0.75, -0.75, 2.99),
        Vec3::X * 1.5,
        Vec3::Y * 1.5,
        -Vec3::Z,
        light,
    );
    // Mirror panel leaning on the back wall
    quad(
        &mut scene,
        Vec3::new(0.3, 1.5, -1.0),
        Vec3::X * 1.2,
        Vec3::new(0.0, 0.3, 2.0),
        -Vec3::Y,
        mirror,
    );

    scene
}
