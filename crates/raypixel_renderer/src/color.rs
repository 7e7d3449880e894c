//! Color type and tone mapping.

use raypixel_math::{Interval, Vec3};

/// Linear RGB color. Channels are unbounded while shading and only clamped
/// when converted to 8-bit.
pub type Color = Vec3;

/// Replace NaN channels with zero.
///
/// A NaN here means a degenerate material or geometry upstream. Debug builds
/// trap on it; release builds log and clamp so it never reaches the display.
pub fn sanitize(color: Color) -> Color {
    if !color.is_nan() {
        return color;
    }

    debug_assert!(false, "NaN color reached tone mapping: {:?}", color);
    log::warn!("NaN color reached tone mapping: {:?}", color);

    let fix = |c: f64| if c.is_nan() { 0.0 } else { c };
    Color::new(fix(color.x), fix(color.y), fix(color.z))
}

/// Scale a linear channel to 0-255 and clamp.
#[inline]
pub fn channel_to_u8(c: f64) -> u8 {
    Interval::CHANNEL.clamp(c * 255.0) as u8
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let color = sanitize(color);
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
        255,
    ]
}
