//! User-tunable film grain settings

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Smallest grain size accepted; keeps the noise scale finite
pub const MIN_GRAIN_SIZE: f32 = 0.01;

/// Film grain settings
///
/// Missing fields deserialize to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmGrainParams {
    /// Size of one grain in pixels (default: 0.75)
    pub grain_size: f32,
    /// Grain strength (default: 0.5)
    pub intensity: f32,
    /// Tint applied to the grain (default: white)
    pub grain_color: Vec3,
    /// Luminance window used for gating, `x <= y` (default: 0.0..0.5)
    pub luminance_range: Vec2,
    /// Fade grain out above the luminance window (default: true)
    pub use_luminance_range: bool,
    /// Independent noise per channel instead of monochrome (default: true)
    pub use_colored_noise: bool,
}

impl FilmGrainParams {
    /// A copy with every field finite and inside its valid range
    pub fn sanitized(mut self) -> Self {
        self.grain_size = sanitize_grain_size(self.grain_size);
        self.intensity = sanitize_intensity(self.intensity);
        self.grain_color = sanitize_grain_color(self.grain_color);
        self.luminance_range = sanitize_luminance_range(self.luminance_range);
        self
    }
}

impl Default for FilmGrainParams {
    fn default() -> Self {
        Self {
            grain_size: 0.75,
            intensity: 0.5,
            grain_color: Vec3::ONE,
            luminance_range: Vec2::new(0.0, 0.5),
            use_luminance_range: true,
            use_colored_noise: true,
        }
    }
}

// Non-finite values cannot be persisted, so every sanitizer maps them back
// into the valid range.

pub(crate) fn sanitize_grain_size(size: f32) -> f32 {
    if !size.is_finite() {
        return FilmGrainParams::default().grain_size;
    }
    size.max(MIN_GRAIN_SIZE)
}

pub(crate) fn sanitize_intensity(intensity: f32) -> f32 {
    if !intensity.is_finite() {
        return 0.0;
    }
    intensity.max(0.0)
}

pub(crate) fn sanitize_grain_color(color: Vec3) -> Vec3 {
    let channel = |c: f32| if c.is_finite() { c } else { 1.0 };
    Vec3::new(channel(color.x), channel(color.y), channel(color.z))
}

pub(crate) fn sanitize_luminance_range(range: Vec2) -> Vec2 {
    let default = FilmGrainParams::default().luminance_range;
    let x = if range.x.is_finite() { range.x } else { default.x };
    let y = if range.y.is_finite() { range.y } else { default.y };
    Vec2::new(x.min(y), x.max(y))
}
