//! Grain noise generation and the regeneration rule for the cached texture

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed for the grain pattern. A fixed seed keeps the pattern stable across
/// regenerations, so a resize does not visibly reshuffle the grain.
pub const NOISE_SEED: u64 = 0x6772_6169_6e00_0001;

/// Tightly packed RGBA8 noise, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseImage {
    pub width: u32,
    pub height: u32,
    texels: Vec<[u8; 4]>,
}

impl NoiseImage {
    /// Uniform noise in every channel, or one value replicated into RGB when
    /// `colored` is false. Alpha is always opaque.
    pub fn generate(width: u32, height: u32, colored: bool, seed: u64) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let count = width as usize * height as usize;

        let mut rng = StdRng::seed_from_u64(seed);
        let texels = (0..count)
            .map(|_| {
                if colored {
                    [rng.gen(), rng.gen(), rng.gen(), u8::MAX]
                } else {
                    let v: u8 = rng.gen();
                    [v, v, v, u8::MAX]
                }
            })
            .collect();

        Self {
            width,
            height,
            texels,
        }
    }

    pub fn texels(&self) -> &[[u8; 4]] {
        &self.texels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

/// Tracks whether the cached noise texture still matches what the pass needs
///
/// The texture is regenerated when the target resolution changes or when a
/// parameter that shapes the noise itself (colored vs monochrome) changes.
#[derive(Debug, Default)]
pub struct NoiseCache {
    resolution: Option<(u32, u32)>,
    dirty: bool,
    generation: u64,
}

impl NoiseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Resolution of the cached noise, `None` before the first refresh
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.resolution
    }

    /// Number of times the noise has been generated
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_stale(&self, resolution: (u32, u32)) -> bool {
        self.dirty || self.resolution != Some(resolution)
    }

    /// Generate new noise if the cache is stale for `resolution`
    ///
    /// Returns the image to upload, or `None` when the cached texture is
    /// still valid (in which case nothing changes).
    pub fn refresh(&mut self, resolution: (u32, u32), colored: bool) -> Option<NoiseImage> {
        if !self.is_stale(resolution) {
            return None;
        }

        let image = NoiseImage::generate(resolution.0, resolution.1, colored, NOISE_SEED);
        self.resolution = Some(resolution);
        self.dirty = false;
        self.generation += 1;

        log::debug!(
            "Regenerated film grain noise {}x{} (colored={}, generation {})",
            image.width,
            image.height,
            colored,
            self.generation
        );

        Some(image)
    }
}
