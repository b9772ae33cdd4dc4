//! GPU parameter block for the film grain shader

use crate::FilmGrainParams;
use bytemuck::{Pod, Zeroable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Film grain uniform data - must match WGSL `FilmGrainUniforms` (48 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FilmGrainUniforms {
    pub grain_color: [f32; 3],
    pub intensity: f32,
    pub luminance_range: [f32; 2],
    pub noise_scale: [f32; 2],
    pub noise_offset: [f32; 2],
    pub use_luminance_range: u32,
    pub _pad: u32,
}

impl FilmGrainUniforms {
    pub fn new(params: &FilmGrainParams, noise_offset: [f32; 2]) -> Self {
        let params = params.sanitized();
        let scale = 1.0 / params.grain_size;

        // Gating off: the range never reaches the GPU
        let (luminance_range, use_luminance_range) = if params.use_luminance_range {
            (params.luminance_range.to_array(), 1)
        } else {
            ([0.0; 2], 0)
        };

        Self {
            grain_color: params.grain_color.to_array(),
            intensity: params.intensity,
            luminance_range,
            noise_scale: [scale, scale],
            noise_offset,
            use_luminance_range,
            _pad: 0,
        }
    }
}

/// Per-frame offset into the noise texture, in `[0, 1)` on both axes
pub fn noise_offset(frame: u64) -> [f32; 2] {
    let mut rng = StdRng::seed_from_u64(frame);
    [rng.gen(), rng.gen()]
}
