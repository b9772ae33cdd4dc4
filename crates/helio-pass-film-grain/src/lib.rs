//! Film grain post-processing pass
//!
//! Adds synthetic film grain to an image: a noise texture is sampled, tinted
//! and scaled, optionally faded out in the brighter part of the image, and
//! added to the source in a single full-screen draw.
//!
//! The pass reads one image (`"source"`) and writes one image (`"target"`) of
//! the same size. The noise texture is generated on the CPU at the target
//! resolution and only regenerated when that resolution changes or when the
//! noise flavour (colored vs monochrome) is switched.

pub mod noise;
pub mod params;
pub mod uniforms;

#[cfg(feature = "ui")]
mod ui;

pub use noise::{NoiseCache, NoiseImage};
pub use params::{FilmGrainParams, MIN_GRAIN_SIZE};
pub use uniforms::FilmGrainUniforms;

use glam::{Vec2, Vec3};
use helio_graph::{
    Error, PassContext, PassReflection, PassSerializer, RenderData, RenderPass, Result,
    TextureResource,
};
use libhelio::FullScreenPass;

/// Name of the reflected input image
pub const SOURCE: &str = "source";
/// Name of the reflected output image
pub const TARGET: &str = "target";

const KEY_GRAIN_SIZE: &str = "grain_size";
const KEY_INTENSITY: &str = "intensity";
const KEY_GRAIN_COLOR: &str = "grain_color";
const KEY_LUMINANCE_RANGE: &str = "luminance_range";
const KEY_USE_LUMINANCE_RANGE: &str = "use_luminance_range";
const KEY_USE_COLORED_NOISE: &str = "use_colored_noise";

const SHADER: &str = include_str!("../shaders/film_grain.wgsl");

/// Pipeline objects, rebuilt when the target format changes
struct GpuState {
    pass: FullScreenPass,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
}

struct NoiseTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Film grain render pass
pub struct FilmGrain {
    params: FilmGrainParams,
    noise: NoiseCache,
    /// Freeze the grain animation
    paused: bool,
    frame: u64,
    gpu: Option<GpuState>,
    noise_texture: Option<NoiseTexture>,
}

impl FilmGrain {
    /// Create the pass. No GPU work happens until the first execute.
    pub fn new(params: FilmGrainParams) -> Self {
        Self {
            params: params.sanitized(),
            noise: NoiseCache::new(),
            paused: false,
            frame: 0,
            gpu: None,
            noise_texture: None,
        }
    }

    /// Restore a pass from settings written by [`RenderPass::serialize`]
    ///
    /// Missing keys keep their default value.
    pub fn deserialize(serializer: &PassSerializer) -> Result<Self> {
        let defaults = FilmGrainParams::default();
        let params = FilmGrainParams {
            grain_size: serializer
                .get(KEY_GRAIN_SIZE)?
                .unwrap_or(defaults.grain_size),
            intensity: serializer
                .get(KEY_INTENSITY)?
                .unwrap_or(defaults.intensity),
            grain_color: serializer
                .get(KEY_GRAIN_COLOR)?
                .unwrap_or(defaults.grain_color),
            luminance_range: serializer
                .get(KEY_LUMINANCE_RANGE)?
                .unwrap_or(defaults.luminance_range),
            use_luminance_range: serializer
                .get(KEY_USE_LUMINANCE_RANGE)?
                .unwrap_or(defaults.use_luminance_range),
            use_colored_noise: serializer
                .get(KEY_USE_COLORED_NOISE)?
                .unwrap_or(defaults.use_colored_noise),
        };
        Ok(Self::new(params))
    }

    pub fn with_grain_size(mut self, grain_size: f32) -> Self {
        self.set_grain_size(grain_size);
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.set_intensity(intensity);
        self
    }

    pub fn with_grain_color(mut self, color: Vec3) -> Self {
        self.set_grain_color(color);
        self
    }

    pub fn with_luminance_range(mut self, range: Vec2) -> Self {
        self.set_luminance_range(range);
        self
    }

    pub fn with_luminance_gating(mut self, enabled: bool) -> Self {
        self.set_luminance_gating(enabled);
        self
    }

    pub fn with_colored_noise(mut self, colored: bool) -> Self {
        self.set_colored_noise(colored);
        self
    }

    pub fn params(&self) -> &FilmGrainParams {
        &self.params
    }

    /// Replace every setting at once
    pub fn set_params(&mut self, params: FilmGrainParams) {
        let params = params.sanitized();
        if params.use_colored_noise != self.params.use_colored_noise {
            self.noise.mark_dirty();
        }
        self.params = params;
    }

    pub fn set_grain_size(&mut self, grain_size: f32) {
        self.params.grain_size = params::sanitize_grain_size(grain_size);
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.params.intensity = params::sanitize_intensity(intensity);
    }

    pub fn set_grain_color(&mut self, color: Vec3) {
        self.params.grain_color = params::sanitize_grain_color(color);
    }

    pub fn set_luminance_range(&mut self, range: Vec2) {
        self.params.luminance_range = params::sanitize_luminance_range(range);
    }

    pub fn set_luminance_gating(&mut self, enabled: bool) {
        self.params.use_luminance_range = enabled;
    }

    pub fn set_colored_noise(&mut self, colored: bool) {
        if colored != self.params.use_colored_noise {
            self.params.use_colored_noise = colored;
            self.noise.mark_dirty();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Regeneration state of the noise texture
    pub fn noise_cache(&self) -> &NoiseCache {
        &self.noise
    }

    /// Apply the grain to `source` and write the result into `target`
    ///
    /// Both images must have the same size. `target` must be renderable and
    /// must not be a view of `source`.
    pub fn execute_to(
        &mut self,
        ctx: &mut PassContext,
        source: &TextureResource,
        target: &TextureResource,
    ) -> Result<()> {
        if target.width == 0 || target.height == 0 {
            return Err(Error::Resource(format!(
                "film grain target is {}x{}",
                target.width, target.height
            )));
        }
        if source.resolution() != target.resolution() {
            return Err(Error::Resource(format!(
                "film grain source {}x{} does not match target {}x{}",
                source.width, source.height, target.width, target.height
            )));
        }

        log::trace!(
            "Film grain frame {} at {}x{}",
            self.frame,
            target.width,
            target.height
        );

        self.prepare_pipeline(ctx.device, target.format);
        self.prepare_noise(ctx.device, ctx.queue, target.resolution());

        let gpu = self
            .gpu
            .as_ref()
            .ok_or_else(|| Error::Pipeline("FilmGrain pipeline build failed".into()))?;
        let noise = self
            .noise_texture
            .as_ref()
            .ok_or_else(|| Error::Resource("FilmGrain noise texture missing".into()))?;

        let uniforms = FilmGrainUniforms::new(&self.params, uniforms::noise_offset(self.frame));
        ctx.queue
            .write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Film Grain Bind Group"),
            layout: gpu.pass.bind_group_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&noise.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&gpu.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: gpu.uniform_buffer.as_entire_binding(),
                },
            ],
        });

        {
            let mut render_pass = ctx.begin_render_pass(
                "Film Grain Pass",
                &[Some(FullScreenPass::color_attachment(target.view))],
                None,
            );
            gpu.pass.record(&mut render_pass, &bind_group);
        }

        if !self.paused {
            self.frame = self.frame.wrapping_add(1);
        }

        Ok(())
    }

    fn prepare_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        let current = self.gpu.as_ref().map(|gpu| gpu.pass.target_format());
        if current == Some(format) {
            return;
        }

        let pass = FullScreenPass::new(device, "Film Grain", SHADER, &layout_entries(), format);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Film Grain Noise Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Film Grain Uniform Buffer"),
            size: std::mem::size_of::<FilmGrainUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.gpu = Some(GpuState {
            pass,
            sampler,
            uniform_buffer,
        });
    }

    fn prepare_noise(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, resolution: (u32, u32)) {
        if self.noise_texture.is_none() {
            self.noise.mark_dirty();
        }

        if let Some(image) = self.noise.refresh(resolution, self.params.use_colored_noise) {
            let texture = libhelio::upload_rgba8(
                device,
                queue,
                "Film Grain Noise",
                image.width,
                image.height,
                image.as_bytes(),
            );
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            self.noise_texture = Some(NoiseTexture {
                _texture: texture,
                view,
            });
        }
    }
}

impl Default for FilmGrain {
    fn default() -> Self {
        Self::new(FilmGrainParams::default())
    }
}

impl RenderPass for FilmGrain {
    fn name(&self) -> &str {
        "film_grain"
    }

    fn reflect(&self, reflector: &mut PassReflection) {
        reflector.add_input(SOURCE, "Image to add grain to");
        reflector.add_output(TARGET, "Image with grain applied");
    }

    fn execute(&mut self, ctx: &mut PassContext, data: &RenderData) -> Result<()> {
        let source = *data.require(SOURCE)?;
        let target = *data.require(TARGET)?;
        self.execute_to(ctx, &source, &target)
    }

    fn serialize(&self, serializer: &mut PassSerializer) -> Result<()> {
        serializer.set(KEY_GRAIN_SIZE, &self.params.grain_size)?;
        serializer.set(KEY_INTENSITY, &self.params.intensity)?;
        serializer.set(KEY_GRAIN_COLOR, &self.params.grain_color)?;
        serializer.set(KEY_LUMINANCE_RANGE, &self.params.luminance_range)?;
        serializer.set(KEY_USE_LUMINANCE_RANGE, &self.params.use_luminance_range)?;
        serializer.set(KEY_USE_COLORED_NOISE, &self.params.use_colored_noise)?;
        Ok(())
    }

    #[cfg(feature = "ui")]
    fn render_ui(&mut self, ui: &mut egui::Ui, group: Option<&str>) {
        let widgets = match group {
            Some(name) => ui.collapsing(name, |ui| self.draw_widgets(ui)).body_returned,
            None => Some(self.draw_widgets(ui)),
        };

        if let Some(widgets) = widgets {
            if widgets.luminance_low.drag_stopped() {
                log::trace!(
                    "Film grain luminance range {:?}",
                    self.params.luminance_range
                );
            }
            if widgets.pause.changed() {
                log::debug!("Film grain animation paused: {}", self.paused);
            }
            if widgets.colored_noise.changed() {
                log::debug!(
                    "Film grain noise switched to colored={}",
                    self.params.use_colored_noise
                );
            }
        }
    }
}

/// Source, noise, sampler, uniforms
fn layout_entries() -> [wgpu::BindGroupLayoutEntry; 4] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                // Loaded, never filtered, so float targets of any precision work
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 3,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<FilmGrainUniforms>() as u64
                ),
            },
            count: None,
        },
    ]
}
