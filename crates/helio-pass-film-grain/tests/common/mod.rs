//! Headless GPU helpers shared by the integration tests

#![allow(dead_code)]

use helio_graph::{PassContext, RenderData, RenderPass, TextureResource};

pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

/// A headless device, or `None` when the machine has no usable adapter
pub fn gpu() -> Option<Gpu> {
    let _ = env_logger::builder().is_test(true).try_init();

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))?;

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("Film Grain Test Device"),
            required_features: wgpu::Features::empty(),
            required_limits: adapter.limits(),
            memory_hints: wgpu::MemoryHints::default(),
        },
        None,
    ))
    .ok()?;

    log::info!("Testing on {:?}", adapter.get_info().name);
    Some(Gpu { device, queue })
}

/// Skip the current test when no adapter is available
macro_rules! require_gpu {
    () => {
        match common::gpu() {
            Some(gpu) => gpu,
            None => {
                log::warn!("No GPU adapter available, skipping");
                return;
            }
        }
    };
}

pub fn solid_rgba8(gpu: &Gpu, width: u32, height: u32, texel: [u8; 4]) -> wgpu::Texture {
    let texels: Vec<u8> = (0..width * height).flat_map(|_| texel).collect();
    libhelio::upload_rgba8(&gpu.device, &gpu.queue, "Test Source", width, height, &texels)
}

pub fn target(gpu: &Gpu, width: u32, height: u32, format: wgpu::TextureFormat) -> wgpu::Texture {
    gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Test Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// Run `pass` once through the graph entry point and submit
pub fn run(
    gpu: &Gpu,
    pass: &mut dyn RenderPass,
    source: &wgpu::Texture,
    target: &wgpu::Texture,
) -> helio_graph::Result<()> {
    let source_view = source.create_view(&wgpu::TextureViewDescriptor::default());
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut data = RenderData::new();
    data.insert("source", TextureResource::from_texture(source, &source_view))
        .insert("target", TextureResource::from_texture(target, &target_view));

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Encoder"),
        });
    {
        let mut ctx = PassContext::new(&gpu.device, &gpu.queue, &mut encoder);
        pass.execute(&mut ctx, &data)?;
    }
    gpu.queue.submit(Some(encoder.finish()));
    Ok(())
}

/// Copy an `Rgba8Unorm` texture back to the CPU
pub fn read_rgba8(gpu: &Gpu, texture: &wgpu::Texture) -> Vec<[u8; 4]> {
    let (width, height) = (texture.width(), texture.height());
    let padded = libhelio::padded_bytes_per_row(width, 4);

    let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Test Readback"),
        size: padded as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Readback Encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        texture.size(),
    );
    gpu.queue.submit(Some(encoder.finish()));

    let slice = buffer.slice(..);
    slice.map_async(wgpu::MapMode::Read, |result| {
        result.expect("map readback buffer");
    });
    gpu.device.poll(wgpu::Maintain::Wait);

    let bytes = slice.get_mapped_range();
    let texels = bytes
        .chunks(padded as usize)
        .flat_map(|row| row[..(width * 4) as usize].chunks_exact(4))
        .map(|t| [t[0], t[1], t[2], t[3]])
        .collect();
    drop(bytes);
    buffer.unmap();
    texels
}
