//! Texture helpers

/// Create a sampled `Rgba8Unorm` texture and fill it with `texels`
///
/// `texels` must hold `width * height * 4` bytes, tightly packed.
pub fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    texels: &[u8],
) -> wgpu::Texture {
    debug_assert_eq!(texels.len(), rgba8_len(width, height));

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        texels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}

/// Byte length of a tightly packed RGBA8 image
pub fn rgba8_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Row pitch for texture <-> buffer copies, padded to
/// `wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`
pub fn padded_bytes_per_row(width: u32, bytes_per_texel: u32) -> u32 {
    let unpadded = width * bytes_per_texel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
