//! Full-screen triangle pipeline for post-processing passes
//!
//! A pass supplies only a fragment stage; the vertex stage from
//! `shaders/fullscreen.wgsl` is prepended so every post-processing shader
//! receives the same `FullScreenVertex` input (clip position + uv).

/// Vertex stage shared by all full-screen passes (entry point `vs_main`)
pub const FULLSCREEN_VERTEX_WGSL: &str = include_str!("../shaders/fullscreen.wgsl");

/// Build the complete WGSL module for a fragment stage
///
/// The fragment source can refer to `FullScreenVertex` and must provide
/// `fs_main`.
pub fn compose_shader(fragment: &str) -> String {
    let mut source = String::with_capacity(FULLSCREEN_VERTEX_WGSL.len() + fragment.len() + 1);
    source.push_str(FULLSCREEN_VERTEX_WGSL);
    source.push('\n');
    source.push_str(fragment);
    source
}

/// A single bind group, a single color target, three vertices
pub struct FullScreenPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    target_format: wgpu::TextureFormat,
}

impl FullScreenPass {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        fragment_source: &str,
        layout_entries: &[wgpu::BindGroupLayoutEntry],
        target_format: wgpu::TextureFormat,
    ) -> Self {
        log::info!("Creating full-screen pipeline '{}' for {:?}", label, target_format);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(compose_shader(fragment_source).into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} Bind Group Layout", label)),
            entries: layout_entries,
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", label)),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} Pipeline", label)),
            layout: Some(&layout),
            cache: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            target_format,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Color attachment that keeps the existing contents of `target`
    ///
    /// The triangle covers every pixel, so whatever was loaded is overwritten.
    pub fn color_attachment(target: &wgpu::TextureView) -> wgpu::RenderPassColorAttachment<'_> {
        wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        }
    }

    /// Record the full-screen draw into an open render pass
    pub fn record(&self, pass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
