//! Render pass trait and execution context

use crate::{PassReflection, PassSerializer, RenderData, Result};

/// Render pass trait - implemented by every pass the graph can host
pub trait RenderPass {
    /// Unique name for this pass
    fn name(&self) -> &str;

    /// Declare the images this pass reads and writes
    ///
    /// Called by the graph while it is being built. The declaration is static:
    /// it must not depend on per-frame state.
    fn reflect(&self, reflector: &mut PassReflection);

    /// Execute the pass
    ///
    /// Called every frame. `data` holds the images bound to the names the pass
    /// declared in [`RenderPass::reflect`].
    fn execute(&mut self, ctx: &mut PassContext, data: &RenderData) -> Result<()>;

    /// Store the pass settings
    fn serialize(&self, _serializer: &mut PassSerializer) -> Result<()> {
        // Default: nothing to persist
        Ok(())
    }

    /// Draw editable widgets for the pass settings
    ///
    /// When `group` is given the widgets are drawn inside a collapsing group
    /// with that name.
    #[cfg(feature = "ui")]
    fn render_ui(&mut self, _ui: &mut egui::Ui, _group: Option<&str>) {}
}

/// Context for pass execution
pub struct PassContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,

    /// Command encoder for recording GPU commands
    pub encoder: &'a mut wgpu::CommandEncoder,
}

impl<'a> PassContext<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> Self {
        Self {
            device,
            queue,
            encoder,
        }
    }

    /// Begin a render pass
    pub fn begin_render_pass(
        &mut self,
        label: &str,
        color_attachments: &[Option<wgpu::RenderPassColorAttachment>],
        depth_stencil_attachment: Option<wgpu::RenderPassDepthStencilAttachment>,
    ) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments,
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}
