//! Per-frame resources bound by the graph

use crate::{Error, Result};
use std::collections::HashMap;

/// An image bound to a pass for one frame
///
/// The graph owns the texture; passes only borrow the view.
#[derive(Debug, Copy, Clone)]
pub struct TextureResource<'a> {
    pub view: &'a wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

impl<'a> TextureResource<'a> {
    pub fn new(
        view: &'a wgpu::TextureView,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            view,
            width,
            height,
            format,
        }
    }

    /// Describe a view of mip 0 of `texture`
    pub fn from_texture(texture: &wgpu::Texture, view: &'a wgpu::TextureView) -> Self {
        Self::new(view, texture.width(), texture.height(), texture.format())
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Images the graph bound for the current frame, keyed by reflected name
#[derive(Debug, Default)]
pub struct RenderData<'a> {
    resources: HashMap<String, TextureResource<'a>>,
}

impl<'a> RenderData<'a> {
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, resource: TextureResource<'a>) -> &mut Self {
        self.resources.insert(name.to_string(), resource);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TextureResource<'a>> {
        self.resources.get(name)
    }

    /// Like [`RenderData::get`], but a missing image is an error
    pub fn require(&self, name: &str) -> Result<&TextureResource<'a>> {
        self.get(name)
            .ok_or_else(|| Error::MissingResource(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
