//! Helio Graph - the contract between the render graph and its passes
//!
//! A pass plugs into the graph through a small surface:
//!
//! - [`RenderPass`] - reflect, execute, serialize and (optionally) draw UI
//! - [`PassReflection`] - static declaration of the images a pass reads and writes
//! - [`RenderData`] - the images the graph bound for this frame, by name
//! - [`PassSerializer`] - persisted pass settings
//!
//! Scheduling, transient allocation and aliasing belong to the graph and are
//! not part of this crate.

pub mod pass;
pub mod reflection;
pub mod resource;
pub mod serializer;

pub use pass::{PassContext, RenderPass};
pub use reflection::{PassReflection, ResourceField, ResourceKind};
pub use resource::{RenderData, TextureResource};
pub use serializer::PassSerializer;

#[cfg(feature = "ui")]
pub use egui;

/// Result type for pass operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a pass
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing resource '{0}' in render data")]
    MissingResource(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("WGPU error: {0}")]
    Wgpu(String),
}

impl From<wgpu::Error> for Error {
    fn from(err: wgpu::Error) -> Self {
        Error::Wgpu(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
