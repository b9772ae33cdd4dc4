//! Shared GPU types and utilities for Helio render passes

pub mod fullscreen;
pub mod texture;

pub use fullscreen::{compose_shader, FullScreenPass, FULLSCREEN_VERTEX_WGSL};
pub use texture::{padded_bytes_per_row, rgba8_len, upload_rgba8};
