//! SDF render core - culling and render-queue submission for a GPU raymarcher
//!
//! Core modules:
//! - `scene`: Entity data (transforms, shapes, cull bounds) and entity stores
//! - `view`: Camera, projection and frustum culling
//! - `renderer`: GPU data contract, render queue, per-frame submission, wgpu pipeline
//! - `settings`: Data-driven projection and queue configuration

pub mod error;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod view;

pub use error::RenderError;
pub use settings::{RenderSettings, SettingsError};

/// Renderer configuration constants
pub mod consts {
    /// Number of queue records the GPU program is compiled against
    pub const MAX_RENDER_QUEUE: usize = 100;

    /// Default vertical field of view (degrees)
    pub const DEFAULT_FOV_DEGREES: f32 = 90.0;
    /// Default near plane distance
    pub const DEFAULT_Z_NEAR: f32 = 0.1;
    /// Default far plane distance
    pub const DEFAULT_Z_FAR: f32 = 100.0;

    /// Pitch limit for the first-person camera (degrees)
    pub const MAX_PITCH: f32 = 89.0;

    /// Binding slots hardcoded in the WGSL program
    pub const FRAME_UNIFORMS_BINDING: u32 = 0;
    pub const RENDER_QUEUE_BINDING: u32 = 1;
}
