//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.
//! Everything up to the GPU upload (encoding, the render queue, frame
//! submission) runs without a device.

pub mod encode;
pub mod gpu_types;
pub mod queue;
pub mod sdf_pipeline;
pub mod submit;

pub use encode::{decode, encode};
pub use gpu_types::{FrameUniforms, QueueRecord};
pub use queue::{QueueState, QueueWriter, RenderQueue};
pub use sdf_pipeline::SdfRenderer;
pub use submit::{FrameContext, FrameOutput, FrameStats};
