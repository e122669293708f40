//! Error types for frame submission and GPU hand-off

use thiserror::Error;

use crate::renderer::QueueState;
use crate::scene::ShapeKind;

/// Everything that can abort a frame.
///
/// None of these are retried: a frame is recomputed from scratch on the next
/// tick, so the caller only has to skip drawing and report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// More visible entities than the render queue can hold
    #[error("render queue is full ({capacity} records)")]
    QueueFull { capacity: usize },

    /// Shape kind that has no queue encoding
    #[error("shape kind {0:?} cannot be encoded into a queue record")]
    UnencodableShape(ShapeKind),

    /// Shape payload that would put garbage into the GPU buffer
    #[error("invalid {kind:?} payload: {reason}")]
    InvalidShape {
        kind: ShapeKind,
        reason: &'static str,
    },

    #[error("unknown shape kind tag {0}")]
    UnknownShapeKind(u32),

    #[error("unknown category tag {0}")]
    UnknownCategory(u32),

    #[error("unknown shape operator tag {0}")]
    UnknownOperator(u32),

    /// Render queue used out of its Begin/Submit/End order
    #[error("render queue {operation} not allowed while {state:?}")]
    AccessOrder {
        operation: &'static str,
        state: QueueState,
    },

    /// Queue built with a different capacity than the GPU buffer
    #[error("render queue holds {actual} records but the GPU buffer holds {expected}")]
    CapacityMismatch { expected: usize, actual: usize },

    /// Uniforms built for a different frame than the queue being uploaded
    #[error("frame uniforms count {uniforms} records but the queue holds {queue}")]
    CountMismatch { uniforms: u32, queue: usize },

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
