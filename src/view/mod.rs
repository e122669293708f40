//! Camera and visibility
//!
//! The frustum is rebuilt from the camera every frame; nothing here is cached
//! across frames.

pub mod camera;
pub mod frustum;

pub use camera::Camera;
pub use frustum::{Frustum, Plane, PlaneSide, Projection, ViewBasis};
