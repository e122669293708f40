//! Scene data the renderer consumes
//!
//! Components are plain data owned by whichever entity store holds them:
//! - `Transform`: where an entity is
//! - `Renderable`: what to draw there
//! - `CullObject`: optional bounding radius for frustum culling

pub mod cull;
pub mod shape;
pub mod store;
pub mod transform;

pub use cull::CullObject;
pub use shape::{Category, Renderable, Shape, ShapeKind, ShapeOperator};
pub use store::{EntityId, RenderItem, RenderSource, Scene, SceneEntity};
pub use transform::Transform;
