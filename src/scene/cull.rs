//! Opt-in frustum culling bound

use serde::{Deserialize, Serialize};

use super::shape::Shape;
use super::transform::Transform;

/// Bounding sphere radius for an entity that takes part in frustum culling.
///
/// Entities without this component are always submitted. That covers ground
/// and other environment geometry as well as line-like effects, which have no
/// cheap bound. The radius must over-approximate the drawn extent: a sphere
/// that is too small culls visible geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCullObject")]
pub struct CullObject {
    radius: f32,
}

/// Serialized form; loading goes through `CullObject::new`
#[derive(Deserialize)]
struct RawCullObject {
    radius: f32,
}

impl From<RawCullObject> for CullObject {
    fn from(raw: RawCullObject) -> Self {
        Self::new(raw.radius)
    }
}

impl CullObject {
    /// Negative or NaN radii collapse to a point bound
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }

    /// Bound derived from the shape and transform scale
    pub fn enclosing(shape: &Shape, transform: &Transform) -> Option<Self> {
        shape
            .bounding_radius()
            .map(|r| Self::new(r * transform.max_scale()))
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}
