//! World-space placement of an entity

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position, orientation and scale of an entity.
///
/// Physics writes `position` once per tick; culling and encoding only read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles (radians, XYZ)
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Largest scale factor on any axis
    #[inline]
    pub fn max_scale(&self) -> f32 {
        self.scale.abs().max_element()
    }
}
