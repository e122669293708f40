//! Shape descriptors and the tags the GPU program switches on
//!
//! `Shape` is the typed sum the rest of the crate works with. It is only
//! flattened into the shared `shape_data` slots when a queue record is encoded.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Shape discriminant. Numeric values are part of the GPU contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ShapeKind {
    None = 0,
    Sphere = 1,
    Box = 2,
    Gun = 3,
    CapsuleSegment = 4,
}

impl ShapeKind {
    #[inline]
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for ShapeKind {
    type Error = RenderError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ShapeKind::None),
            1 => Ok(ShapeKind::Sphere),
            2 => Ok(ShapeKind::Box),
            3 => Ok(ShapeKind::Gun),
            4 => Ok(ShapeKind::CapsuleSegment),
            _ => Err(RenderError::UnknownShapeKind(tag)),
        }
    }
}

/// Coarse classification used by the GPU program to pick shading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u32)]
pub enum Category {
    Player = 0,
    Ground = 1,
    Enemy = 2,
    #[default]
    Object = 3,
}

impl Category {
    #[inline]
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Category {
    type Error = RenderError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Category::Player),
            1 => Ok(Category::Ground),
            2 => Ok(Category::Enemy),
            3 => Ok(Category::Object),
            _ => Err(RenderError::UnknownCategory(tag)),
        }
    }
}

/// How a shape combines with the scene accumulated before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u32)]
pub enum ShapeOperator {
    #[default]
    Union = 0,
    Intersect = 1,
    Subtract = 2,
}

impl ShapeOperator {
    #[inline]
    pub fn tag(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for ShapeOperator {
    type Error = RenderError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ShapeOperator::Union),
            1 => Ok(ShapeOperator::Intersect),
            2 => Ok(ShapeOperator::Subtract),
            _ => Err(RenderError::UnknownOperator(tag)),
        }
    }
}

/// What to draw, relative to the entity's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    None,
    Sphere {
        radius: f32,
    },
    Box {
        half_extents: Vec3,
    },
    /// Fixed model in the GPU program, placed by the record transform only
    Gun,
    /// Capsule around the segment `from..to`; endpoints are offsets from the
    /// entity position
    CapsuleSegment {
        from: Vec3,
        to: Vec3,
        radius: f32,
    },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::None => ShapeKind::None,
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Gun => ShapeKind::Gun,
            Shape::CapsuleSegment { .. } => ShapeKind::CapsuleSegment,
        }
    }

    /// Radius of a sphere around the entity origin that contains the whole
    /// unscaled shape. `None` when no cheap bound exists.
    pub fn bounding_radius(&self) -> Option<f32> {
        match *self {
            Shape::Sphere { radius } => Some(radius),
            Shape::Box { half_extents } => Some(half_extents.length()),
            Shape::CapsuleSegment { from, to, radius } => {
                Some(from.length().max(to.length()) + radius)
            }
            Shape::None | Shape::Gun => None,
        }
    }
}

/// Render component: shape plus the tags and color the shader needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub category: Category,
    pub shape: Shape,
    pub op: ShapeOperator,
    /// Linear RGB, 0-1
    pub color: Vec3,
}

impl Renderable {
    pub fn new(category: Category, shape: Shape, color: Vec3) -> Self {
        Self {
            category,
            shape,
            op: ShapeOperator::Union,
            color,
        }
    }

    /// Color from 8-bit RGB components
    pub fn with_rgb8(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = Vec3::new(r as f32, g as f32, b as f32) / 255.0;
        self
    }

    pub fn with_operator(mut self, op: ShapeOperator) -> Self {
        self.op = op;
        self
    }
}
