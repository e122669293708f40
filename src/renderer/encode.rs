//! Shape encoding into queue records, and the matching decoder
//!
//! `decode` mirrors the switch the GPU program runs over `shape_kind`. It is
//! used for diagnostics and to pin the encoding down in tests.

use glam::Vec3;

use super::gpu_types::QueueRecord;
use crate::error::RenderError;
use crate::scene::{Category, Renderable, Shape, ShapeKind, ShapeOperator, Transform};

/// Encode one entity into a queue record.
///
/// Fails for `Shape::None` and for payloads with negative or non-finite
/// sizes, rather than handing the GPU program a record it cannot evaluate.
pub fn encode(transform: &Transform, renderable: &Renderable) -> Result<QueueRecord, RenderError> {
    let mut record = QueueRecord {
        position: transform.position.to_array(),
        scale: transform.scale.to_array(),
        rotation: transform.rotation.to_array(),
        color: renderable.color.to_array(),
        category: renderable.category.tag(),
        shape_kind: renderable.shape.kind().tag(),
        shape_op: renderable.op.tag(),
        ..QueueRecord::EMPTY
    };

    match renderable.shape {
        Shape::Sphere { radius } => {
            check_radius(ShapeKind::Sphere, radius)?;
            record.shape_data[0] = radius;
        }
        Shape::Box { half_extents } => {
            if !half_extents.is_finite() || half_extents.min_element() < 0.0 {
                return Err(RenderError::InvalidShape {
                    kind: ShapeKind::Box,
                    reason: "half extents must be finite and non-negative",
                });
            }
            record.shape_data[..3].copy_from_slice(&half_extents.to_array());
        }
        Shape::CapsuleSegment { from, to, radius } => {
            check_radius(ShapeKind::CapsuleSegment, radius)?;
            if !from.is_finite() || !to.is_finite() {
                return Err(RenderError::InvalidShape {
                    kind: ShapeKind::CapsuleSegment,
                    reason: "endpoints must be finite",
                });
            }
            record.shape_data = from.extend(radius).to_array();
            record.shape_data_secondary = to.to_array();
        }
        Shape::Gun => {}
        Shape::None => return Err(RenderError::UnencodableShape(ShapeKind::None)),
    }

    Ok(record)
}

fn check_radius(kind: ShapeKind, radius: f32) -> Result<(), RenderError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(RenderError::InvalidShape {
            kind,
            reason: "radius must be finite and non-negative",
        })
    }
}

/// Rebuild the transform and renderable a record was encoded from
pub fn decode(record: &QueueRecord) -> Result<(Transform, Renderable), RenderError> {
    let data = record.shape_data;
    let shape = match ShapeKind::try_from(record.shape_kind)? {
        ShapeKind::None => Shape::None,
        ShapeKind::Sphere => Shape::Sphere { radius: data[0] },
        ShapeKind::Box => Shape::Box {
            half_extents: Vec3::new(data[0], data[1], data[2]),
        },
        ShapeKind::Gun => Shape::Gun,
        ShapeKind::CapsuleSegment => Shape::CapsuleSegment {
            from: Vec3::new(data[0], data[1], data[2]),
            to: Vec3::from_array(record.shape_data_secondary),
            radius: data[3],
        },
    };

    let transform = Transform {
        position: Vec3::from_array(record.position),
        rotation: Vec3::from_array(record.rotation),
        scale: Vec3::from_array(record.scale),
    };
    let renderable = Renderable {
        category: Category::try_from(record.category)?,
        shape,
        op: ShapeOperator::try_from(record.shape_op)?,
        color: Vec3::from_array(record.color),
    };
    Ok((transform, renderable))
}
