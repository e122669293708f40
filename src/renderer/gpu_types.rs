//! GPU data structures (must match sdf_shader.wgsl)
//!
//! Both structs follow WGSL host-shareable layout: every `vec3<f32>` starts on
//! a 16-byte boundary and a trailing scalar may sit in its fourth lane.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::mem::{offset_of, size_of};

/// One entry of the render queue storage buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QueueRecord {
    pub position: [f32; 3], // offset 0
    pub(crate) _pad0: u32,
    pub scale: [f32; 3], // offset 16
    pub(crate) _pad1: u32,
    pub rotation: [f32; 3], // offset 32
    pub(crate) _pad2: u32,
    pub color: [f32; 3], // offset 48
    pub(crate) _pad3: u32,
    /// Sphere: x = radius. Box: xyz = half extents.
    /// Capsule: xyz = first endpoint, w = radius.
    pub shape_data: [f32; 4], // offset 64
    /// Capsule: second endpoint
    pub shape_data_secondary: [f32; 3], // offset 80
    pub category: u32,   // offset 92
    pub shape_kind: u32, // offset 96
    pub shape_op: u32,   // offset 100
    pub(crate) _pad4: [u32; 2], // pad to 112 bytes
}

const _: () = assert!(size_of::<QueueRecord>() % 16 == 0, "QueueRecord must be 16-byte aligned");
const _: () = assert!(size_of::<QueueRecord>() == 112);
const _: () = assert!(offset_of!(QueueRecord, scale) == 16);
const _: () = assert!(offset_of!(QueueRecord, color) == 48);
const _: () = assert!(offset_of!(QueueRecord, shape_data) == 64);
const _: () = assert!(offset_of!(QueueRecord, shape_data_secondary) == 80);
const _: () = assert!(offset_of!(QueueRecord, category) == 92);
const _: () = assert!(offset_of!(QueueRecord, shape_kind) == 96);

impl QueueRecord {
    /// Unused slot (shape kind None)
    pub const EMPTY: Self = Self {
        position: [0.0; 3],
        _pad0: 0,
        scale: [0.0; 3],
        _pad1: 0,
        rotation: [0.0; 3],
        _pad2: 0,
        color: [0.0; 3],
        _pad3: 0,
        shape_data: [0.0; 4],
        shape_data_secondary: [0.0; 3],
        category: 0,
        shape_kind: 0,
        shape_op: 0,
        _pad4: [0; 2],
    };
}

impl Default for QueueRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Per-frame uniform block
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// xy = resolution in pixels, z = elapsed seconds
    pub resolution_time: [f32; 3], // offset 0
    pub(crate) _pad0: u32,
    pub camera_position: [f32; 3], // offset 16
    pub(crate) _pad1: u32,
    /// Unit vector
    pub camera_direction: [f32; 3], // offset 32
    /// Valid records in the render queue this frame
    pub queue_count: u32, // offset 44
}

const _: () = assert!(size_of::<FrameUniforms>() % 16 == 0, "FrameUniforms must be 16-byte aligned");
const _: () = assert!(size_of::<FrameUniforms>() == 48);
const _: () = assert!(offset_of!(FrameUniforms, camera_direction) == 32);
const _: () = assert!(offset_of!(FrameUniforms, queue_count) == 44);

impl FrameUniforms {
    pub fn new(
        resolution: Vec2,
        time: f32,
        camera_position: Vec3,
        camera_direction: Vec3,
        queue_count: u32,
    ) -> Self {
        let direction = camera_direction.try_normalize().unwrap_or(Vec3::NEG_Z);
        Self {
            resolution_time: [resolution.x, resolution.y, time],
            _pad0: 0,
            camera_position: camera_position.to_array(),
            _pad1: 0,
            camera_direction: direction.to_array(),
            queue_count,
        }
    }

    #[inline]
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.resolution_time[0], self.resolution_time[1])
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.resolution_time[2]
    }
}
