//! First-person yaw/pitch camera

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::frustum::{Frustum, Projection};
use crate::consts::MAX_PITCH;

/// Camera driven by mouse offsets; angles are in degrees.
///
/// Yaw 0 looks down +X, yaw 270 looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    pub projection: Projection,
    /// Degrees per unit of mouse offset
    pub sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.6, 0.0),
            yaw: 270.0,
            pitch: 0.0,
            projection: Projection::default(),
            sensitivity: 0.5,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, projection: Projection) -> Self {
        Self {
            position,
            projection,
            ..Default::default()
        }
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set orientation directly; pitch is clamped like mouse look
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Apply a mouse offset (x turns, y looks up/down)
    pub fn move_direction(&mut self, offset: Vec2) {
        let offset = offset * self.sensitivity;
        self.set_orientation(self.yaw - offset.x, self.pitch + offset.y);
    }

    /// Keep the vertical field of view and refit the horizontal one
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.projection.aspect = width as f32 / height as f32;
        }
    }

    /// Unit view direction
    pub fn direction(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    /// Horizontal view direction, for walking
    pub fn direction_without_pitch(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin()).normalize()
    }

    /// Horizontal right vector
    pub fn right(&self) -> Vec3 {
        self.direction_without_pitch().cross(Vec3::Y).normalize()
    }

    /// Frustum for the current position and orientation
    pub fn frustum(&self) -> Frustum {
        Frustum::new(self.position, self.direction(), &self.projection)
    }
}
