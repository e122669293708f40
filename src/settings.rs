//! Renderer settings
//!
//! Loaded from a JSON file on native builds. Missing fields take their
//! defaults, so a settings file only has to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::view::Projection;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Projection, culling and queue configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    // === Projection ===
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,

    // === Render queue ===
    /// Records per frame, at most `MAX_RENDER_QUEUE`
    pub queue_capacity: usize,
    /// Frustum culling (off submits every entity)
    pub culling: bool,

    // === Input ===
    /// Degrees per pixel of mouse movement
    pub mouse_sensitivity: f32,

    // === Window ===
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            z_near: DEFAULT_Z_NEAR,
            z_far: DEFAULT_Z_FAR,

            queue_capacity: MAX_RENDER_QUEUE,
            culling: true,

            mouse_sensitivity: 0.5,

            width: 1280,
            height: 720,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(SettingsError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.z_near > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "z_near must be positive, got {}",
                self.z_near
            )));
        }
        if !(self.z_far > self.z_near) || !self.z_far.is_finite() {
            return Err(SettingsError::Invalid(format!(
                "z_far must be finite and beyond z_near ({}), got {}",
                self.z_near, self.z_far
            )));
        }
        if !(1..=MAX_RENDER_QUEUE).contains(&self.queue_capacity) {
            return Err(SettingsError::Invalid(format!(
                "queue_capacity must be in 1..={}, got {}",
                MAX_RENDER_QUEUE, self.queue_capacity
            )));
        }
        if !self.mouse_sensitivity.is_finite() {
            return Err(SettingsError::Invalid(
                "mouse_sensitivity must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Width / height of the configured window
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn projection(&self, aspect: f32) -> Projection {
        Projection {
            fov_y: self.fov_degrees.to_radians(),
            aspect,
            near: self.z_near,
            far: self.z_far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.queue_capacity, MAX_RENDER_QUEUE);
        assert_eq!(settings.projection(1.0), Projection::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = RenderSettings::from_json(r#"{ "z_far": 250.0, "culling": false }"#).unwrap();
        assert_eq!(settings.z_far, 250.0);
        assert!(!settings.culling);
        assert_eq!(settings.fov_degrees, DEFAULT_FOV_DEGREES);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = RenderSettings {
            fov_degrees: 70.0,
            queue_capacity: 32,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(RenderSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let cases = [
            r#"{ "fov_degrees": 0.0 }"#,
            r#"{ "fov_degrees": 180.0 }"#,
            r#"{ "z_near": 0.0 }"#,
            r#"{ "z_near": 5.0, "z_far": 5.0 }"#,
            r#"{ "queue_capacity": 0 }"#,
            r#"{ "queue_capacity": 101 }"#,
        ];
        for json in cases {
            assert!(
                matches!(RenderSettings::from_json(json), Err(SettingsError::Invalid(_))),
                "{} should be rejected",
                json
            );
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RenderSettings::from_json("{ fov"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            RenderSettings::load("/nonexistent/sdf-render-settings.json"),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_projection_uses_radians() {
        let settings = RenderSettings {
            fov_degrees: 60.0,
            ..Default::default()
        };
        let projection = settings.projection(settings.aspect());
        assert!((projection.fov_y - std::f32::consts::FRAC_PI_3).abs() < 1e-6);
        assert!((projection.aspect - 16.0 / 9.0).abs() < 1e-6);
    }
}
