use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Speed profile limits, in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub default: f32,
    pub max: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        // 0.12 / 0.30 units per frame at 60 fps.
        Self {
            default: 7.2,
            max: 18.0,
        }
    }
}

/// Anti-clipping parameters for the movement step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Extra ray length beyond the frame's displacement.
    pub clearance_margin: f32,
    /// Minimum distance kept between the player and collidable geometry.
    pub clearance_threshold: f32,
    /// Intent vectors with a smaller squared length produce no movement.
    pub min_intent_sq: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            clearance_margin: 0.6,
            clearance_threshold: 0.35,
            min_intent_sq: 0.01,
        }
    }
}

/// Drag-to-look parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Radians per pixel when `scale_by_dt` is off.
    pub sensitivity: f32,
    /// Radians per pixel per second when `scale_by_dt` is on.
    pub dt_sensitivity: f32,
    pub scale_by_dt: bool,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]` radians.
    pub pitch_limit: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.004,
            dt_sensitivity: 0.04,
            scale_by_dt: false,
            pitch_limit: 1.48,
        }
    }
}

/// Tunables for one game session. Every field has a default, so a partial
/// YAML document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World units per grid cell.
    pub cell_size: f32,
    pub eye_height: f32,
    pub collectible_height: f32,
    pub wall_height: f32,
    pub ceiling_height: f32,
    /// Squared pickup distance.
    pub pickup_radius_sq: f32,
    pub speed: SpeedConfig,
    pub movement: MovementConfig,
    pub look: LookConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 2.0,
            eye_height: 1.8,
            collectible_height: 1.5,
            wall_height: 3.0,
            ceiling_height: 5.0,
            pickup_radius_sq: 1.0,
            speed: SpeedConfig::default(),
            movement: MovementConfig::default(),
            look: LookConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("cell_size", self.cell_size),
            ("wall_height", self.wall_height),
            ("ceiling_height", self.ceiling_height),
            ("pickup_radius_sq", self.pickup_radius_sq),
            ("look.pitch_limit", self.look.pitch_limit),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.speed.default >= 0.0 && self.speed.default <= self.speed.max) {
            return Err(ConfigError::Invalid(format!(
                "speed.default ({}) must be within [0, speed.max ({})]",
                self.speed.default, self.speed.max
            )));
        }
        if self.eye_height <= 0.0 || self.eye_height >= self.ceiling_height {
            return Err(ConfigError::Invalid(format!(
                "eye_height ({}) must lie between the floor and the ceiling ({})",
                self.eye_height, self.ceiling_height
            )));
        }
        let m = &self.movement;
        if !(m.clearance_threshold >= 0.0 && m.clearance_threshold < m.clearance_margin) {
            return Err(ConfigError::Invalid(format!(
                "movement.clearance_threshold ({}) must be below movement.clearance_margin ({})",
                m.clearance_threshold, m.clearance_margin
            )));
        }
        Ok(())
    }
}
