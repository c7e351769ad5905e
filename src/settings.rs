//! Run configuration
//!
//! World geometry and effect limits. Gameplay tuning that must stay fixed
//! lives in [`crate::consts`]; everything here may vary between hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Effect quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Host configuration for a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Visible world width; obstacles spawn at this x
    pub world_width: f32,
    /// Visible world height
    pub world_height: f32,
    /// Ground line sits this far above the bottom edge
    pub ground_margin: f32,
    /// Player edge length
    pub player_size: f32,
    /// Player x as a fraction of world width
    pub player_offset: f32,
    /// Floor for the spawn check interval (frames)
    pub min_spawn_interval: u64,

    /// Particle effects (jump dust, crash burst)
    pub particles: bool,
    pub quality: QualityPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: 1280.0,
            world_height: 720.0,
            ground_margin: GROUND_MARGIN,
            player_size: PLAYER_SIZE,
            player_offset: PLAYER_OFFSET_FRACTION,
            min_spawn_interval: 1,

            particles: true,
            quality: QualityPreset::Medium,
        }
    }
}

impl Settings {
    /// Settings for a world of the given size
    pub fn for_world(width: f32, height: f32) -> Self {
        Self {
            world_width: width,
            world_height: height,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(SettingsError::InvalidWorld(self.world_width, self.world_height));
        }
        if !(self.world_height.is_finite() && self.world_height > 0.0) {
            return Err(SettingsError::InvalidWorld(self.world_width, self.world_height));
        }
        if !(self.player_size.is_finite() && self.ground_margin.is_finite())
            || self.player_size <= 0.0
            || self.ground_y() - self.player_size < 0.0
        {
            return Err(SettingsError::PlayerDoesNotFit {
                player_size: self.player_size,
                ground_y: self.ground_y(),
            });
        }
        if !(0.0..1.0).contains(&self.player_offset) {
            return Err(SettingsError::PlayerOffset(self.player_offset));
        }
        if self.min_spawn_interval == 0 {
            return Err(SettingsError::ZeroSpawnInterval);
        }
        Ok(())
    }

    /// Y coordinate of the ground line (y grows downward)
    pub fn ground_y(&self) -> f32 {
        self.world_height - self.ground_margin
    }

    /// Fixed x coordinate of the player's left edge
    pub fn player_x(&self) -> f32 {
        self.world_width * self.player_offset
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }
}

/// Reasons a settings document is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    Parse(String),
    InvalidWorld(f32, f32),
    PlayerDoesNotFit { player_size: f32, ground_y: f32 },
    PlayerOffset(f32),
    ZeroSpawnInterval,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "settings JSON is malformed: {msg}"),
            Self::InvalidWorld(w, h) => write!(f, "world size {w}x{h} is not usable"),
            Self::PlayerDoesNotFit {
                player_size,
                ground_y,
            } => write!(
                f,
                "player of size {player_size} does not fit above ground at y={ground_y}"
            ),
            Self::PlayerOffset(v) => write!(f, "player offset {v} must be in [0, 1)"),
            Self::ZeroSpawnInterval => write!(f, "minimum spawn interval must be at least 1"),
        }
    }
}

impl std::error::Error for SettingsError {}
