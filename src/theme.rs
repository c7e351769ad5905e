//! Level themes
//!
//! A theme is the only per-run input to the simulation: a set of colors for
//! the presenter and three physics scalars. Themes arrive as JSON from an
//! outside generator; anything unusable is replaced by [`ThemeParameters::fallback`]
//! so the simulation never sees a partial theme.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Colors and physics for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeParameters {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub background_color: String,
    pub ground_color: String,
    pub player_color: String,
    pub obstacle_color: String,
    pub sky_color: String,
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Base obstacle scroll speed (pixels per frame at multiplier 1.0)
    #[serde(rename = "speed")]
    pub scroll_speed: f32,
    /// Initial upward velocity of a jump
    pub jump_strength: f32,
}

impl Default for ThemeParameters {
    fn default() -> Self {
        Self::neon_city()
    }
}

impl ThemeParameters {
    /// Theme used before any generated theme is supplied
    pub fn neon_city() -> Self {
        Self {
            name: "Neon City".to_string(),
            description: "A classic high-speed chase through a digital frontier.".to_string(),
            background_color: "#0f172a".to_string(),
            ground_color: "#1e293b".to_string(),
            player_color: "#38bdf8".to_string(),
            obstacle_color: "#f472b6".to_string(),
            sky_color: "#312e81".to_string(),
            gravity: 0.6,
            scroll_speed: 8.0,
            jump_strength: 15.0,
        }
    }

    /// Theme substituted when generation fails
    pub fn fallback() -> Self {
        Self {
            name: "Fallback Zone".to_string(),
            description: "Connection failed, running in simulation mode.".to_string(),
            background_color: "#111827".to_string(),
            ground_color: "#374151".to_string(),
            player_color: "#3B82F6".to_string(),
            obstacle_color: "#EF4444".to_string(),
            sky_color: "#1F2937".to_string(),
            gravity: 0.6,
            scroll_speed: 8.0,
            jump_strength: 15.0,
        }
    }

    /// Parse and validate a theme from its JSON form
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let theme: Self =
            serde_json::from_str(json).map_err(|e| ThemeError::Parse(e.to_string()))?;
        theme.validate()?;
        Ok(theme)
    }

    /// Check that every field is usable by the simulation and presenter
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (field, value) in [
            ("gravity", self.gravity),
            ("speed", self.scroll_speed),
            ("jumpStrength", self.jump_strength),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ThemeError::InvalidScalar { field, value });
            }
        }

        for (field, value) in [
            ("backgroundColor", &self.background_color),
            ("groundColor", &self.ground_color),
            ("playerColor", &self.player_color),
            ("obstacleColor", &self.obstacle_color),
            ("skyColor", &self.sky_color),
        ] {
            if value.trim().is_empty() {
                return Err(ThemeError::MissingColor { field });
            }
        }

        Ok(())
    }
}

/// Collapse a theme request into a usable theme, falling back on any error
pub fn resolve(result: Result<ThemeParameters, ThemeError>) -> ThemeParameters {
    match result {
        Ok(theme) => {
            log::info!("Using theme '{}'", theme.name);
            theme
        }
        Err(e) => {
            log::warn!("Theme rejected ({}), using fallback", e);
            ThemeParameters::fallback()
        }
    }
}

/// Reasons a supplied theme can't be used
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeError {
    Parse(String),
    InvalidScalar { field: &'static str, value: f32 },
    MissingColor { field: &'static str },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "theme JSON is malformed: {msg}"),
            Self::InvalidScalar { field, value } => {
                write!(f, "theme {field} must be finite and positive, got {value}")
            }
            Self::MissingColor { field } => write!(f, "theme {field} is empty"),
        }
    }
}

impl std::error::Error for ThemeError {}
