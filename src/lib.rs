//! Neon Dash - A themed endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, particles)
//! - `platform`: Input collection and frame scheduling around the simulation
//! - `theme`: Theme bundles (colors + physics scalars) with a fixed fallback
//! - `settings`: World geometry and effect configuration

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod theme;

pub use highscores::HighScores;
pub use settings::Settings;
pub use theme::ThemeParameters;

/// Gameplay tuning constants
pub mod consts {
    /// Distance from the bottom of the world to the ground line
    pub const GROUND_MARGIN: f32 = 100.0;
    /// Player is a square of this size
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Player's fixed x position as a fraction of world width
    pub const PLAYER_OFFSET_FRACTION: f32 = 0.1;

    /// Obstacle height range (inclusive, whole pixels)
    pub const OBSTACLE_MIN_HEIGHT: u32 = 40;
    pub const OBSTACLE_MAX_HEIGHT: u32 = 100;
    /// Obstacle width range [min, min + span)
    pub const OBSTACLE_MIN_WIDTH: f32 = 30.0;
    pub const OBSTACLE_WIDTH_SPAN: f32 = 20.0;

    /// Frames between spawn checks at multiplier 1.0
    pub const BASE_SPAWN_INTERVAL: f32 = 100.0;
    /// A spawn check fires only when the roll exceeds this
    pub const SPAWN_SKIP_CHANCE: f32 = 0.3;

    /// Difficulty ramps by `DIFFICULTY_STEP` every `DIFFICULTY_INTERVAL` frames
    pub const DIFFICULTY_INTERVAL: u64 = 600;
    pub const DIFFICULTY_STEP: f32 = 0.1;

    /// Raw score is divided by this for display
    pub const SCORE_DIVISOR: u64 = 10;
    /// UI score updates are throttled to every N frames
    pub const SCORE_UPDATE_INTERVAL: u64 = 10;

    /// Per-frame particle life decay (~50 frame lifetime)
    pub const PARTICLE_DECAY: f32 = 0.02;
    /// Particle velocity components are drawn from [-MAX, MAX)
    pub const PARTICLE_MAX_SPEED: f32 = 5.0;
    /// Particle size range [min, min + span)
    pub const PARTICLE_MIN_SIZE: f32 = 2.0;
    pub const PARTICLE_SIZE_SPAN: f32 = 4.0;

    pub const JUMP_PARTICLES: usize = 5;
    pub const JUMP_PARTICLE_COLOR: &str = "#ffffff";
    pub const CRASH_PARTICLES: usize = 20;
}
