//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded randomness only (separate streams for gameplay and effects)
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod particles;
pub mod physics;
pub mod random;
pub mod shape;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::find_collision;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use shape::Rect;
pub use spawner::{SpawnContext, maybe_spawn, spawn_interval};
pub use state::{
    FrameSnapshot, GameEvent, GamePhase, GameState, Obstacle, Particle, Player, RunState,
};
pub use tick::{TickInput, tick};
