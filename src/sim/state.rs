//! Game state and core simulation types
//!
//! The simulation owns everything here exclusively. Presenters only ever see a
//! [`FrameSnapshot`].

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::{RandomSource, SeededRandom};
use super::shape::Rect;
use crate::consts::SCORE_DIVISOR;
use crate::settings::Settings;
use crate::theme::ThemeParameters;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress
    Idle,
    /// Run in progress, one tick per frame
    Active,
    /// Collision ended the run; ticks are ignored
    Ended,
}

/// The runner. Only `y` and the vertical state ever change during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Rect,
    pub vertical_velocity: f32,
    pub airborne: bool,
    pub color: String,
}

impl Player {
    /// Player standing on the ground at `x`
    pub fn on_ground(x: f32, size: f32, ground_y: f32, color: &str) -> Self {
        Self {
            body: Rect::new(x, ground_y - size, size, size),
            vertical_velocity: 0.0,
            airborne: false,
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub body: Rect,
    /// Captured at spawn; later difficulty steps don't affect it
    pub scroll_speed: f32,
    pub color: String,
    /// Set once the obstacle is fully behind the player
    pub passed: bool,
}

/// Cosmetic particle. Never read by gameplay code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub color: String,
    pub size: f32,
}

/// Per-run counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub frame_count: u64,
    pub raw_score: u64,
    pub speed_multiplier: f32,
    pub ground_y: f32,
}

impl RunState {
    pub fn new(ground_y: f32) -> Self {
        Self {
            frame_count: 0,
            raw_score: 0,
            speed_multiplier: 1.0,
            ground_y,
        }
    }

    /// Human-scaled score shown to the player
    pub fn display_score(&self) -> u64 {
        self.raw_score / SCORE_DIVISOR
    }
}

/// Notifications for the surrounding layer, drained after each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { theme: String },
    Jumped,
    ObstacleSpawned { id: u32 },
    ObstacleCleared { id: u32 },
    /// Throttled display score update
    ScoreChanged { score: u64 },
    /// Emitted exactly once per run
    GameOver { score: u64 },
}

/// Everything a presenter needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub ground_y: f32,
    pub speed_multiplier: f32,
    pub frame_count: u64,
    pub theme: ThemeParameters,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
}

/// Complete simulation state
///
/// Spawning and particle effects use separate random streams so cosmetic
/// bursts never shift obstacle generation.
#[derive(Debug, Clone)]
pub struct GameState<R: RandomSource = SeededRandom> {
    pub settings: Settings,
    pub phase: GamePhase,
    pub run: RunState,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    /// Reported score, fixed at the moment of collision
    pub final_score: Option<u64>,
    pub(crate) spawn_rng: R,
    pub(crate) effects_rng: R,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) theme: Arc<ThemeParameters>,
    next_id: u32,
}

impl GameState<SeededRandom> {
    /// Default settings, seeded randomness
    pub fn new(seed: u64) -> Self {
        Self::with_settings(Settings::default(), seed)
    }

    pub fn with_settings(settings: Settings, seed: u64) -> Self {
        Self::with_random(
            settings,
            SeededRandom::new(seed),
            SeededRandom::with_stream(seed, 1),
        )
    }
}

impl<R: RandomSource> GameState<R> {
    /// Idle state with explicit random sources for spawning and effects
    pub fn with_random(settings: Settings, spawn_rng: R, effects_rng: R) -> Self {
        let theme = Arc::new(ThemeParameters::default());
        let ground_y = settings.ground_y();
        let player = Player::on_ground(
            settings.player_x(),
            settings.player_size,
            ground_y,
            &theme.player_color,
        );
        Self {
            settings,
            phase: GamePhase::Idle,
            run: RunState::new(ground_y),
            player,
            obstacles: Vec::new(),
            particles: Vec::new(),
            final_score: None,
            spawn_rng,
            effects_rng,
            events: Vec::new(),
            theme,
            next_id: 1,
        }
    }

    /// Theme of the current (or most recent) run
    pub fn theme(&self) -> &ThemeParameters {
        &self.theme
    }

    /// Begin a run with `theme`. An ended run is torn down first.
    ///
    /// Returns false (and changes nothing) while a run is already active.
    pub fn start_run(&mut self, theme: Arc<ThemeParameters>) -> bool {
        match self.phase {
            GamePhase::Active => {
                log::warn!("start_run ignored: a run is already active");
                return false;
            }
            GamePhase::Ended => self.stop(),
            GamePhase::Idle => {}
        }

        self.theme = theme;
        self.reset_run();
        self.phase = GamePhase::Active;
        self.events.push(GameEvent::RunStarted {
            theme: self.theme.name.clone(),
        });
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        log::info!(
            "Run started: theme='{}' gravity={} speed={} jump={}",
            self.theme.name,
            self.theme.gravity,
            self.theme.scroll_speed,
            self.theme.jump_strength
        );
        true
    }

    /// Tear down any run and return to Idle, releasing live entities
    pub fn stop(&mut self) {
        if self.phase == GamePhase::Active {
            log::info!("Run stopped at frame {}", self.run.frame_count);
        }
        self.phase = GamePhase::Idle;
        self.obstacles = Vec::new();
        self.particles = Vec::new();
        self.events.clear();
        self.final_score = None;
        self.run = RunState::new(self.settings.ground_y());
    }

    /// Replace the world settings between runs. Refused while a run is active.
    pub fn apply_settings(&mut self, settings: Settings) -> bool {
        if self.phase == GamePhase::Active {
            return false;
        }
        self.settings = settings;
        if self.phase == GamePhase::Idle {
            let ground_y = self.settings.ground_y();
            self.run = RunState::new(ground_y);
            self.player = Player::on_ground(
                self.settings.player_x(),
                self.settings.player_size,
                ground_y,
                &self.theme.player_color,
            );
        }
        true
    }

    fn reset_run(&mut self) {
        let ground_y = self.settings.ground_y();
        self.run = RunState::new(ground_y);
        self.player = Player::on_ground(
            self.settings.player_x(),
            self.settings.player_size,
            ground_y,
            &self.theme.player_color,
        );
        self.obstacles.clear();
        self.particles.clear();
        self.final_score = None;
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.final_score.unwrap_or_else(|| self.run.display_score())
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase,
            score: self.display_score(),
            ground_y: self.run.ground_y,
            speed_multiplier: self.run.speed_multiplier,
            frame_count: self.run.frame_count,
            theme: (*self.theme).clone(),
            player: self.player.clone(),
            obstacles: self.obstacles.clone(),
            particles: self.particles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.display_score(), 0);
    }

    #[test]
    fn test_start_run_places_player() {
        let mut state = GameState::with_settings(Settings::for_world(1000.0, 600.0), 1);
        assert!(state.start_run(Arc::new(ThemeParameters::fallback())));
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.player.body, Rect::new(100.0, 460.0, 40.0, 40.0));
        assert_eq!(state.player.color, "#3B82F6");
        assert_eq!(state.run.ground_y, 500.0);
        assert_eq!(state.theme().name, "Fallback Zone");
    }

    #[test]
    fn test_start_while_active_is_rejected() {
        let mut state = GameState::new(1);
        assert!(state.start_run(Arc::new(ThemeParameters::default())));
        state.run.raw_score = 55;
        assert!(!state.start_run(Arc::new(ThemeParameters::fallback())));
        assert_eq!(state.run.raw_score, 55);
        assert_eq!(state.theme().name, "Neon City");
    }

    #[test]
    fn test_stop_releases_entities() {
        let mut state = GameState::new(1);
        state.start_run(Arc::new(ThemeParameters::default()));
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            body: Rect::new(500.0, 520.0, 40.0, 100.0),
            scroll_speed: 8.0,
            color: "#f472b6".to_string(),
            passed: false,
        });
        state.stop();
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.obstacles.capacity(), 0);
        assert_eq!(state.run.frame_count, 0);
    }

    #[test]
    fn test_apply_settings_between_runs() {
        let mut state = GameState::new(1);
        assert!(state.apply_settings(Settings::for_world(1000.0, 600.0)));
        assert_eq!(state.run.ground_y, 500.0);
        assert_eq!(state.player.body, Rect::new(100.0, 460.0, 40.0, 40.0));

        state.start_run(Arc::new(ThemeParameters::default()));
        assert!(!state.apply_settings(Settings::default()));
        assert_eq!(state.settings.world_width, 1000.0);
        assert_eq!(state.run.ground_y, 500.0);
    }

    #[test]
    fn test_run_started_events() {
        let mut state = GameState::new(1);
        state.start_run(Arc::new(ThemeParameters::default()));
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::RunStarted {
                    theme: "Neon City".to_string()
                },
                GameEvent::ScoreChanged { score: 0 },
            ]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(1);
        state.start_run(Arc::new(ThemeParameters::default()));
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Active\""));
        assert!(json.contains("\"playerColor\":\"#38bdf8\""));
    }
}
