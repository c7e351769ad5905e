//! Frame-driven run controller
//!
//! Owns the simulation, the input handler and the host's frame scheduler.
//! At most one frame request is outstanding at any time, and the next frame is
//! only requested after the current tick has finished. Tearing a run down
//! cancels the outstanding request, so nothing keeps ticking after a run.

use std::sync::Arc;

use super::input::InputHandler;
use crate::highscores::HighScores;
use crate::settings::{Settings, SettingsError};
use crate::sim::{GameEvent, GamePhase, GameState, RandomSource, SeededRandom, TickInput, tick};
use crate::theme::ThemeParameters;

/// Host display-frame callback source (e.g. `requestAnimationFrame`)
pub trait FrameScheduler {
    type Handle;

    /// Ask for one callback on the next display frame
    fn request_frame(&mut self) -> Self::Handle;

    /// Withdraw a request that hasn't fired yet
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// What happened during one frame callback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<GameEvent>,
    /// Final score, present only on the frame the run ended
    pub game_over: Option<u64>,
    /// Leaderboard rank earned by that score
    pub rank: Option<usize>,
}

pub struct RunDriver<S: FrameScheduler, R: RandomSource = SeededRandom> {
    pub state: GameState<R>,
    pub input: InputHandler,
    pub high_scores: HighScores,
    scheduler: S,
    pending: Option<S::Handle>,
    /// World geometry waiting for the current run to finish
    pending_world: Option<Settings>,
}

impl<S: FrameScheduler, R: RandomSource> RunDriver<S, R> {
    pub fn new(state: GameState<R>, scheduler: S) -> Self {
        Self {
            state,
            input: InputHandler::new(),
            high_scores: HighScores::new(),
            scheduler,
            pending: None,
            pending_world: None,
        }
    }

    /// Start a run with an already-resolved theme and begin requesting frames
    pub fn start(&mut self, theme: ThemeParameters) -> bool {
        if self.state.phase != GamePhase::Active {
            self.flush_world();
        }
        if !self.state.start_run(Arc::new(theme)) {
            return false;
        }
        self.input.reset();
        self.schedule();
        true
    }

    /// Stop the run, cancel the outstanding frame, release entities
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.input.reset();
        self.state.stop();
        self.flush_world();
    }

    /// New world geometry (host resize). Applied now if no run is active,
    /// otherwise when the current run is torn down or replaced.
    pub fn set_world(&mut self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        if self.state.phase == GamePhase::Active {
            log::debug!(
                "World resize to {}x{} deferred until the run ends",
                settings.world_width,
                settings.world_height
            );
            self.pending_world = Some(settings);
        } else {
            self.pending_world = None;
            self.state.apply_settings(settings);
        }
        Ok(())
    }

    /// Frame callback: consume input, tick once, reschedule while active
    pub fn on_frame(&mut self) -> FrameReport {
        // The request that brought us here has fired
        self.pending = None;

        let input: TickInput = self.input.take_tick_input(self.state.phase);
        tick(&mut self.state, &input);

        let mut report = FrameReport {
            events: self.state.drain_events(),
            ..Default::default()
        };
        for event in &report.events {
            if let GameEvent::GameOver { score } = *event {
                report.game_over = Some(score);
                report.rank = self.high_scores.add_score(
                    score,
                    &self.state.theme().name,
                    self.state.run.frame_count,
                );
            }
        }

        if self.state.phase == GamePhase::Active {
            self.schedule();
        }
        report
    }

    /// True while a frame request is outstanding
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    fn flush_world(&mut self) {
        if let Some(settings) = self.pending_world.take() {
            self.state.apply_settings(settings);
        }
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::Trigger;
    use crate::settings::Settings;
    use crate::sim::{Obstacle, Rect, ScriptedRandom};

    #[derive(Debug, Default)]
    struct CountingScheduler {
        next: u32,
        live: Vec<u32>,
        cancelled: Vec<u32>,
    }

    impl FrameScheduler for CountingScheduler {
        type Handle = u32;

        fn request_frame(&mut self) -> u32 {
            self.next += 1;
            self.live.push(self.next);
            self.next
        }

        fn cancel_frame(&mut self, handle: u32) {
            self.live.retain(|h| *h != handle);
            self.cancelled.push(handle);
        }
    }

    fn driver() -> RunDriver<CountingScheduler, ScriptedRandom> {
        let state = GameState::with_random(
            Settings::default(),
            ScriptedRandom::constant(0.0),
            ScriptedRandom::constant(0.5),
        );
        RunDriver::new(state, CountingScheduler::default())
    }

    /// Simulate the host firing the outstanding request
    fn fire(d: &mut RunDriver<CountingScheduler, ScriptedRandom>) -> FrameReport {
        d.scheduler.live.clear();
        d.on_frame()
    }

    #[test]
    fn test_start_requests_one_frame() {
        let mut d = driver();
        assert!(!d.is_scheduled());
        assert!(d.start(ThemeParameters::default()));
        assert!(d.is_scheduled());
        assert_eq!(d.scheduler.next, 1);

        // Starting again while active neither restarts nor double-schedules
        assert!(!d.start(ThemeParameters::fallback()));
        assert_eq!(d.scheduler.next, 1);
    }

    #[test]
    fn test_each_frame_requests_the_next() {
        let mut d = driver();
        d.start(ThemeParameters::default());
        for _ in 0..5 {
            fire(&mut d);
            assert!(d.is_scheduled());
        }
        assert_eq!(d.scheduler.next, 6);
        assert_eq!(d.state.run.frame_count, 5);
    }

    #[test]
    fn test_jump_reaches_the_tick() {
        let mut d = driver();
        d.start(ThemeParameters::default());
        d.input.press(Trigger::Space);
        let report = fire(&mut d);
        assert!(report.events.contains(&GameEvent::Jumped));
        assert!(d.state.player.airborne);
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let mut d = driver();
        d.start(ThemeParameters::default());
        fire(&mut d);
        d.teardown();
        assert!(!d.is_scheduled());
        assert_eq!(d.scheduler.cancelled, vec![2]);
        assert!(d.scheduler.live.is_empty());
        assert_eq!(d.state.phase, GamePhase::Idle);
        assert!(d.state.obstacles.is_empty());
        assert!(d.state.particles.is_empty());

        // A stray callback after teardown does nothing and schedules nothing
        let report = d.on_frame();
        assert!(report.events.is_empty());
        assert!(!d.is_scheduled());
    }

    #[test]
    fn test_game_over_stops_scheduling_and_records_score() {
        let mut d = driver();
        d.start(ThemeParameters::default());
        for _ in 0..120 {
            fire(&mut d);
        }
        let p = d.state.player.body;
        d.state.obstacles.push(Obstacle {
            id: 999,
            body: Rect::new(p.x, p.y, p.width, p.height),
            scroll_speed: 8.0,
            color: "#f472b6".to_string(),
            passed: false,
        });

        let report = fire(&mut d);
        assert_eq!(report.game_over, Some(12));
        assert_eq!(report.rank, Some(1));
        assert!(!d.is_scheduled());
        assert_eq!(d.high_scores.top_score(), Some(12));
        assert_eq!(d.high_scores.entries[0].theme, "Neon City");

        // A new run is allowed from the ended state
        assert!(d.start(ThemeParameters::fallback()));
        assert_eq!(d.state.phase, GamePhase::Active);
        assert_eq!(d.state.display_score(), 0);
        assert!(d.is_scheduled());
    }

    #[test]
    fn test_resize_applies_on_next_start() {
        let mut d = driver();
        d.start(ThemeParameters::default());
        fire(&mut d);

        d.set_world(Settings::for_world(1000.0, 600.0)).unwrap();
        // The active run keeps its geometry
        assert_eq!(d.state.settings.world_width, 1280.0);
        assert_eq!(d.state.run.ground_y, 620.0);
        assert_eq!(d.state.player.body.x, 128.0);

        d.teardown();
        assert!(d.start(ThemeParameters::default()));
        assert_eq!(d.state.run.ground_y, 500.0);
        assert_eq!(d.state.player.body, Rect::new(100.0, 460.0, 40.0, 40.0));
    }

    #[test]
    fn test_resize_while_idle_applies_immediately() {
        let mut d = driver();
        d.set_world(Settings::for_world(1000.0, 600.0)).unwrap();
        assert_eq!(d.state.run.ground_y, 500.0);

        assert!(matches!(
            d.set_world(Settings::for_world(0.0, 600.0)),
            Err(SettingsError::InvalidWorld(..))
        ));
        assert_eq!(d.state.settings.world_width, 1000.0);
    }
}
