//! Per-frame simulation tick
//!
//! Core game loop that advances an active run by exactly one frame.

use std::sync::Arc;

use super::random::RandomSource;
use super::spawner::SpawnContext;
use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, difficulty, particles, physics, spawner};
use crate::consts::*;
use crate::theme::ThemeParameters;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump edge seen since the last tick
    pub jump: bool,
    /// Demo mode - jump automatically ahead of obstacles
    pub autopilot: bool,
}

/// Advance the game state by one frame. Does nothing unless the run is active.
pub fn tick<R: RandomSource>(state: &mut GameState<R>, input: &TickInput) {
    if state.phase != GamePhase::Active {
        return;
    }

    let theme = Arc::clone(&state.theme);
    let particle_cap = state.settings.max_particles();

    state.run.frame_count += 1;
    let frame = state.run.frame_count;

    // Jump edge, then gravity
    let wants_jump = input.jump || (input.autopilot && autopilot_wants_jump(state));
    if wants_jump && physics::try_jump(&mut state.player, theme.jump_strength) {
        particles::burst(
            &mut state.particles,
            &mut state.effects_rng,
            state.player.body.foot(),
            JUMP_PARTICLE_COLOR,
            JUMP_PARTICLES,
            particle_cap,
        );
        state.events.push(GameEvent::Jumped);
    }
    physics::integrate(&mut state.player, theme.gravity, state.run.ground_y);

    state.run.speed_multiplier = difficulty::multiplier(frame);
    if difficulty::is_step_frame(frame) {
        log::debug!(
            "Difficulty step at frame {}: x{:.1}",
            frame,
            state.run.speed_multiplier
        );
    }

    let ctx = SpawnContext {
        frame_count: frame,
        speed_multiplier: state.run.speed_multiplier,
        ground_y: state.run.ground_y,
        spawn_x: state.settings.world_width,
        min_interval: state.settings.min_spawn_interval,
        theme: &theme,
    };
    if let Some(mut obstacle) = spawner::maybe_spawn(&mut state.spawn_rng, &ctx) {
        obstacle.id = state.next_entity_id();
        log::debug!(
            "Spawned obstacle {} ({}x{}) at frame {}",
            obstacle.id,
            obstacle.body.width,
            obstacle.body.height,
            frame
        );
        state.events.push(GameEvent::ObstacleSpawned { id: obstacle.id });
        state.obstacles.push(obstacle);
    }

    // Scroll obstacles past the player
    let player_left = state.player.body.x;
    for obstacle in &mut state.obstacles {
        obstacle.body.x -= obstacle.scroll_speed;
        if !obstacle.passed && obstacle.body.right() < player_left {
            obstacle.passed = true;
            state.events.push(GameEvent::ObstacleCleared { id: obstacle.id });
        }
    }
    state.obstacles.retain(|o| o.body.right() >= 0.0);

    // Every frame counts, including the one that ends the run
    state.run.raw_score += 1;

    if let Some(hit) = collision::find_collision(&state.player.body, &state.obstacles) {
        let hit_id = hit.id;
        end_run(state, hit_id, &theme, particle_cap);
        return;
    }

    particles::tick(&mut state.particles);

    if frame.is_multiple_of(SCORE_UPDATE_INTERVAL) {
        state.events.push(GameEvent::ScoreChanged {
            score: state.run.display_score(),
        });
    }
}

/// Collision: crash burst, freeze the score, stop ticking
fn end_run<R: RandomSource>(
    state: &mut GameState<R>,
    obstacle_id: u32,
    theme: &ThemeParameters,
    particle_cap: usize,
) {
    particles::burst(
        &mut state.particles,
        &mut state.effects_rng,
        state.player.body.center(),
        &theme.player_color,
        CRASH_PARTICLES,
        particle_cap,
    );

    let score = state.run.display_score();
    state.final_score = Some(score);
    state.phase = GamePhase::Ended;
    state.events.push(GameEvent::GameOver { score });
    log::info!(
        "Run over: hit obstacle {} at frame {}, score {}",
        obstacle_id,
        state.run.frame_count,
        score
    );
}

/// Jump when the nearest obstacle ahead will be under the player at the apex
fn autopilot_wants_jump<R: RandomSource>(state: &GameState<R>) -> bool {
    if state.player.airborne {
        return false;
    }
    let theme = &state.theme;
    let frames_to_apex = theme.jump_strength / theme.gravity;
    let player = &state.player.body;

    state
        .obstacles
        .iter()
        .filter(|o| !o.passed && o.body.x >= player.right())
        .min_by(|a, b| a.body.x.total_cmp(&b.body.x))
        .is_some_and(|o| {
            // Distance until the obstacle's center reaches the player's center
            let to_center = o.body.center().x - player.center().x;
            to_center <= o.scroll_speed * frames_to_apex
        })
}
