//! Procedural obstacle spawning
//!
//! Spawn checks run on a cadence that tightens with difficulty. Each check
//! skips with a fixed chance so density stays jumpable as the cadence shrinks.

use super::random::RandomSource;
use super::shape::Rect;
use super::state::Obstacle;
use crate::consts::*;
use crate::theme::ThemeParameters;

/// Frames between spawn checks, never below `min_interval`
pub fn spawn_interval(speed_multiplier: f32, min_interval: u64) -> u64 {
    let interval = (BASE_SPAWN_INTERVAL / speed_multiplier).floor();
    // Non-finite or tiny quotients collapse to the floor
    if interval.is_finite() && interval >= 1.0 {
        (interval as u64).max(min_interval)
    } else {
        min_interval.max(1)
    }
}

/// Inputs for a single spawn decision
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub frame_count: u64,
    pub speed_multiplier: f32,
    pub ground_y: f32,
    /// Right edge of the visible world; new obstacles start here
    pub spawn_x: f32,
    pub min_interval: u64,
    pub theme: &'a ThemeParameters,
}

/// Roll for an obstacle on this frame
///
/// Consumes no randomness on frames that aren't spawn checks. The returned
/// obstacle has no id yet (0); the caller assigns one.
pub fn maybe_spawn(rng: &mut impl RandomSource, ctx: &SpawnContext<'_>) -> Option<Obstacle> {
    let interval = spawn_interval(ctx.speed_multiplier, ctx.min_interval);
    if !ctx.frame_count.is_multiple_of(interval) {
        return None;
    }
    if rng.next_unit() <= SPAWN_SKIP_CHANCE {
        return None;
    }

    let height_span = (OBSTACLE_MAX_HEIGHT - OBSTACLE_MIN_HEIGHT + 1) as f32;
    let height = (rng.next_unit() * height_span).floor() + OBSTACLE_MIN_HEIGHT as f32;
    let width = rng.range(OBSTACLE_MIN_WIDTH, OBSTACLE_MIN_WIDTH + OBSTACLE_WIDTH_SPAN);

    Some(Obstacle {
        id: 0,
        body: Rect::new(ctx.spawn_x, ctx.ground_y - height, width, height),
        scroll_speed: ctx.theme.scroll_speed * ctx.speed_multiplier,
        color: ctx.theme.obstacle_color.clone(),
        passed: false,
    })
}
