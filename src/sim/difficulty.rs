//! Difficulty ramp
//!
//! A step function of the frame counter. Keeping it pure means a run can be
//! inspected at any frame without replaying it.

use crate::consts::{DIFFICULTY_INTERVAL, DIFFICULTY_STEP};

/// Speed multiplier in effect at `frame_count`
pub fn multiplier(frame_count: u64) -> f32 {
    let steps = frame_count / DIFFICULTY_INTERVAL;
    1.0 + DIFFICULTY_STEP * steps as f32
}

/// True on the frames where the multiplier steps up
pub fn is_step_frame(frame_count: u64) -> bool {
    frame_count > 0 && frame_count.is_multiple_of(DIFFICULTY_INTERVAL)
}
