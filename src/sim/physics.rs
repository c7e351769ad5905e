//! Player vertical physics
//!
//! The player never moves horizontally; the world scrolls past instead.

use super::state::Player;

/// Apply one frame of gravity, then resolve against the ground line
pub fn integrate(player: &mut Player, gravity: f32, ground_y: f32) {
    player.vertical_velocity += gravity;
    player.body.y += player.vertical_velocity;

    if player.body.bottom() > ground_y {
        player.body.y = ground_y - player.body.height;
        player.vertical_velocity = 0.0;
        player.airborne = false;
    }
}

/// Start a jump if the player is grounded. Returns whether it was accepted.
pub fn try_jump(player: &mut Player, jump_strength: f32) -> bool {
    if player.airborne {
        return false;
    }
    player.vertical_velocity = -jump_strength;
    player.airborne = true;
    true
}
