//! Player vs obstacle collision detection

use super::shape::Rect;
use super::state::Obstacle;

/// First obstacle (in spawn order) whose box strictly overlaps `player`
pub fn find_collision<'a>(player: &Rect, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles.iter().find(|obs| player.overlaps(&obs.body))
}
