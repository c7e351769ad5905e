//! Cosmetic particle bursts

use glam::Vec2;

use super::random::RandomSource;
use super::state::Particle;
use crate::consts::*;

/// Append up to `count` particles at `origin`, respecting `cap` live particles
pub fn burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl RandomSource,
    origin: Vec2,
    color: &str,
    count: usize,
    cap: usize,
) {
    let room = cap.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let vel = Vec2::new(
            rng.range(-PARTICLE_MAX_SPEED, PARTICLE_MAX_SPEED),
            rng.range(-PARTICLE_MAX_SPEED, PARTICLE_MAX_SPEED),
        );
        particles.push(Particle {
            pos: origin,
            vel,
            life: 1.0,
            color: color.to_string(),
            size: rng.range(PARTICLE_MIN_SIZE, PARTICLE_MIN_SIZE + PARTICLE_SIZE_SPAN),
        });
    }
}

/// Move, fade, and cull particles
pub fn tick(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= PARTICLE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}
