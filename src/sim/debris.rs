//! Falling debris
//!
//! Cut pieces and missed blocks fall under simple gravity with a constant
//! spin. They have no collisions and are culled below the cleanup height.
//! Randomized push/spin is drawn from an injected RNG so runs replay exactly.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Axis, GameEvent, GameState};
use crate::tuning::Tuning;

/// A free-falling piece of a block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingDebris {
    pub id: u32,
    pub position: Vec3,
    /// Full extents (width, height, depth)
    pub size: Vec3,
    /// Euler angles (radians)
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl FallingDebris {
    /// Integrate one step of gravity, motion and spin
    #[inline]
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.velocity.y -= gravity * dt;
        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;
    }
}

/// Uniform value in [-strength, strength]
fn symmetric<R: Rng + ?Sized>(rng: &mut R, strength: f32) -> f32 {
    (rng.random::<f32>() * 2.0 - 1.0) * strength
}

fn random_spin<R: Rng + ?Sized>(rng: &mut R, strength: f32) -> Vec3 {
    Vec3::new(
        symmetric(rng, strength),
        symmetric(rng, strength),
        symmetric(rng, strength),
    )
}

/// Debris for the trimmed-off part of a landed block.
///
/// Pushed outward along `axis` in the direction of `push_sign`.
pub fn spawn_cut_piece<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    position: Vec3,
    size: Vec3,
    axis: Axis,
    push_sign: f32,
    tuning: &Tuning,
) -> FallingDebris {
    let mut velocity = Vec3::ZERO;
    let push = tuning.falling_block_side_push * (0.5 + 0.5 * rng.random::<f32>());
    velocity[axis.index()] = push_sign * push;

    FallingDebris {
        id,
        position,
        size,
        rotation: Vec3::ZERO,
        velocity,
        angular_velocity: random_spin(rng, tuning.falling_block_spin_strength),
    }
}

/// Debris for a whole block that missed the stack
pub fn spawn_missed_block<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    position: Vec3,
    size: Vec3,
    tuning: &Tuning,
) -> FallingDebris {
    let drift = tuning.falling_block_side_push * 0.5;
    let velocity = Vec3::new(symmetric(rng, drift), 0.0, symmetric(rng, drift));

    FallingDebris {
        id,
        position,
        size,
        rotation: Vec3::ZERO,
        velocity,
        angular_velocity: random_spin(rng, tuning.falling_block_spin_strength),
    }
}

/// Integrate every piece and drop the ones below `cleanup_y`.
///
/// Returns the ids of removed pieces.
pub fn step_debris(
    pieces: &mut Vec<FallingDebris>,
    dt: f32,
    gravity: f32,
    cleanup_y: f32,
) -> Vec<u32> {
    let mut removed = Vec::new();
    pieces.retain_mut(|piece| {
        piece.integrate(dt, gravity);
        if piece.position.y < cleanup_y {
            removed.push(piece.id);
            false
        } else {
            true
        }
    });
    removed
}

/// Advance all debris in the state. Runs in every phase.
pub fn advance_debris(state: &mut GameState, dt: f32) {
    if state.debris.is_empty() {
        return;
    }
    let removed = step_debris(
        &mut state.debris,
        dt,
        state.tuning.falling_block_gravity,
        state.tuning.falling_block_cleanup_y,
    );
    for id in removed {
        log::trace!("Debris {} culled", id);
        state.push_event(GameEvent::DebrisRemoved { id });
    }
}

impl GameState {
    /// Add a piece to the debris list and announce it
    pub(crate) fn push_debris(&mut self, piece: FallingDebris) {
        self.push_event(GameEvent::DebrisSpawned {
            id: piece.id,
            position: piece.position,
            size: piece.size,
        });
        self.debris.push(piece);
    }
}
