//! Active block drop
//!
//! A drop trigger is only honoured while Swinging. While Dropping the block
//! accelerates downward until it reaches the landing height, where it is
//! clamped and handed to the overlap resolver.

use super::state::{GamePhase, GameState};

/// Start dropping the active block. Returns false (and does nothing) outside Swinging.
pub fn trigger_drop(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Swinging {
        log::debug!("Drop ignored in {:?}", state.phase);
        return false;
    }
    let Some(active) = state.active.as_mut() else {
        return false;
    };
    active.velocity_y = state.tuning.drop_initial_velocity;
    state.phase = GamePhase::Dropping;
    true
}

/// Advance a dropping block. Returns true on the tick it lands.
pub fn advance_drop(state: &mut GameState, dt: f32) -> bool {
    if state.phase != GamePhase::Dropping {
        return false;
    }
    let target_y = state.landing_y();
    let Some(active) = state.active.as_mut() else {
        return false;
    };

    active.velocity_y -= state.tuning.drop_acceleration * dt;
    active.position.y += active.velocity_y * dt;

    if active.position.y <= target_y {
        active.position.y = target_y;
        return true;
    }
    false
}
