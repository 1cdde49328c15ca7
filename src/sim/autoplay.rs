//! Simple autoplay bot
//!
//! Drops whenever the swinging block is close enough to the centre of the
//! block below it. Used by the headless runner and for demo/idle play.

use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autoplay {
    /// Allowed offset as a fraction of the base footprint on the swing axis
    pub tolerance: f32,
}

impl Default for Autoplay {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

impl Autoplay {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Whether the bot would trigger a drop right now
    pub fn wants_drop(&self, state: &GameState) -> bool {
        if state.phase() != GamePhase::Swinging {
            return false;
        }
        let Some(active) = state.active() else {
            return false;
        };
        let axis = state.swing().axis;
        let base = &state.stack()[active.base_index];
        let offset = (active.position[axis.index()] - base.position[axis.index()]).abs();
        offset <= base.footprint(axis) * self.tolerance
    }
}
