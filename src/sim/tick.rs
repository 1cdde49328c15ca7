//! Per-frame simulation step
//!
//! `tick` runs the phase machine in a fixed order: swing (Swinging), drop and
//! landing (Dropping), then debris in every phase. `Session` wraps a state with
//! the frame-delta clamp and the game-over callback.

use super::debris::advance_debris;
use super::drop::{advance_drop, trigger_drop};
use super::overlap::resolve_landing;
use super::state::{GameEvent, GamePhase, GameState, Snapshot};
use super::swing::advance_swing;
use crate::tuning::Tuning;

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, dt: f32) {
    match state.phase {
        GamePhase::Loading => {
            state.loading_remaining -= dt;
            if state.loading_remaining <= 0.0 {
                state.loading_remaining = 0.0;
                state.phase = GamePhase::Swinging;
                state.spawn_active_block();
                log::info!("Loading done, first block swinging");
            }
        }
        GamePhase::Swinging => advance_swing(state, dt),
        GamePhase::Dropping => {
            if advance_drop(state, dt) {
                resolve_landing(state);
            }
        }
        GamePhase::GameOver => {}
    }

    // Debris keeps falling after game over
    advance_debris(state, dt);
}

/// Callback receiving the final score
pub type GameOverCallback = Box<dyn FnMut(u64)>;

/// A running game: the state plus its driver-facing entry points
pub struct Session {
    state: GameState,
    on_game_over: Option<GameOverCallback>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            on_game_over: None,
        }
    }

    /// Register the callback invoked once per game over
    pub fn on_game_over(&mut self, callback: impl FnMut(u64) + 'static) {
        self.on_game_over = Some(Box::new(callback));
    }

    /// Advance by a frame delta. Oversized deltas are clamped, invalid ones skipped.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Skipping tick with invalid dt {}", dt);
            return;
        }
        let dt = dt.min(self.state.tuning.max_frame_dt);
        tick(&mut self.state, dt);

        if let Some(score) = self.state.take_game_over() {
            log::info!("Game over, final score {}", score);
            if let Some(callback) = self.on_game_over.as_mut() {
                callback(score);
            }
        }
    }

    /// Player input. Only takes effect while Swinging.
    pub fn trigger_drop(&mut self) -> bool {
        trigger_drop(&mut self.state)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn reset_with_seed(&mut self, seed: u64) {
        self.state.reset_with_seed(seed);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("has_game_over_callback", &self.on_game_over.is_some())
            .finish()
    }
}
