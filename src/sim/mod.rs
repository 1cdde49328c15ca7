//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta only
//! - Seeded RNG only
//! - Stable iteration order (stack by layer, debris by spawn)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod debris;
pub mod drop;
pub mod overlap;
pub mod score;
pub mod state;
pub mod swing;
pub mod tick;

pub use autoplay::Autoplay;
pub use debris::{FallingDebris, advance_debris, spawn_cut_piece, spawn_missed_block, step_debris};
pub use drop::{advance_drop, trigger_drop};
pub use overlap::{CutPiece, LandingOutcome, Placement, axis_overlap, resolve_landing, resolve_overlap};
pub use score::ScoreKeeper;
pub use state::{ActiveBlock, Axis, Block, GameEvent, GamePhase, GameState, Snapshot, SwingState};
pub use swing::advance_swing;
pub use tick::{GameOverCallback, Session, tick};
