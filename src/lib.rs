//! Stack Tower - A block-stacking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (swing, drop, overlap trimming, debris, game state)
//! - `platform`: Frame clock and browser bindings
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, GamePhase, GameState, Session, Snapshot};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Height of every stack layer
    pub const BOX_HEIGHT: f32 = 1.0;
    /// Footprint (width and depth) of the base block
    pub const INITIAL_BOX_SIZE: f32 = 3.0;

    /// Swing speed along the active axis (units/s)
    pub const SWING_SPEED: f32 = 4.0;
    /// Swing amplitude as a multiple of the previous block's footprint on the axis
    pub const SWING_LIMIT_MULTIPLIER: f32 = 1.2;
    /// Spawn offset from the stack centre as a multiple of the previous footprint
    pub const INITIAL_SWING_OFFSET_MULTIPLIER: f32 = 1.0;
    /// How far above its landing height the active block swings
    pub const SWING_HEIGHT: f32 = 2.0;

    /// Downward acceleration of a dropped block (units/s²)
    pub const DROP_ACCELERATION: f32 = 30.0;
    /// Seed velocity when a drop is triggered (negative = down)
    pub const DROP_INITIAL_VELOCITY: f32 = -2.0;

    /// Overlap within this distance of the full base footprint counts as perfect
    pub const PERFECT_MATCH_TOLERANCE: f32 = 0.12;
    /// Smallest overlap that still lands the block
    pub const MIN_OVERLAP_FOR_SUCCESS: f32 = 0.05;
    /// Float slack applied to the success threshold (2.95 on a 3.0 block is a hit)
    pub const OVERLAP_EPSILON: f32 = 1e-5;
    /// Cut pieces thinner than this are not spawned
    pub const MIN_CUT_SIZE: f32 = 1e-3;

    pub const BASE_SCORE_INCREMENT: u64 = 1;
    pub const PERFECT_MATCH_SCORE_BONUS: u64 = 2;

    /// Debris gravity (units/s²)
    pub const FALLING_BLOCK_GRAVITY: f32 = 20.0;
    /// Max angular speed per component for debris (rad/s)
    pub const FALLING_BLOCK_SPIN_STRENGTH: f32 = 3.0;
    /// Max horizontal push given to debris (units/s)
    pub const FALLING_BLOCK_SIDE_PUSH: f32 = 1.5;
    /// Debris below this height is culled
    pub const FALLING_BLOCK_CLEANUP_Y: f32 = -30.0;

    /// Deferred Loading -> Swinging interval (seconds)
    pub const LOADING_DELAY: f32 = 0.1;
    /// Camera target sits this far above the top of the stack
    pub const CAMERA_OFFSET: f32 = 4.0;
    /// Undrained render events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;
    /// Upper bound on a single frame delta (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
}

/// Sign of `value`, treating zero as positive
#[inline]
pub fn sign_or_positive(value: f32) -> f32 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// Height of the stack layer at `index`
#[inline]
pub fn layer_y(index: usize, box_height: f32) -> f32 {
    index as f32 * box_height
}
