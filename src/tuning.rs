//! Game balance and geometry tuning
//!
//! Every knob the simulation reads lives here. Loaded from JSON on native,
//! passed in as a JSON string from the browser, defaults in [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors produced while loading or validating a [`Tuning`]
#[derive(Debug)]
pub enum TuningError {
    /// Tuning file could not be read or written
    Io(std::io::Error),
    /// Tuning JSON was malformed
    Json(serde_json::Error),
    /// A value is outside the range the simulation can run with
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "tuning io error: {e}"),
            TuningError::Json(e) => write!(f, "tuning json error: {e}"),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Json(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    pub box_height: f32,
    pub initial_box_size: f32,

    // === Swing ===
    pub swing_speed: f32,
    pub swing_limit_multiplier: f32,
    pub initial_swing_offset_multiplier: f32,
    pub swing_height: f32,

    // === Drop ===
    pub drop_acceleration: f32,
    pub drop_initial_velocity: f32,

    // === Outcome thresholds ===
    pub perfect_match_tolerance: f32,
    pub min_overlap_for_success: f32,

    // === Scoring ===
    pub base_score_increment: u64,
    pub perfect_match_score_bonus: u64,

    // === Debris ===
    pub falling_block_gravity: f32,
    pub falling_block_spin_strength: f32,
    pub falling_block_side_push: f32,
    pub falling_block_cleanup_y: f32,

    // === Session ===
    /// Seconds spent in Loading before the first block swings
    pub loading_delay: f32,
    pub camera_offset: f32,
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            box_height: BOX_HEIGHT,
            initial_box_size: INITIAL_BOX_SIZE,

            swing_speed: SWING_SPEED,
            swing_limit_multiplier: SWING_LIMIT_MULTIPLIER,
            initial_swing_offset_multiplier: INITIAL_SWING_OFFSET_MULTIPLIER,
            swing_height: SWING_HEIGHT,

            drop_acceleration: DROP_ACCELERATION,
            drop_initial_velocity: DROP_INITIAL_VELOCITY,

            perfect_match_tolerance: PERFECT_MATCH_TOLERANCE,
            min_overlap_for_success: MIN_OVERLAP_FOR_SUCCESS,

            base_score_increment: BASE_SCORE_INCREMENT,
            perfect_match_score_bonus: PERFECT_MATCH_SCORE_BONUS,

            falling_block_gravity: FALLING_BLOCK_GRAVITY,
            falling_block_spin_strength: FALLING_BLOCK_SPIN_STRENGTH,
            falling_block_side_push: FALLING_BLOCK_SIDE_PUSH,
            falling_block_cleanup_y: FALLING_BLOCK_CLEANUP_Y,

            loading_delay: LOADING_DELAY,
            camera_offset: CAMERA_OFFSET,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Write the tuning as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TuningError> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        log::info!("Tuning saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid { field, reason: "must be a positive number" })
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid { field, reason: "must be zero or greater" })
            }
        }

        positive("box_height", self.box_height)?;
        positive("initial_box_size", self.initial_box_size)?;
        positive("swing_speed", self.swing_speed)?;
        positive("swing_limit_multiplier", self.swing_limit_multiplier)?;
        non_negative("initial_swing_offset_multiplier", self.initial_swing_offset_multiplier)?;
        non_negative("swing_height", self.swing_height)?;
        positive("drop_acceleration", self.drop_acceleration)?;
        non_negative("perfect_match_tolerance", self.perfect_match_tolerance)?;
        positive("falling_block_gravity", self.falling_block_gravity)?;
        non_negative("falling_block_spin_strength", self.falling_block_spin_strength)?;
        non_negative("falling_block_side_push", self.falling_block_side_push)?;
        non_negative("loading_delay", self.loading_delay)?;
        non_negative("camera_offset", self.camera_offset)?;
        positive("max_frame_dt", self.max_frame_dt)?;

        if !self.drop_initial_velocity.is_finite() || self.drop_initial_velocity > 0.0 {
            return Err(TuningError::Invalid {
                field: "drop_initial_velocity",
                reason: "must be zero or negative",
            });
        }
        if !self.min_overlap_for_success.is_finite() || self.min_overlap_for_success <= MIN_CUT_SIZE {
            return Err(TuningError::Invalid {
                field: "min_overlap_for_success",
                reason: "must be larger than the smallest cut piece",
            });
        }
        if self.initial_swing_offset_multiplier > self.swing_limit_multiplier {
            return Err(TuningError::Invalid {
                field: "initial_swing_offset_multiplier",
                reason: "must not exceed swing_limit_multiplier",
            });
        }
        if !self.falling_block_cleanup_y.is_finite() || self.falling_block_cleanup_y >= 0.0 {
            return Err(TuningError::Invalid {
                field: "falling_block_cleanup_y",
                reason: "must be below the base block",
            });
        }
        Ok(())
    }

    /// Swing amplitude for a block spawned over a footprint of `footprint`
    #[inline]
    pub fn swing_limit(&self, footprint: f32) -> f32 {
        footprint * self.swing_limit_multiplier
    }
}
