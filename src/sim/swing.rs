//! Active block swing
//!
//! Moves the active block back and forth along the swing axis. On reaching
//! the limit it is clamped to the limit exactly, then the direction flips.

use super::state::{GamePhase, GameState};

/// Advance the swinging block by `dt`. No-op outside Swinging.
pub fn advance_swing(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Swinging {
        return;
    }
    let Some(active) = state.active.as_mut() else {
        return;
    };

    let swing = &mut state.swing;
    let axis = swing.axis.index();
    let base = state.stack[active.base_index].position[axis];

    active.position[axis] += swing.direction * state.tuning.swing_speed * dt;

    if (active.position[axis] - base).abs() >= swing.limit {
        active.position[axis] = base + swing.limit * swing.direction;
        swing.direction = -swing.direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn swinging_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.spawn_active_block();
        state.phase = GamePhase::Swinging;
        state
    }

    #[test]
    fn test_swing_moves_along_axis() {
        let mut state = swinging_state(1);
        state.swing.direction = 1.0;
        let start = state.active().unwrap().position;

        advance_swing(&mut state, 0.01);

        let pos = state.active().unwrap().position;
        assert!((pos.x - (start.x + SWING_SPEED * 0.01)).abs() < 1e-5);
        assert_eq!(pos.y, start.y);
        assert_eq!(pos.z, start.z);
    }

    #[test]
    fn test_swing_clamps_then_flips() {
        let mut state = swinging_state(2);
        state.swing.direction = 1.0;
        let limit = state.swing().limit;
        state.active.as_mut().unwrap().position.x = limit - 0.01;

        advance_swing(&mut state, 0.1);

        assert_eq!(state.active().unwrap().position.x, limit);
        assert_eq!(state.swing().direction, -1.0);

        // Next step heads back inward from the clamped extreme
        advance_swing(&mut state, 0.1);
        assert!(state.active().unwrap().position.x < limit);
    }

    #[test]
    fn test_swing_clamps_negative_side() {
        let mut state = swinging_state(3);
        state.swing.direction = -1.0;
        let limit = state.swing().limit;
        state.active.as_mut().unwrap().position.x = -limit + 0.01;

        advance_swing(&mut state, 0.1);

        assert_eq!(state.active().unwrap().position.x, -limit);
        assert_eq!(state.swing().direction, 1.0);
    }

    #[test]
    fn test_swing_noop_outside_swinging() {
        let mut state = swinging_state(4);
        state.phase = GamePhase::Dropping;
        let before = state.active().unwrap().position;
        advance_swing(&mut state, 0.05);
        assert_eq!(state.active().unwrap().position, before);
    }

    proptest! {
        #[test]
        fn prop_swing_stays_within_limit(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0001f32..0.05, 1..400),
        ) {
            let mut state = swinging_state(seed);
            let axis = state.swing().axis.index();
            let base = state.top_block().position[axis];
            for dt in steps {
                advance_swing(&mut state, dt);
                let offset = (state.active().unwrap().position[axis] - base).abs();
                prop_assert!(offset <= state.swing().limit + 1e-5);
            }
        }
    }
}
