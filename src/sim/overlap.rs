//! Landing resolution
//!
//! When a dropped block reaches the stack, its extent along the swing axis is
//! intersected with the top block's:
//!
//! ```text
//! delta   = dropped[axis] - base[axis]
//! overlap = (base_size[axis] / 2 + dropped_size[axis] / 2) - |delta|
//! ```
//!
//! Too little overlap ends the run. Near-full overlap snaps onto the base and
//! scores a bonus. Anything in between is trimmed to the overlap and the
//! overhang falls off as debris.

use glam::Vec3;

use super::debris::{spawn_cut_piece, spawn_missed_block};
use super::state::{ActiveBlock, Axis, Block, GameEvent, GamePhase, GameState};
use crate::consts::{MIN_CUT_SIZE, OVERLAP_EPSILON};
use crate::sign_or_positive;
use crate::tuning::Tuning;

/// Overhang trimmed from a landed block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutPiece {
    pub position: Vec3,
    pub size: Vec3,
    /// Which way along the axis the piece hangs off (+1 / -1)
    pub push_sign: f32,
}

/// Geometry of a successful landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    pub perfect: bool,
    pub score_increment: u64,
    pub cut: Option<CutPiece>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LandingOutcome {
    /// Not enough overlap; the whole block falls
    Miss { overlap: f32 },
    Placed(Placement),
}

/// Length of the intersection of two extents along one axis
#[inline]
pub fn axis_overlap(base_pos: f32, base_size: f32, dropped_pos: f32, dropped_size: f32) -> f32 {
    (base_size / 2.0 + dropped_size / 2.0) - (dropped_pos - base_pos).abs()
}

/// Decide the outcome of `dropped` landing on `base`. Pure geometry, no state.
pub fn resolve_overlap(base: &Block, dropped: &ActiveBlock, axis: Axis, tuning: &Tuning) -> LandingOutcome {
    let i = axis.index();
    let base_size = base.footprint(axis);
    let delta = dropped.position[i] - base.position[i];
    let overlap = axis_overlap(base.position[i], base_size, dropped.position[i], dropped.footprint(axis));

    if overlap + OVERLAP_EPSILON < tuning.min_overlap_for_success {
        return LandingOutcome::Miss { overlap };
    }

    let perfect = overlap > base_size - tuning.perfect_match_tolerance;
    let score_increment = tuning.base_score_increment
        + if perfect { tuning.perfect_match_score_bonus } else { 0 };

    if perfect {
        return LandingOutcome::Placed(Placement {
            position: base.position,
            width: base.width,
            depth: base.depth,
            perfect,
            score_increment,
            cut: None,
        });
    }

    let trimmed = overlap.max(0.0);
    let mut position = base.position;
    position[i] += delta / 2.0;
    let (width, depth) = base.footprint_with(axis, trimmed);

    let cut_size = dropped.footprint(axis) - overlap;
    let cut = (cut_size > MIN_CUT_SIZE).then(|| {
        let push_sign = sign_or_positive(delta);
        let mut cut_position = position;
        cut_position.y = dropped.position.y;
        cut_position[i] += push_sign * (overlap / 2.0 + cut_size / 2.0);

        let (cut_width, cut_depth) = base.footprint_with(axis, cut_size);
        CutPiece {
            position: cut_position,
            size: Vec3::new(cut_width, tuning.box_height, cut_depth),
            push_sign,
        }
    });

    LandingOutcome::Placed(Placement {
        position,
        width,
        depth,
        perfect,
        score_increment,
        cut,
    })
}

/// Resolve the landed active block against the top of the stack and apply the
/// outcome: place and spawn the next block, or end the run.
pub fn resolve_landing(state: &mut GameState) {
    let Some(active) = state.active.take() else {
        return;
    };
    state.push_event(GameEvent::ActiveRetired { id: active.id });
    let axis = state.swing.axis;
    let base = state.stack[active.base_index];

    match resolve_overlap(&base, &active, axis, &state.tuning) {
        LandingOutcome::Miss { overlap } => {
            let size = Vec3::new(active.width, state.tuning.box_height, active.depth);
            let id = state.next_entity_id();
            let piece = spawn_missed_block(&mut state.rng, id, active.position, size, &state.tuning);
            state.push_debris(piece);

            let score = state.score.value();
            state.phase = GamePhase::GameOver;
            state.pending_game_over = Some(score);
            state.push_event(GameEvent::GameOver { score });
            log::info!("Missed (overlap {:.3}), game over at {} points", overlap, score);
        }
        LandingOutcome::Placed(placement) => {
            state.place_block(placement.position, placement.width, placement.depth, placement.perfect);

            if let Some(cut) = placement.cut {
                let id = state.next_entity_id();
                let piece = spawn_cut_piece(
                    &mut state.rng,
                    id,
                    cut.position,
                    cut.size,
                    axis,
                    cut.push_sign,
                    &state.tuning,
                );
                state.push_debris(piece);
            }

            state.score.add(placement.score_increment);
            log::debug!(
                "Layer {} placed ({:.3} x {:.3}){}, score {}",
                state.top_index(),
                placement.width,
                placement.depth,
                if placement.perfect { " PERFECT" } else { "" },
                state.score.value()
            );

            state.swing.axis = axis.flipped();
            state.swing.direction = state.random_direction();
            state.phase = GamePhase::Swinging;
            state.spawn_active_block();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn base_block() -> Block {
        Block {
            id: 1,
            position: Vec3::ZERO,
            width: 3.0,
            depth: 3.0,
        }
    }

    fn dropped_at(axis: Axis, offset: f32) -> ActiveBlock {
        let mut position = Vec3::new(0.0, BOX_HEIGHT, 0.0);
        position[axis.index()] = offset;
        ActiveBlock {
            id: 2,
            position,
            width: 3.0,
            depth: 3.0,
            velocity_y: -5.0,
            base_index: 0,
        }
    }

    /// State with an active block landed at `offset` along X
    fn landed_state(offset: f32) -> GameState {
        let mut state = GameState::new(21);
        state.swing.axis = Axis::X;
        state.spawn_active_block();
        let active = state.active.as_mut().unwrap();
        active.position = Vec3::new(offset, BOX_HEIGHT, 0.0);
        state.phase = GamePhase::Dropping;
        state
    }

    #[test]
    fn test_perfect_match_snaps_and_scores_bonus() {
        let tuning = Tuning::default();
        let outcome = resolve_overlap(&base_block(), &dropped_at(Axis::X, 0.0), Axis::X, &tuning);
        let LandingOutcome::Placed(p) = outcome else {
            panic!("expected placement, got {outcome:?}");
        };
        assert!(p.perfect);
        assert_eq!(p.score_increment, 3);
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!((p.width, p.depth), (3.0, 3.0));
        assert!(p.cut.is_none());
    }

    #[test]
    fn test_small_drift_within_tolerance_snaps() {
        let tuning = Tuning::default();
        let outcome = resolve_overlap(&base_block(), &dropped_at(Axis::Z, -0.1), Axis::Z, &tuning);
        let LandingOutcome::Placed(p) = outcome else {
            panic!("expected placement");
        };
        assert!(p.perfect);
        assert_eq!(p.position, Vec3::ZERO);
    }

    #[test]
    fn test_partial_overlap_trims_and_cuts() {
        let tuning = Tuning::default();
        let outcome = resolve_overlap(&base_block(), &dropped_at(Axis::X, 1.0), Axis::X, &tuning);
        let LandingOutcome::Placed(p) = outcome else {
            panic!("expected placement");
        };
        assert!(!p.perfect);
        assert_eq!(p.score_increment, BASE_SCORE_INCREMENT);
        assert!((p.width - 2.0).abs() < 1e-6);
        assert_eq!(p.depth, 3.0);
        assert!((p.position.x - 0.5).abs() < 1e-6);

        let cut = p.cut.unwrap();
        assert!((cut.size.x - 1.0).abs() < 1e-6);
        assert_eq!(cut.size.z, 3.0);
        assert_eq!(cut.size.y, BOX_HEIGHT);
        // Trimmed edge of the dropped block: 1.0 + 1.5 - 0.5 = 2.0
        assert!((cut.position.x - 2.0).abs() < 1e-6);
        assert_eq!(cut.push_sign, 1.0);
    }

    #[test]
    fn test_negative_offset_cuts_on_negative_side() {
        let tuning = Tuning::default();
        let outcome = resolve_overlap(&base_block(), &dropped_at(Axis::Z, -1.2), Axis::Z, &tuning);
        let LandingOutcome::Placed(p) = outcome else {
            panic!("expected placement");
        };
        assert!((p.depth - 1.8).abs() < 1e-5);
        assert_eq!(p.width, 3.0);
        assert!((p.position.z - -0.6).abs() < 1e-6);

        let cut = p.cut.unwrap();
        assert_eq!(cut.push_sign, -1.0);
        assert!((cut.size.z - 1.2).abs() < 1e-5);
        assert!((cut.position.z - -2.1).abs() < 1e-5);
    }

    #[test]
    fn test_boundary_overlap_is_success() {
        let tuning = Tuning::default();
        let outcome = resolve_overlap(&base_block(), &dropped_at(Axis::X, 2.95), Axis::X, &tuning);
        let LandingOutcome::Placed(p) = outcome else {
            panic!("overlap equal to the minimum must land, got {outcome:?}");
        };
        assert!((p.width - MIN_OVERLAP_FOR_SUCCESS).abs() < 1e-4);
    }

    #[test]
    fn test_just_below_boundary_is_miss() {
        let tuning = Tuning::default();
        let outcome = resolve_overlap(&base_block(), &dropped_at(Axis::X, 2.951), Axis::X, &tuning);
        assert!(matches!(outcome, LandingOutcome::Miss { .. }));
    }

    #[test]
    fn test_zero_overlap_never_places_block() {
        // Edges just touching: smallest threshold validation allows must still miss
        let mut tuning = Tuning::default();
        tuning.min_overlap_for_success = MIN_CUT_SIZE * 2.0;
        assert!(tuning.validate().is_ok());

        let outcome = resolve_overlap(&base_block(), &dropped_at(Axis::X, 3.0), Axis::X, &tuning);
        assert!(matches!(outcome, LandingOutcome::Miss { .. }));
    }

    #[test]
    fn test_landing_success_flips_axis_and_spawns_next() {
        let mut state = landed_state(1.0);
        let landed_id = state.active().unwrap().id;
        state.drain_events();

        resolve_landing(&mut state);

        assert_eq!(state.phase(), GamePhase::Swinging);
        assert_eq!(state.stack().len(), 2);
        assert_eq!(state.score(), BASE_SCORE_INCREMENT);
        assert_eq!(state.debris().len(), 1);
        assert_eq!(state.swing().axis, Axis::Z);

        let top = state.top_block();
        assert_eq!(top.position.y, BOX_HEIGHT);
        let active = state.active().unwrap();
        assert_eq!(active.base_index, 1);
        assert_eq!((active.width, active.depth), (top.width, top.depth));
        assert!((state.swing().limit - top.depth * SWING_LIMIT_MULTIPLIER).abs() < 1e-6);

        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::ActiveRetired { id: landed_id });
        assert!(matches!(events[1], GameEvent::BlockPlaced { layer: 1, perfect: false, .. }));
        assert!(matches!(events[2], GameEvent::DebrisSpawned { .. }));
        assert!(matches!(events[3], GameEvent::ActiveSpawned { axis: Axis::Z, .. }));
    }

    #[test]
    fn test_landing_miss_ends_game_with_frozen_score() {
        let mut state = landed_state(2.951);
        state.score.add(7);
        state.drain_events();

        resolve_landing(&mut state);

        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(state.active().is_none());
        assert_eq!(state.stack().len(), 1);
        assert_eq!(state.score(), 7);
        assert_eq!(state.debris().len(), 1);
        assert_eq!(state.debris()[0].size, Vec3::new(3.0, BOX_HEIGHT, 3.0));
        assert_eq!(state.take_game_over(), Some(7));
        assert_eq!(state.take_game_over(), None);

        let events = state.drain_events();
        assert!(matches!(events.first(), Some(GameEvent::ActiveRetired { .. })));
        assert!(matches!(events.last(), Some(GameEvent::GameOver { score: 7 })));
    }

    #[test]
    fn test_perfect_landing_keeps_footprint() {
        let mut state = landed_state(0.05);
        resolve_landing(&mut state);

        assert_eq!(state.score(), BASE_SCORE_INCREMENT + PERFECT_MATCH_SCORE_BONUS);
        assert!(state.debris().is_empty());
        let top = state.top_block();
        assert_eq!(top.position, Vec3::new(0.0, BOX_HEIGHT, 0.0));
        assert_eq!((top.width, top.depth), (INITIAL_BOX_SIZE, INITIAL_BOX_SIZE));
    }
}
