//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything the simulation mutates. The
//! renderer reads it through accessors, [`Snapshot`] and drained [`GameEvent`]s.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::debris::FallingDebris;
use super::score::ScoreKeeper;
use crate::consts::MAX_PENDING_EVENTS;
use crate::layer_y;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Base block placed, waiting out the loading delay
    Loading,
    /// Active block swinging, waiting for a drop
    Swinging,
    /// Active block falling toward the stack
    Dropping,
    /// Run ended (terminal until reset)
    GameOver,
}

/// Horizontal axis the active block swings along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Component index into a `Vec3`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Z => 2,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

/// A placed stack block. Immutable once pushed onto the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    /// Centre of the block's bottom face
    pub position: Vec3,
    /// Extent along X
    pub width: f32,
    /// Extent along Z
    pub depth: f32,
}

impl Block {
    /// Footprint extent along `axis`
    #[inline]
    pub fn footprint(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Z => self.depth,
        }
    }

    /// Copy of the footprint with `axis` replaced by `extent`
    pub fn footprint_with(&self, axis: Axis, extent: f32) -> (f32, f32) {
        match axis {
            Axis::X => (extent, self.depth),
            Axis::Z => (self.width, extent),
        }
    }
}

/// The block the player controls. Exists only while Swinging or Dropping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveBlock {
    pub id: u32,
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    /// Vertical speed while dropping (negative = down)
    pub velocity_y: f32,
    /// Index of the stack block this one swings over
    pub base_index: usize,
}

impl ActiveBlock {
    #[inline]
    pub fn footprint(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Z => self.depth,
        }
    }
}

/// Swing parameters for the current active block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingState {
    pub axis: Axis,
    /// +1.0 or -1.0
    pub direction: f32,
    /// Max distance from the base block centre along `axis`
    pub limit: f32,
}

impl Default for SwingState {
    fn default() -> Self {
        Self {
            axis: Axis::X,
            direction: 1.0,
            limit: 0.0,
        }
    }
}

/// Events for the render collaborator, keyed by logical id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// State was reinitialized; drop every handle
    Reset,
    ActiveSpawned {
        id: u32,
        position: Vec3,
        width: f32,
        depth: f32,
        axis: Axis,
    },
    BlockPlaced {
        id: u32,
        /// Stack index, used for colour selection
        layer: usize,
        position: Vec3,
        width: f32,
        depth: f32,
        perfect: bool,
    },
    /// The active block landed or missed; its handle is no longer needed
    ActiveRetired {
        id: u32,
    },
    DebrisSpawned {
        id: u32,
        position: Vec3,
        size: Vec3,
    },
    DebrisRemoved {
        id: u32,
    },
    GameOver {
        score: u64,
    },
}

/// Read-only view of the state for rendering or serialization
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub stack: Vec<Block>,
    pub active: Option<ActiveBlock>,
    pub debris: Vec<FallingDebris>,
    pub swing: SwingState,
    pub camera_target_y: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed, reapplied on reset
    seed: u64,
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    /// Placed blocks, index n sits at y = n * box_height
    pub(crate) stack: Vec<Block>,
    pub(crate) active: Option<ActiveBlock>,
    pub(crate) debris: Vec<FallingDebris>,
    pub(crate) swing: SwingState,
    pub(crate) score: ScoreKeeper,
    /// Seconds left in Loading
    pub(crate) loading_remaining: f32,
    /// Score of a GameOver not yet reported to the session
    pub(crate) pending_game_over: Option<u64>,
    /// Undrained events, capped at `MAX_PENDING_EVENTS` (oldest dropped first)
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with the given tuning. The tuning is assumed valid.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Loading,
            stack: Vec::new(),
            active: None,
            debris: Vec::new(),
            swing: SwingState::default(),
            score: ScoreKeeper::default(),
            loading_remaining: 0.0,
            pending_game_over: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Reinitialize the run with the current seed
    pub fn reset(&mut self) {
        self.reset_with_seed(self.seed);
    }

    /// Reinitialize the run: clear stack and debris, place the base block,
    /// enter Loading. Swinging starts once the loading delay elapses.
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.stack.clear();
        self.debris.clear();
        self.active = None;
        self.score.reset();
        self.pending_game_over = None;
        self.events.clear();
        self.push_event(GameEvent::Reset);
        self.next_id = 1;

        let size = self.tuning.initial_box_size;
        self.place_block(Vec3::ZERO, size, size, false);

        self.swing = SwingState {
            axis: Axis::X,
            direction: self.random_direction(),
            limit: self.tuning.swing_limit(size),
        };
        self.phase = GamePhase::Loading;
        self.loading_remaining = self.tuning.loading_delay;

        log::info!("Game reset with seed {}", seed);
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue an event for the renderer. A host that never drains only keeps the newest ones.
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    pub(crate) fn random_direction(&mut self) -> f32 {
        if self.rng.random_bool(0.5) { 1.0 } else { -1.0 }
    }

    /// Push a block onto the stack at the next layer height
    pub(crate) fn place_block(&mut self, mut position: Vec3, width: f32, depth: f32, perfect: bool) {
        let layer = self.stack.len();
        position.y = layer_y(layer, self.tuning.box_height);
        let id = self.next_entity_id();
        self.stack.push(Block {
            id,
            position,
            width,
            depth,
        });
        self.push_event(GameEvent::BlockPlaced {
            id,
            layer,
            position,
            width,
            depth,
            perfect,
        });
    }

    /// Spawn the next active block over the top of the stack.
    ///
    /// The swing limit comes from the top block's footprint on the current
    /// axis; the block starts offset against its swing direction.
    pub(crate) fn spawn_active_block(&mut self) {
        let base_index = self.top_index();
        let base = self.stack[base_index];
        let axis = self.swing.axis;
        let footprint = base.footprint(axis);

        let limit = self.tuning.swing_limit(footprint);
        let offset = (footprint * self.tuning.initial_swing_offset_multiplier).min(limit);

        let mut position = base.position;
        position.y = self.landing_y() + self.tuning.swing_height;
        position[axis.index()] -= self.swing.direction * offset;

        let id = self.next_entity_id();
        self.swing.limit = limit;
        self.active = Some(ActiveBlock {
            id,
            position,
            width: base.width,
            depth: base.depth,
            velocity_y: 0.0,
            base_index,
        });
        self.push_event(GameEvent::ActiveSpawned {
            id,
            position,
            width: base.width,
            depth: base.depth,
            axis,
        });
    }

    /// Index of the top stack block
    #[inline]
    pub(crate) fn top_index(&self) -> usize {
        self.stack.len() - 1
    }

    /// Height the active block lands at (top of the stack)
    #[inline]
    pub fn landing_y(&self) -> f32 {
        layer_y(self.stack.len(), self.tuning.box_height)
    }

    /// Where the renderer's camera should look: the top face of the stack plus the offset
    pub fn camera_target_y(&self) -> f32 {
        self.landing_y() + self.tuning.camera_offset
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score.value()
    }

    pub fn stack(&self) -> &[Block] {
        &self.stack
    }

    pub fn top_block(&self) -> &Block {
        &self.stack[self.top_index()]
    }

    pub fn active(&self) -> Option<&ActiveBlock> {
        self.active.as_ref()
    }

    pub fn debris(&self) -> &[FallingDebris] {
        &self.debris
    }

    pub fn swing(&self) -> &SwingState {
        &self.swing
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the final score of a GameOver not yet reported
    pub(crate) fn take_game_over(&mut self) -> Option<u64> {
        self.pending_game_over.take()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score(),
            stack: self.stack.clone(),
            active: self.active,
            debris: self.debris.clone(),
            swing: self.swing,
            camera_target_y: self.camera_target_y(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_state_is_loading_with_base_block() {
        let state = GameState::new(42);
        assert_eq!(state.phase(), GamePhase::Loading);
        assert_eq!(state.stack().len(), 1);
        assert!(state.active().is_none());
        assert_eq!(state.score(), 0);

        let base = state.top_block();
        assert_eq!(base.position, Vec3::ZERO);
        assert_eq!(base.width, INITIAL_BOX_SIZE);
        assert_eq!(base.depth, INITIAL_BOX_SIZE);
    }

    #[test]
    fn test_reset_emits_reset_then_base_placement() {
        let mut state = GameState::new(7);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::Reset);
        assert!(matches!(events[1], GameEvent::BlockPlaced { layer: 0, .. }));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_spawn_active_block_offsets_against_direction() {
        let mut state = GameState::new(3);
        state.swing.direction = 1.0;
        state.spawn_active_block();

        let active = state.active().unwrap();
        assert_eq!(active.base_index, 0);
        assert_eq!(active.width, INITIAL_BOX_SIZE);
        assert!((active.position.x + INITIAL_BOX_SIZE * INITIAL_SWING_OFFSET_MULTIPLIER).abs() < 1e-6);
        assert_eq!(active.position.z, 0.0);
        assert!((active.position.y - (BOX_HEIGHT + SWING_HEIGHT)).abs() < 1e-6);
        assert!((state.swing().limit - INITIAL_BOX_SIZE * SWING_LIMIT_MULTIPLIER).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_offset_never_exceeds_limit() {
        let mut tuning = Tuning::default();
        tuning.swing_limit_multiplier = 0.5;
        tuning.initial_swing_offset_multiplier = 0.5;
        let mut state = GameState::with_tuning(1, tuning);
        state.spawn_active_block();
        let active = state.active().unwrap();
        let axis = state.swing().axis.index();
        assert!((active.position[axis] - state.top_block().position[axis]).abs() <= state.swing().limit);
    }

    #[test]
    fn test_camera_target_follows_top_of_stack() {
        let mut state = GameState::new(5);
        assert_eq!(state.camera_target_y(), BOX_HEIGHT + CAMERA_OFFSET);
        assert_eq!(state.camera_target_y(), state.landing_y() + CAMERA_OFFSET);
        state.place_block(Vec3::ZERO, 3.0, 3.0, true);
        assert_eq!(state.camera_target_y(), 2.0 * BOX_HEIGHT + CAMERA_OFFSET);
    }

    #[test]
    fn test_undrained_events_are_capped_keeping_newest() {
        let mut state = GameState::new(13);
        for id in 0..(MAX_PENDING_EVENTS as u32 + 10) {
            state.push_event(GameEvent::DebrisRemoved { id });
        }
        let events = state.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(
            events.last(),
            Some(&GameEvent::DebrisRemoved { id: MAX_PENDING_EVENTS as u32 + 9 })
        );
        assert!(!events.contains(&GameEvent::Reset));
    }

    #[test]
    fn test_entity_ids_restart_on_reset() {
        let mut state = GameState::new(9);
        let first = state.top_block().id;
        state.spawn_active_block();
        state.reset();
        assert_eq!(state.top_block().id, first);
    }

    #[test]
    fn test_axis_flip_and_index() {
        assert_eq!(Axis::X.flipped(), Axis::Z);
        assert_eq!(Axis::Z.flipped(), Axis::X);
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Z.index(), 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(11);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Loading\""));
        assert!(json.contains("\"camera_target_y\""));
    }
}
