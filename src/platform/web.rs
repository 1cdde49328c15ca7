//! Browser bindings
//!
//! Exposes a `StackGame` class to JavaScript. The page drives it from
//! `requestAnimationFrame`, forwards taps/keys to `triggerDrop`, and reads
//! events and snapshots back as JSON for its Three.js scene.

use wasm_bindgen::prelude::*;

use super::{FrameClock, now_seconds};
use crate::sim::Session;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Stack Tower core loaded");
}

/// A game driven from JavaScript.
///
/// Render events queue until `drainEvents` is called; a page that only reads
/// `snapshotJson` can ignore them, the queue keeps just the newest
/// `MAX_PENDING_EVENTS`. `ActiveRetired` marks the moment the swinging block's
/// mesh should go: the landed block arrives as a `BlockPlaced` with a new id.
#[wasm_bindgen]
pub struct StackGame {
    session: Session,
    clock: FrameClock,
}

#[wasm_bindgen]
impl StackGame {
    /// Create a game. `tuning_json` may be empty to use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: &str) -> Result<StackGame, JsError> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json_str(tuning_json)?
        };
        let clock = FrameClock::new(tuning.max_frame_dt);
        log::info!("Game initialized with seed: {}", seed);
        Ok(StackGame {
            session: Session::with_tuning(seed, tuning),
            clock,
        })
    }

    /// Register `callback(score)`, called once per game over
    #[wasm_bindgen(js_name = onGameOver)]
    pub fn on_game_over(&mut self, callback: js_sys::Function) {
        self.session.on_game_over(move |score| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(score as f64)) {
                log::warn!("onGameOver callback threw: {:?}", e);
            }
        });
    }

    /// Advance by an explicit delta in seconds
    pub fn tick(&mut self, dt: f32) {
        self.session.tick(dt);
    }

    /// Advance by the time since the previous frame
    pub fn frame(&mut self) {
        let dt = self.clock.frame_dt(now_seconds());
        if dt > 0.0 {
            self.session.tick(dt);
        }
    }

    #[wasm_bindgen(js_name = triggerDrop)]
    pub fn trigger_drop(&mut self) -> bool {
        self.session.trigger_drop()
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.clock.restart();
    }

    /// Call after the page was hidden so the gap isn't simulated
    #[wasm_bindgen(js_name = resumeClock)]
    pub fn resume_clock(&mut self) {
        self.clock.restart();
    }

    pub fn score(&self) -> f64 {
        self.session.state().score() as f64
    }

    #[wasm_bindgen(js_name = cameraTargetY)]
    pub fn camera_target_y(&self) -> f32 {
        self.session.state().camera_target_y()
    }

    /// Events since the last call, as a JSON array. Call once per frame when
    /// rendering from events.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.drain_events())?)
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.snapshot())?)
    }
}
