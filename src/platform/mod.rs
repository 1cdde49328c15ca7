//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic clock → clamped frame delta)
//! - JavaScript bindings (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seconds on a monotonic clock. Origin is arbitrary.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Seconds on a monotonic clock (`performance.now()`). Origin is page load.
#[cfg(target_arch = "wasm32")]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

/// Turns clock readings into frame deltas, clamped so a stalled or
/// backgrounded frame can't blow up the simulation.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Delta since the previous reading. The first reading, and any reading
    /// that goes backwards, yields zero.
    pub fn frame_dt(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) if now > last => ((now - last) as f32).min(self.max_dt),
            _ => 0.0,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous reading (e.g. after the tab was hidden)
    pub fn restart(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new(0.05);
        assert_eq!(clock.frame_dt(12.0), 0.0);
        assert!((clock.frame_dt(12.016) - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new(0.05);
        clock.frame_dt(1.0);
        assert_eq!(clock.frame_dt(9.0), 0.05);
    }

    #[test]
    fn test_backwards_time_yields_zero() {
        let mut clock = FrameClock::new(0.05);
        clock.frame_dt(5.0);
        assert_eq!(clock.frame_dt(4.0), 0.0);
        clock.restart();
        assert_eq!(clock.frame_dt(4.5), 0.0);
    }

    #[test]
    fn test_native_clock_is_monotonic() {
        let a = now_seconds();
        let b = now_seconds();
        assert!(b >= a);
    }
}
