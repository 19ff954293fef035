//! Platform abstraction layer
//!
//! Handles wall-clock vs virtual time and the two frame drivers:
//! - `FramePacedLoop`: sleeps until the next frame boundary on the system clock
//! - `VirtualLoop`: advances a virtual clock by exactly one frame per call

use std::time::{Duration, Instant};

use crate::sim::GameState;

/// Millisecond clock; whole milliseconds on the system clock, arbitrary on the virtual one
#[derive(Debug, Clone)]
pub enum Clock {
    System { origin: Instant },
    Virtual { now_ms: f64 },
}

impl Clock {
    pub fn system() -> Self {
        Clock::System {
            origin: Instant::now(),
        }
    }

    pub fn virtual_at(now_ms: f64) -> Self {
        Clock::Virtual { now_ms }
    }

    pub fn now(&self) -> f64 {
        match self {
            Clock::System { origin } => origin.elapsed().as_millis() as f64,
            Clock::Virtual { now_ms } => *now_ms,
        }
    }

    /// Only meaningful for the virtual clock; the system clock ignores it
    pub fn set(&mut self, ms: f64) {
        if let Clock::Virtual { now_ms } = self {
            *now_ms = ms;
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, Clock::Virtual { .. })
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::virtual_at(0.0)
    }
}

/// Decides when the next frame runs and how much time it covers.
///
/// `next_frame` must leave `state.loop_delta` holding the frame's delta in ms.
pub trait GameLoop {
    fn next_frame(&mut self, state: &mut GameState);

    /// Cooperative yield requested by the runner's re-entrancy guard
    fn yield_now(&mut self) {}
}

/// Real-time driver: waits for the frame boundary, then measures the elapsed time
#[derive(Debug, Default)]
pub struct FramePacedLoop;

impl GameLoop for FramePacedLoop {
    fn next_frame(&mut self, state: &mut GameState) {
        let start = state.ctx.clock.now();
        let goal = state.loop_start_time + state.opts.frame_time_ms;
        if start < goal {
            std::thread::sleep(Duration::from_secs_f64((goal - start) / 1000.0));
        }

        let now = state.ctx.clock.now();
        state.loop_delta = now - state.loop_start_time;
        state.loop_start_time = now;
    }

    fn yield_now(&mut self) {
        std::thread::yield_now();
    }
}

/// Headless driver: every frame is exactly `frame_time_ms` of virtual time
#[derive(Debug, Default)]
pub struct VirtualLoop;

impl GameLoop for VirtualLoop {
    fn next_frame(&mut self, state: &mut GameState) {
        let frame = state.opts.frame_time_ms;
        state.ctx.clock.set(state.loop_start_time + frame);
        state.loop_start_time = state.ctx.clock.now();
        state.loop_delta = frame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_clock_only_moves_when_set() {
        let mut clock = Clock::virtual_at(10.0);
        assert_eq!(clock.now(), 10.0);
        clock.set(26.0);
        assert_eq!(clock.now(), 26.0);
        assert!(clock.is_virtual());
    }

    #[test]
    fn system_clock_ignores_set() {
        let mut clock = Clock::system();
        clock.set(1_000_000.0);
        assert!(clock.now() < 1_000_000.0);
    }
}
