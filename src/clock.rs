//! Explicit simulation clock.
//!
//! The original engine reads a process-wide wall-clock singleton from every
//! gadget/lamp/storm/wave state machine. Design note 9 calls that out as a
//! thing to fix: here the clock is a plain value threaded into every
//! `update` call, so state machines are deterministic given their inputs and
//! tests can drive time directly instead of sleeping.

use std::time::Duration;

/// Monotonic wall-clock time and simulation time passed into every per-tick
/// entry point. `wall` drives gadget/lamp/wind/storm dwell timers (real
/// time, unaffected by pause — see spec §5 "pause is implemented by not
/// calling `update`"). `simulation_time` is the integration clock (advances
/// by `dt` every tick, used by ephemeral particle lifetimes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    wall: Duration,
    simulation_time: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            wall: Duration::ZERO,
            simulation_time: 0.0,
        }
    }

    /// Advances both the wall clock and the simulation clock by `dt` seconds.
    /// Appropriate when the simulation is not paused.
    pub fn advance(&mut self, dt: f32) {
        self.wall += Duration::from_secs_f32(dt.max(0.0));
        self.simulation_time += dt;
    }

    pub fn wall(&self) -> Duration {
        self.wall
    }

    pub fn simulation_time(&self) -> f32 {
        self.simulation_time
    }

    /// Returns a clock advanced by `delta` without mutating `self`, useful
    /// for tests that want to assert on a future instant.
    pub fn plus(&self, delta: Duration) -> Self {
        Self {
            wall: self.wall + delta,
            simulation_time: self.simulation_time + delta.as_secs_f32(),
        }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_both_clocks() {
        let mut clock = SimClock::new();
        clock.advance(1.0 / 60.0);
        assert!(clock.simulation_time() > 0.0);
        assert!(clock.wall() > Duration::ZERO);
    }

    #[test]
    fn plus_does_not_mutate() {
        let clock = SimClock::new();
        let future = clock.plus(Duration::from_millis(100));
        assert_eq!(clock.wall(), Duration::ZERO);
        assert!(future.wall() > clock.wall());
    }
}
