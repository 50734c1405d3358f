//! Fixed timestep clock and scaled timers
//!
//! The host reports wall-clock frame time; the clock turns it into a whole
//! number of fixed simulation steps. Timers count simulated time and can be
//! sped up, slowed down or stopped by a rate multiplier.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame the clock will try to catch up on
const MAX_FRAME_SECS: f32 = 0.1;

/// Fixed-step accumulator
#[derive(Debug, Clone)]
pub struct Clock {
    accumulator: f32,
    ticks: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// Feed elapsed wall time; returns how many `SIM_DT` steps to run
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_SECS);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        self.ticks += steps as u64;
        steps
    }

    /// Total fixed steps produced so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Repeating timer with an initial delay and a rate multiplier
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    interval: f32,
    remaining: f32,
    rate: f32,
}

impl Timer {
    /// First fires after `delay`, then every `interval`
    pub fn new(delay: f32, interval: f32) -> Self {
        Self {
            interval,
            remaining: delay,
            rate: 1.0,
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.max(0.0);
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Advance by `dt` of simulated time; true when the timer fires
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt * self.rate;
        if self.remaining <= 0.0 {
            self.remaining += self.interval;
            true
        } else {
            false
        }
    }
}

/// One-shot countdown
#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    remaining: f32,
    done: bool,
}

impl Delay {
    pub fn new(secs: f32) -> Self {
        Self {
            remaining: secs,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// True exactly once, on the tick the delay runs out
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.done {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.done = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_accumulates_partial_frames() {
        let mut clock = Clock::new();
        assert_eq!(clock.advance(SIM_DT * 0.6), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn test_clock_caps_substeps() {
        let mut clock = Clock::new();
        assert_eq!(clock.advance(10.0), MAX_SUBSTEPS);
        // Backlog was dropped, so a tiny frame yields at most one step
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_timer_delay_then_interval() {
        let mut timer = Timer::new(1.0, 0.5);
        assert!(!timer.tick(0.75));
        assert!(timer.tick(0.25));
        assert!(!timer.tick(0.25));
        assert!(timer.tick(0.25));
    }

    #[test]
    fn test_timer_rate_scaling_and_stop() {
        let mut timer = Timer::new(1.0, 1.0);
        timer.set_rate(2.0);
        assert!(timer.tick(0.5));
        timer.set_rate(0.0);
        for _ in 0..100 {
            assert!(!timer.tick(1.0));
        }
    }

    #[test]
    fn test_delay_fires_once() {
        let mut delay = Delay::new(0.5);
        assert!(!delay.tick(0.25));
        assert!(delay.tick(0.25));
        assert!(!delay.tick(0.25));
        assert!(delay.is_done());
    }
}
