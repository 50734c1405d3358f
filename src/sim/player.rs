//! The rotating player
//!
//! An anchor dot with N outer dots spaced evenly on a circle around it.
//! Rotation is driven by two actuators, one per direction; exactly one of
//! them is running at any time and a tap swaps which one. The first
//! collision freezes the player into slow motion for the rest of the session.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::{BOB_LEG_SECS, PLAYER_ENTRY_SECS};
use crate::settings::Settings;
use crate::{ease_in_out, ease_out, rotate, wrap_angle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    Counterclockwise,
}

impl RotationDirection {
    pub fn reversed(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::Counterclockwise,
            RotationDirection::Counterclockwise => RotationDirection::Clockwise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Rotating(RotationDirection),
    /// Collided; slow motion until the session ends
    Frozen,
}

/// One outer dot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub pos: Vec2,
    /// Set on the dot that made contact
    pub flagged: bool,
}

/// Ease-in-ease-out vertical oscillation, one leg at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Bob {
    amplitude: f32,
    from: f32,
    to: f32,
    elapsed: f32,
    rate: f32,
}

impl Bob {
    fn new(amplitude: f32) -> Self {
        // First leg rises from the centre line
        Self {
            amplitude,
            from: 0.0,
            to: amplitude,
            elapsed: 0.0,
            rate: 0.0,
        }
    }

    fn offset(&self) -> f32 {
        self.from + (self.to - self.from) * ease_in_out(self.elapsed / BOB_LEG_SECS)
    }

    fn update(&mut self, dt: f32) {
        self.elapsed += dt * self.rate;
        while self.elapsed >= BOB_LEG_SECS {
            self.elapsed -= BOB_LEG_SECS;
            self.from = self.to;
            self.to = if self.to > 0.0 {
                -self.amplitude
            } else {
                self.amplitude
            };
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Where the anchor comes to rest after sliding in
    rest: Vec2,
    /// Anchor x when the session starts (off-screen left)
    entry_x: f32,
    entry_elapsed: f32,
    anchor: Vec2,
    rotation_angle: f32,
    direction: RotationDirection,
    clockwise_rate: f32,
    counterclockwise_rate: f32,
    /// Radians per second at rate 1.0
    angular_speed: f32,
    /// Fixed per-dot offsets from the anchor at angle 0
    offsets: Vec<Vec2>,
    dots: Vec<Dot>,
    bob: Bob,
    collided: bool,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        let n = settings.number_of_dots();
        let distance = settings.dot_distance_from_anchor();
        // Dot k sits 2πk/N clockwise from straight up
        let offsets: Vec<Vec2> = (0..n)
            .map(|k| {
                let angle = TAU / n as f32 * k as f32;
                Vec2::new(distance * angle.sin(), distance * angle.cos())
            })
            .collect();

        let rest = settings.player_rest_position();
        let entry_x = -settings.window_size().x / 2.0;
        let mut player = Self {
            rest,
            entry_x,
            entry_elapsed: 0.0,
            anchor: Vec2::new(entry_x, rest.y),
            rotation_angle: 0.0,
            direction: RotationDirection::Clockwise,
            clockwise_rate: 1.0,
            counterclockwise_rate: 0.0,
            angular_speed: TAU / settings.rotation_period(),
            dots: vec![
                Dot {
                    pos: Vec2::ZERO,
                    flagged: false,
                };
                n
            ],
            offsets,
            bob: Bob::new(settings.bob_amplitude()),
            collided: false,
        };
        player.place_dots();
        player
    }

    /// Advance slide-in, rotation and bob by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.entry_elapsed < PLAYER_ENTRY_SECS {
            self.entry_elapsed = (self.entry_elapsed + dt).min(PLAYER_ENTRY_SECS);
        }
        let t = ease_out(self.entry_elapsed / PLAYER_ENTRY_SECS);
        self.anchor.x = self.entry_x + (self.rest.x - self.entry_x) * t;

        let net_rate = self.counterclockwise_rate - self.clockwise_rate;
        self.rotation_angle = wrap_angle(self.rotation_angle + net_rate * self.angular_speed * dt);

        self.bob.update(dt);
        self.anchor.y = self.rest.y + self.bob.offset();

        self.place_dots();
    }

    fn place_dots(&mut self) {
        for (dot, offset) in self.dots.iter_mut().zip(&self.offsets) {
            dot.pos = self.anchor + rotate(*offset, self.rotation_angle);
        }
    }

    /// Reverse rotation. Does nothing once frozen.
    pub fn toggle_direction(&mut self) -> bool {
        if self.collided {
            return false;
        }
        let speed = self.speed_multiplier();
        self.direction = self.direction.reversed();
        self.apply_rate(speed);
        true
    }

    /// Set the running actuator's rate, leaving the idle one at zero
    fn apply_rate(&mut self, rate: f32) {
        match self.direction {
            RotationDirection::Clockwise => {
                self.clockwise_rate = rate;
                self.counterclockwise_rate = 0.0;
            }
            RotationDirection::Counterclockwise => {
                self.clockwise_rate = 0.0;
                self.counterclockwise_rate = rate;
            }
        }
    }

    /// Difficulty-driven rotation speed
    pub fn set_speed(&mut self, multiplier: f32) {
        if !self.collided {
            self.apply_rate(multiplier.max(0.0));
        }
    }

    /// Speed up the vertical bob; the first call switches it on
    pub fn increase_bob_rate(&mut self, increment: f32) {
        if !self.collided {
            self.bob.rate += increment;
        }
    }

    /// Enter slow motion. Returns false if already frozen.
    pub fn freeze(&mut self, slow_motion: f32, include_vertical: bool) -> bool {
        if self.collided {
            return false;
        }
        self.apply_rate(slow_motion);
        if include_vertical {
            self.bob.rate = slow_motion;
        }
        self.collided = true;
        true
    }

    /// Mark the outer dot that made contact
    pub fn flag_dot(&mut self, index: usize) {
        if let Some(dot) = self.dots.get_mut(index) {
            dot.flagged = true;
        }
    }

    pub fn state(&self) -> PlayerState {
        if self.collided {
            PlayerState::Frozen
        } else {
            PlayerState::Rotating(self.direction)
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.collided
    }

    pub fn direction(&self) -> RotationDirection {
        self.direction
    }

    /// (clockwise, counterclockwise) actuator rates
    pub fn rates(&self) -> (f32, f32) {
        (self.clockwise_rate, self.counterclockwise_rate)
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.clockwise_rate.max(self.counterclockwise_rate)
    }

    pub fn bob_rate(&self) -> f32 {
        self.bob.rate
    }

    pub fn vertical_offset(&self) -> f32 {
        self.bob.offset()
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Angle of dot `k` around the anchor, clockwise from straight up
    pub fn dot_bearing(&self, k: usize) -> Option<f32> {
        self.dots.get(k).map(|dot| {
            let d = dot.pos - self.anchor;
            wrap_angle(d.x.atan2(d.y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn settings(n: usize) -> Settings {
        Settings::new(500.0, 300.0, n, 1.75).unwrap()
    }

    fn angular_gap(a: f32, b: f32) -> f32 {
        wrap_angle(b - a)
    }

    #[test]
    fn test_starts_clockwise_off_screen() {
        let p = Player::new(&settings(2));
        assert_eq!(p.state(), PlayerState::Rotating(RotationDirection::Clockwise));
        assert_eq!(p.rates(), (1.0, 0.0));
        assert!(p.anchor().x < 0.0);
        assert_eq!(p.bob_rate(), 0.0);
    }

    #[test]
    fn test_slides_in_to_rest() {
        let s = settings(2);
        let mut p = Player::new(&s);
        for _ in 0..(5.0 / SIM_DT) as usize {
            p.update(SIM_DT);
        }
        assert!((p.anchor() - s.player_rest_position()).length() < 1e-3);
    }

    #[test]
    fn test_clockwise_decreases_angle() {
        let mut p = Player::new(&settings(2));
        p.update(0.1);
        assert!(p.rotation_angle() > std::f32::consts::PI);
        p.toggle_direction();
        let before = p.rotation_angle();
        p.update(0.01);
        assert!(p.rotation_angle() > before);
    }

    #[test]
    fn test_bob_only_moves_once_enabled() {
        let mut p = Player::new(&settings(2));
        p.update(1.0);
        assert_eq!(p.vertical_offset(), 0.0);
        p.increase_bob_rate(0.8);
        p.update(BOB_LEG_SECS / 0.8);
        assert!((p.vertical_offset() - 15.0).abs() < 1e-3);
        p.update(BOB_LEG_SECS / 0.8);
        assert!((p.vertical_offset() + 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_freeze_without_bob_leaves_vertical_alone() {
        let mut p = Player::new(&settings(2));
        p.set_speed(1.36);
        assert!(p.freeze(0.25, false));
        assert_eq!(p.state(), PlayerState::Frozen);
        assert_eq!(p.rates(), (0.25, 0.0));
        assert_eq!(p.bob_rate(), 0.0);
    }

    #[test]
    fn test_freeze_with_bob_scales_vertical() {
        let mut p = Player::new(&settings(2));
        p.increase_bob_rate(0.8);
        p.toggle_direction();
        assert!(p.freeze(0.25, true));
        assert_eq!(p.rates(), (0.0, 0.25));
        assert_eq!(p.bob_rate(), 0.25);
    }

    #[test]
    fn test_frozen_is_terminal() {
        let mut p = Player::new(&settings(3));
        assert!(p.freeze(0.25, false));
        assert!(!p.freeze(0.5, true));
        assert!(!p.toggle_direction());
        p.set_speed(3.0);
        p.increase_bob_rate(1.0);
        assert_eq!(p.rates(), (0.25, 0.0));
        assert_eq!(p.bob_rate(), 0.0);
    }

    #[test]
    fn test_flag_dot() {
        let mut p = Player::new(&settings(2));
        p.flag_dot(1);
        p.flag_dot(99);
        assert!(!p.dots()[0].flagged);
        assert!(p.dots()[1].flagged);
    }

    proptest! {
        #[test]
        fn prop_dots_stay_evenly_spaced(
            n in 1usize..9,
            steps in proptest::collection::vec((0.0f32..0.05, any::<bool>()), 0..200),
        ) {
            let s = settings(n);
            let mut p = Player::new(&s);
            for (dt, tap) in steps {
                if tap {
                    p.toggle_direction();
                }
                p.update(dt);
            }
            let base = p.dot_bearing(0).unwrap();
            for (k, dot) in p.dots().iter().enumerate() {
                let dist = (dot.pos - p.anchor()).length();
                prop_assert!((dist - s.dot_distance_from_anchor()).abs() < 1e-2);
                let expected = TAU / n as f32 * k as f32;
                let gap = angular_gap(base, p.dot_bearing(k).unwrap());
                let err = (gap - expected).abs().min(TAU - (gap - expected).abs());
                prop_assert!(err < 1e-3, "dot {} off by {}", k, err);
            }
        }

        #[test]
        fn prop_toggle_keeps_one_actuator(speed in 0.01f32..5.0, toggles in 1usize..10) {
            let mut p = Player::new(&settings(2));
            p.set_speed(speed);
            for _ in 0..toggles {
                prop_assert!(p.toggle_direction());
                let (cw, ccw) = p.rates();
                prop_assert!((cw == 0.0) != (ccw == 0.0));
                prop_assert!((cw.max(ccw) - speed).abs() < 1e-6);
            }
        }
    }
}
