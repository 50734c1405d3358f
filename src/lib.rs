//! Twister - an endless side-scrolling avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, obstacles, collisions, scoring)
//! - `scene`: Intro / Playing / GameOver state machine and frame driver
//! - `platform`: External collaborator contracts (audio toggle, scene transitions, input)
//! - `persistence`: JSON load/save helpers
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, MemoryHighScores};
pub use scene::{Game, Scene, SceneKind};
pub use settings::{Color, ConfigError, Settings};
pub use tuning::{PrebuildMode, Tuning, TuningConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player slides in from off-screen over this many seconds
    pub const PLAYER_ENTRY_SECS: f32 = 4.0;
    /// Duration of one vertical bob leg (up or down) at rate 1.0
    pub const BOB_LEG_SECS: f32 = 2.0;

    /// First block spawns after this many rotation periods
    pub const FIRST_SPAWN_ROTATIONS: f32 = 2.15;
    /// A block crosses the window in this many rotation periods
    pub const BLOCK_TRANSIT_ROTATIONS: f32 = 2.0;
    /// Moving blocks start drifting after this fraction of their transit
    pub const DRIFT_START_FRACTION: f32 = 0.25;

    /// Scene crossfade requested from the scene manager
    pub const SCENE_TRANSITION_SECS: f32 = 2.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Rotate a vector counterclockwise by `angle` radians (y-up)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Ease-in-ease-out curve on [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Ease-out curve on [0, 1]
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), PI / 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }
}
