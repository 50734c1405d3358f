//! Platform abstraction layer
//!
//! The simulation never talks to audio devices, windows or input hardware.
//! Whoever drives the game implements these traits and hands them to the
//! `Game`, which calls them only when the scene changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which top-level scene is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneKind {
    Intro,
    Playing,
    GameOver,
}

/// A logical tap in scene coordinates (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub pos: Vec2,
}

impl Tap {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// Gameplay music on/off. Muting swaps to the intro channel.
pub trait MusicToggle {
    fn set_muted(&mut self, muted: bool);
}

/// Presents scenes. `duration` is the crossfade length in seconds.
pub trait SceneManager {
    fn transition(&mut self, to: SceneKind, duration: f32);
}

/// Collaborator that ignores everything; stands in for unavailable devices
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl MusicToggle for Headless {
    fn set_muted(&mut self, _muted: bool) {}
}

impl SceneManager for Headless {
    fn transition(&mut self, to: SceneKind, duration: f32) {
        log::debug!("Presenting {to:?} ({duration}s crossfade)");
    }
}
