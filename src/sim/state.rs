//! Observable simulation output
//!
//! The renderer and audio host learn about everything that happened in a
//! tick from the event list; nothing in here feeds back into gameplay.

use serde::{Deserialize, Serialize};

use crate::platform::SceneKind;

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BlockSpawned { id: u32, moving: bool },
    /// The spawn timer fired but no block could be placed this tick
    SpawnDeferred,
    BlockCleared { id: u32, score: u32 },
    BlockRetired { id: u32 },
    SpeedChanged { multiplier: f32 },
    BobChanged { rate: f32 },
    MovingBlocksEnabled,
    Notification { text: String },
    Collision { dot: usize, block: u32 },
    ScoreRevealed { text: String },
    NewHighScore { score: u32 },
    HighScoreReset,
    SceneChanged { to: SceneKind },
}

/// Entities marked by the session's collision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedEntities {
    pub dot: Option<usize>,
    pub block: Option<u32>,
}
