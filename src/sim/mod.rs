//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod obstacles;
pub mod player;
pub mod rect;
pub mod score;
pub mod session;
pub mod state;

pub use clock::{Clock, Delay, Timer};
pub use collision::{CollisionDetector, Contact, circle_rect_overlap, first_contact};
pub use difficulty::{DifficultyController, Reaction, Step};
pub use effects::{Background, Banner, ScoreReveal};
pub use obstacles::{Block, BlockFactory, BuildRequest, ObstaclePool};
pub use player::{Dot, Player, PlayerState, RotationDirection};
pub use rect::Rect;
pub use score::ScoreTracker;
pub use session::Session;
pub use state::{FlaggedEntities, GameEvent};
