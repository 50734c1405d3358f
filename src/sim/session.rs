//! One playing session
//!
//! Owns every entity that lives between tapping to start and returning to
//! the intro. A tick runs in a fixed order: motion first, then the
//! collision test against the fresh positions, then scoring and the
//! difficulty reaction to it.

use std::sync::Arc;

use super::collision::{CollisionDetector, Contact};
use super::difficulty::{DifficultyController, Step};
use super::effects::{Background, Banner};
use super::obstacles::{Block, ObstaclePool};
use super::player::Player;
use super::score::ScoreTracker;
use super::state::{FlaggedEntities, GameEvent};
use crate::settings::Settings;
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct Session {
    settings: Arc<Settings>,
    player: Player,
    obstacles: ObstaclePool,
    collisions: CollisionDetector,
    difficulty: DifficultyController,
    score: ScoreTracker,
    background: Background,
    alert: Option<Banner>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Build a session ready to start; nothing moves until the first tick
    pub fn new(settings: Arc<Settings>, tuning: &Tuning, seed: u64) -> Self {
        Self {
            player: Player::new(&settings),
            obstacles: ObstaclePool::new(&settings, tuning, seed),
            collisions: CollisionDetector::new(),
            difficulty: DifficultyController::new(tuning),
            score: ScoreTracker::new(),
            background: Background::new(&settings),
            alert: None,
            events: Vec::new(),
            settings,
        }
    }

    /// Advance one fixed step. Returns the contact on the tick it happens.
    pub fn tick(&mut self, dt: f32) -> Option<Contact> {
        // Motion
        self.obstacles.update(dt, &mut self.events);
        self.player.update(dt);
        self.background.update(dt);
        if let Some(alert) = &mut self.alert {
            alert.update(dt);
            if alert.is_done() {
                self.alert = None;
            }
        }

        if self.player.is_frozen() {
            return None;
        }

        // Collision
        let contact = self.collisions.check(
            self.player.dots(),
            self.settings.dot_radius(),
            self.obstacles.blocks(),
        );
        if let Some(contact) = contact {
            self.on_contact(contact);
            return Some(contact);
        }

        // Score and difficulty
        let line = self.settings.clearing_line();
        let awarded = self.score.collect(self.obstacles.blocks_mut(), line);
        for (id, score) in awarded {
            self.events.push(GameEvent::BlockCleared { id, score });
            let reaction = self.difficulty.on_score(score);
            for step in reaction.steps {
                self.apply(step);
            }
            if let Some(text) = reaction.notification {
                self.alert = Some(Banner::new(text.clone()));
                self.events.push(GameEvent::Notification { text });
            }
        }
        None
    }

    fn apply(&mut self, step: Step) {
        match step {
            Step::Speed(multiplier) => {
                self.player.set_speed(multiplier);
                self.obstacles.set_speed(multiplier);
                self.background.set_speed(multiplier);
                self.events.push(GameEvent::SpeedChanged { multiplier });
            }
            Step::Bob(increment) => {
                self.player.increase_bob_rate(increment);
                self.events.push(GameEvent::BobChanged {
                    rate: self.player.bob_rate(),
                });
            }
            Step::MovingBlocks => {
                self.obstacles.enable_moving_blocks();
                self.events.push(GameEvent::MovingBlocksEnabled);
            }
        }
    }

    fn on_contact(&mut self, contact: Contact) {
        log::info!(
            "Dot {} hit block {} at score {}",
            contact.dot,
            contact.block,
            self.score.score()
        );
        self.player.flag_dot(contact.dot);
        self.obstacles.flag(contact.block);
        self.events.push(GameEvent::Collision {
            dot: contact.dot,
            block: contact.block,
        });

        let slow_motion = self.difficulty.freeze();
        self.player.freeze(slow_motion, self.difficulty.bob_active());
        self.obstacles.decelerate(slow_motion);
        self.background.set_speed(slow_motion);
        self.score.finalize();
    }

    /// Reverse rotation; ignored after the collision
    pub fn tap(&mut self) -> bool {
        self.player.toggle_direction()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn is_over(&self) -> bool {
        self.player.is_frozen()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.difficulty.speed_multiplier()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn blocks(&self) -> &[Block] {
        self.obstacles.blocks()
    }

    pub fn obstacles(&self) -> &ObstaclePool {
        &self.obstacles
    }

    /// Direct access to the pool, e.g. to place blocks by hand
    pub fn obstacles_mut(&mut self) -> &mut ObstaclePool {
        &mut self.obstacles
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn alert(&self) -> Option<&Banner> {
        self.alert.as_ref()
    }

    /// The dot and block involved in the collision
    pub fn flagged(&self) -> FlaggedEntities {
        self.collisions
            .contact()
            .map(|c| FlaggedEntities {
                dot: Some(c.dot),
                block: Some(c.block),
            })
            .unwrap_or_default()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
