//! Scene state machine and frame driver
//!
//! Intro -> Playing -> GameOver -> Intro, forever. The intro always holds a
//! fully built session so tapping to start costs nothing. Game over keeps
//! the finished session running in slow motion behind the score reveal,
//! then a fresh intro (with a fresh session inside) takes over.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{SCENE_TRANSITION_SECS, SIM_DT};
use crate::highscores::HighScoreStore;
use crate::platform::{MusicToggle, SceneManager, Tap};
use crate::settings::Settings;
use crate::sim::clock::Clock;
use crate::sim::effects::ScoreReveal;
use crate::sim::rect::Rect;
use crate::sim::session::Session;
use crate::sim::state::GameEvent;
use crate::tuning::Tuning;

pub use crate::platform::SceneKind;

/// Bottom-left "Reset High Score?" control
const RESET_CORNER: Vec2 = Vec2::new(5.0, 5.0);
const RESET_SIZE: Vec2 = Vec2::new(90.0, 12.0);

/// Title screen with a session waiting to start
#[derive(Debug)]
pub struct Intro {
    session: Box<Session>,
    high_score_text: String,
    reset_region: Rect,
}

impl Intro {
    fn new(session: Session, high_score: u32) -> Self {
        Self {
            session: Box::new(session),
            high_score_text: high_score_text(high_score),
            reset_region: Rect::from_corner(RESET_CORNER, RESET_SIZE),
        }
    }

    pub fn high_score_text(&self) -> &str {
        &self.high_score_text
    }

    pub fn reset_region(&self) -> Rect {
        self.reset_region
    }

    /// The session a tap will start
    pub fn pending_session(&self) -> &Session {
        &self.session
    }
}

fn high_score_text(score: u32) -> String {
    format!("High Score: {score}")
}

/// Slow-motion aftermath with the score reveal on top
#[derive(Debug)]
pub struct GameOver {
    session: Box<Session>,
    reveal: ScoreReveal,
}

impl GameOver {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reveal(&self) -> &ScoreReveal {
        &self.reveal
    }
}

#[derive(Debug)]
pub enum Scene {
    Intro(Intro),
    Playing(Box<Session>),
    GameOver(GameOver),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Intro(_) => SceneKind::Intro,
            Scene::Playing(_) => SceneKind::Playing,
            Scene::GameOver(_) => SceneKind::GameOver,
        }
    }

    /// The session on screen, if one is running
    pub fn session(&self) -> Option<&Session> {
        match self {
            Scene::Intro(_) => None,
            Scene::Playing(session) => Some(session),
            Scene::GameOver(over) => Some(&over.session),
        }
    }
}

/// Top-level driver: owns the scene and the external collaborators
pub struct Game<M: MusicToggle, S: SceneManager, H: HighScoreStore> {
    settings: Arc<Settings>,
    tuning: Tuning,
    rng: Pcg32,
    clock: Clock,
    /// Always `Some` outside of a transition
    scene: Option<Scene>,
    music: M,
    scenes: S,
    high_scores: H,
    events: Vec<GameEvent>,
}

impl<M: MusicToggle, S: SceneManager, H: HighScoreStore> Game<M, S, H> {
    pub fn new(
        settings: Settings,
        tuning: Tuning,
        seed: u64,
        music: M,
        scenes: S,
        high_scores: H,
    ) -> Self {
        let mut game = Self {
            settings: Arc::new(settings),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            clock: Clock::new(),
            scene: None,
            music,
            scenes,
            high_scores,
            events: Vec::new(),
        };
        let intro = game.new_intro();
        game.music.set_muted(true);
        game.scene = Some(Scene::Intro(intro));
        game.events.push(GameEvent::SceneChanged {
            to: SceneKind::Intro,
        });
        log::info!("Game ready (seed {seed})");
        game
    }

    fn new_intro(&mut self) -> Intro {
        let session = Session::new(self.settings.clone(), &self.tuning, self.rng.random());
        Intro::new(session, self.high_scores.get())
    }

    pub fn scene(&self) -> &Scene {
        // Only a transition in progress leaves this empty, and transitions
        // never span a call boundary
        self.scene
            .as_ref()
            .unwrap_or_else(|| unreachable!("scene taken outside a transition"))
    }

    pub fn kind(&self) -> SceneKind {
        self.scene().kind()
    }

    /// The running session while playing
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self.scene.as_mut() {
            Some(Scene::Playing(session)) => Some(session),
            _ => None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn music(&self) -> &M {
        &self.music
    }

    /// For hosts that advance their own audio
    pub fn music_mut(&mut self) -> &mut M {
        &mut self.music
    }

    pub fn scene_manager(&self) -> &S {
        &self.scenes
    }

    pub fn high_scores(&self) -> &H {
        &self.high_scores
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed wall-clock frame time; runs as many fixed steps as it covers
    pub fn frame(&mut self, elapsed: f32) {
        for _ in 0..self.clock.advance(elapsed) {
            self.step(SIM_DT);
        }
    }

    /// Run exactly one fixed step
    pub fn step(&mut self, dt: f32) {
        let Some(scene) = self.scene.take() else {
            return;
        };
        let next = match scene {
            Scene::Intro(intro) => Scene::Intro(intro),
            Scene::Playing(mut session) => {
                let contact = session.tick(dt);
                self.events.extend(session.drain_events());
                if contact.is_some() {
                    self.game_over(session)
                } else {
                    Scene::Playing(session)
                }
            }
            Scene::GameOver(mut over) => {
                over.session.tick(dt);
                self.events.extend(over.session.drain_events());
                if over.reveal.update(dt) {
                    self.events.push(GameEvent::ScoreRevealed {
                        text: over.reveal.text().to_string(),
                    });
                }
                if over.reveal.is_done() {
                    self.back_to_intro()
                } else {
                    Scene::GameOver(over)
                }
            }
        };
        self.scene = Some(next);
    }

    /// Deliver a tap
    pub fn tap(&mut self, tap: Tap) {
        let Some(scene) = self.scene.take() else {
            return;
        };
        let next = match scene {
            Scene::Intro(mut intro) => {
                if intro.reset_region.contains(tap.pos) {
                    self.reset_high_score(&mut intro);
                    Scene::Intro(intro)
                } else {
                    self.start(intro)
                }
            }
            Scene::Playing(mut session) => {
                session.tap();
                Scene::Playing(session)
            }
            other => other,
        };
        self.scene = Some(next);
    }

    fn reset_high_score(&mut self, intro: &mut Intro) {
        self.high_scores.set(0);
        intro.high_score_text = high_score_text(self.high_scores.get());
        self.events.push(GameEvent::HighScoreReset);
        log::info!("High score reset");
    }

    fn start(&mut self, intro: Intro) -> Scene {
        self.music.set_muted(false);
        self.scenes
            .transition(SceneKind::Playing, SCENE_TRANSITION_SECS);
        self.events.push(GameEvent::SceneChanged {
            to: SceneKind::Playing,
        });
        log::info!("Session started");
        Scene::Playing(intro.session)
    }

    fn game_over(&mut self, session: Box<Session>) -> Scene {
        let score = session.score();
        let best = self.high_scores.get();
        let new_high_score = score > best;
        if new_high_score {
            self.high_scores.set(score);
            self.events.push(GameEvent::NewHighScore { score });
        }
        log::info!("Game over: {score} blocks cleared (best {best})");
        self.events.push(GameEvent::SceneChanged {
            to: SceneKind::GameOver,
        });
        Scene::GameOver(GameOver {
            session,
            reveal: ScoreReveal::new(score, new_high_score),
        })
    }

    fn back_to_intro(&mut self) -> Scene {
        let intro = self.new_intro();
        self.music.set_muted(true);
        self.scenes.transition(SceneKind::Intro, SCENE_TRANSITION_SECS);
        self.events.push(GameEvent::SceneChanged {
            to: SceneKind::Intro,
        });
        Scene::Intro(intro)
    }
}
