//! Score-driven difficulty
//!
//! Each new score value is checked against three schedules: a global speed
//! step every K1 points, a vertical bob step every K2 points, and a single
//! switch at K3 that lets new blocks change lanes mid-flight. Scores are fed
//! one at a time, so a tick that clears several blocks still hits every
//! threshold exactly once.

use crate::tuning::Tuning;

/// A difficulty change for the session to apply
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// New global speed multiplier
    Speed(f32),
    /// Bob rate increment
    Bob(f32),
    MovingBlocks,
}

/// What happened at one score value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    pub steps: Vec<Step>,
    /// Banner text; the last step reached wins
    pub notification: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DifficultyController {
    tuning: Tuning,
    extra_speed: f32,
    bob_steps: u32,
    moving_blocks: bool,
    frozen: bool,
}

impl DifficultyController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.clone(),
            extra_speed: 0.0,
            bob_steps: 0,
            moving_blocks: false,
            frozen: false,
        }
    }

    /// Global multiplier for rotation, blocks, background and spawning
    pub fn speed_multiplier(&self) -> f32 {
        if self.frozen {
            self.tuning.slow_motion_factor()
        } else {
            1.0 + self.extra_speed
        }
    }

    pub fn bob_active(&self) -> bool {
        self.bob_steps > 0
    }

    pub fn moving_blocks(&self) -> bool {
        self.moving_blocks
    }

    /// Lock everything to slow motion; later scores change nothing
    pub fn freeze(&mut self) -> f32 {
        self.frozen = true;
        self.tuning.slow_motion_factor()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// React to the score having just become `score`
    pub fn on_score(&mut self, score: u32) -> Reaction {
        let mut reaction = Reaction::default();
        if self.frozen || score == 0 {
            return reaction;
        }

        if score % self.tuning.speed_step_every() == 0 {
            self.extra_speed += self.tuning.speed_increment();
            let multiplier = self.speed_multiplier();
            log::info!("Score {score}: speed x{multiplier:.2}");
            reaction.steps.push(Step::Speed(multiplier));
            reaction.notification = Some(format!("Score: {score} - speeding up!"));
        }

        if score % self.tuning.bob_step_every() == 0 {
            self.bob_steps += 1;
            log::info!("Score {score}: bob step {}", self.bob_steps);
            reaction.steps.push(Step::Bob(self.tuning.bob_increment()));
            reaction.notification = Some(if self.bob_steps == 1 {
                "Not bad... time for some up and down!".to_string()
            } else {
                "Still going? Let's bounce faster!".to_string()
            });
        }

        if !self.moving_blocks && score == self.tuning.moving_blocks_at() {
            self.moving_blocks = true;
            log::info!("Score {score}: moving blocks enabled");
            reaction.steps.push(Step::MovingBlocks);
            reaction.notification = Some("Watch out, the blocks are on the move!".to_string());
        }

        reaction
    }
}
