//! Data-driven game balance
//!
//! Difficulty steps, slow-motion and spawn weights are tuned by feel rather
//! than derived, so they live here as data instead of as invariants.
//! `TuningConfig` is the editable form; a `Tuning` only exists once it has
//! been checked, so the simulation never sees a zero step or a bad weight.

use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// Where blocks are constructed before they join the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrebuildMode {
    /// Built on the tick thread, ahead of their spawn instant
    #[default]
    Inline,
    /// Built by a worker thread and handed over through a bounded inbox
    Background,
}

/// Unchecked tuning values, as read from disk or written by hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Global speed steps up every this many points (K1)
    pub speed_step_every: u32,
    /// Added to the global speed multiplier at each speed step
    pub speed_increment: f32,
    /// Vertical bob steps up every this many points (K2)
    pub bob_step_every: u32,
    /// Added to the bob rate at each bob step
    pub bob_increment: f32,
    /// Score at which new blocks may change lanes mid-flight (K3)
    pub moving_blocks_at: u32,
    /// Weight of "change lane" against "stay" for a moving-capable block
    pub secondary_height_chance: f64,
    /// Seconds (at speed 1.0) a moving block takes to reach its new lane
    pub drift_secs: f32,
    /// Rate applied to everything still moving after a collision
    pub slow_motion_factor: f32,
    /// Blocks that may be built ahead of their spawn instant
    pub max_prebuilt: usize,
    /// Live blocks allowed on the playfield before spawning pauses
    pub max_active: usize,
    pub prebuild: PrebuildMode,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            speed_step_every: 20,
            speed_increment: 0.12,
            bob_step_every: 50,
            bob_increment: 0.8,
            moving_blocks_at: 70,
            secondary_height_chance: 0.3,
            drift_secs: 0.5,
            slow_motion_factor: 0.25,
            max_prebuilt: 2,
            max_active: 16,
            prebuild: PrebuildMode::Inline,
        }
    }
}

/// Validated game balance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TuningConfig", into = "TuningConfig")]
pub struct Tuning {
    config: TuningConfig,
}

impl TryFrom<TuningConfig> for Tuning {
    type Error = ConfigError;

    fn try_from(config: TuningConfig) -> Result<Self, Self::Error> {
        let fail = |msg: &str| Err(ConfigError::InvalidTuning(msg.to_string()));
        if config.speed_step_every == 0 || config.bob_step_every == 0 {
            return fail("step intervals must be non-zero");
        }
        if !(0.0..=1.0).contains(&config.secondary_height_chance) {
            return fail("secondary_height_chance must be within [0, 1]");
        }
        if !(0.0..1.0).contains(&config.slow_motion_factor) {
            return fail("slow_motion_factor must be within [0, 1)");
        }
        if !(config.speed_increment >= 0.0 && config.bob_increment >= 0.0) {
            return fail("increments must not be negative");
        }
        if !(config.drift_secs > 0.0) {
            return fail("drift_secs must be positive");
        }
        if config.max_prebuilt == 0 || config.max_active == 0 {
            return fail("pool bounds must be non-zero");
        }
        Ok(Self { config })
    }
}

impl From<Tuning> for TuningConfig {
    fn from(tuning: Tuning) -> Self {
        tuning.config
    }
}

impl Tuning {
    pub fn new(config: TuningConfig) -> Result<Self, ConfigError> {
        Self::try_from(config)
    }

    /// Same balance, different construction path
    pub fn with_prebuild(mut self, mode: PrebuildMode) -> Self {
        self.config.prebuild = mode;
        self
    }

    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &std::path::Path) -> Self {
        match crate::persistence::load_json::<Tuning>(path) {
            Ok(Some(tuning)) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Rejected tuning file {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn speed_step_every(&self) -> u32 {
        self.config.speed_step_every
    }

    pub fn speed_increment(&self) -> f32 {
        self.config.speed_increment
    }

    pub fn bob_step_every(&self) -> u32 {
        self.config.bob_step_every
    }

    pub fn bob_increment(&self) -> f32 {
        self.config.bob_increment
    }

    pub fn moving_blocks_at(&self) -> u32 {
        self.config.moving_blocks_at
    }

    pub fn secondary_height_chance(&self) -> f64 {
        self.config.secondary_height_chance
    }

    pub fn drift_secs(&self) -> f32 {
        self.config.drift_secs
    }

    pub fn slow_motion_factor(&self) -> f32 {
        self.config.slow_motion_factor
    }

    pub fn max_prebuilt(&self) -> usize {
        self.config.max_prebuilt
    }

    pub fn max_active(&self) -> usize {
        self.config.max_active
    }

    pub fn prebuild(&self) -> PrebuildMode {
        self.config.prebuild
    }
}
