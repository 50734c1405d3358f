//! Session settings
//!
//! Constructed once per session and shared read-only by every component.
//! All geometry is derived from the window size, so the only way to change
//! it is to build a new `Settings`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Configuration validation failures
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("window size must be positive, got {0}x{1}")]
    InvalidWindow(f32, f32),

    #[error("number of dots must be at least 1")]
    NoDots,

    #[error("seconds per rotation must be positive, got {0}")]
    InvalidRotation(f32),

    #[error("color palette must not be empty")]
    EmptyPalette,

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const ORANGE: Color = Color::rgb(255, 128, 0);
}

/// Default block palette
pub const DEFAULT_PALETTE: [Color; 7] = [
    Color::RED,
    Color::BLUE,
    Color::GREEN,
    Color::PURPLE,
    Color::CYAN,
    Color::MAGENTA,
    Color::YELLOW,
];

/// The user-facing knobs that settings are derived from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub number_of_dots: usize,
    pub seconds_per_rotation: f32,
    pub palette: Vec<Color>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            window_width: 500.0,
            window_height: 300.0,
            number_of_dots: 2,
            seconds_per_rotation: 1.75,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

/// Immutable session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SettingsConfig", into = "SettingsConfig")]
pub struct Settings {
    window_size: Vec2,
    dot_radius: f32,
    dot_distance_from_anchor: f32,
    number_of_dots: usize,
    seconds_per_rotation: f32,
    block_size: Vec2,
    palette: Vec<Color>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::derive(&SettingsConfig::default())
    }
}

impl TryFrom<SettingsConfig> for Settings {
    type Error = ConfigError;

    fn try_from(config: SettingsConfig) -> Result<Self, Self::Error> {
        if !(config.window_width > 0.0 && config.window_height > 0.0) {
            return Err(ConfigError::InvalidWindow(
                config.window_width,
                config.window_height,
            ));
        }
        if config.number_of_dots == 0 {
            return Err(ConfigError::NoDots);
        }
        if !(config.seconds_per_rotation > 0.0) {
            return Err(ConfigError::InvalidRotation(config.seconds_per_rotation));
        }
        if config.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self::derive(&config))
    }
}

impl From<Settings> for SettingsConfig {
    fn from(settings: Settings) -> Self {
        Self {
            window_width: settings.window_size.x,
            window_height: settings.window_size.y,
            number_of_dots: settings.number_of_dots,
            seconds_per_rotation: settings.seconds_per_rotation,
            palette: settings.palette,
        }
    }
}

impl Settings {
    /// Build settings with the default palette
    pub fn new(
        window_width: f32,
        window_height: f32,
        number_of_dots: usize,
        seconds_per_rotation: f32,
    ) -> Result<Self, ConfigError> {
        Self::try_from(SettingsConfig {
            window_width,
            window_height,
            number_of_dots,
            seconds_per_rotation,
            palette: DEFAULT_PALETTE.to_vec(),
        })
    }

    /// Recompute every derived constant for a new window size
    pub fn with_window_size(&self, width: f32, height: f32) -> Result<Self, ConfigError> {
        let mut config = SettingsConfig::from(self.clone());
        config.window_width = width;
        config.window_height = height;
        Self::try_from(config)
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn derive(config: &SettingsConfig) -> Self {
        let h = config.window_height;
        let dot_radius = h * 0.015;
        Self {
            window_size: Vec2::new(config.window_width, h),
            dot_radius,
            dot_distance_from_anchor: h * 0.25,
            number_of_dots: config.number_of_dots,
            seconds_per_rotation: config.seconds_per_rotation,
            block_size: Vec2::new(dot_radius * 2.0, h / 5.0),
            palette: config.palette.clone(),
        }
    }

    #[inline]
    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    #[inline]
    pub fn dot_radius(&self) -> f32 {
        self.dot_radius
    }

    #[inline]
    pub fn dot_distance_from_anchor(&self) -> f32 {
        self.dot_distance_from_anchor
    }

    #[inline]
    pub fn number_of_dots(&self) -> usize {
        self.number_of_dots
    }

    #[inline]
    pub fn seconds_per_rotation(&self) -> f32 {
        self.seconds_per_rotation
    }

    #[inline]
    pub fn block_size(&self) -> Vec2 {
        self.block_size
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Seconds for one full player revolution at speed 1.0
    pub fn rotation_period(&self) -> f32 {
        self.seconds_per_rotation / 2.0 * self.number_of_dots as f32
    }

    /// Seconds between block spawns at speed 1.0
    pub fn spawn_interval(&self) -> f32 {
        self.seconds_per_rotation / 4.0 * self.number_of_dots as f32
    }

    /// Resting anchor position once the player has slid in
    pub fn player_rest_position(&self) -> Vec2 {
        Vec2::new(self.window_size.x / 5.0, self.window_size.y / 2.0)
    }

    /// Blocks left of this x count as cleared
    pub fn clearing_line(&self) -> f32 {
        self.player_rest_position().x - self.dot_distance_from_anchor
    }

    /// The two block lane heights: (near-bottom, near-top)
    pub fn lanes(&self) -> (f32, f32) {
        let bh = self.block_size.y;
        (bh * 1.5, self.window_size.y - 1.5 * bh)
    }

    /// Vertical bob amplitude
    pub fn bob_amplitude(&self) -> f32 {
        self.window_size.y / 20.0
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &std::path::Path) -> Self {
        match crate::persistence::load_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Invalid settings file {}: {e:#}", path.display());
                Self::default()
            }
        }
    }
}
