//! Music channel mixing
//!
//! The soundtrack ships as two looping tracks that play in lockstep: the
//! full mix for gameplay and a muted mix for the intro. Toggling crossfades
//! between them rather than starting or stopping playback. Decoding and
//! output belong to the host; this only tracks the channel volumes.

use crate::platform::MusicToggle;

/// Volume of the audible channel
pub const FULL_VOLUME: f32 = 1.0;
/// Seconds for a channel swap
pub const CROSSFADE_SECS: f32 = 2.0;

/// Volume ramp for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ramp {
    volume: f32,
    target: f32,
}

impl Ramp {
    fn silent() -> Self {
        Self {
            volume: 0.0,
            target: 0.0,
        }
    }

    fn update(&mut self, dt: f32) {
        let step = FULL_VOLUME / CROSSFADE_SECS * dt;
        if self.volume < self.target {
            self.volume = (self.volume + step).min(self.target);
        } else {
            self.volume = (self.volume - step).max(self.target);
        }
    }
}

/// Gameplay / intro channel pair
#[derive(Debug, Clone)]
pub struct MusicChannels {
    gameplay: Ramp,
    intro: Ramp,
    muted: bool,
}

impl Default for MusicChannels {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicChannels {
    /// Both channels start silent until the first toggle
    pub fn new() -> Self {
        Self {
            gameplay: Ramp::silent(),
            intro: Ramp::silent(),
            muted: true,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Current (gameplay, intro) volumes
    pub fn volumes(&self) -> (f32, f32) {
        (self.gameplay.volume, self.intro.volume)
    }

    /// Advance the crossfade
    pub fn update(&mut self, dt: f32) {
        self.gameplay.update(dt);
        self.intro.update(dt);
    }
}

impl MusicToggle for MusicChannels {
    fn set_muted(&mut self, muted: bool) {
        if muted != self.muted {
            log::debug!("Music {}", if muted { "muted" } else { "unmuted" });
        }
        self.muted = muted;
        self.gameplay.target = if muted { 0.0 } else { FULL_VOLUME };
        self.intro.target = if muted { FULL_VOLUME } else { 0.0 };
    }
}
