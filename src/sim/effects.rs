//! Cosmetic timed effects: banners, the score reveal, parallax background
//!
//! Each effect is a small state machine advanced by the tick. None of them
//! affect collision or scoring, but the score reveal gates the return to
//! the intro.

use super::clock::Delay;
use crate::consts::BLOCK_TRANSIT_ROTATIONS;
use crate::settings::Settings;

const FADE_IN_SECS: f32 = 0.75;
const HOLD_SECS: f32 = 1.0;
const FADE_OUT_SECS: f32 = 0.75;
/// Total banner lifetime; the scale pulse runs for the same span
pub const BANNER_SECS: f32 = FADE_IN_SECS + HOLD_SECS + FADE_OUT_SECS;
const BANNER_PEAK_SCALE: f32 = 1.3;

/// Pause before the final score fades in
pub const REVEAL_DELAY_SECS: f32 = 0.5;

/// Fading, growing text notification
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    elapsed: f32,
}

impl Banner {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            elapsed: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(BANNER_SECS);
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= BANNER_SECS
    }

    pub fn alpha(&self) -> f32 {
        let t = self.elapsed;
        if t < FADE_IN_SECS {
            t / FADE_IN_SECS
        } else if t < FADE_IN_SECS + HOLD_SECS {
            1.0
        } else {
            (1.0 - (t - FADE_IN_SECS - HOLD_SECS) / FADE_OUT_SECS).max(0.0)
        }
    }

    pub fn scale(&self) -> f32 {
        if self.is_done() {
            return 1.0;
        }
        1.0 + (BANNER_PEAK_SCALE - 1.0) * self.elapsed / BANNER_SECS
    }
}

/// End-of-session score presentation
#[derive(Debug, Clone)]
pub struct ScoreReveal {
    text: String,
    wait: Delay,
    banner: Option<Banner>,
}

impl ScoreReveal {
    pub fn new(score: u32, new_high_score: bool) -> Self {
        let mut text = format!("Blocks cleared: {score}");
        if new_high_score {
            text.push_str(" - New High Score!");
        }
        Self {
            text,
            wait: Delay::new(REVEAL_DELAY_SECS),
            banner: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.banner.as_ref().is_some_and(Banner::is_done)
    }

    /// Advance; true on the tick the banner starts
    pub fn update(&mut self, dt: f32) -> bool {
        if let Some(banner) = &mut self.banner {
            banner.update(dt);
            return false;
        }
        if self.wait.tick(dt) {
            self.banner = Some(Banner::new(self.text.clone()));
            return true;
        }
        false
    }
}

/// Two background tiles scrolling left in a loop
#[derive(Debug, Clone)]
pub struct Background {
    width: f32,
    velocity: f32,
    offset: f32,
    speed: f32,
}

impl Background {
    pub fn new(settings: &Settings) -> Self {
        let width = settings.window_size().x;
        Self {
            width,
            velocity: width / (settings.seconds_per_rotation() * BLOCK_TRANSIT_ROTATIONS),
            offset: 0.0,
            speed: 1.0,
        }
    }

    pub fn set_speed(&mut self, multiplier: f32) {
        self.speed = multiplier;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn update(&mut self, dt: f32) {
        self.offset = (self.offset + self.velocity * self.speed * dt).rem_euclid(self.width);
    }

    /// Left edge x of each tile; the second overlaps by a pixel to hide the seam
    pub fn tile_positions(&self) -> [f32; 2] {
        [-self.offset, self.width - 1.0 - self.offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_phases() {
        let mut b = Banner::new("hi");
        assert_eq!(b.alpha(), 0.0);
        b.update(0.375);
        assert!((b.alpha() - 0.5).abs() < 1e-5);
        b.update(1.0);
        assert_eq!(b.alpha(), 1.0);
        assert!(b.scale() > 1.0);
        b.update(1.125);
        assert!(b.is_done());
        assert_eq!(b.alpha(), 0.0);
        assert_eq!(b.scale(), 1.0);
    }

    #[test]
    fn test_reveal_text() {
        assert_eq!(ScoreReveal::new(12, false).text(), "Blocks cleared: 12");
        assert_eq!(
            ScoreReveal::new(30, true).text(),
            "Blocks cleared: 30 - New High Score!"
        );
    }

    #[test]
    fn test_reveal_waits_then_runs_banner() {
        let mut reveal = ScoreReveal::new(3, false);
        assert!(!reveal.update(0.25));
        assert!(reveal.banner().is_none());
        assert!(reveal.update(0.25));
        assert!(!reveal.is_done());
        reveal.update(BANNER_SECS);
        assert!(reveal.is_done());
    }

    #[test]
    fn test_background_wraps() {
        let settings = Settings::default();
        let mut bg = Background::new(&settings);
        // One full width takes two rotations of 1.75s
        bg.update(1.75);
        assert!((bg.tile_positions()[0] + 250.0).abs() < 1e-2);
        bg.update(1.75);
        assert!(bg.tile_positions()[0].abs() < 1e-2 || (bg.tile_positions()[0] + 500.0).abs() < 1e-2);
    }
}
