//! Twister entry point
//!
//! Runs the simulation headless at a fixed frame rate with a simple
//! autopilot standing in for the player, logging every game event.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use twister::audio::MusicChannels;
    use twister::highscores::FileHighScores;
    use twister::platform::{Headless, Tap};
    use twister::settings::SettingsConfig;
    use twister::sim::GameEvent;
    use twister::{Game, PrebuildMode, SceneKind, Settings, Tuning};

    /// Host frame length; the game runs its own 120 Hz steps inside
    const FRAME_SECS: f32 = 1.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Headless Twister runner", long_about = None)]
    struct Args {
        /// Orbiting dots around the anchor
        #[arg(long)]
        dots: Option<usize>,
        /// Seconds for one full turn with two dots
        #[arg(long)]
        seconds_per_rotation: Option<f32>,
        #[arg(long)]
        width: Option<f32>,
        #[arg(long)]
        height: Option<f32>,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Frames to run at 60 fps
        #[arg(long, default_value_t = 3600)]
        frames: u32,
        /// Settings JSON; flags above override its fields
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Tuning JSON
        #[arg(long)]
        tuning: Option<PathBuf>,
        #[arg(long)]
        high_score_file: Option<PathBuf>,
        /// Build upcoming blocks on a worker thread
        #[arg(long)]
        background_prebuild: bool,
        /// Average taps per second while playing
        #[arg(long, default_value_t = 1.5)]
        taps_per_second: f64,
    }

    fn settings(args: &Args) -> anyhow::Result<Settings> {
        let base = match &args.settings {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };
        Settings::try_from(overrides(args, SettingsConfig::from(base)))
            .context("invalid settings flags")
    }

    /// Flags win over the file; everything else (the palette included) is kept
    fn overrides(args: &Args, mut config: SettingsConfig) -> SettingsConfig {
        if let Some(width) = args.width {
            config.window_width = width;
        }
        if let Some(height) = args.height {
            config.window_height = height;
        }
        if let Some(dots) = args.dots {
            config.number_of_dots = dots;
        }
        if let Some(secs) = args.seconds_per_rotation {
            config.seconds_per_rotation = secs;
        }
        config
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::init();
        let args = Args::parse();
        log::info!("Twister (headless) starting...");

        let settings = settings(&args)?;
        let mut tuning = match &args.tuning {
            Some(path) => Tuning::load(path),
            None => Tuning::default(),
        };
        if args.background_prebuild {
            tuning = tuning.with_prebuild(PrebuildMode::Background);
        }
        let high_scores = FileHighScores::open(
            args.high_score_file
                .clone()
                .unwrap_or_else(FileHighScores::default_path),
        );
        log::info!(
            "{} dots, {:.2}s per rotation, {}x{} window",
            settings.number_of_dots(),
            settings.seconds_per_rotation(),
            settings.window_size().x,
            settings.window_size().y
        );

        let tap_chance = (args.taps_per_second * f64::from(FRAME_SECS)).clamp(0.0, 1.0);
        let mut pilot = Pcg32::seed_from_u64(args.seed ^ 0x5EED);
        let mut game = Game::new(
            settings,
            tuning,
            args.seed,
            MusicChannels::new(),
            Headless,
            high_scores,
        );
        let center = game.settings().window_size() / 2.0;
        let mut sessions = 0u32;

        for _ in 0..args.frames {
            match game.kind() {
                SceneKind::Intro => game.tap(Tap { pos: center }),
                SceneKind::Playing if pilot.random_bool(tap_chance) => {
                    game.tap(Tap { pos: center })
                }
                _ => {}
            }
            game.frame(FRAME_SECS);
            game.music_mut().update(FRAME_SECS);

            for event in game.drain_events() {
                match &event {
                    GameEvent::SceneChanged {
                        to: SceneKind::GameOver,
                    } => {
                        sessions += 1;
                        log::info!("{event:?}");
                    }
                    GameEvent::BlockSpawned { .. }
                    | GameEvent::BlockRetired { .. }
                    | GameEvent::BlockCleared { .. } => log::debug!("{event:?}"),
                    _ => log::info!("{event:?}"),
                }
            }
        }

        log::info!(
            "Finished {} frames: {sessions} sessions, high score {}",
            args.frames,
            twister::HighScoreStore::get(game.high_scores())
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `twister::Game` directly
}
