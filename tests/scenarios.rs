//! End-to-end gameplay scenarios driven through the public API

use std::sync::Arc;

use glam::Vec2;
use twister::consts::{PLAYER_ENTRY_SECS, SIM_DT};
use twister::highscores::FileHighScores;
use twister::platform::{Headless, Tap};
use twister::sim::{Block, GameEvent, Session};
use twister::{Color, Game, HighScoreStore, MemoryHighScores, SceneKind, Settings, Tuning};

fn session() -> Session {
    Session::new(Arc::new(Settings::default()), &Tuning::default(), 99)
}

/// A block far below the player, just short of the clearing line
fn clearing_block(session: &Session, id: u32) -> Block {
    let s = session.settings();
    Block::new(
        id,
        Vec2::new(s.clearing_line() + 0.5, -1000.0),
        s.block_size(),
        Color::ORANGE,
        100.0,
    )
}

fn clear(session: &mut Session, count: u32, first_id: u32) {
    for id in first_id..first_id + count {
        let block = clearing_block(session, id);
        session.obstacles_mut().activate(block);
    }
    session.tick(SIM_DT);
}

/// Let the player reach its rest position
fn settle(session: &mut Session) {
    for _ in 0..((PLAYER_ENTRY_SECS + 0.5) / SIM_DT) as usize {
        assert!(session.tick(SIM_DT).is_none());
    }
}

/// Put a block on the first dot once the player is in place; the next tick
/// collides
fn crash(session: &mut Session) {
    settle(session);
    let pos = session.player().dots()[0].pos;
    let size = session.settings().block_size();
    session
        .obstacles_mut()
        .activate(Block::new(9000, pos, size, Color::RED, 100.0));
    assert!(session.tick(SIM_DT).is_some());
}

#[test]
fn speed_steps_exactly_once_at_twentieth_clear() {
    let mut s = session();
    for i in 0..19 {
        clear(&mut s, 1, i);
        assert_eq!(s.speed_multiplier(), 1.0);
    }
    assert_eq!(s.score(), 19);

    clear(&mut s, 1, 19);
    assert_eq!(s.score(), 20);
    assert!((s.speed_multiplier() - 1.12).abs() < 1e-6);
    let speed_events = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::SpeedChanged { .. }))
        .count();
    assert_eq!(speed_events, 1);
    assert_eq!(
        s.alert().map(|b| b.text.as_str()),
        Some("Score: 20 - speeding up!")
    );
}

#[test]
fn cleared_block_scores_once() {
    let mut s = session();
    clear(&mut s, 1, 1);
    assert_eq!(s.score(), 1);
    // Still left of the line on every later tick
    for _ in 0..30 {
        s.tick(SIM_DT);
    }
    assert_eq!(s.score(), 1);
}

#[test]
fn collision_slows_bob_only_once_it_is_active() {
    let mut late = session();
    clear(&mut late, 55, 1);
    assert_eq!(late.score(), 55);
    assert!((late.player().bob_rate() - 0.8).abs() < 1e-6);
    crash(&mut late);
    assert_eq!(late.player().bob_rate(), 0.25);
    assert_eq!(late.player().speed_multiplier(), 0.25);

    let mut early = session();
    clear(&mut early, 10, 1);
    crash(&mut early);
    assert_eq!(early.player().bob_rate(), 0.0);
    assert_eq!(early.player().speed_multiplier(), 0.25);
}

#[test]
fn collision_locks_score_and_controls() {
    let mut s = session();
    clear(&mut s, 3, 1);
    crash(&mut s);
    assert!(s.is_over());
    assert!(!s.tap());
    clear(&mut s, 4, 100);
    assert_eq!(s.score(), 3);
}

#[test]
fn high_score_reset_then_new_best_persists() {
    let path = std::env::temp_dir().join(format!(
        "twister-scenario-{}.json",
        std::process::id()
    ));
    let mut store = FileHighScores::open(&path);
    store.set(40);

    let mut game = Game::new(
        Settings::default(),
        Tuning::default(),
        3,
        Headless,
        Headless,
        FileHighScores::open(&path),
    );
    assert_eq!(game.high_scores().get(), 40);

    game.tap(Tap::at(8.0, 8.0));
    assert_eq!(game.kind(), SceneKind::Intro);
    assert_eq!(FileHighScores::open(&path).get(), 0);

    game.tap(Tap::at(250.0, 150.0));
    assert_eq!(game.kind(), SceneKind::Playing);
    let session = game.session_mut().expect("playing");
    clear(session, 5, 1);
    settle(session);
    let pos = session.player().dots()[0].pos;
    let size = session.settings().block_size();
    session
        .obstacles_mut()
        .activate(Block::new(9000, pos, size, Color::RED, 100.0));
    game.step(SIM_DT);

    assert_eq!(game.kind(), SceneKind::GameOver);
    assert_eq!(FileHighScores::open(&path).get(), 5);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::HighScoreReset));
    assert!(events.contains(&GameEvent::NewHighScore { score: 5 }));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn unattended_game_cycles_back_to_intro() {
    let mut game = Game::new(
        Settings::default(),
        Tuning::default(),
        11,
        Headless,
        Headless,
        MemoryHighScores::new(0),
    );
    game.tap(Tap::at(250.0, 150.0));
    // Never tapping again, the player eventually meets a block
    let mut saw_game_over = false;
    for _ in 0..60 * 120 {
        game.frame(1.0 / 60.0);
        saw_game_over |= game.kind() == SceneKind::GameOver;
        if saw_game_over && game.kind() == SceneKind::Intro {
            break;
        }
    }
    assert!(saw_game_over);
    assert_eq!(game.kind(), SceneKind::Intro);
}
