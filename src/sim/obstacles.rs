//! Obstacle generation and recycling
//!
//! Blocks enter at the right edge in one of two lanes and slide left until
//! they leave the window. They are built ahead of their spawn instant,
//! either on the tick thread or on a worker thread, and handed over through
//! an inbox the tick loop drains. A block that is not ready in time is
//! simply spawned on a later tick. Whether a block changes lanes is decided
//! at handoff, so a block built before moving blocks were enabled can still
//! move once they are.

use std::collections::VecDeque;
use std::sync::mpsc;

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Timer;
use super::rect::Rect;
use super::state::GameEvent;
use crate::consts::{BLOCK_TRANSIT_ROTATIONS, DRIFT_START_FRACTION, FIRST_SPAWN_ROTATIONS};
use crate::ease_in_out;
use crate::settings::{Color, Settings};
use crate::tuning::{PrebuildMode, Tuning};

/// Lane change in progress or pending
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Drift {
    from: f32,
    elapsed: f32,
}

/// An obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    /// Already counted toward the score
    pub cleared: bool,
    /// The block that made contact
    pub flagged: bool,
    /// Lane this block will drift to partway through its transit
    pub target_secondary_height: Option<f32>,
    pub speed: f32,
    spawn_x: f32,
    /// Horizontal distance covered over a full transit
    path_len: f32,
    /// Pixels per second at speed 1.0
    velocity: f32,
    drift_secs: f32,
    drift: Option<Drift>,
}

impl Block {
    /// A stationary-lane block at `pos`
    pub fn new(id: u32, pos: Vec2, size: Vec2, color: Color, velocity: f32) -> Self {
        Self {
            id,
            pos,
            size,
            color,
            cleared: false,
            flagged: false,
            target_secondary_height: None,
            speed: 1.0,
            spawn_x: pos.x,
            path_len: pos.x + size.x,
            velocity,
            drift_secs: 1.0,
            drift: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -self.size.x
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.x -= self.velocity * self.speed * dt;

        let Some(target) = self.target_secondary_height else {
            return;
        };
        let traveled = self.spawn_x - self.pos.x;
        if self.drift.is_none() && traveled >= self.path_len * DRIFT_START_FRACTION {
            self.drift = Some(Drift {
                from: self.pos.y,
                elapsed: 0.0,
            });
        }
        if let Some(drift) = &mut self.drift {
            drift.elapsed = (drift.elapsed + dt * self.speed).min(self.drift_secs);
            let t = ease_in_out(drift.elapsed / self.drift_secs);
            self.pos.y = drift.from + (target - drift.from) * t;
        }
    }
}

/// Everything needed to build a block, detached from the pool so it can
/// move to a worker thread
#[derive(Debug, Clone)]
pub struct BlockFactory {
    spawn_x: f32,
    size: Vec2,
    lanes: (f32, f32),
    palette: Vec<Color>,
    velocity: f32,
    drift_secs: f32,
    secondary_height_chance: f64,
}

/// Work order for the factory
#[derive(Debug)]
pub struct BuildRequest {
    pub id: u32,
    /// A retired block to reuse
    pub recycled: Option<Block>,
}

impl BlockFactory {
    pub fn new(settings: &Settings, tuning: &Tuning) -> Self {
        let w = settings.window_size().x;
        let size = settings.block_size();
        let transit = settings.seconds_per_rotation() * BLOCK_TRANSIT_ROTATIONS;
        Self {
            spawn_x: w,
            size,
            lanes: settings.lanes(),
            palette: settings.palette().to_vec(),
            velocity: (w + size.x) / transit,
            drift_secs: tuning.drift_secs(),
            secondary_height_chance: tuning.secondary_height_chance(),
        }
    }

    /// Pixels per second at speed 1.0
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Lane and color; the block stays in its lane until
    /// `commit_lane_change` says otherwise
    pub fn build(&self, rng: &mut Pcg32, request: BuildRequest) -> Block {
        let (low, high) = self.lanes;
        let y = if rng.random_bool(0.5) { high } else { low };
        let color = self.palette.choose(rng).copied().unwrap_or(Color::RED);

        let fresh = Block::new(
            request.id,
            Vec2::new(self.spawn_x, y),
            self.size,
            color,
            self.velocity,
        );
        let mut block = match request.recycled {
            Some(mut shell) => {
                shell.clone_from(&fresh);
                shell
            }
            None => fresh,
        };
        block.drift_secs = self.drift_secs;
        block
    }

    /// Roll whether `block` drifts to the other lane partway through its
    /// transit. Weighted toward staying put.
    pub fn commit_lane_change(&self, rng: &mut Pcg32, block: &mut Block) {
        let (low, high) = self.lanes;
        block.target_secondary_height = rng
            .random_bool(self.secondary_height_chance)
            .then_some(if block.pos.y == high { low } else { high });
    }
}

/// Construction path for upcoming blocks
enum Builder {
    Inline {
        factory: BlockFactory,
        rng: Pcg32,
        ready: VecDeque<Block>,
    },
    Background {
        requests: mpsc::Sender<BuildRequest>,
        ready: mpsc::Receiver<Block>,
    },
}

impl Builder {
    fn new(factory: BlockFactory, seed: u64, mode: PrebuildMode, capacity: usize) -> Self {
        let inline = |factory| Builder::Inline {
            factory,
            rng: Pcg32::seed_from_u64(seed),
            ready: VecDeque::with_capacity(capacity),
        };
        if mode == PrebuildMode::Inline {
            return inline(factory);
        }

        let (request_tx, request_rx) = mpsc::channel::<BuildRequest>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Block>(capacity);
        let worker_factory = factory.clone();
        let spawned = std::thread::Builder::new()
            .name("block-builder".into())
            .spawn(move || {
                let mut rng = Pcg32::seed_from_u64(seed);
                for request in request_rx {
                    let block = worker_factory.build(&mut rng, request);
                    if ready_tx.send(block).is_err() {
                        break;
                    }
                }
            });
        match spawned {
            Ok(_) => Builder::Background {
                requests: request_tx,
                ready: ready_rx,
            },
            Err(e) => {
                log::warn!("Block builder thread unavailable ({e}), building inline");
                inline(factory)
            }
        }
    }

    /// Queue construction. False if the worker has gone away.
    fn request(&mut self, request: BuildRequest) -> bool {
        match self {
            Builder::Inline {
                factory,
                rng,
                ready,
            } => {
                ready.push_back(factory.build(rng, request));
                true
            }
            Builder::Background { requests, .. } => requests.send(request).is_ok(),
        }
    }

    /// Take the next finished block without waiting
    fn try_take(&mut self) -> Option<Block> {
        match self {
            Builder::Inline { ready, .. } => ready.pop_front(),
            Builder::Background { ready, .. } => ready.try_recv().ok(),
        }
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Builder::Inline { ready, .. } => f
                .debug_struct("Inline")
                .field("ready", &ready.len())
                .finish(),
            Builder::Background { .. } => f.write_str("Background"),
        }
    }
}

/// Keeps lane-change rolls independent of the builder's lane/color stream
const LANE_CHANGE_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Spawns, moves and retires blocks
#[derive(Debug)]
pub struct ObstaclePool {
    builder: Builder,
    factory: BlockFactory,
    /// Lane-change rolls, drawn on the tick thread at handoff
    lane_rng: Pcg32,
    active: Vec<Block>,
    recycled: Vec<Block>,
    spawn_timer: Timer,
    speed: f32,
    /// Requested from the builder but not yet on the playfield
    outstanding: usize,
    /// The spawn timer fired and no block has been placed yet
    owed: bool,
    moving_blocks: bool,
    max_prebuilt: usize,
    max_active: usize,
    next_id: u32,
}

impl ObstaclePool {
    pub fn new(settings: &Settings, tuning: &Tuning, seed: u64) -> Self {
        let factory = BlockFactory::new(settings, tuning);
        let first_spawn = settings.seconds_per_rotation() * FIRST_SPAWN_ROTATIONS;
        Self {
            builder: Builder::new(
                factory.clone(),
                seed,
                tuning.prebuild(),
                tuning.max_prebuilt(),
            ),
            factory,
            lane_rng: Pcg32::seed_from_u64(seed ^ LANE_CHANGE_SEED),
            active: Vec::with_capacity(tuning.max_active()),
            recycled: Vec::new(),
            spawn_timer: Timer::new(first_spawn, settings.spawn_interval()),
            speed: 1.0,
            outstanding: 0,
            owed: false,
            moving_blocks: false,
            max_prebuilt: tuning.max_prebuilt(),
            max_active: tuning.max_active(),
            next_id: 1,
        }
    }

    /// Top up prebuilds, spawn on cadence, move blocks, retire exits
    pub fn update(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.prebuild();

        if self.spawn_timer.tick(dt) {
            if self.owed {
                log::debug!("Spawn still pending, cadence tick merged");
            }
            self.owed = true;
            if !self.try_spawn(events) {
                events.push(GameEvent::SpawnDeferred);
            }
        } else if self.owed {
            self.try_spawn(events);
        }

        for block in &mut self.active {
            block.update(dt);
        }

        let mut i = 0;
        while i < self.active.len() {
            if self.active[i].is_off_screen() {
                let block = self.active.remove(i);
                log::debug!("Block {} left the playfield", block.id);
                events.push(GameEvent::BlockRetired { id: block.id });
                if self.recycled.len() < self.max_active {
                    self.recycled.push(block);
                }
            } else {
                i += 1;
            }
        }
    }

    fn prebuild(&mut self) {
        while self.outstanding < self.max_prebuilt {
            let request = BuildRequest {
                id: self.next_id,
                recycled: self.recycled.pop(),
            };
            if !self.builder.request(request) {
                log::warn!("Block builder stopped; no further blocks");
                return;
            }
            self.next_id += 1;
            self.outstanding += 1;
        }
    }

    /// Place a prebuilt block if one is ready and there is room
    fn try_spawn(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.active.len() >= self.max_active {
            return false;
        }
        let Some(mut block) = self.builder.try_take() else {
            return false;
        };
        self.outstanding -= 1;
        self.owed = false;
        if self.moving_blocks {
            self.factory.commit_lane_change(&mut self.lane_rng, &mut block);
        }
        log::debug!("Spawned block {} at y={}", block.id, block.pos.y);
        events.push(GameEvent::BlockSpawned {
            id: block.id,
            moving: block.target_secondary_height.is_some(),
        });
        self.activate(block);
        true
    }

    /// Hand a finished block to the playfield at the pool's current speed
    pub fn activate(&mut self, mut block: Block) {
        block.speed = self.speed;
        self.active.push(block);
    }

    /// Difficulty speed: live blocks and spawn cadence alike
    pub fn set_speed(&mut self, multiplier: f32) {
        self.speed = multiplier;
        self.spawn_timer.set_rate(multiplier);
        for block in &mut self.active {
            block.speed = multiplier;
        }
    }

    /// Slow live blocks to `slow_motion` and stop spawning
    pub fn decelerate(&mut self, slow_motion: f32) {
        self.set_speed(slow_motion);
        self.spawn_timer.set_rate(0.0);
        self.owed = false;
    }

    /// Let blocks built from now on commit to lane changes
    pub fn enable_moving_blocks(&mut self) {
        self.moving_blocks = true;
    }

    pub fn moving_blocks_enabled(&self) -> bool {
        self.moving_blocks
    }

    pub fn flag(&mut self, id: u32) {
        if let Some(block) = self.active.iter_mut().find(|b| b.id == id) {
            block.flagged = true;
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.active
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.active
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn spawn_rate(&self) -> f32 {
        self.spawn_timer.rate()
    }
}
