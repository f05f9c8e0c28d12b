//! One sliding puzzle game.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{iso_timestamp, Millis, RunClock};
use crate::config::SlidingConfig;
use crate::error::ConfigError;
use crate::leaderboard::{Leaderboard, Ranked};
use crate::observer::{Observers, SubscriptionId};
use crate::persist::{load_json, save_json, SaveStore};
use crate::GameStatus;

use super::board::{SlideRecord, SlideRejected, SlidingBoard, Tile};

/// Storage key of the persisted sliding puzzle data.
pub const STORAGE_KEY: &str = "sliding-storage";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlidingScore {
    pub time: f64,
    pub moves: u32,
    pub size: u8,
    pub date: String,
}

impl Ranked for SlidingScore {
    fn moves(&self) -> u32 {
        self.moves
    }

    fn time(&self) -> f64 {
        self.time
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlidingSave {
    pub leaderboard: Vec<SlidingScore>,
    pub size: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SlidingEvent {
    Slid { slide: SlideRecord, move_count: u32 },
    Solved { score: SlidingScore, rank: Option<usize> },
    Shuffled { size: u8 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidingSnapshot {
    pub rows: Vec<Vec<Tile>>,
    pub size: u8,
    pub status: GameStatus,
    pub move_count: u32,
    pub movable: Vec<Tile>,
    pub manhattan: usize,
}

/// Sliding puzzle session.
pub struct SlidingGame {
    config: SlidingConfig,
    board: SlidingBoard,
    status: GameStatus,
    move_count: u32,
    clock: RunClock,
    rng: SmallRng,
    leaderboard: Leaderboard<SlidingScore>,
    observers: Observers<SlidingEvent>,
    store: Option<Box<dyn SaveStore>>,
}

impl SlidingGame {
    /// New shuffled game. `seed` drives shuffling.
    pub fn new(config: SlidingConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = SlidingBoard::shuffled(config.default_size, config.shuffle_moves, &mut rng);
        Self {
            config,
            board,
            status: GameStatus::NotStarted,
            move_count: 0,
            clock: RunClock::new(),
            rng,
            leaderboard: Leaderboard::new(),
            observers: Observers::new(),
            store: None,
        }
    }

    /// New game restoring the leaderboard and board size from `store`.
    pub fn with_store(config: SlidingConfig, seed: u64, store: Box<dyn SaveStore>) -> Self {
        let mut game = Self::new(config, seed);
        match load_json::<SlidingSave>(store.as_ref(), STORAGE_KEY) {
            Ok(Some(save)) => {
                game.leaderboard = Leaderboard::from_entries(save.leaderboard, game.config.leaderboard_capacity);
                match game.config.check_size(save.size) {
                    Ok(()) if save.size != game.board.size() => game.shuffle(save.size),
                    Ok(()) => {}
                    Err(e) => warn!(error = %e, "ignoring saved puzzle size"),
                }
            }
            Ok(None) => debug!("no saved sliding data"),
            Err(e) => warn!(error = %e, "ignoring unreadable sliding save"),
        }
        game.store = Some(store);
        game
    }

    /// Slide `tile` into the gap.
    pub fn slide(&mut self, tile: Tile, now: Millis) -> Result<SlideRecord, SlideRejected> {
        if self.status.is_solved() {
            return Err(SlideRejected::AlreadySolved);
        }
        let slide = self.board.slide(tile)?;

        self.move_count += 1;
        if self.status == GameStatus::NotStarted {
            self.status = GameStatus::InProgress;
            self.clock.start(now);
        }
        debug!(tile, move_count = self.move_count, "tile slid");
        self.observers.emit(&SlidingEvent::Slid {
            slide,
            move_count: self.move_count,
        });

        if self.board.is_solved() {
            self.finish(now);
        }
        Ok(slide)
    }

    /// Slide whatever tile is at (`row`, `col`).
    pub fn slide_at(&mut self, row: usize, col: usize, now: Millis) -> Result<SlideRecord, SlideRejected> {
        let tile = self
            .board
            .tile_at(row, col)
            .ok_or(SlideRejected::OffBoard { row, col })?;
        self.slide(tile, now)
    }

    /// Reshuffle, optionally at a new size. Keeps the leaderboard.
    pub fn reset(&mut self, size: Option<u8>) -> Result<(), ConfigError> {
        let size = size.unwrap_or(self.board.size());
        self.config.check_size(size)?;
        let changed = size != self.board.size();
        self.shuffle(size);
        if changed {
            self.persist();
        }
        Ok(())
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SlidingEvent) + Send + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn board(&self) -> &SlidingBoard {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn leaderboard(&self) -> &Leaderboard<SlidingScore> {
        &self.leaderboard
    }

    pub fn save_data(&self) -> SlidingSave {
        SlidingSave {
            leaderboard: self.leaderboard.entries().to_vec(),
            size: self.board.size(),
        }
    }

    pub fn snapshot(&self) -> SlidingSnapshot {
        SlidingSnapshot {
            rows: self.board.rows(),
            size: self.board.size(),
            status: self.status,
            move_count: self.move_count,
            movable: self.board.movable_tiles(),
            manhattan: self.board.manhattan_distance(),
        }
    }

    fn shuffle(&mut self, size: u8) {
        self.board = SlidingBoard::shuffled(size, self.config.shuffle_moves, &mut self.rng);
        self.status = GameStatus::NotStarted;
        self.move_count = 0;
        self.clock.reset();
        info!(size, "sliding puzzle shuffled");
        self.observers.emit(&SlidingEvent::Shuffled { size });
    }

    fn finish(&mut self, now: Millis) {
        self.status = GameStatus::Solved;
        let score = SlidingScore {
            time: self.clock.elapsed_secs(now).unwrap_or(0.0),
            moves: self.move_count,
            size: self.board.size(),
            date: iso_timestamp(now),
        };
        let rank = self
            .leaderboard
            .record(score.clone(), self.config.leaderboard_capacity);
        info!(moves = score.moves, time = score.time, size = score.size, ?rank, "sliding puzzle solved");
        self.persist();
        self.observers.emit(&SlidingEvent::Solved { score, rank });
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = save_json(store.as_ref(), STORAGE_KEY, &self.save_data()) {
            warn!(error = %e, "failed to save sliding data");
        }
    }
}

impl std::fmt::Debug for SlidingGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingGame")
            .field("board", &self.board)
            .field("status", &self.status)
            .field("move_count", &self.move_count)
            .finish_non_exhaustive()
    }
}
