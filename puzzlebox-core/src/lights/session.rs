//! One Lights Out game with levels, hints and a leaderboard.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{iso_timestamp, Millis, RunClock};
use crate::config::LightsConfig;
use crate::error::ConfigError;
use crate::leaderboard::{Leaderboard, Ranked};
use crate::observer::{Observers, SubscriptionId};
use crate::persist::{load_json, save_json, SaveStore};
use crate::GameStatus;

use super::board::{Cell, LightsBoard, PressRejected};
use super::solver::LightsSolver;

/// Storage key of the persisted Lights Out data.
pub const STORAGE_KEY: &str = "lights-storage";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightsScore {
    pub time: f64,
    pub moves: u32,
    pub grid_size: u8,
    pub level: u32,
    pub date: String,
}

impl Ranked for LightsScore {
    fn moves(&self) -> u32 {
        self.moves
    }

    fn time(&self) -> f64 {
        self.time
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightsSave {
    pub leaderboard: Vec<LightsScore>,
    pub grid_size: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LightsEvent {
    Pressed { cell: Cell, move_count: u32 },
    Solved { score: LightsScore, rank: Option<usize> },
    NewPuzzle { size: u8, level: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightsSnapshot {
    pub grid: Vec<Vec<bool>>,
    pub size: u8,
    pub level: u32,
    pub status: GameStatus,
    pub move_count: u32,
    pub lit: u32,
    pub hint: Option<Cell>,
    pub hint_count: u32,
    /// Presses in the shortest remaining solution.
    pub min_presses: Option<u32>,
}

/// Lights Out session.
pub struct LightsGame {
    config: LightsConfig,
    board: LightsBoard,
    solver: LightsSolver,
    level: u32,
    status: GameStatus,
    move_count: u32,
    clock: RunClock,
    hint: Option<Cell>,
    hint_count: u32,
    rng: SmallRng,
    leaderboard: Leaderboard<LightsScore>,
    observers: Observers<LightsEvent>,
    store: Option<Box<dyn SaveStore>>,
}

impl LightsGame {
    /// New level-1 game. `seed` drives puzzle generation.
    pub fn new(config: LightsConfig, seed: u64) -> Self {
        let size = config.default_size;
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = generate(&config, size, 1, &mut rng);
        Self {
            solver: LightsSolver::new(board.size()),
            board,
            config,
            level: 1,
            status: GameStatus::NotStarted,
            move_count: 0,
            clock: RunClock::new(),
            hint: None,
            hint_count: 0,
            rng,
            leaderboard: Leaderboard::new(),
            observers: Observers::new(),
            store: None,
        }
    }

    /// New game restoring the leaderboard and grid size from `store`.
    pub fn with_store(config: LightsConfig, seed: u64, store: Box<dyn SaveStore>) -> Self {
        let mut game = Self::new(config, seed);
        match load_json::<LightsSave>(store.as_ref(), STORAGE_KEY) {
            Ok(Some(save)) => {
                game.leaderboard = Leaderboard::from_entries(save.leaderboard, game.config.leaderboard_capacity);
                match game.config.check_size(save.grid_size) {
                    Ok(()) if save.grid_size != game.board.size() => game.new_puzzle(save.grid_size),
                    Ok(()) => {}
                    Err(e) => warn!(error = %e, "ignoring saved grid size"),
                }
            }
            Ok(None) => debug!("no saved lights data"),
            Err(e) => warn!(error = %e, "ignoring unreadable lights save"),
        }
        game.store = Some(store);
        game
    }

    /// Press a cell.
    pub fn press(&mut self, cell: Cell, now: Millis) -> Result<GameStatus, PressRejected> {
        if self.status.is_solved() {
            return Err(PressRejected::AlreadySolved);
        }
        self.board.press(cell)?;

        self.move_count += 1;
        self.hint = None;
        if self.status == GameStatus::NotStarted {
            self.status = GameStatus::InProgress;
            self.clock.start(now);
        }
        debug!(%cell, move_count = self.move_count, lit = self.board.lit_count(), "light pressed");
        self.observers.emit(&LightsEvent::Pressed {
            cell,
            move_count: self.move_count,
        });

        if self.board.is_solved() {
            self.finish(now);
        }
        Ok(self.status)
    }

    /// Next press of a shortest solution. Cleared by the next press.
    pub fn show_hint(&mut self) -> Option<Cell> {
        if self.status.is_solved() {
            return None;
        }
        let cell = self.solver.hint(&self.board)?;
        self.hint = Some(cell);
        self.hint_count += 1;
        debug!(%cell, "lights hint");
        Some(cell)
    }

    /// New puzzle at the current size and level.
    pub fn reset(&mut self) {
        self.new_puzzle(self.board.size());
    }

    /// Change the grid size; restarts from level 1.
    pub fn set_grid_size(&mut self, size: u8) -> Result<(), ConfigError> {
        self.config.check_size(size)?;
        self.level = 1;
        self.new_puzzle(size);
        self.persist();
        Ok(())
    }

    /// Advance to a harder puzzle of the same size.
    pub fn next_level(&mut self) {
        self.level = self.level.saturating_add(1);
        self.new_puzzle(self.board.size());
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&LightsEvent) + Send + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn board(&self) -> &LightsBoard {
        &self.board
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn hint(&self) -> Option<Cell> {
        self.hint
    }

    pub fn leaderboard(&self) -> &Leaderboard<LightsScore> {
        &self.leaderboard
    }

    pub fn save_data(&self) -> LightsSave {
        LightsSave {
            leaderboard: self.leaderboard.entries().to_vec(),
            grid_size: self.board.size(),
        }
    }

    pub fn snapshot(&self) -> LightsSnapshot {
        LightsSnapshot {
            grid: self.board.rows(),
            size: self.board.size(),
            level: self.level,
            status: self.status,
            move_count: self.move_count,
            lit: self.board.lit_count(),
            hint: self.hint,
            hint_count: self.hint_count,
            min_presses: self.solver.min_presses(self.board.bits()),
        }
    }

    fn new_puzzle(&mut self, size: u8) {
        self.board = generate(&self.config, size, self.level, &mut self.rng);
        if self.solver.size() != self.board.size() {
            self.solver = LightsSolver::new(self.board.size());
        }
        self.status = GameStatus::NotStarted;
        self.move_count = 0;
        self.clock.reset();
        self.hint = None;
        self.hint_count = 0;
        info!(size, level = self.level, "new lights puzzle");
        self.observers.emit(&LightsEvent::NewPuzzle { size, level: self.level });
    }

    fn finish(&mut self, now: Millis) {
        self.status = GameStatus::Solved;
        let score = LightsScore {
            time: self.clock.elapsed_secs(now).unwrap_or(0.0),
            moves: self.move_count,
            grid_size: self.board.size(),
            level: self.level,
            date: iso_timestamp(now),
        };
        let rank = self
            .leaderboard
            .record(score.clone(), self.config.leaderboard_capacity);
        info!(moves = score.moves, time = score.time, level = score.level, ?rank, "lights solved");
        self.persist();
        self.observers.emit(&LightsEvent::Solved { score, rank });
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = save_json(store.as_ref(), STORAGE_KEY, &self.save_data()) {
            warn!(error = %e, "failed to save lights data");
        }
    }
}

fn generate(config: &LightsConfig, size: u8, level: u32, rng: &mut SmallRng) -> LightsBoard {
    LightsBoard::generate(size, config.scramble_presses(level), rng)
}

impl std::fmt::Debug for LightsGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightsGame")
            .field("board", &self.board)
            .field("level", &self.level)
            .field("status", &self.status)
            .field("move_count", &self.move_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::persist::MemoryStore;

    fn game(seed: u64) -> LightsGame {
        LightsGame::new(LightsConfig::default(), seed)
    }

    /// Follow hints until solved, one second per press.
    fn solve_with_hints(game: &mut LightsGame, start: Millis) {
        let mut now = start;
        while let Some(cell) = game.show_hint() {
            game.press(cell, now).unwrap();
            now += 1_000;
        }
    }

    #[test]
    fn test_new_game_is_scrambled() {
        let g = game(1);
        assert_eq!(g.board().size(), 3);
        assert_eq!(g.level(), 1);
        assert!(!g.board().is_solved());
        assert_eq!(g.status(), GameStatus::NotStarted);
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        assert_eq!(game(99).board(), game(99).board());
    }

    #[test]
    fn test_first_press_starts_game() {
        let mut g = game(3);
        g.press(Cell { row: 0, col: 0 }, 5_000).unwrap();
        assert_eq!(g.move_count(), 1);
        assert_ne!(g.status(), GameStatus::NotStarted);
        assert_eq!(g.clock.started_at(), Some(5_000));
    }

    #[test]
    fn test_out_of_bounds_press_changes_nothing() {
        let mut g = game(3);
        let before = *g.board();
        assert!(matches!(
            g.press(Cell { row: 0, col: 3 }, 0),
            Err(PressRejected::OutOfBounds { .. })
        ));
        assert_eq!(*g.board(), before);
        assert_eq!(g.move_count(), 0);
    }

    #[test]
    fn test_hints_solve_in_minimum_presses() {
        let mut g = game(11);
        let min = g.snapshot().min_presses.unwrap();
        solve_with_hints(&mut g, 0);

        assert_eq!(g.status(), GameStatus::Solved);
        assert_eq!(g.move_count(), min);
        let best = g.leaderboard().best().unwrap();
        assert_eq!(best.moves, min);
        assert_eq!(best.level, 1);
        assert_eq!(best.grid_size, 3);
        assert_eq!(best.time, (min - 1) as f64);

        assert_eq!(g.press(Cell { row: 0, col: 0 }, 0), Err(PressRejected::AlreadySolved));
        assert_eq!(g.show_hint(), None);
    }

    #[test]
    fn test_press_clears_hint() {
        let mut g = game(5);
        let cell = g.show_hint().unwrap();
        assert_eq!(g.hint(), Some(cell));
        g.press(cell, 0).unwrap();
        assert_eq!(g.hint(), None);
    }

    #[test]
    fn test_next_level_and_grid_size() {
        let mut g = game(8);
        solve_with_hints(&mut g, 0);
        g.next_level();
        assert_eq!(g.level(), 2);
        assert_eq!(g.status(), GameStatus::NotStarted);
        assert_eq!(g.move_count(), 0);
        assert!(!g.board().is_solved());

        g.set_grid_size(5).unwrap();
        assert_eq!(g.level(), 1);
        assert_eq!(g.board().size(), 5);
        assert!(g.snapshot().min_presses.is_some());

        assert!(g.set_grid_size(9).is_err());
        assert_eq!(g.board().size(), 5);
    }

    #[test]
    fn test_generated_puzzles_are_solvable() {
        let mut g = game(21);
        for size in 3..=7 {
            g.set_grid_size(size).unwrap();
            for _ in 0..10 {
                g.next_level();
                assert!(g.snapshot().min_presses.is_some(), "size {size}");
            }
        }
    }

    #[test]
    fn test_persists_and_restores() {
        let store = MemoryStore::new();
        let mut g = LightsGame::with_store(LightsConfig::default(), 4, Box::new(store.clone()));
        solve_with_hints(&mut g, 0);
        g.set_grid_size(4).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&store.get(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(raw["gridSize"], 4);
        assert_eq!(raw["leaderboard"][0]["gridSize"], 3);

        let restored = LightsGame::with_store(LightsConfig::default(), 4, Box::new(store));
        assert_eq!(restored.board().size(), 4);
        assert_eq!(restored.leaderboard().len(), 1);
    }

    #[test]
    fn test_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mut g = game(2);
        g.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
        solve_with_hints(&mut g, 0);
        g.next_level();

        let events = events.lock().unwrap();
        assert!(matches!(events[0], LightsEvent::Pressed { move_count: 1, .. }));
        assert!(events.iter().any(|e| matches!(e, LightsEvent::Solved { rank: Some(0), .. })));
        assert_eq!(events.last(), Some(&LightsEvent::NewPuzzle { size: 3, level: 2 }));
    }

    #[test]
    fn test_snapshot_json_names() {
        let mut g = game(5);
        let cell = g.show_hint().unwrap();
        g.press(cell, 0).unwrap();
        let json = serde_json::to_value(g.snapshot()).unwrap();
        assert_eq!(json["moveCount"], 1);
        assert_eq!(json["hintCount"], 1);
        assert!(json.get("minPresses").is_some());
        assert!(json.get("move_count").is_none());
    }
}
