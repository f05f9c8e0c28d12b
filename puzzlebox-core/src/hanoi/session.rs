//! One Tower of Hanoi game: selection, animated moves, hints and records.
//!
//! [`HanoiGame`] is the single owner of all mutable game state. Hosts drive
//! it with commands ([`HanoiGame::select_peg`], [`HanoiGame::tick`],
//! [`HanoiGame::show_hint`], [`HanoiGame::reset`]) and read it back through
//! [`HanoiGame::snapshot`] or by subscribing to [`HanoiEvent`]s.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::animation::{MoveAnimation, Vec3};
use crate::clock::{iso_timestamp, Millis, RunClock};
use crate::config::HanoiConfig;
use crate::error::ConfigError;
use crate::leaderboard::{Leaderboard, Ranked};
use crate::observer::{Observers, SubscriptionId};
use crate::persist::{load_json, save_json, SaveStore};
use crate::GameStatus;

use super::layout::{clearance_height, disk_position};
use super::pegs::{Disk, InvalidMove, MoveRecord, MoveRejected, Pegs, PEG_COUNT};
use super::solver::{min_moves, next_optimal_move};

/// Storage key of the persisted Hanoi data.
pub const STORAGE_KEY: &str = "hanoi-storage";

/// A finished game on the leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HanoiScore {
    /// Seconds from the first committed move to the solving one.
    pub time: f64,
    pub moves: u32,
    pub disk_count: u8,
    /// RFC 3339 timestamp of the solve.
    pub date: String,
    #[serde(default)]
    pub hint_count: u32,
}

impl Ranked for HanoiScore {
    fn moves(&self) -> u32 {
        self.moves
    }

    fn time(&self) -> f64 {
        self.time
    }
}

/// Fields that survive across sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HanoiSave {
    pub leaderboard: Vec<HanoiScore>,
    pub disk_count: u8,
}

/// Result of a peg click.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// The peg is now the pending source.
    Selected { peg: usize },
    /// The pending source was clicked again and released.
    Deselected,
    /// A legal destination was clicked; the move is animating.
    MoveStarted { mv: MoveRecord },
}

/// Something that happened to the game.
#[derive(Clone, Debug, PartialEq)]
pub enum HanoiEvent {
    MoveStarted(MoveRecord),
    MoveCommitted { mv: MoveRecord, move_count: u32 },
    Solved { score: HanoiScore, rank: Option<usize> },
    HintShown(MoveRecord),
    HintCleared,
    Reset { disk_count: u8 },
}

/// Position of the disk that is currently moving.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct DiskFrame {
    pub disk: Disk,
    pub position: Vec3,
    /// True on the frame that landed the disk and committed the move.
    pub completed: bool,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HanoiSnapshot {
    /// Committed stacks; a moving disk is still listed on its source peg.
    pub pegs: [Vec<Disk>; PEG_COUNT],
    pub disk_count: u8,
    pub selected: Option<usize>,
    pub status: GameStatus,
    pub hint: Option<MoveRecord>,
    pub animating: Option<MoveRecord>,
    pub animation_position: Option<Vec3>,
    pub move_count: u32,
    pub hint_count: u32,
    pub min_moves: u32,
    pub generation: u64,
}

#[derive(Debug)]
struct InFlight {
    mv: MoveRecord,
    animation: MoveAnimation,
}

#[derive(Clone, Copy, Debug)]
struct ActiveHint {
    mv: MoveRecord,
    expires_at: Millis,
    generation: u64,
}

/// Tower of Hanoi session.
pub struct HanoiGame {
    config: HanoiConfig,
    pegs: Pegs,
    selected: Option<usize>,
    status: GameStatus,
    move_count: u32,
    clock: RunClock,
    in_flight: Option<InFlight>,
    hint: Option<ActiveHint>,
    hint_count: u32,
    /// Bumped on every reset; hints from an older game are never shown.
    generation: u64,
    leaderboard: Leaderboard<HanoiScore>,
    observers: Observers<HanoiEvent>,
    store: Option<Box<dyn SaveStore>>,
}

impl HanoiGame {
    /// New game with the configured default disk count and no saved data.
    pub fn new(config: HanoiConfig) -> Self {
        let disks = config.default_disks;
        Self {
            pegs: Pegs::new(disks),
            config,
            selected: None,
            status: GameStatus::NotStarted,
            move_count: 0,
            clock: RunClock::new(),
            in_flight: None,
            hint: None,
            hint_count: 0,
            generation: 0,
            leaderboard: Leaderboard::new(),
            observers: Observers::new(),
            store: None,
        }
    }

    /// New game restoring the leaderboard and disk count from `store`.
    ///
    /// Unreadable or out-of-range saved data is logged and ignored.
    pub fn with_store(config: HanoiConfig, store: Box<dyn SaveStore>) -> Self {
        let mut game = Self::new(config);
        match load_json::<HanoiSave>(store.as_ref(), STORAGE_KEY) {
            Ok(Some(save)) => game.restore(save),
            Ok(None) => debug!("no saved hanoi data"),
            Err(e) => warn!(error = %e, "ignoring unreadable hanoi save"),
        }
        game.store = Some(store);
        game
    }

    fn restore(&mut self, save: HanoiSave) {
        self.leaderboard = Leaderboard::from_entries(save.leaderboard, self.config.leaderboard_capacity);
        match self.config.check_disks(save.disk_count) {
            Ok(()) => self.pegs = Pegs::new(save.disk_count),
            Err(e) => warn!(error = %e, "ignoring saved disk count"),
        }
    }

    // ========== Commands ==========

    /// Handle a click on `peg`.
    ///
    /// First click on a non-empty peg selects it; a click on a different peg
    /// then tries the move; a click on the selected peg releases it. Invalid
    /// destinations release the selection. Clicks while a move is animating
    /// or after the puzzle is solved change nothing.
    pub fn select_peg(&mut self, peg: usize) -> Result<Selection, MoveRejected> {
        self.check_accepting()?;

        let Some(source) = self.selected else {
            if peg >= PEG_COUNT {
                return Err(InvalidMove::NoSuchPeg(peg).into());
            }
            if self.pegs.top(peg).is_none() {
                return Err(InvalidMove::EmptySource(peg).into());
            }
            self.selected = Some(peg);
            debug!(peg, "peg selected");
            return Ok(Selection::Selected { peg });
        };

        match self.propose_move(source, peg) {
            Ok(mv) => {
                self.start_move(mv);
                Ok(Selection::MoveStarted { mv })
            }
            Err(MoveRejected::SamePeg) => {
                self.selected = None;
                Ok(Selection::Deselected)
            }
            Err(e) => {
                debug!(source, dest = peg, error = %e, "move rejected");
                self.selected = None;
                Err(e)
            }
        }
    }

    /// Validate a move without starting it.
    pub fn propose_move(&self, from: usize, to: usize) -> Result<MoveRecord, MoveRejected> {
        self.check_accepting()?;
        self.pegs.check_move(from, to)
    }

    /// Validate and start a move in one step, bypassing selection.
    pub fn request_move(&mut self, from: usize, to: usize) -> Result<MoveRecord, MoveRejected> {
        let mv = self.propose_move(from, to)?;
        self.start_move(mv);
        Ok(mv)
    }

    /// Advance the move animation by `dt` seconds and expire stale hints.
    ///
    /// Returns the moving disk's position, or `None` when nothing is moving.
    /// The move is committed on the frame that lands it.
    pub fn tick(&mut self, dt: f32, now: Millis) -> Option<DiskFrame> {
        self.expire_hint(now);

        let in_flight = self.in_flight.as_mut()?;
        let frame = in_flight.animation.advance(dt);
        let disk = in_flight.mv.disk;
        if frame.completed {
            self.commit(now);
        }
        Some(DiskFrame {
            disk,
            position: frame.position,
            completed: frame.completed,
        })
    }

    /// Completion signal from a renderer that animates on its own.
    ///
    /// Commits the in-flight move; does nothing (and returns `None`) if no
    /// move is in flight, so a repeated signal cannot count a move twice.
    pub fn complete_animation(&mut self, now: Millis) -> Option<MoveRecord> {
        self.commit(now)
    }

    /// Compute and display the next optimal move.
    ///
    /// Ignored while a move is animating or once solved. Clears the selection.
    pub fn show_hint(&mut self, now: Millis) -> Option<MoveRecord> {
        if self.check_accepting().is_err() {
            return None;
        }
        let mv = next_optimal_move(&self.pegs)?;

        self.hint_count += 1;
        self.selected = None;
        self.hint = Some(ActiveHint {
            mv,
            expires_at: now.saturating_add(self.config.hint_duration_ms),
            generation: self.generation,
        });
        debug!(%mv, hint_count = self.hint_count, "hint shown");
        self.observers.emit(&HanoiEvent::HintShown(mv));
        Some(mv)
    }

    /// Hide the hint.
    pub fn clear_hint(&mut self) {
        if self.hint.take().is_some() {
            self.observers.emit(&HanoiEvent::HintCleared);
        }
    }

    /// Hide the hint only if it belongs to game `generation`.
    ///
    /// For hosts that schedule their own deferred clear: a timer armed before
    /// a reset finds a newer generation and leaves the new game alone.
    pub fn clear_hint_for(&mut self, generation: u64) {
        if self.generation == generation {
            self.clear_hint();
        }
    }

    /// Start over, optionally with a different disk count. Keeps the
    /// leaderboard.
    pub fn reset(&mut self, disk_count: Option<u8>) -> Result<(), ConfigError> {
        let disks = disk_count.unwrap_or(self.pegs.disk_count());
        self.config.check_disks(disks)?;
        let changed = disks != self.pegs.disk_count();

        self.pegs = Pegs::new(disks);
        self.selected = None;
        self.status = GameStatus::NotStarted;
        self.move_count = 0;
        self.clock.reset();
        self.in_flight = None;
        self.hint = None;
        self.hint_count = 0;
        self.generation += 1;

        info!(disks, generation = self.generation, "hanoi reset");
        if changed {
            self.persist();
        }
        self.observers.emit(&HanoiEvent::Reset { disk_count: disks });
        Ok(())
    }

    /// Change the difficulty; equivalent to `reset(Some(disks))`.
    pub fn set_disk_count(&mut self, disks: u8) -> Result<(), ConfigError> {
        self.reset(Some(disks))
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&HanoiEvent) + Send + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ========== Queries ==========

    #[inline]
    pub fn pegs(&self) -> &Pegs {
        &self.pegs
    }

    #[inline]
    pub fn disk_count(&self) -> u8 {
        self.pegs.disk_count()
    }

    #[inline]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub fn hint_count(&self) -> u32 {
        self.hint_count
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn min_moves(&self) -> u32 {
        min_moves(self.pegs.disk_count())
    }

    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn animating_move(&self) -> Option<MoveRecord> {
        self.in_flight.as_ref().map(|f| f.mv)
    }

    /// The visible hint at `now`, if any.
    pub fn hint(&self, now: Millis) -> Option<MoveRecord> {
        self.hint
            .filter(|h| h.generation == self.generation && now < h.expires_at)
            .map(|h| h.mv)
    }

    pub fn leaderboard(&self) -> &Leaderboard<HanoiScore> {
        &self.leaderboard
    }

    pub fn config(&self) -> &HanoiConfig {
        &self.config
    }

    /// Data to persist.
    pub fn save_data(&self) -> HanoiSave {
        HanoiSave {
            leaderboard: self.leaderboard.entries().to_vec(),
            disk_count: self.pegs.disk_count(),
        }
    }

    pub fn snapshot(&self, now: Millis) -> HanoiSnapshot {
        HanoiSnapshot {
            pegs: self.pegs.stacks().clone(),
            disk_count: self.pegs.disk_count(),
            selected: self.selected,
            status: self.status,
            hint: self.hint(now),
            animating: self.animating_move(),
            animation_position: self.in_flight.as_ref().map(|f| f.animation.position()),
            move_count: self.move_count,
            hint_count: self.hint_count,
            min_moves: self.min_moves(),
            generation: self.generation,
        }
    }

    // ========== Internals ==========

    fn check_accepting(&self) -> Result<(), MoveRejected> {
        if self.in_flight.is_some() {
            Err(MoveRejected::Busy)
        } else if self.status.is_solved() {
            Err(MoveRejected::AlreadySolved)
        } else {
            Ok(())
        }
    }

    fn start_move(&mut self, mv: MoveRecord) {
        let start = disk_position(mv.from, self.pegs.height(mv.from).saturating_sub(1));
        let target = disk_position(mv.to, self.pegs.height(mv.to));
        self.selected = None;
        self.in_flight = Some(InFlight {
            mv,
            animation: MoveAnimation::new(start, target, self.config.animation)
                .with_clearance(clearance_height(self.pegs.disk_count())),
        });
        debug!(%mv, "move started");
        self.observers.emit(&HanoiEvent::MoveStarted(mv));
    }

    fn commit(&mut self, now: Millis) -> Option<MoveRecord> {
        let InFlight { mv, .. } = self.in_flight.take()?;
        if let Err(e) = self.pegs.apply(mv) {
            warn!(%mv, error = %e, "dropping in-flight move that no longer applies");
            return None;
        }

        self.move_count += 1;
        if self.status == GameStatus::NotStarted {
            self.status = GameStatus::InProgress;
            self.clock.start(now);
        }
        self.clear_hint();
        debug!(%mv, move_count = self.move_count, "move committed");
        self.observers.emit(&HanoiEvent::MoveCommitted {
            mv,
            move_count: self.move_count,
        });

        if self.pegs.is_solved() {
            self.finish(now);
        }
        Some(mv)
    }

    fn finish(&mut self, now: Millis) {
        self.status = GameStatus::Solved;
        let score = HanoiScore {
            time: self.clock.elapsed_secs(now).unwrap_or(0.0),
            moves: self.move_count,
            disk_count: self.pegs.disk_count(),
            date: iso_timestamp(now),
            hint_count: self.hint_count,
        };
        let rank = self
            .leaderboard
            .record(score.clone(), self.config.leaderboard_capacity);
        info!(
            moves = score.moves,
            time = score.time,
            disks = score.disk_count,
            ?rank,
            "hanoi solved"
        );
        self.persist();
        self.observers.emit(&HanoiEvent::Solved { score, rank });
    }

    fn expire_hint(&mut self, now: Millis) {
        let stale = self
            .hint
            .is_some_and(|h| h.generation != self.generation || now >= h.expires_at);
        if stale {
            self.clear_hint();
        }
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = save_json(store.as_ref(), STORAGE_KEY, &self.save_data()) {
            warn!(error = %e, "failed to save hanoi data");
        }
    }
}

impl std::fmt::Debug for HanoiGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HanoiGame")
            .field("pegs", &self.pegs)
            .field("selected", &self.selected)
            .field("status", &self.status)
            .field("move_count", &self.move_count)
            .field("in_flight", &self.in_flight)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::hanoi::solver::starting_solution;
    use crate::persist::MemoryStore;

    fn game() -> HanoiGame {
        HanoiGame::new(HanoiConfig::default())
    }

    /// Click `from` then `to` and land the move instantly.
    fn play(game: &mut HanoiGame, from: usize, to: usize, now: Millis) {
        assert_eq!(game.select_peg(from), Ok(Selection::Selected { peg: from }));
        assert!(matches!(game.select_peg(to), Ok(Selection::MoveStarted { .. })));
        assert!(game.complete_animation(now).is_some());
    }

    #[test]
    fn test_tall_stack_move_lifts_over_pegs() {
        let config = HanoiConfig {
            max_disks: Pegs::MAX_DISKS,
            default_disks: Pegs::MAX_DISKS,
            ..HanoiConfig::default()
        };
        config.validate().unwrap();
        let mut game = HanoiGame::new(config);
        let mv = game.request_move(0, 2).unwrap();
        let start = disk_position(0, Pegs::MAX_DISKS as usize - 1);
        assert!(start.y > HanoiConfig::default().animation.lift_height);

        let mut frames = Vec::new();
        for i in 0..10_000 {
            let frame = game.tick(1.0 / 60.0, i).unwrap();
            frames.push(frame);
            if frame.completed {
                break;
            }
        }
        assert!(frames.last().unwrap().completed);
        assert_eq!(game.pegs().top(2), Some(mv.disk));

        // Up, across at a height that clears every stack, then down
        let peak = frames.iter().map(|f| f.position.y).fold(f32::MIN, f32::max);
        assert!(peak >= clearance_height(Pegs::MAX_DISKS));
        let peak_at = frames.iter().position(|f| f.position.y == peak).unwrap();
        let mut last_y = start.y;
        for frame in &frames[..=peak_at] {
            assert!(frame.position.y >= last_y, "disk lowered while lifting");
            last_y = frame.position.y;
        }
        for frame in &frames[peak_at..] {
            assert!(frame.position.y <= last_y, "disk raised while dropping");
            last_y = frame.position.y;
        }
        let target_x = disk_position(2, 0).x;
        for frame in frames.iter().filter(|f| f.position.x != start.x && f.position.x != target_x) {
            assert_eq!(frame.position.y, peak);
        }
    }

    fn solve(game: &mut HanoiGame, start: Millis) {
        for (i, mv) in starting_solution(game.disk_count()).into_iter().enumerate() {
            play(game, mv.from, mv.to, start + i as Millis * 1_000);
        }
    }

    #[test]
    fn test_select_then_move() {
        let mut g = game();
        assert_eq!(g.select_peg(0), Ok(Selection::Selected { peg: 0 }));
        assert_eq!(g.selected(), Some(0));

        let mv = MoveRecord { from: 0, to: 2, disk: 1 };
        assert_eq!(g.select_peg(2), Ok(Selection::MoveStarted { mv }));
        assert_eq!(g.selected(), None);
        assert_eq!(g.animating_move(), Some(mv));
        // Not committed until the animation lands
        assert_eq!(g.move_count(), 0);
        assert_eq!(g.pegs().stack(0), &[3, 2, 1]);
    }

    #[test]
    fn test_empty_first_click_is_ignored() {
        let mut g = game();
        assert_eq!(
            g.select_peg(1),
            Err(MoveRejected::Invalid(InvalidMove::EmptySource(1)))
        );
        assert_eq!(g.selected(), None);
        assert_eq!(
            g.select_peg(5),
            Err(MoveRejected::Invalid(InvalidMove::NoSuchPeg(5)))
        );
    }

    #[test]
    fn test_same_peg_deselects() {
        let mut g = game();
        g.select_peg(0).unwrap();
        assert_eq!(g.select_peg(0), Ok(Selection::Deselected));
        assert_eq!(g.selected(), None);
        assert!(!g.is_animating());
    }

    #[test]
    fn test_invalid_destination_clears_selection() {
        let mut g = game();
        play(&mut g, 0, 2, 1_000);
        g.select_peg(0).unwrap();
        assert_eq!(
            g.select_peg(2),
            Err(MoveRejected::Invalid(InvalidMove::LargerOnSmaller { disk: 2, onto: 1 }))
        );
        assert_eq!(g.selected(), None);
        assert_eq!(g.pegs().stack(0), &[3, 2]);
        assert_eq!(g.move_count(), 1);
    }

    #[test]
    fn test_busy_while_animating() {
        let mut g = game();
        g.select_peg(0).unwrap();
        g.select_peg(1).unwrap();
        assert_eq!(g.select_peg(0), Err(MoveRejected::Busy));
        assert_eq!(g.selected(), None);
        assert_eq!(g.request_move(0, 2), Err(MoveRejected::Busy));
        assert_eq!(g.show_hint(0), None);
    }

    #[test]
    fn test_tick_commits_on_landing() {
        let mut g = game();
        g.select_peg(0).unwrap();
        g.select_peg(1).unwrap();

        let mut frames = 0;
        let last = loop {
            let frame = g.tick(1.0 / 60.0, 5_000).unwrap();
            frames += 1;
            if frame.completed {
                break frame;
            }
            assert!(frames < 10_000);
        };

        assert_eq!(last.disk, 1);
        assert_eq!(last.position, disk_position(1, 0));
        assert_eq!(g.move_count(), 1);
        assert_eq!(g.pegs().stack(1), &[1]);
        assert_eq!(g.status(), GameStatus::InProgress);
        assert_eq!(g.tick(1.0 / 60.0, 5_100), None);
    }

    #[test]
    fn test_complete_animation_is_idempotent() {
        let mut g = game();
        g.request_move(0, 2).unwrap();
        assert!(g.complete_animation(1_000).is_some());
        assert!(g.complete_animation(1_000).is_none());
        assert_eq!(g.move_count(), 1);
    }

    #[test]
    fn test_timer_starts_on_first_commit() {
        let mut g = game();
        g.request_move(0, 2).unwrap();
        assert_eq!(g.status(), GameStatus::NotStarted);
        g.complete_animation(2_000);
        assert_eq!(g.status(), GameStatus::InProgress);
        assert_eq!(g.clock.started_at(), Some(2_000));
    }

    #[test]
    fn test_solve_records_score() {
        let mut g = game();
        solve(&mut g, 10_000);

        assert_eq!(g.status(), GameStatus::Solved);
        assert_eq!(g.move_count(), 7);
        let best = g.leaderboard().best().unwrap();
        assert_eq!(best.moves, 7);
        assert_eq!(best.disk_count, 3);
        assert_eq!(best.time, 6.0);
        assert_eq!(best.hint_count, 0);

        assert_eq!(g.select_peg(2), Err(MoveRejected::AlreadySolved));
        assert_eq!(g.show_hint(20_000), None);
    }

    #[test]
    fn test_hint_expires() {
        let mut g = game();
        let hint = g.show_hint(1_000).unwrap();
        assert_eq!(hint, MoveRecord { from: 0, to: 2, disk: 1 });
        assert_eq!(g.hint_count(), 1);
        assert_eq!(g.hint(3_999), Some(hint));
        assert_eq!(g.hint(4_000), None);

        g.tick(0.016, 4_000);
        assert!(g.hint.is_none());
    }

    #[test]
    fn test_hint_clears_selection_and_commit_clears_hint() {
        let mut g = game();
        g.select_peg(0).unwrap();
        g.show_hint(0).unwrap();
        assert_eq!(g.selected(), None);

        play(&mut g, 0, 2, 500);
        assert_eq!(g.hint(500), None);
    }

    #[test]
    fn test_stale_generation_clear_is_ignored() {
        let mut g = game();
        g.show_hint(0).unwrap();
        let old = g.generation();
        g.reset(None).unwrap();
        g.show_hint(100).unwrap();

        g.clear_hint_for(old);
        assert!(g.hint(200).is_some());
        g.clear_hint_for(g.generation());
        assert!(g.hint(200).is_none());
    }

    #[test]
    fn test_reset() {
        let mut g = game();
        play(&mut g, 0, 2, 0);
        g.show_hint(0);
        g.reset(Some(5)).unwrap();

        assert_eq!(g.pegs(), &Pegs::new(5));
        assert_eq!(g.move_count(), 0);
        assert_eq!(g.hint_count(), 0);
        assert_eq!(g.status(), GameStatus::NotStarted);
        assert_eq!(g.min_moves(), 31);
    }

    #[test]
    fn test_reset_rejects_out_of_range() {
        let mut g = game();
        play(&mut g, 0, 2, 0);
        assert!(g.reset(Some(2)).is_err());
        assert!(g.set_disk_count(8).is_err());
        // Rejected resets leave the game alone
        assert_eq!(g.move_count(), 1);
    }

    #[test]
    fn test_reset_during_animation_drops_move() {
        let mut g = game();
        g.request_move(0, 1).unwrap();
        g.reset(None).unwrap();
        assert!(!g.is_animating());
        assert!(g.complete_animation(0).is_none());
        assert_eq!(g.pegs(), &Pegs::new(3));
    }

    #[test]
    fn test_persists_and_restores() {
        let store = MemoryStore::new();
        let mut g = HanoiGame::with_store(HanoiConfig::default(), Box::new(store.clone()));
        solve(&mut g, 0);
        g.set_disk_count(4).unwrap();

        let saved: HanoiSave = serde_json::from_str(&store.get(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(saved.disk_count, 4);
        assert_eq!(saved.leaderboard.len(), 1);

        let restored = HanoiGame::with_store(HanoiConfig::default(), Box::new(store));
        assert_eq!(restored.disk_count(), 4);
        assert_eq!(restored.leaderboard().len(), 1);
        assert_eq!(restored.status(), GameStatus::NotStarted);
    }

    #[test]
    fn test_save_format() {
        let store = MemoryStore::new();
        store
            .save(
                STORAGE_KEY,
                r#"{"leaderboard":[{"time":12.5,"moves":9,"diskCount":3,"date":"2024-01-01T00:00:00.000Z"}],"diskCount":5}"#,
            )
            .unwrap();
        let g = HanoiGame::with_store(HanoiConfig::default(), Box::new(store));
        assert_eq!(g.disk_count(), 5);
        assert_eq!(g.leaderboard().best().unwrap().hint_count, 0);
    }

    #[test]
    fn test_bad_save_is_ignored() {
        let store = MemoryStore::new();
        store.save(STORAGE_KEY, "not json").unwrap();
        let g = HanoiGame::with_store(HanoiConfig::default(), Box::new(store.clone()));
        assert_eq!(g.disk_count(), 3);
        assert!(g.leaderboard().is_empty());

        store.save(STORAGE_KEY, r#"{"leaderboard":[],"diskCount":12}"#).unwrap();
        let g = HanoiGame::with_store(HanoiConfig::default(), Box::new(store));
        assert_eq!(g.disk_count(), 3);
    }

    #[test]
    fn test_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mut g = HanoiGame::new(HanoiConfig {
            min_disks: 1,
            default_disks: 1,
            ..HanoiConfig::default()
        });
        g.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        play(&mut g, 0, 2, 3_000);
        let events = events.lock().unwrap();
        let mv = MoveRecord { from: 0, to: 2, disk: 1 };
        assert_eq!(events[0], HanoiEvent::MoveStarted(mv));
        assert_eq!(events[1], HanoiEvent::MoveCommitted { mv, move_count: 1 });
        assert!(matches!(&events[2], HanoiEvent::Solved { rank: Some(0), score } if score.moves == 1));
    }

    #[test]
    fn test_snapshot() {
        let mut g = game();
        g.select_peg(0).unwrap();
        g.select_peg(1).unwrap();
        let snap = g.snapshot(0);
        assert_eq!(snap.pegs[0], vec![3, 2, 1]);
        assert_eq!(snap.animating, Some(MoveRecord { from: 0, to: 1, disk: 1 }));
        assert_eq!(snap.animation_position, Some(disk_position(0, 2)));
        assert_eq!(snap.min_moves, 7);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["status"], "not_started");
        assert_eq!(json["moveCount"], 0);
        assert_eq!(json["minMoves"], 7);
        assert_eq!(json["diskCount"], 3);
        assert!(json["animationPosition"].is_object());
        assert!(json.get("move_count").is_none());
    }
}
