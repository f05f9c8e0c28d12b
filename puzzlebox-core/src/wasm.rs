//! WASM bindings for puzzlebox-core
//!
//! Each game is wrapped in a JavaScript class. Timestamps come from
//! `Date.now()`. Persisted data lives in a [`MemoryStore`] seeded from the
//! page's local storage; after any command the page reads `savedJson()` and
//! writes it back.

use wasm_bindgen::prelude::*;

use crate::config::{HanoiConfig, LightsConfig, SlidingConfig};
use crate::hanoi::{self, HanoiGame, MoveRejected};
use crate::lights::{self, Cell, LightsGame};
use crate::persist::{MemoryStore, SaveStore};
use crate::sliding::{self, SlidingGame};
use crate::Millis;

fn millis(now: f64) -> Millis {
    if now.is_finite() && now > 0.0 {
        now as Millis
    } else {
        0
    }
}

/// Store preloaded with the page's saved JSON for `key`.
fn seeded_store(key: &str, saved: Option<String>) -> Result<MemoryStore, JsError> {
    let store = MemoryStore::new();
    if let Some(json) = saved {
        store.save(key, &json)?;
    }
    Ok(store)
}

fn parse_config<T: serde::de::DeserializeOwned + Default>(config: JsValue) -> Result<T, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

// ============================================================================
// Tower of Hanoi
// ============================================================================

/// WASM-friendly wrapper around HanoiGame
#[wasm_bindgen]
pub struct WasmHanoi {
    inner: HanoiGame,
    store: MemoryStore,
}

#[wasm_bindgen]
impl WasmHanoi {
    /// Create a game, restoring from previously saved JSON if given
    #[wasm_bindgen(constructor)]
    pub fn new(saved: Option<String>) -> Result<WasmHanoi, JsError> {
        Self::with_config(JsValue::UNDEFINED, saved)
    }

    /// Create a game with a custom configuration object
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue, saved: Option<String>) -> Result<WasmHanoi, JsError> {
        let config: HanoiConfig = parse_config(config)?;
        config.validate()?;
        let store = seeded_store(hanoi::session::STORAGE_KEY, saved)?;
        Ok(WasmHanoi {
            inner: HanoiGame::with_store(config, Box::new(store.clone())),
            store,
        })
    }

    /// Click a peg. Returns the selection outcome, or throws with the reason
    /// the click was rejected
    #[wasm_bindgen(js_name = selectPeg)]
    pub fn select_peg(&mut self, peg: usize) -> Result<JsValue, JsError> {
        let selection = self.inner.select_peg(peg)?;
        to_js(&selection)
    }

    /// Check a move without starting it. Returns null when it is legal,
    /// otherwise the reason
    #[wasm_bindgen(js_name = checkMove)]
    pub fn check_move(&self, from: usize, to: usize) -> Option<String> {
        self.inner
            .propose_move(from, to)
            .err()
            .map(|e: MoveRejected| e.to_string())
    }

    /// Advance the move animation. Returns the moving disk's frame or null
    pub fn tick(&mut self, dt: f32, now: f64) -> Result<JsValue, JsError> {
        let frame = self.inner.tick(dt, millis(now));
        to_js(&frame)
    }

    /// Signal that an externally driven animation landed
    #[wasm_bindgen(js_name = completeAnimation)]
    pub fn complete_animation(&mut self, now: f64) -> bool {
        self.inner.complete_animation(millis(now)).is_some()
    }

    /// Show the next optimal move. Returns it, or null if none is available
    #[wasm_bindgen(js_name = showHint)]
    pub fn show_hint(&mut self, now: f64) -> Result<JsValue, JsError> {
        let hint = self.inner.show_hint(millis(now));
        to_js(&hint)
    }

    /// Clear the hint if it still belongs to game `generation`
    #[wasm_bindgen(js_name = clearHint)]
    pub fn clear_hint(&mut self, generation: u64) {
        self.inner.clear_hint_for(generation);
    }

    /// Start over, optionally with a new disk count
    pub fn reset(&mut self, disks: Option<u8>) -> Result<(), JsError> {
        self.inner.reset(disks)?;
        Ok(())
    }

    /// Everything needed to draw the current frame
    pub fn snapshot(&self, now: f64) -> Result<JsValue, JsError> {
        to_js(&self.inner.snapshot(millis(now)))
    }

    /// Leaderboard entries, best first
    pub fn leaderboard(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.leaderboard().entries())
    }

    /// Remaining optimal moves from the current position
    pub fn solution(&self) -> Result<JsValue, JsError> {
        to_js(&hanoi::solution_from(self.inner.pegs()))
    }

    /// Disk radius for rendering
    #[wasm_bindgen(js_name = diskRadius)]
    pub fn disk_radius(&self, disk: u8) -> f32 {
        hanoi::layout::disk_radius(disk, self.inner.disk_count())
    }

    /// JSON to keep in local storage, or null if nothing was saved yet
    #[wasm_bindgen(js_name = savedJson)]
    pub fn saved_json(&self) -> Option<String> {
        self.store.get(hanoi::session::STORAGE_KEY)
    }
}

// ============================================================================
// Lights Out
// ============================================================================

/// WASM-friendly wrapper around LightsGame
#[wasm_bindgen]
pub struct WasmLights {
    inner: LightsGame,
    store: MemoryStore,
}

#[wasm_bindgen]
impl WasmLights {
    /// Create a game; `seed` drives puzzle generation
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, saved: Option<String>) -> Result<WasmLights, JsError> {
        Self::with_config(JsValue::UNDEFINED, seed, saved)
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue, seed: u64, saved: Option<String>) -> Result<WasmLights, JsError> {
        let config: LightsConfig = parse_config(config)?;
        config.validate()?;
        let store = seeded_store(lights::session::STORAGE_KEY, saved)?;
        Ok(WasmLights {
            inner: LightsGame::with_store(config, seed, Box::new(store.clone())),
            store,
        })
    }

    /// Press a light. Returns the game status afterwards
    pub fn press(&mut self, row: usize, col: usize, now: f64) -> Result<JsValue, JsError> {
        let status = self.inner.press(Cell { row, col }, millis(now))?;
        to_js(&status)
    }

    /// Next press of a shortest solution, or null
    #[wasm_bindgen(js_name = showHint)]
    pub fn show_hint(&mut self) -> Result<JsValue, JsError> {
        let hint = self.inner.show_hint();
        to_js(&hint)
    }

    /// New puzzle at the current size and level
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&mut self) {
        self.inner.next_level();
    }

    #[wasm_bindgen(js_name = setGridSize)]
    pub fn set_grid_size(&mut self, size: u8) -> Result<(), JsError> {
        self.inner.set_grid_size(size)?;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.snapshot())
    }

    pub fn leaderboard(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.leaderboard().entries())
    }

    #[wasm_bindgen(js_name = savedJson)]
    pub fn saved_json(&self) -> Option<String> {
        self.store.get(lights::session::STORAGE_KEY)
    }
}

// ============================================================================
// Sliding puzzle
// ============================================================================

/// WASM-friendly wrapper around SlidingGame
#[wasm_bindgen]
pub struct WasmSliding {
    inner: SlidingGame,
    store: MemoryStore,
}

#[wasm_bindgen]
impl WasmSliding {
    /// Create a game; `seed` drives shuffling
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, saved: Option<String>) -> Result<WasmSliding, JsError> {
        Self::with_config(JsValue::UNDEFINED, seed, saved)
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue, seed: u64, saved: Option<String>) -> Result<WasmSliding, JsError> {
        let config: SlidingConfig = parse_config(config)?;
        config.validate()?;
        let store = seeded_store(sliding::session::STORAGE_KEY, saved)?;
        Ok(WasmSliding {
            inner: SlidingGame::with_store(config, seed, Box::new(store.clone())),
            store,
        })
    }

    /// Slide a tile by number. Returns the slide record
    pub fn slide(&mut self, tile: u8, now: f64) -> Result<JsValue, JsError> {
        let slide = self.inner.slide(tile, millis(now))?;
        to_js(&slide)
    }

    /// Slide the tile at a square
    #[wasm_bindgen(js_name = slideAt)]
    pub fn slide_at(&mut self, row: usize, col: usize, now: f64) -> Result<JsValue, JsError> {
        let slide = self.inner.slide_at(row, col, millis(now))?;
        to_js(&slide)
    }

    /// Reshuffle, optionally at a new size
    pub fn reset(&mut self, size: Option<u8>) -> Result<(), JsError> {
        self.inner.reset(size)?;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.snapshot())
    }

    pub fn leaderboard(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.leaderboard().entries())
    }

    #[wasm_bindgen(js_name = savedJson)]
    pub fn saved_json(&self) -> Option<String> {
        self.store.get(sliding::session::STORAGE_KEY)
    }
}
