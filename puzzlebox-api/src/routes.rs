//! HTTP endpoints.
//!
//! One shared [`Arcade`] holds a session per game; every handler locks it,
//! runs one command and answers with the game's snapshot.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use puzzlebox_core::hanoi::{
    self, DiskFrame, HanoiGame, HanoiScore, HanoiSnapshot, MoveRecord, Selection,
};
use puzzlebox_core::lights::{Cell, LightsGame, LightsScore, LightsSnapshot};
use puzzlebox_core::sliding::{SlideRecord, SlidingGame, SlidingScore, SlidingSnapshot};
use puzzlebox_core::{GameConfig, Millis, SaveStore};

use crate::error::ApiError;

// =============================================================================
// State
// =============================================================================

/// One session of every game.
pub struct Arcade {
    pub hanoi: HanoiGame,
    pub lights: LightsGame,
    pub sliding: SlidingGame,
}

impl Arcade {
    /// Sessions restored from `store`; `seed` drives puzzle generation.
    pub fn new<S>(config: &GameConfig, store: S, seed: u64) -> Self
    where
        S: SaveStore + Clone + 'static,
    {
        Self {
            hanoi: HanoiGame::with_store(config.hanoi.clone(), Box::new(store.clone())),
            lights: LightsGame::with_store(config.lights.clone(), seed, Box::new(store.clone())),
            sliding: SlidingGame::with_store(config.sliding.clone(), seed.wrapping_add(1), Box::new(store)),
        }
    }
}

pub struct AppStateInner {
    pub arcade: Mutex<Arcade>,
}

pub type AppState = Arc<AppStateInner>;

fn lock(state: &AppState) -> Result<MutexGuard<'_, Arcade>, ApiError> {
    state.arcade.lock().map_err(|_| ApiError::Poisoned)
}

pub fn now_millis() -> Millis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or(0)
}

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Serialize)]
pub struct HealthModel {
    status: String,
}

#[derive(Deserialize)]
pub struct SelectRequest {
    peg: usize,
}

#[derive(Serialize)]
pub struct SelectResponse {
    selection: Selection,
    state: HanoiSnapshot,
}

#[derive(Deserialize)]
pub struct TickRequest {
    /// Seconds since the previous tick.
    dt: f32,
}

#[derive(Serialize)]
pub struct TickResponse {
    frame: Option<DiskFrame>,
    state: HanoiSnapshot,
}

#[derive(Serialize)]
pub struct CompleteResponse {
    committed: Option<MoveRecord>,
    state: HanoiSnapshot,
}

#[derive(Serialize)]
pub struct HanoiHintResponse {
    hint: Option<MoveRecord>,
    state: HanoiSnapshot,
}

#[derive(Deserialize, Default)]
pub struct HanoiResetRequest {
    #[serde(default)]
    disks: Option<u8>,
}

#[derive(Deserialize)]
pub struct PressRequest {
    row: usize,
    col: usize,
}

#[derive(Serialize)]
pub struct LightsHintResponse {
    hint: Option<Cell>,
    state: LightsSnapshot,
}

#[derive(Deserialize, Default)]
pub struct SizeRequest {
    #[serde(default)]
    size: Option<u8>,
}

#[derive(Deserialize)]
pub struct SlideRequest {
    tile: u8,
}

#[derive(Serialize)]
pub struct SlideResponse {
    slide: SlideRecord,
    state: SlidingSnapshot,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// Tower of Hanoi
// =============================================================================

async fn get_hanoi(State(state): State<AppState>) -> ApiResult<HanoiSnapshot> {
    let arcade = lock(&state)?;
    Ok(Json(arcade.hanoi.snapshot(now_millis())))
}

async fn select_peg(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> ApiResult<SelectResponse> {
    let mut arcade = lock(&state)?;
    let selection = arcade.hanoi.select_peg(req.peg)?;
    Ok(Json(SelectResponse {
        selection,
        state: arcade.hanoi.snapshot(now_millis()),
    }))
}

async fn tick(State(state): State<AppState>, Json(req): Json<TickRequest>) -> ApiResult<TickResponse> {
    let mut arcade = lock(&state)?;
    let now = now_millis();
    let frame = arcade.hanoi.tick(req.dt, now);
    Ok(Json(TickResponse {
        frame,
        state: arcade.hanoi.snapshot(now),
    }))
}

async fn complete(State(state): State<AppState>) -> ApiResult<CompleteResponse> {
    let mut arcade = lock(&state)?;
    let now = now_millis();
    let committed = arcade.hanoi.complete_animation(now);
    Ok(Json(CompleteResponse {
        committed,
        state: arcade.hanoi.snapshot(now),
    }))
}

async fn hanoi_hint(State(state): State<AppState>) -> ApiResult<HanoiHintResponse> {
    let mut arcade = lock(&state)?;
    let now = now_millis();
    let hint = arcade.hanoi.show_hint(now);
    Ok(Json(HanoiHintResponse {
        hint,
        state: arcade.hanoi.snapshot(now),
    }))
}

async fn hanoi_reset(
    State(state): State<AppState>,
    Json(req): Json<HanoiResetRequest>,
) -> ApiResult<HanoiSnapshot> {
    let mut arcade = lock(&state)?;
    arcade.hanoi.reset(req.disks)?;
    Ok(Json(arcade.hanoi.snapshot(now_millis())))
}

async fn hanoi_leaderboard(State(state): State<AppState>) -> ApiResult<Vec<HanoiScore>> {
    let arcade = lock(&state)?;
    Ok(Json(arcade.hanoi.leaderboard().entries().to_vec()))
}

async fn hanoi_solution(State(state): State<AppState>) -> ApiResult<Vec<MoveRecord>> {
    let arcade = lock(&state)?;
    Ok(Json(hanoi::solution_from(arcade.hanoi.pegs())))
}

// =============================================================================
// Lights Out
// =============================================================================

async fn get_lights(State(state): State<AppState>) -> ApiResult<LightsSnapshot> {
    let arcade = lock(&state)?;
    Ok(Json(arcade.lights.snapshot()))
}

async fn press(State(state): State<AppState>, Json(req): Json<PressRequest>) -> ApiResult<LightsSnapshot> {
    let mut arcade = lock(&state)?;
    arcade
        .lights
        .press(Cell { row: req.row, col: req.col }, now_millis())?;
    Ok(Json(arcade.lights.snapshot()))
}

async fn lights_hint(State(state): State<AppState>) -> ApiResult<LightsHintResponse> {
    let mut arcade = lock(&state)?;
    let hint = arcade.lights.show_hint();
    Ok(Json(LightsHintResponse {
        hint,
        state: arcade.lights.snapshot(),
    }))
}

async fn lights_reset(State(state): State<AppState>, Json(req): Json<SizeRequest>) -> ApiResult<LightsSnapshot> {
    let mut arcade = lock(&state)?;
    match req.size {
        Some(size) => arcade.lights.set_grid_size(size)?,
        None => arcade.lights.reset(),
    }
    Ok(Json(arcade.lights.snapshot()))
}

async fn next_level(State(state): State<AppState>) -> ApiResult<LightsSnapshot> {
    let mut arcade = lock(&state)?;
    arcade.lights.next_level();
    Ok(Json(arcade.lights.snapshot()))
}

async fn lights_leaderboard(State(state): State<AppState>) -> ApiResult<Vec<LightsScore>> {
    let arcade = lock(&state)?;
    Ok(Json(arcade.lights.leaderboard().entries().to_vec()))
}

// =============================================================================
// Sliding puzzle
// =============================================================================

async fn get_sliding(State(state): State<AppState>) -> ApiResult<SlidingSnapshot> {
    let arcade = lock(&state)?;
    Ok(Json(arcade.sliding.snapshot()))
}

async fn slide(State(state): State<AppState>, Json(req): Json<SlideRequest>) -> ApiResult<SlideResponse> {
    let mut arcade = lock(&state)?;
    let slide = arcade.sliding.slide(req.tile, now_millis())?;
    Ok(Json(SlideResponse {
        slide,
        state: arcade.sliding.snapshot(),
    }))
}

async fn sliding_reset(State(state): State<AppState>, Json(req): Json<SizeRequest>) -> ApiResult<SlidingSnapshot> {
    let mut arcade = lock(&state)?;
    arcade.sliding.reset(req.size)?;
    Ok(Json(arcade.sliding.snapshot()))
}

async fn sliding_leaderboard(State(state): State<AppState>) -> ApiResult<Vec<SlidingScore>> {
    let arcade = lock(&state)?;
    Ok(Json(arcade.sliding.leaderboard().entries().to_vec()))
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Router
// =============================================================================

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/hanoi", get(get_hanoi))
        .route("/hanoi/select", post(select_peg))
        .route("/hanoi/tick", post(tick))
        .route("/hanoi/complete", post(complete))
        .route("/hanoi/hint", post(hanoi_hint))
        .route("/hanoi/reset", post(hanoi_reset))
        .route("/hanoi/leaderboard", get(hanoi_leaderboard))
        .route("/hanoi/solution", get(hanoi_solution))
        .route("/lights", get(get_lights))
        .route("/lights/press", post(press))
        .route("/lights/hint", post(lights_hint))
        .route("/lights/reset", post(lights_reset))
        .route("/lights/next-level", post(next_level))
        .route("/lights/leaderboard", get(lights_leaderboard))
        .route("/sliding", get(get_sliding))
        .route("/sliding/slide", post(slide))
        .route("/sliding/reset", post(sliding_reset))
        .route("/sliding/leaderboard", get(sliding_leaderboard))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use puzzlebox_core::GameStatus;

    fn state() -> AppState {
        let store = SqliteStore::open_in_memory().unwrap();
        Arc::new(AppStateInner {
            arcade: Mutex::new(Arcade::new(&GameConfig::default(), store, 7)),
        })
    }

    #[tokio::test]
    async fn test_hanoi_select_and_complete() {
        let state = state();
        let Json(resp) = select_peg(State(state.clone()), Json(SelectRequest { peg: 0 }))
            .await
            .unwrap();
        assert_eq!(resp.selection, Selection::Selected { peg: 0 });

        let Json(resp) = select_peg(State(state.clone()), Json(SelectRequest { peg: 2 }))
            .await
            .unwrap();
        assert!(matches!(resp.selection, Selection::MoveStarted { .. }));
        assert!(resp.state.animating.is_some());

        // A second move while the first is animating is refused
        let err = select_peg(State(state.clone()), Json(SelectRequest { peg: 0 }))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);

        let Json(resp) = complete(State(state.clone())).await.unwrap();
        assert_eq!(resp.committed, Some(MoveRecord { from: 0, to: 2, disk: 1 }));
        assert_eq!(resp.state.move_count, 1);
        assert_eq!(resp.state.status, GameStatus::InProgress);
    }

    #[tokio::test]
    async fn test_hanoi_solution_and_reset() {
        let state = state();
        let Json(moves) = hanoi_solution(State(state.clone())).await.unwrap();
        assert_eq!(moves.len(), 7);

        let Json(snap) = hanoi_reset(State(state.clone()), Json(HanoiResetRequest { disks: Some(4) }))
            .await
            .unwrap();
        assert_eq!(snap.disk_count, 4);

        let err = hanoi_reset(State(state), Json(HanoiResetRequest { disks: Some(20) }))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lights_hint_and_press() {
        let state = state();
        let Json(resp) = lights_hint(State(state.clone())).await.unwrap();
        let hint = resp.hint.unwrap();

        let Json(snap) = press(State(state.clone()), Json(PressRequest { row: hint.row, col: hint.col }))
            .await
            .unwrap();
        assert_eq!(snap.move_count, 1);
        assert_eq!(snap.hint, None);

        let Json(snap) = next_level(State(state)).await.unwrap();
        assert_eq!(snap.level, 2);
        assert_eq!(snap.move_count, 0);
    }

    #[tokio::test]
    async fn test_sliding_rejects_far_tile() {
        let state = state();
        let far = {
            let arcade = state.arcade.lock().unwrap();
            let movable = arcade.sliding.board().movable_tiles();
            (1..9u8).find(|t| !movable.contains(t)).unwrap()
        };
        let err = slide(State(state), Json(SlideRequest { tile: far })).await.err().unwrap();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
