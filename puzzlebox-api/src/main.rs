//! Puzzlebox Web API
//!
//! Serves the puzzle sessions over REST for clients that do not run the
//! WASM build. Saved data (leaderboards, preferred sizes) is kept in sqlite.

mod config;
mod error;
mod routes;
mod store;

use std::fs;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ApiConfig;
use crate::routes::{now_millis, Arcade, AppStateInner};
use crate::store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = ApiConfig::from_env();
    let game_config = config.game_config()?;

    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    info!(path = %config.db_path.display(), "save store ready");

    let seed = config.seed.unwrap_or_else(now_millis);
    let state = Arc::new(AppStateInner {
        arcade: Mutex::new(Arcade::new(&game_config, store, seed)),
    });

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(addr = %config.addr, "puzzlebox API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
