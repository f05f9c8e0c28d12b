//! Server configuration from environment variables.
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use puzzlebox_core::GameConfig;

/// Runtime settings of the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    /// Optional JSON file with a [`GameConfig`].
    pub game_config_path: Option<PathBuf>,
    /// Fixed seed for puzzle generation; the start time when unset.
    pub seed: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            db_path: PathBuf::from("data/puzzlebox.db"),
            game_config_path: None,
            seed: None,
        }
    }
}

impl ApiConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `PUZZLEBOX_ADDR` - listen address (default: 0.0.0.0:8000)
    /// - `PUZZLEBOX_DB` - sqlite file for saved data (default: data/puzzlebox.db)
    /// - `PUZZLEBOX_CONFIG` - path to a JSON game configuration
    /// - `PUZZLEBOX_SEED` - puzzle generation seed
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(addr) = read_env::<SocketAddr>("PUZZLEBOX_ADDR") {
            config.addr = addr;
        }
        if let Some(path) = read_env::<PathBuf>("PUZZLEBOX_DB") {
            config.db_path = path;
        }
        config.game_config_path = read_env::<PathBuf>("PUZZLEBOX_CONFIG");
        config.seed = read_env::<u64>("PUZZLEBOX_SEED");

        config
    }

    /// Load and validate the game configuration, or the defaults if no file
    /// is configured.
    pub fn game_config(&self) -> anyhow::Result<GameConfig> {
        let Some(path) = &self.game_config_path else {
            return Ok(GameConfig::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading game config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing game config {}", path.display()))?;
        config.validate().context("invalid game config")?;
        Ok(config)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
