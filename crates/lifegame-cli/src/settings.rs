//! Effective configuration for a run.
//!
//! Precedence, lowest to highest: built-in defaults, `life.toml`
//! (explicit `--config`, else the current directory, else the user config
//! directory), `LIFE_*` environment variables (a `.env` file is honored),
//! command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use lifegame_core::{LifeConfig, StartPattern, CONFIG_FILENAME};
use tracing::{debug, warn};

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub delay_ms: Option<u64>,
    pub preset: Option<StartPattern>,
    pub seed: Option<u64>,
}

impl Overrides {
    fn apply(&self, config: &mut LifeConfig) {
        if let Some(rows) = self.rows {
            config.grid.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.grid.cols = cols;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.ticker.delay_ms = delay_ms;
        }
        if let Some(preset) = self.preset {
            config.start.preset = preset;
        }
        if let Some(seed) = self.seed {
            config.start.seed = Some(seed);
        }
    }
}

/// Resolve all layers into a validated config.
pub fn resolve(config_path: Option<&Path>, overrides: &Overrides) -> Result<LifeConfig> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let mut config = load_file(config_path)?;
    apply_env(&mut config, |key| std::env::var(key).ok());
    overrides.apply(&mut config);

    config.validate().context("Invalid configuration")?;
    debug!(?config, "config_resolved");
    Ok(config)
}

/// Directory holding the per-user `life.toml`.
pub fn user_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "lifegame", "life").map(|dirs| dirs.config_dir().to_path_buf())
}

fn load_file(explicit: Option<&Path>) -> Result<LifeConfig> {
    if let Some(path) = explicit {
        return LifeConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let dir = if cwd.join(CONFIG_FILENAME).exists() {
        cwd
    } else {
        match user_config_dir() {
            Some(dir) => dir,
            None => return Ok(LifeConfig::default()),
        }
    };

    LifeConfig::load_or_default(&dir)
        .with_context(|| format!("Failed to load {} from {}", CONFIG_FILENAME, dir.display()))
}

fn apply_env(config: &mut LifeConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(rows) = parse_env(&lookup, "LIFE_ROWS") {
        config.grid.rows = rows;
    }
    if let Some(cols) = parse_env(&lookup, "LIFE_COLS") {
        config.grid.cols = cols;
    }
    if let Some(delay_ms) = parse_env(&lookup, "LIFE_DELAY_MS") {
        config.ticker.delay_ms = delay_ms;
    }
    if let Some(preset) = parse_env(&lookup, "LIFE_PRESET") {
        config.start.preset = preset;
    }
    if let Some(seed) = parse_env(&lookup, "LIFE_SEED") {
        config.start.seed = Some(seed);
    }
}

fn parse_env<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring_unparseable_env_override");
            None
        }
    }
}
