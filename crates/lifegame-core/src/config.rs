//! Game configuration via `life.toml`.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [grid]
//! rows = 24
//! cols = 48
//!
//! [ticker]
//! delay_ms = 200
//!
//! [start]
//! preset = "random"   # random | blank | block | boat | beehive | loaf | pond | mosaic
//! seed = 42
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LifeError, LifeResult};
use crate::grid::check_dimensions;
use crate::pattern::Preset;

/// Name of the config file looked up by [`LifeConfig::load_or_default`].
pub const CONFIG_FILENAME: &str = "life.toml";

/// The full configuration parsed from `life.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeConfig {
    /// Grid dimensions.
    #[serde(default)]
    pub grid: GridSection,

    /// Stepping cadence.
    #[serde(default)]
    pub ticker: TickerSection,

    /// Initial contents of the grid.
    #[serde(default)]
    pub start: StartSection,
}

/// `[grid]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSection {
    #[serde(default = "GridSection::default_rows")]
    pub rows: usize,

    #[serde(default = "GridSection::default_cols")]
    pub cols: usize,
}

impl GridSection {
    fn default_rows() -> usize {
        24
    }
    fn default_cols() -> usize {
        48
    }
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            cols: Self::default_cols(),
        }
    }
}

/// `[ticker]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSection {
    /// Milliseconds between generations.
    #[serde(default = "TickerSection::default_delay_ms")]
    pub delay_ms: u64,
}

impl TickerSection {
    fn default_delay_ms() -> u64 {
        200
    }
}

impl Default for TickerSection {
    fn default() -> Self {
        Self {
            delay_ms: Self::default_delay_ms(),
        }
    }
}

/// `[start]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSection {
    /// What to stamp before the first generation.
    #[serde(default)]
    pub preset: StartPattern,

    /// Seed for random preset selection. Unseeded runs use OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Initial grid contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StartPattern {
    /// A preset chosen uniformly at random.
    #[default]
    Random,
    /// All cells dead.
    Blank,
    /// A specific preset.
    Preset(Preset),
}

impl FromStr for StartPattern {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "blank" => Ok(Self::Blank),
            other => other.parse().map(Self::Preset),
        }
    }
}

impl TryFrom<String> for StartPattern {
    type Error = LifeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StartPattern> for String {
    fn from(p: StartPattern) -> Self {
        p.to_string()
    }
}

impl fmt::Display for StartPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Blank => f.write_str("blank"),
            Self::Preset(p) => write!(f, "{p}"),
        }
    }
}

impl LifeConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> LifeResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> LifeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    /// Load `life.toml` from `dir`, or the defaults if there is none.
    pub fn load_or_default(dir: &Path) -> LifeResult<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            debug!(dir = %dir.display(), "config_missing_using_defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Reject values the engine or ticker would refuse.
    pub fn validate(&self) -> LifeResult<()> {
        check_dimensions(self.grid.rows, self.grid.cols)?;
        if self.ticker.delay_ms == 0 {
            return Err(LifeError::InvalidDelay {
                delay: self.delay(),
            });
        }
        Ok(())
    }

    /// Delay between generations.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.ticker.delay_ms)
    }
}
