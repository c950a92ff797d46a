//! Error types for the life game engine.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for engine operations.
pub type LifeResult<T> = Result<T, LifeError>;

/// Errors that can occur while building or driving a life game.
#[derive(Debug, Error)]
pub enum LifeError {
    /// A grid was requested with a zero-length side or too many cells.
    #[error("invalid grid dimensions: {rows}x{cols} (each side >= 1, at most 16777216 cells)")]
    InvalidDimensions { rows: usize, cols: usize },

    /// A cell coordinate falls outside the grid.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A ticker was requested with a zero delay.
    #[error("invalid ticker delay: {delay:?} (must be > 0)")]
    InvalidDelay { delay: Duration },

    /// A ticker was created outside of a tokio runtime.
    #[error("no tokio runtime available to drive the ticker")]
    RuntimeUnavailable,

    /// Pattern text could not be parsed.
    #[error("invalid pattern at line {line}: {message}")]
    InvalidPattern { line: usize, message: String },

    /// A preset name did not match any known preset.
    #[error("unknown preset: {name} (expected one of block, boat, beehive, loaf, pond, mosaic)")]
    UnknownPreset { name: String },

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error (reading config or pattern files).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
