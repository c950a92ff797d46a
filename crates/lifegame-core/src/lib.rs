//! Conway's Game of Life on a bounded grid, with a periodic stepping ticker.
//!
//! ## Core Concepts
//!
//! - **Grid**: fixed `rows × cols` matrix of cells; edges do not wrap and
//!   everything outside the grid is permanently dead
//! - **Rule**: maps `(alive, live_neighbors)` to the next state; B3/S23 by default
//! - **Pattern**: binary matrix stamped at the origin after blanking the grid
//! - **Preset**: one of six named still lifes (block, boat, beehive, loaf, pond, mosaic)
//! - **LifeGame**: owns the grid; the only way to mutate it
//! - **Ticker**: invokes a callback every `delay` on a tokio task
//!
//! ## Data Flow
//!
//! ```text
//! Ticker fires → callback → LifeGame::advance_generation
//!              → grid replaced → observers notified → renderer re-reads grid
//! ```
//!
//! The engine does no locking of its own. When the ticker callback and input
//! handling run on different tasks, share the game behind a mutex.

pub mod config;
mod error;
mod game;
mod grid;
mod pattern;
mod rule;
mod ticker;

pub use config::{LifeConfig, StartPattern, CONFIG_FILENAME};
pub use error::{LifeError, LifeResult};
pub use game::{GenerationReport, GridChange, LifeGame};
pub use grid::{Cell, Grid, Row, MAX_CELLS, NEIGHBOR_OFFSETS};
pub use pattern::{Pattern, Preset};
pub use rule::{ConwayRule, Rule};
pub use ticker::Ticker;
