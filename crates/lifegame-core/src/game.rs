//! The life game engine.
//!
//! `LifeGame` owns the grid exclusively. Collaborators read it through
//! [`LifeGame::grid`] and mutate it only through the operations here; each
//! mutation is announced to subscribed observers afterwards.

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::LifeResult;
use crate::grid::Grid;
use crate::pattern::{Pattern, Preset};
use crate::rule::{ConwayRule, Rule};

/// Summary of one call to [`LifeGame::advance_generation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation number after the advance (1 for the first advance).
    pub generation: u64,

    /// Dead cells that came alive.
    pub births: usize,

    /// Live cells that died.
    pub deaths: usize,

    /// Live cells after the advance.
    pub population: usize,

    /// Time spent computing the generation.
    pub duration: Duration,
}

impl GenerationReport {
    /// True when the generation left the grid unchanged.
    pub fn is_still(&self) -> bool {
        self.births == 0 && self.deaths == 0
    }
}

/// A mutation that has just been applied to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridChange {
    /// The grid advanced one generation.
    Advanced(GenerationReport),

    /// Every cell was set dead.
    Reset,

    /// A pattern was stamped at the origin; `preset` names it when it was one.
    Stamped { preset: Option<Preset> },

    /// One cell was flipped.
    Toggled { row: usize, col: usize, is_alive: bool },
}

type Observer = Box<dyn FnMut(&GridChange, &Grid) + Send>;

/// Conway's Game of Life on a bounded, non-wrapping grid.
pub struct LifeGame {
    grid: Grid,
    rule: Box<dyn Rule>,
    generation: u64,
    observers: Vec<Observer>,
}

impl LifeGame {
    /// Create a game with every cell dead.
    ///
    /// Fails with [`LifeError::InvalidDimensions`](crate::LifeError::InvalidDimensions)
    /// if either side is zero or the grid would exceed [`MAX_CELLS`](crate::MAX_CELLS).
    pub fn new(rows: usize, cols: usize) -> LifeResult<Self> {
        let grid = Grid::dead(rows, cols)?;
        debug!(rows, cols, "life_game_created");

        Ok(Self {
            grid,
            rule: Box::new(ConwayRule),
            generation: 0,
            observers: Vec::new(),
        })
    }

    /// Replace the transition rule (builder pattern).
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rule = Box::new(rule);
        self
    }

    /// Register an observer called after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&GridChange, &Grid) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Read-only view of the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The active transition rule.
    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// Generations advanced since construction or the last reset/stamp.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Advance every cell one generation at once.
    pub fn advance_generation(&mut self) -> GenerationReport {
        let started = Instant::now();

        let next = self.grid.next_generation(self.rule.as_ref());
        let (births, deaths) = diff_counts(&self.grid, &next);
        self.grid = next;
        self.generation += 1;

        let report = GenerationReport {
            generation: self.generation,
            births,
            deaths,
            population: self.grid.population(),
            duration: started.elapsed(),
        };

        debug!(
            generation = report.generation,
            births = report.births,
            deaths = report.deaths,
            population = report.population,
            "generation_advanced"
        );

        self.notify(GridChange::Advanced(report));
        report
    }

    /// Set every cell dead.
    pub fn reset(&mut self) {
        self.overwrite(&Pattern::empty());
        debug!("grid_reset");
        self.notify(GridChange::Reset);
    }

    /// Blank the grid, then overlay `pattern` at the origin.
    ///
    /// Pattern cells beyond the grid are ignored.
    pub fn stamp_pattern(&mut self, pattern: &Pattern) {
        self.overwrite(pattern);
        debug!(
            height = pattern.height(),
            width = pattern.width(),
            "pattern_stamped"
        );
        self.notify(GridChange::Stamped { preset: None });
    }

    /// Blank the grid and stamp a specific preset.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.overwrite(&preset.pattern());
        info!(preset = %preset, "preset_stamped");
        self.notify(GridChange::Stamped {
            preset: Some(preset),
        });
    }

    /// Blank the grid and stamp a preset chosen uniformly at random.
    pub fn stamp_preset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Preset {
        let preset = Preset::choose(rng);
        self.apply_preset(preset);
        preset
    }

    /// Flip the cell at `(row, col)` and return its new state.
    ///
    /// Out-of-range coordinates are rejected with
    /// [`LifeError::OutOfBounds`](crate::LifeError::OutOfBounds) and the grid
    /// is left untouched.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> LifeResult<bool> {
        let is_alive = self.grid.toggle(row, col).inspect_err(|e| {
            warn!(row, col, error = %e, "toggle_rejected");
        })?;

        debug!(row, col, is_alive, "cell_toggled");
        self.notify(GridChange::Toggled { row, col, is_alive });
        Ok(is_alive)
    }

    fn overwrite(&mut self, pattern: &Pattern) {
        self.grid = self.grid.reshaped(|r, c| pattern.is_alive(r, c));
        self.generation = 0;
    }

    fn notify(&mut self, change: GridChange) {
        for observer in &mut self.observers {
            observer(&change, &self.grid);
        }
    }
}

fn diff_counts(before: &Grid, after: &Grid) -> (usize, usize) {
    before
        .iter_rows()
        .zip(after.iter_rows())
        .flat_map(|(old, new)| old.iter().zip(new))
        .fold((0, 0), |(births, deaths), (old, new)| {
            match (old.is_alive, new.is_alive) {
                (false, true) => (births + 1, deaths),
                (true, false) => (births, deaths + 1),
                _ => (births, deaths),
            }
        })
}

impl fmt::Debug for LifeGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifeGame")
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("generation", &self.generation)
            .field("rule", &self.rule)
            .field("observers", &self.observers.len())
            .finish()
    }
}
