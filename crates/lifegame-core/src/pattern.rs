//! Binary patterns and the preset still lifes.
//!
//! A pattern is stamped at the grid origin after the whole grid has been
//! blanked. Pattern cells that fall outside the grid are clipped.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LifeError, LifeResult};
use crate::grid::Grid;

/// A matrix of binary digits (`0` dead, `1` alive).
///
/// Rows may be shorter than the widest row; missing cells read as dead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    rows: Vec<Vec<bool>>,
}

impl Pattern {
    /// The pattern with no cells. Stamping it blanks the grid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from rows of digits. Anything other than `0` or `1` is rejected.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> LifeResult<Self> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.as_ref()
                    .iter()
                    .map(|&dot| match dot {
                        0 => Ok(false),
                        1 => Ok(true),
                        other => Err(LifeError::InvalidPattern {
                            line: i + 1,
                            message: format!("expected 0 or 1, found {other}"),
                        }),
                    })
                    .collect::<LifeResult<Vec<bool>>>()
            })
            .collect::<LifeResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Parse pattern text, one row per line.
    ///
    /// Live cells are `#`, `O`, `*` or `1`; dead cells are `.` or `0`.
    /// Lines starting with `!` are comments (plaintext `.cells` format).
    pub fn parse(text: &str) -> LifeResult<Self> {
        let mut rows = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.starts_with('!') {
                continue;
            }

            let row = line
                .chars()
                .map(|ch| match ch {
                    '#' | 'O' | '*' | '1' => Ok(true),
                    '.' | '0' => Ok(false),
                    other => Err(LifeError::InvalidPattern {
                        line: i + 1,
                        message: format!("unexpected character {other:?}"),
                    }),
                })
                .collect::<LifeResult<Vec<bool>>>()?;
            rows.push(row);
        }

        // Trailing blank lines carry no cells.
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }

        Ok(Self { rows })
    }

    /// Capture the current contents of a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let rows = grid
            .iter_rows()
            .map(|row| row.iter().map(|cell| cell.is_alive).collect())
            .collect();
        Self { rows }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True iff the pattern has a live cell at `(row, col)`.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Coordinates of all live cells in row-major order.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, alive)| **alive)
                    .map(move |(c, _)| (r, c))
            })
            .collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for &alive in row {
                f.write_str(if alive { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Each preset carries a one-cell dead frame, so it sits one cell away from
// the grid edges once stamped at the origin.

const BLOCK: &[&[u8]] = &[
    &[0, 0, 0, 0],
    &[0, 1, 1, 0],
    &[0, 1, 1, 0],
    &[0, 0, 0, 0],
];

const BOAT: &[&[u8]] = &[
    &[0, 0, 0, 0, 0],
    &[0, 1, 1, 0, 0],
    &[0, 1, 0, 1, 0],
    &[0, 0, 1, 0, 0],
    &[0, 0, 0, 0, 0],
];

const BEEHIVE: &[&[u8]] = &[
    &[0, 0, 0, 0, 0, 0],
    &[0, 0, 1, 1, 0, 0],
    &[0, 1, 0, 0, 1, 0],
    &[0, 0, 1, 1, 0, 0],
    &[0, 0, 0, 0, 0, 0],
];

const LOAF: &[&[u8]] = &[
    &[0, 0, 0, 0, 0, 0],
    &[0, 0, 1, 1, 0, 0],
    &[0, 1, 0, 0, 1, 0],
    &[0, 0, 1, 0, 1, 0],
    &[0, 0, 0, 1, 0, 0],
    &[0, 0, 0, 0, 0, 0],
];

const POND: &[&[u8]] = &[
    &[0, 0, 0, 0, 0, 0],
    &[0, 0, 1, 1, 0, 0],
    &[0, 1, 0, 0, 1, 0],
    &[0, 1, 0, 0, 1, 0],
    &[0, 0, 1, 1, 0, 0],
    &[0, 0, 0, 0, 0, 0],
];

// A 4x4 array of blocks separated by single dead lanes.
const MOSAIC: &[&[u8]] = &[
    &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0],
    &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// One of the six named starting patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Block,
    Boat,
    Beehive,
    Loaf,
    Pond,
    Mosaic,
}

impl Preset {
    /// Every preset, in selection order.
    pub const ALL: [Preset; 6] = [
        Preset::Block,
        Preset::Boat,
        Preset::Beehive,
        Preset::Loaf,
        Preset::Pond,
        Preset::Mosaic,
    ];

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Block => "block",
            Preset::Boat => "boat",
            Preset::Beehive => "beehive",
            Preset::Loaf => "loaf",
            Preset::Pond => "pond",
            Preset::Mosaic => "mosaic",
        }
    }

    fn dots(self) -> &'static [&'static [u8]] {
        match self {
            Preset::Block => BLOCK,
            Preset::Boat => BOAT,
            Preset::Beehive => BEEHIVE,
            Preset::Loaf => LOAF,
            Preset::Pond => POND,
            Preset::Mosaic => MOSAIC,
        }
    }

    /// The preset's pattern matrix.
    pub fn pattern(self) -> Pattern {
        let rows = self
            .dots()
            .iter()
            .map(|row| row.iter().map(|&dot| dot == 1).collect())
            .collect();
        Pattern { rows }
    }

    /// Pick a preset uniformly at random.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| LifeError::UnknownPreset {
                name: s.to_string(),
            })
    }
}
