//! ANSI terminal rendering of the grid.

use std::fmt::Write as _;
use std::io::{self, Write};

use lifegame_core::{Grid, GridChange};

const CLEAR: &str = "\x1B[2J\x1B[H";
const LIVE: &str = "\x1B[92m█\x1B[0m";

/// Redraws the whole screen on every grid change.
///
/// The grid does not carry a generation number, so the renderer tracks it
/// from the changes it observes.
#[derive(Debug, Default)]
pub struct Renderer {
    generation: u64,
    last_event: String,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer entry point: update state and write a frame to stdout.
    pub fn draw(&mut self, change: &GridChange, grid: &Grid) -> io::Result<()> {
        self.observe(change);
        let mut out = io::stdout().lock();
        out.write_all(self.frame(grid).as_bytes())?;
        out.flush()
    }

    fn observe(&mut self, change: &GridChange) {
        self.last_event = match change {
            GridChange::Advanced(report) => {
                self.generation = report.generation;
                format!("+{} -{}", report.births, report.deaths)
            }
            GridChange::Reset => {
                self.generation = 0;
                "reset".to_string()
            }
            GridChange::Stamped { preset } => {
                self.generation = 0;
                match preset {
                    Some(preset) => format!("stamped {preset}"),
                    None => "stamped pattern".to_string(),
                }
            }
            GridChange::Toggled { row, col, is_alive } => {
                let state = if *is_alive { "alive" } else { "dead" };
                format!("({row}, {col}) {state}")
            }
        };
    }

    /// Build one full frame: header, bordered grid, status line.
    pub fn frame(&self, grid: &Grid) -> String {
        let width = grid.cols();
        let rule = "═".repeat(width.max(40) + 4);
        let border = "─".repeat(width);

        let mut out = String::with_capacity((width + 8) * (grid.rows() + 8));
        out.push_str(CLEAR);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "  Conway's Game of Life - Generation {}", self.generation);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);

        let _ = writeln!(out, "  ┌{border}┐");
        for row in grid.iter_rows() {
            out.push_str("  │");
            for cell in row {
                out.push_str(if cell.is_alive { LIVE } else { " " });
            }
            out.push_str("│\n");
        }
        let _ = writeln!(out, "  └{border}┘");

        let _ = writeln!(
            out,
            "\n  Population: {}  |  {}  |  Ctrl+C to quit",
            grid.population(),
            self.last_event
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegame_core::{LifeGame, Preset};

    #[test]
    fn test_frame_draws_live_cells_inside_border() {
        let mut game = LifeGame::new(4, 4).unwrap();
        game.apply_preset(Preset::Block);

        let mut renderer = Renderer::new();
        renderer.observe(&GridChange::Stamped {
            preset: Some(Preset::Block),
        });
        let frame = renderer.frame(game.grid());

        assert!(frame.starts_with(CLEAR));
        assert!(frame.contains("Generation 0"));
        assert!(frame.contains("  ┌────┐"));
        assert!(frame.contains("  └────┘"));
        assert_eq!(frame.matches(LIVE).count(), 4);
        assert!(frame.contains("Population: 4"));
        assert!(frame.contains("stamped block"));
    }

    #[test]
    fn test_generation_tracks_changes() {
        let mut game = LifeGame::new(3, 3).unwrap();
        let report = game.advance_generation();

        let mut renderer = Renderer::new();
        renderer.observe(&GridChange::Advanced(report));
        assert!(renderer.frame(game.grid()).contains("Generation 1"));

        renderer.observe(&GridChange::Toggled {
            row: 1,
            col: 2,
            is_alive: true,
        });
        let frame = renderer.frame(game.grid());
        assert!(frame.contains("Generation 1"));
        assert!(frame.contains("(1, 2) alive"));

        renderer.observe(&GridChange::Reset);
        assert!(renderer.frame(game.grid()).contains("Generation 0"));
    }
}
