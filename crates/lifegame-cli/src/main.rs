//! `life` - Conway's Game of Life in the terminal.
//!
//! Stamps a still life (or a pattern file) onto a bounded grid and steps it
//! at a fixed delay until Ctrl+C or a generation limit.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use lifegame_core::{GridChange, LifeConfig, LifeGame, Pattern, StartPattern, Ticker};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Notify;
use tracing::{error, info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;

mod render;
mod settings;

use render::Renderer;
use settings::Overrides;

/// Conway's Game of Life on a bounded grid.
///
/// Settings come from `life.toml`, then `LIFE_*` environment variables,
/// then these flags.
#[derive(Parser, Debug)]
#[command(
    name = "life",
    author,
    version,
    about = "Conway's Game of Life in the terminal",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Path to a config file (defaults to ./life.toml, then the user config dir).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of grid rows.
    #[arg(long)]
    rows: Option<usize>,

    /// Number of grid columns.
    #[arg(long)]
    cols: Option<usize>,

    /// Milliseconds between generations.
    #[arg(short, long = "delay-ms", value_name = "MS")]
    delay_ms: Option<u64>,

    /// Starting pattern: random, blank, block, boat, beehive, loaf, pond or mosaic.
    #[arg(short, long)]
    preset: Option<StartPattern>,

    /// Plain-text pattern to stamp instead of a preset (`#`/`O` alive, `.` dead).
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pattern_file: Option<PathBuf>,

    /// Seed for random preset selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many generations (0 runs until Ctrl+C).
    #[arg(short, long, default_value_t = 0)]
    generations: u64,

    /// Flip a cell before the first generation. Repeatable.
    #[arg(short, long = "toggle", value_name = "ROW,COL", value_parser = parse_cell)]
    toggles: Vec<(usize, usize)>,

    /// Print the final grid as JSON on exit.
    #[arg(long)]
    dump_json: bool,

    /// Do not draw frames (useful with --dump-json).
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            rows: self.rows,
            cols: self.cols,
            delay_ms: self.delay_ms,
            preset: self.preset,
            seed: self.seed,
        }
    }
}

fn parse_cell(s: &str) -> Result<(usize, usize), String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got '{s}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("invalid row '{row}': {e}"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{col}': {e}"))?;
    Ok((row, col))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // Frames go to stdout; keep logs off it.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = settings::resolve(cli.config.as_deref(), &cli.overrides())?;
    info!(
        rows = config.grid.rows,
        cols = config.grid.cols,
        delay_ms = config.ticker.delay_ms,
        start = %config.start.preset,
        "life_starting"
    );

    let mut game = LifeGame::new(config.grid.rows, config.grid.cols)?;
    let done = Arc::new(Notify::new());

    let limit = cli.generations;
    let finished = Arc::clone(&done);
    let mut renderer = (!cli.headless).then(Renderer::new);
    game.subscribe(move |change, grid| {
        if let Some(renderer) = renderer.as_mut() {
            if let Err(e) = renderer.draw(change, grid) {
                warn!(error = %e, "render_failed");
            }
        }
        if let GridChange::Advanced(report) = change {
            if limit > 0 && report.generation >= limit {
                finished.notify_one();
            }
        }
    });

    seed_grid(&mut game, &config, cli.pattern_file.as_deref())?;
    for &(row, col) in &cli.toggles {
        game.toggle_cell(row, col)
            .with_context(|| format!("Cannot toggle {row},{col}"))?;
    }

    let game = Arc::new(Mutex::new(game));
    let mut ticker = Ticker::new(config.delay())?;

    let stepping = Arc::clone(&game);
    ticker.start(move || match stepping.lock() {
        Ok(mut game) => {
            step_within_limit(&mut game, limit);
        }
        Err(e) => error!(error = %e, "game_lock_poisoned"),
    });

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            info!("interrupted");
        }
        _ = done.notified() => {
            info!(generations = limit, "generation_limit_reached");
        }
    }
    ticker.stop();

    let game = game.lock().map_err(|_| anyhow!("Game state poisoned"))?;
    info!(
        generation = game.generation(),
        population = game.population(),
        "life_finished"
    );

    if cli.dump_json {
        println!("{}", serde_json::to_string_pretty(game.grid())?);
    }

    Ok(())
}

/// Advance one generation unless `limit` (0 = unlimited) is already reached.
///
/// Ticks that land between reaching the limit and the ticker being stopped
/// leave the grid alone.
fn step_within_limit(game: &mut LifeGame, limit: u64) -> bool {
    if limit > 0 && game.generation() >= limit {
        return false;
    }
    game.advance_generation();
    true
}

/// Put the configured starting contents on the grid.
fn seed_grid(game: &mut LifeGame, config: &LifeConfig, pattern_file: Option<&Path>) -> Result<()> {
    if let Some(path) = pattern_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
        let pattern = Pattern::parse(&text)
            .with_context(|| format!("Failed to parse pattern file {}", path.display()))?;
        game.stamp_pattern(&pattern);
        return Ok(());
    }

    match config.start.preset {
        StartPattern::Random => {
            let mut rng = match config.start.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let preset = game.stamp_preset(&mut rng);
            info!(%preset, seed = ?config.start.seed, "random_preset_selected");
        }
        StartPattern::Blank => game.reset(),
        StartPattern::Preset(preset) => game.apply_preset(preset),
    }
    Ok(())
}
