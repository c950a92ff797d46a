//! Integration tests for lifegame-core: whole-engine behavior through the public API.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lifegame_core::{
    GridChange, LifeConfig, LifeError, LifeGame, Pattern, Preset, StartPattern, Ticker,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Helpers
// ============================================================================

fn game_from_rows(rows: usize, cols: usize, dots: &[&[u8]]) -> LifeGame {
    let mut game = LifeGame::new(rows, cols).unwrap();
    game.stamp_pattern(&Pattern::from_rows(dots).unwrap());
    game
}

/// A game with one cell at (2, 2) and `n` of its neighbors alive.
fn cell_with_neighbors(alive: bool, n: usize) -> LifeGame {
    const RING: [(usize, usize); 8] = [
        (1, 1),
        (1, 2),
        (1, 3),
        (2, 1),
        (2, 3),
        (3, 1),
        (3, 2),
        (3, 3),
    ];

    let mut game = LifeGame::new(5, 5).unwrap();
    if alive {
        game.toggle_cell(2, 2).unwrap();
    }
    for &(r, c) in RING.iter().take(n) {
        game.toggle_cell(r, c).unwrap();
    }
    game
}

fn preset_grid_sets(rows: usize, cols: usize) -> Vec<Vec<(usize, usize)>> {
    Preset::ALL
        .iter()
        .map(|&p| {
            let mut game = LifeGame::new(rows, cols).unwrap();
            game.apply_preset(p);
            game.grid().live_cells()
        })
        .collect()
}

// ============================================================================
// Transition rule
// ============================================================================

#[test]
fn test_advance_preserves_dimensions() {
    for (rows, cols) in [(1, 1), (1, 9), (7, 1), (13, 13), (20, 31)] {
        let mut game = LifeGame::new(rows, cols).unwrap();
        let mut rng = StdRng::seed_from_u64(rows as u64 * 100 + cols as u64);
        game.stamp_preset(&mut rng);
        for _ in 0..3 {
            game.advance_generation();
            assert_eq!(game.grid().dimensions(), (rows, cols));
        }
    }
}

#[test]
fn test_birth_with_three_neighbors() {
    let mut game = cell_with_neighbors(false, 3);
    game.advance_generation();
    assert!(game.grid().is_alive(2, 2));
}

#[test]
fn test_survival_with_two_or_three_neighbors() {
    for n in [2, 3] {
        let mut game = cell_with_neighbors(true, n);
        game.advance_generation();
        assert!(game.grid().is_alive(2, 2), "alive with {n} neighbors");
    }
}

#[test]
fn test_underpopulation() {
    for n in [0, 1] {
        let mut game = cell_with_neighbors(true, n);
        game.advance_generation();
        assert!(!game.grid().is_alive(2, 2), "alive with {n} neighbors");
    }
}

#[test]
fn test_overpopulation() {
    for n in 4..=8 {
        let mut game = cell_with_neighbors(true, n);
        game.advance_generation();
        assert!(!game.grid().is_alive(2, 2), "alive with {n} neighbors");
    }
}

#[test]
fn test_dead_cell_without_three_stays_dead() {
    for n in [0, 1, 2, 4, 5, 6, 7, 8] {
        let mut game = cell_with_neighbors(false, n);
        game.advance_generation();
        assert!(!game.grid().is_alive(2, 2), "dead with {n} neighbors");
    }
}

#[test]
fn test_glider_settles_in_corner_without_wrapping() {
    // Glider heading for the bottom-right corner of a small board.
    let mut game = game_from_rows(6, 6, &[&[0, 1, 0], &[0, 0, 1], &[1, 1, 1]]);
    for _ in 0..40 {
        game.advance_generation();
    }

    // On a torus the glider would keep travelling; bounded, it settles into a block.
    assert_eq!(game.grid().live_cells(), vec![(4, 4), (4, 5), (5, 4), (5, 5)]);
}

// ============================================================================
// Presets
// ============================================================================

#[test]
fn test_all_presets_are_still_lifes() {
    for preset in Preset::ALL {
        let mut game = LifeGame::new(16, 16).unwrap();
        game.apply_preset(preset);
        let before = game.grid().live_cells();

        let report = game.advance_generation();
        assert_eq!(game.grid().live_cells(), before, "{preset} changed");
        assert!(report.is_still(), "{preset} reported changes");
    }
}

#[test]
fn test_block_scenario_on_four_by_four() {
    let mut game = game_from_rows(
        4,
        4,
        &[&[0, 0, 0, 0], &[0, 1, 1, 0], &[0, 1, 1, 0], &[0, 0, 0, 0]],
    );
    let before = game.grid().live_cells();
    game.advance_generation();
    assert_eq!(game.grid().live_cells(), before);
}

#[test]
fn test_three_cell_corner_grows_into_block() {
    // The L-shaped triomino is not stable: its open corner is born.
    let mut game = game_from_rows(
        4,
        4,
        &[&[0, 0, 0, 0], &[0, 1, 1, 0], &[0, 0, 1, 0], &[0, 0, 0, 0]],
    );
    game.advance_generation();
    assert_eq!(game.grid().live_cells(), Preset::Block.pattern().live_cells());
}

#[test]
fn test_stamp_preset_matches_one_known_pattern() {
    let known = preset_grid_sets(20, 20);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut game = LifeGame::new(20, 20).unwrap();

    for _ in 0..50 {
        // Dirty the grid so stamping must blank it.
        game.toggle_cell(19, 19).unwrap();
        game.toggle_cell(0, 19).unwrap();

        let preset = game.stamp_preset(&mut rng);
        let live = game.grid().live_cells();

        let matches = known.iter().filter(|set| **set == live).count();
        assert_eq!(matches, 1);
        assert_eq!(live, preset.pattern().live_cells());
    }
}

#[test]
fn test_stamp_preset_is_roughly_uniform() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut game = LifeGame::new(13, 13).unwrap();
    let mut counts = [0usize; 6];

    for _ in 0..6000 {
        let preset = game.stamp_preset(&mut rng);
        let idx = Preset::ALL.iter().position(|p| *p == preset).unwrap();
        counts[idx] += 1;
    }

    for (preset, count) in Preset::ALL.iter().zip(counts) {
        assert!((800..=1200).contains(&count), "{preset} chosen {count} times");
    }
}

#[test]
fn test_mosaic_is_clipped_on_small_grid() {
    let mut game = LifeGame::new(5, 5).unwrap();
    game.apply_preset(Preset::Mosaic);
    assert_eq!(game.grid().dimensions(), (5, 5));
    assert_eq!(
        game.grid().live_cells(),
        vec![(1, 1), (1, 2), (1, 4), (2, 1), (2, 2), (2, 4), (4, 1), (4, 2), (4, 4)]
    );
}

// ============================================================================
// Reset, toggle, stamp
// ============================================================================

#[test]
fn test_reset_kills_everything() {
    let mut game = LifeGame::new(13, 13).unwrap();
    game.apply_preset(Preset::Mosaic);
    assert!(game.population() > 0);

    game.reset();
    assert_eq!(game.grid().dimensions(), (13, 13));
    assert!(game
        .grid()
        .iter_rows()
        .all(|row| row.iter().all(|cell| !cell.is_alive)));
}

#[test]
fn test_toggle_twice_restores_and_touches_only_target() {
    let mut game = LifeGame::new(8, 8).unwrap();
    game.apply_preset(Preset::Pond);
    let original = game.grid().clone();

    assert!(game.toggle_cell(5, 6).unwrap());
    for (r, row) in game.grid().iter_rows().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if (r, c) != (5, 6) {
                assert_eq!(*cell, original.get(r, c).unwrap());
            }
        }
    }

    assert!(!game.toggle_cell(5, 6).unwrap());
    assert_eq!(game.grid(), &original);
}

#[test]
fn test_toggle_out_of_bounds_is_an_error() {
    let mut game = LifeGame::new(3, 4).unwrap();
    let err = game.toggle_cell(1, 4).unwrap_err();
    assert!(matches!(
        err,
        LifeError::OutOfBounds {
            row: 1,
            col: 4,
            rows: 3,
            cols: 4
        }
    ));
    assert_eq!(err.to_string(), "cell (1, 4) is outside the 3x4 grid");
}

#[test]
fn test_stamp_pattern_overwrites_whole_grid() {
    let mut game = LifeGame::new(6, 6).unwrap();
    game.toggle_cell(5, 5).unwrap();
    game.stamp_pattern(&Pattern::from_rows(&[&[1u8, 0][..], &[0, 1][..]]).unwrap());
    assert_eq!(game.grid().live_cells(), vec![(0, 0), (1, 1)]);
}

#[test]
fn test_pattern_from_grid_round_trip() {
    let mut game = LifeGame::new(9, 9).unwrap();
    game.apply_preset(Preset::Loaf);
    let captured = Pattern::from_grid(game.grid());

    let mut copy = LifeGame::new(9, 9).unwrap();
    copy.stamp_pattern(&captured);
    assert_eq!(copy.grid(), game.grid());
}

#[test]
fn test_construction_rejects_empty_grid() {
    assert!(matches!(
        LifeGame::new(0, 5),
        Err(LifeError::InvalidDimensions { rows: 0, cols: 5 })
    ));
}

#[test]
fn test_grid_serializes_for_renderers() {
    let mut game = LifeGame::new(2, 2).unwrap();
    game.toggle_cell(0, 1).unwrap();

    let json = serde_json::to_value(game.grid()).unwrap();
    assert_eq!(json["rows"], 2);
    assert_eq!(json["cols"], 2);
    assert_eq!(json["cells"][0][1]["is_alive"], true);
    assert_eq!(json["cells"][1][1]["is_alive"], false);
}

#[test]
fn test_config_drives_construction() {
    let config = LifeConfig::from_toml_str(
        "[grid]\nrows = 10\ncols = 12\n[start]\npreset = \"boat\"\n",
    )
    .unwrap();

    let mut game = LifeGame::new(config.grid.rows, config.grid.cols).unwrap();
    match config.start.preset {
        StartPattern::Preset(p) => game.apply_preset(p),
        other => panic!("unexpected start pattern {other}"),
    }
    assert_eq!(game.grid().live_cells(), Preset::Boat.pattern().live_cells());
}

// ============================================================================
// Ticker driving the engine
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_ticker_advances_shared_game() {
    let game = Arc::new(Mutex::new(LifeGame::new(5, 5).unwrap()));
    {
        let mut g = game.lock().unwrap();
        g.stamp_pattern(&Pattern::parse(".....\n.....\n.###.\n").unwrap());
    }

    let mut ticker = Ticker::new(Duration::from_millis(50)).unwrap();
    let stepping = Arc::clone(&game);
    ticker.start(move || {
        stepping.lock().unwrap().advance_generation();
    });

    tokio::time::sleep(Duration::from_millis(175)).await;
    ticker.stop();
    tokio::time::sleep(Duration::from_millis(500)).await;

    let g = game.lock().unwrap();
    assert_eq!(g.generation(), 3);
    // Blinker has period 2: after three generations it is vertical.
    assert_eq!(g.grid().live_cells(), vec![(1, 2), (2, 2), (3, 2)]);
}

#[tokio::test(start_paused = true)]
async fn test_observer_sees_ticker_generations() {
    let last_generation = Arc::new(AtomicU64::new(0));
    let seen: Arc<Mutex<HashSet<u64>>> = Arc::new(Mutex::new(HashSet::new()));

    let mut game = LifeGame::new(4, 4).unwrap();
    let last = Arc::clone(&last_generation);
    let sink = Arc::clone(&seen);
    game.subscribe(move |change, _grid| {
        if let GridChange::Advanced(report) = change {
            last.store(report.generation, Ordering::SeqCst);
            sink.lock().unwrap().insert(report.generation);
        }
    });

    let game = Arc::new(Mutex::new(game));
    let mut ticker = Ticker::new(Duration::from_millis(10)).unwrap();
    let stepping = Arc::clone(&game);
    ticker.start(move || {
        stepping.lock().unwrap().advance_generation();
    });

    tokio::time::sleep(Duration::from_millis(45)).await;
    ticker.stop();

    assert_eq!(last_generation.load(Ordering::SeqCst), 4);
    assert_eq!(seen.lock().unwrap().len(), 4);
}
