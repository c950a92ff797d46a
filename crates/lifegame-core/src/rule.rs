//! Transition rules for cell evolution.
//!
//! A rule maps a cell's current liveness and its live-neighbor count to its
//! liveness in the next generation. The engine applies it to every cell at
//! once.

use std::fmt;

/// A rule that decides a cell's next state from local context.
pub trait Rule: Send + Sync {
    /// Short identifier, e.g. `"B3/S23"`.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Liveness in the next generation.
    fn next_state(&self, alive: bool, live_neighbors: u8) -> bool;
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name()).finish()
    }
}

/// Conway's Game of Life (B3/S23).
///
/// - Live cell with 0-1 live neighbors dies (underpopulation)
/// - Live cell with 2-3 live neighbors survives
/// - Live cell with 4+ live neighbors dies (overpopulation)
/// - Dead cell with exactly 3 live neighbors is born
#[derive(Debug, Default, Clone, Copy)]
pub struct ConwayRule;

impl Rule for ConwayRule {
    fn name(&self) -> &str {
        "B3/S23"
    }

    fn description(&self) -> &str {
        "Conway's Game of Life: survive with 2-3 neighbors, born with exactly 3"
    }

    fn next_state(&self, alive: bool, live_neighbors: u8) -> bool {
        matches!((alive, live_neighbors), (true, 2) | (true, 3) | (false, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underpopulation() {
        assert!(!ConwayRule.next_state(true, 0));
        assert!(!ConwayRule.next_state(true, 1));
    }

    #[test]
    fn test_survival() {
        assert!(ConwayRule.next_state(true, 2));
        assert!(ConwayRule.next_state(true, 3));
    }

    #[test]
    fn test_overpopulation() {
        for n in 4..=8 {
            assert!(!ConwayRule.next_state(true, n), "alive with {n} neighbors");
        }
    }

    #[test]
    fn test_birth_only_on_three() {
        for n in 0..=8 {
            assert_eq!(ConwayRule.next_state(false, n), n == 3, "dead with {n} neighbors");
        }
    }
}
