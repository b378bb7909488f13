//! Board invariants - sanity checks that detect bugs.
//!
//! Every one of these holds by construction after a snapshot is applied and
//! the analytics are refreshed. If one trips, the refresh logic or an engine
//! commit has a bug, not the incoming data (with one exception: units
//! standing on grass can only come from a malformed snapshot).

use crate::game::{Cell, GameState};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
/// These are bug detectors, not gameplay limits.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = state.board();

    for (_, cell) in board.iter() {
        check_cell(cell, &mut violations);
    }

    // The three border sets must agree with the per-cell flags.
    let set_and_flags = [
        ("inner border", board.inner_border(), board.cells().iter().filter(|c| c.inner_border).count()),
        ("outer border", board.outer_border(), board.cells().iter().filter(|c| c.outer_border).count()),
        ("warzone", board.warzone(), board.cells().iter().filter(|c| c.warzone).count()),
    ];
    for (name, set, flagged) in set_and_flags {
        if set.len() != flagged {
            violations.push(InvariantViolation {
                message: format!("{name} set has {} entries but {flagged} cells are flagged", set.len()),
            });
        }
    }

    // Warzone cells are always inner border cells as well.
    for &id in board.warzone() {
        if !board.inner_border().contains(&id) {
            violations.push(InvariantViolation {
                message: format!("Warzone cell {id} is missing from the inner border set"),
            });
        }
    }

    violations
}

/// Per-cell structural checks.
fn check_cell(cell: &Cell, violations: &mut Vec<InvariantViolation>) {
    let at = (cell.x, cell.y);

    if cell.is_grass() && cell.can_move_here {
        violations.push(InvariantViolation {
            message: format!("Grass at {at:?} is marked movable"),
        });
    }
    if cell.recycler && cell.can_move_here {
        violations.push(InvariantViolation {
            message: format!("Recycler at {at:?} is marked movable"),
        });
    }
    if cell.is_grass() && cell.units > 0 {
        violations.push(InvariantViolation {
            message: format!("Grass at {at:?} carries {} units", cell.units),
        });
    }
    if !(0.0..=1.0).contains(&cell.traffic_coef) {
        violations.push(InvariantViolation {
            message: format!("Traffic coefficient {} at {at:?} is outside [0, 1]", cell.traffic_coef),
        });
    }
    if !(0.0..=1.0).contains(&cell.distance_coef) {
        violations.push(InvariantViolation {
            message: format!("Distance coefficient {} at {at:?} is outside [0, 1]", cell.distance_coef),
        });
    }
    if !(0.0..=1.0).contains(&cell.normalized_my_spawn)
        || !(0.0..=1.0).contains(&cell.normalized_opp_spawn)
    {
        violations.push(InvariantViolation {
            message: format!("Normalized spawn distance at {at:?} is outside [0, 1]"),
        });
    }
    if cell.attacked_max_stack > cell.attacked {
        violations.push(InvariantViolation {
            message: format!(
                "Largest adjacent stack {} at {at:?} exceeds total threat {}",
                cell.attacked_max_stack, cell.attacked
            ),
        });
    }
    if cell.inner_border && cell.outer_border {
        violations.push(InvariantViolation {
            message: format!("Cell at {at:?} sits on both the inner and outer border"),
        });
    }
    if cell.warzone && !cell.inner_border {
        violations.push(InvariantViolation {
            message: format!("Warzone cell at {at:?} is not on the inner border"),
        });
    }
    if cell.inner_border && !cell.is_mine() {
        violations.push(InvariantViolation {
            message: format!("Inner border cell at {at:?} is not ours"),
        });
    }
    if cell.outer_border && cell.is_mine() {
        violations.push(InvariantViolation {
            message: format!("Outer border cell at {at:?} is ours"),
        });
    }
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
