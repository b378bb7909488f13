//! Recycler placement economics.
//!
//! A recycler harvests one scrap per turn from its own tile and each
//! orthogonal neighbor until those tiles exhaust to grass. The two estimates
//! here price a prospective placement before committing matter:
//!
//! - `scrap_to_recycle`: matter the recycler would recover before the tiles
//!   under its range run out. Tiles already covered by a friendly recycler
//!   contribute nothing (the matter is counted once); tiles contested by an
//!   enemy recycler lose one scrap to the race.
//! - `tiles_to_recycle`: how many tiles the placement would turn to grass,
//!   which is the territorial price paid for the matter.
//!
//! Both feed the build allocator's cost/benefit sort.

use crate::game::{Board, CellId, Owner};

/// Matter recovered by building a recycler on `id` before the affected tiles
/// turn to grass. Zero when the cell cannot build.
#[must_use]
pub fn scrap_to_recycle(board: &Board, id: CellId) -> u32 {
    let Some(cell) = board.cell(id) else {
        return 0;
    };
    if !cell.can_build {
        return 0;
    }

    // The recycler dies with its own tile; an already-covered tile has one
    // turn less to live.
    let recycle_turns = cell
        .scrap_amount
        .saturating_sub(u32::from(cell.in_range_of_recycler));

    let mut total = 0u32;
    for harvested in std::iter::once(id).chain(cell.adjacent().iter().copied()) {
        let Some(tile) = board.cell(harvested) else {
            continue;
        };
        let contribution = match adjacent_recycler_owner(board, harvested) {
            Some(Owner::Mine) => 0,
            Some(Owner::Foe) => tile.scrap_amount.saturating_sub(1),
            _ => tile.scrap_amount,
        };
        total += contribution.min(recycle_turns);
    }
    total
}

/// Tiles a recycler built on `id` would consume to grass: the cell itself
/// plus every orthogonal neighbor with positive scrap not exceeding the
/// cell's own (those exhaust no later than the recycler does).
#[must_use]
pub fn tiles_to_recycle(board: &Board, id: CellId) -> u32 {
    let Some(cell) = board.cell(id) else {
        return 0;
    };
    let consumed_neighbors: u32 = cell
        .adjacent()
        .iter()
        .filter(|&&n| {
            board
                .cell(n)
                .is_some_and(|nc| nc.scrap_amount > 0 && nc.scrap_amount <= cell.scrap_amount)
        })
        .map(|_| 1)
        .sum();
    1 + consumed_neighbors
}

/// Owner of a recycler orthogonally adjacent to `id`, friendly first.
fn adjacent_recycler_owner(board: &Board, id: CellId) -> Option<Owner> {
    let cell = board.cell(id)?;
    let mut foe = false;
    for &n in cell.adjacent() {
        if let Some(neighbor) = board.cell(n)
            && neighbor.recycler
        {
            if neighbor.is_mine() {
                return Some(Owner::Mine);
            }
            if neighbor.is_foe() {
                foe = true;
            }
        }
    }
    if foe { Some(Owner::Foe) } else { None }
}
