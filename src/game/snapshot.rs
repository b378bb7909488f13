//! Raw per-turn input records, as handed over by the arena.

// Four of the seven wire fields are flags
#![allow(clippy::struct_excessive_bools)]

use crate::game::Owner;

/// Received state of one cell, straight off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellSnapshot {
    /// Scrap remaining; 0 means grass.
    pub scrap_amount: u32,
    /// Cell owner.
    pub owner: Owner,
    /// Unit stack on the cell.
    pub units: u32,
    /// Recycler present.
    pub recycler: bool,
    /// We may build here this turn.
    pub can_build: bool,
    /// We may spawn here this turn.
    pub can_spawn: bool,
    /// An active recycler is consuming this cell.
    pub in_range_of_recycler: bool,
}

impl CellSnapshot {
    /// An exhausted, unclaimed cell.
    #[must_use]
    pub const fn grass() -> Self {
        Self {
            scrap_amount: 0,
            owner: Owner::Neutral,
            units: 0,
            recycler: false,
            can_build: false,
            can_spawn: false,
            in_range_of_recycler: false,
        }
    }

    /// An unclaimed cell with the given scrap.
    #[must_use]
    pub const fn neutral(scrap_amount: u32) -> Self {
        Self {
            scrap_amount,
            owner: Owner::Neutral,
            ..Self::grass()
        }
    }

    /// An owned cell with the given scrap and unit stack.
    #[must_use]
    pub const fn owned(owner: Owner, scrap_amount: u32, units: u32) -> Self {
        Self {
            scrap_amount,
            owner,
            units,
            ..Self::grass()
        }
    }
}

/// One full turn of input: both matter pools plus every cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TurnSnapshot {
    /// Our matter pool.
    pub my_matter: u32,
    /// The opponent's matter pool.
    pub opp_matter: u32,
    /// Board width.
    pub width: u16,
    /// Board height.
    pub height: u16,
    /// Cells in row-major order (`y * width + x`).
    pub cells: Vec<CellSnapshot>,
}

impl TurnSnapshot {
    /// A snapshot of all-grass cells with empty matter pools.
    #[must_use]
    pub fn empty(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            my_matter: 0,
            opp_matter: 0,
            width,
            height,
            cells: vec![CellSnapshot::grass(); size],
        }
    }

    /// Get the cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<&CellSnapshot> {
        if x < self.width && y < self.height {
            self.cells
                .get(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Get the cell at `(x, y)` mutably, or `None` when out of bounds.
    #[must_use]
    pub fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut CellSnapshot> {
        if x < self.width && y < self.height {
            let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Set the cell at `(x, y)`.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: CellSnapshot) -> bool {
        if let Some(slot) = self.cell_mut(x, y) {
            *slot = cell;
            true
        } else {
            false
        }
    }
}
