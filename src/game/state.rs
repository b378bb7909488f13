//! Top-level game state: the turn counter, both matter banks, and the board.

use crate::game::{Board, SnapshotError, TurnSnapshot};

/// Everything the engine knows about the game at one point in time.
#[derive(Debug, Clone)]
pub struct GameState {
    turn: u32,
    my_matter: u32,
    opp_matter: u32,
    board: Board,
}

impl GameState {
    /// Create a fresh state over an all-grass board.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        Some(Self {
            turn: 0,
            my_matter: 0,
            opp_matter: 0,
            board: Board::new(width, height)?,
        })
    }

    /// Completed update count. Zero until the first snapshot is applied.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Our matter bank, as last reported minus anything spent this turn.
    #[must_use]
    pub const fn my_matter(&self) -> u32 {
        self.my_matter
    }

    /// The opponent's reported matter bank.
    #[must_use]
    pub const fn opp_matter(&self) -> u32 {
        self.opp_matter
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) const fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Ingest one turn snapshot: bump the turn counter, take the matter
    /// banks, apply the cell grid, and recompute the board analytics.
    ///
    /// # Errors
    ///
    /// Propagates [`SnapshotError`] from the board. The turn counter has
    /// already advanced when that happens and the board may hold a partial
    /// update; callers should treat the state as unusable.
    pub fn update(&mut self, snapshot: &TurnSnapshot) -> Result<(), SnapshotError> {
        self.turn += 1;
        self.my_matter = snapshot.my_matter;
        self.opp_matter = snapshot.opp_matter;
        self.board.apply_snapshot(snapshot)?;
        self.board.refresh_analytics();
        Ok(())
    }

    /// Deduct `amount` from our matter bank if it is covered.
    ///
    /// Returns `false`, leaving the bank untouched, when the bank is short.
    pub fn try_spend(&mut self, amount: u32) -> bool {
        if self.my_matter >= amount {
            self.my_matter -= amount;
            true
        } else {
            false
        }
    }
}
