//! Game layer for Scrapper.
//!
//! Models one side's view of a match:
//! - Cells with received, spawn-relative, and per-turn derived fields
//! - The board arena with flat-index adjacency
//! - Turn snapshots as the only way state enters the system
//! - Recycling economics (harvest yield and tile destruction)
//! - Sanity invariants over the refreshed analytics

mod board;
mod cell;
mod economy;
mod invariants;
mod snapshot;
mod state;

pub use board::{Board, SnapshotError};
pub use cell::{AreaOwner, Cell, CellId, Owner, PrevCell};
pub use economy::{scrap_to_recycle, tiles_to_recycle};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use snapshot::{CellSnapshot, TurnSnapshot};
pub use state::GameState;
