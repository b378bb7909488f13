//! Deterministic scenario generation for validation runs and benchmarks.
//!
//! A scenario is a single turn snapshot on a mirror-symmetric board: the
//! right half is the left half reflected, with ownership flipped. That is
//! how the arena lays out real matches, and it keeps generated boards fair
//! by construction.

// Coordinate and RNG conversions use intentional casts
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::game::{CellSnapshot, Owner, TurnSnapshot};

/// Matter each side holds on the first turn.
const STARTING_MATTER: u32 = 10;

/// Fraction of cells turned to grass by the noise pass.
const GRASS_RATIO: f64 = 0.12;

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate random u32 in [0, max).
    fn next_u32(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(max)) as u32
    }

    /// Generate random f64 in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }
}

/// Error type for scenario generation.
#[derive(Debug, Clone)]
pub struct ScenarioError {
    /// Description of the error.
    pub reason: String,
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scenario generation error: {}", self.reason)
    }
}

impl std::error::Error for ScenarioError {}

/// Generate one first-turn snapshot on a mirror-symmetric board.
///
/// The left half gets random scrap and grass, one spawn, and a handful of
/// starting units; the right half is its reflection with ownership flipped.
/// The result always passes snapshot ingestion: both spawns are unique
/// owned cells with zero units.
///
/// # Errors
///
/// Returns an error when the grid is too small to hold two separated
/// spawns (width below 4 or height of 0).
pub fn generate_scenario(
    seed: u64,
    width: u16,
    height: u16,
) -> Result<TurnSnapshot, ScenarioError> {
    if width < 4 {
        return Err(ScenarioError {
            reason: format!("width must be at least 4, got {width}"),
        });
    }
    if height == 0 {
        return Err(ScenarioError {
            reason: "height must be positive".to_owned(),
        });
    }

    let mut rng = Rng::new(seed);
    let mut snapshot = TurnSnapshot::empty(width, height);
    snapshot.my_matter = STARTING_MATTER;
    snapshot.opp_matter = STARTING_MATTER;

    scatter_scrap(&mut snapshot, &mut rng);
    let spawn = place_spawn_area(&mut snapshot, &mut rng);
    mirror_left_half(&mut snapshot);
    grant_permissions(&mut snapshot);

    debug_assert!(spawn.0 < width / 2);
    Ok(snapshot)
}

/// Generate a short match: successive snapshots of the same scenario with
/// the matter banks growing by the base income every turn.
///
/// # Errors
///
/// Same conditions as [`generate_scenario`].
pub fn generate_match(
    seed: u64,
    width: u16,
    height: u16,
    turns: u32,
) -> Result<Vec<TurnSnapshot>, ScenarioError> {
    let base = generate_scenario(seed, width, height)?;
    let mut snapshots = Vec::new();
    for turn in 0..turns {
        let mut snapshot = base.clone();
        snapshot.my_matter = STARTING_MATTER + STARTING_MATTER * turn;
        snapshot.opp_matter = snapshot.my_matter;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

/// Fill the left half with random scrap, then cut grass on a noise pass.
fn scatter_scrap(snapshot: &mut TurnSnapshot, rng: &mut Rng) {
    let width = snapshot.width;
    let height = snapshot.height;
    for y in 0..height {
        for x in 0..width.div_ceil(2) {
            let scrap = 1 + rng.next_u32(10);
            let cell = if rng.next_f64() < GRASS_RATIO {
                CellSnapshot::grass()
            } else {
                CellSnapshot::neutral(scrap)
            };
            snapshot.set(x, y, cell);
        }
    }
}

/// Drop our spawn in the left quarter and seed units around it.
///
/// The spawn cell and its orthogonal neighbors are forced back to scrap so
/// the opening position is never walled in. Neighbors in the left half
/// become owned cells with one unit each; the spawn itself stays empty,
/// which is what makes it recognizable as a spawn.
fn place_spawn_area(snapshot: &mut TurnSnapshot, rng: &mut Rng) -> (u16, u16) {
    let width = snapshot.width;
    let height = snapshot.height;
    let spawn_x = 1 + rng.next_u32(u32::from(width / 4).max(1)) as u16;
    let spawn_y = rng.next_u32(u32::from(height)) as u16;
    snapshot.set(spawn_x, spawn_y, CellSnapshot::owned(Owner::Mine, 5, 0));

    let neighbors = [
        (spawn_x.wrapping_sub(1), spawn_y),
        (spawn_x + 1, spawn_y),
        (spawn_x, spawn_y.wrapping_sub(1)),
        (spawn_x, spawn_y + 1),
    ];
    for (x, y) in neighbors {
        if x >= width || y >= height {
            continue;
        }
        // Only claim cells that stay in the left half after mirroring.
        if usize::from(x) < usize::from(width) - 1 - usize::from(x) {
            snapshot.set(x, y, CellSnapshot::owned(Owner::Mine, 5, 1));
        } else {
            snapshot.set(x, y, CellSnapshot::neutral(5));
        }
    }
    (spawn_x, spawn_y)
}

/// Reflect the left half onto the right, flipping ownership.
fn mirror_left_half(snapshot: &mut TurnSnapshot) {
    let width = snapshot.width;
    let height = snapshot.height;
    for y in 0..height {
        for x in 0..width / 2 {
            let mirrored_x = width - 1 - x;
            if let Some(mut cell) = snapshot.cell(x, y).copied() {
                cell.owner = match cell.owner {
                    Owner::Mine => Owner::Foe,
                    Owner::Foe => Owner::Mine,
                    Owner::Neutral => Owner::Neutral,
                };
                snapshot.set(mirrored_x, y, cell);
            }
        }
    }
}

/// Mark what the arena would let us do on the opening turn: spawn on any
/// owned working tile, build where no unit is parked. Opponent cells never
/// carry permission bits on our side of the wire.
fn grant_permissions(snapshot: &mut TurnSnapshot) {
    for cell in &mut snapshot.cells {
        if cell.owner == Owner::Mine && !cell.recycler && cell.scrap_amount > 0 {
            cell.can_spawn = true;
            cell.can_build = cell.units == 0;
        }
    }
}
