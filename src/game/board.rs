//! Board arena: adjacency wiring, snapshot application, derived analytics.
//!
//! Cells live in one flat row-major `Vec` and reference each other by
//! `CellId` index, never by pointer. Adjacency is wired once at construction
//! and never changes; everything else is overwritten or recomputed per turn.

use crate::game::{economy, AreaOwner, Cell, CellId, Owner, PrevCell, TurnSnapshot};

/// Error applying a turn snapshot to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// The snapshot's dimensions differ from the board's.
    GridMismatch {
        /// Board dimensions.
        expected: (u16, u16),
        /// Snapshot dimensions.
        received: (u16, u16),
    },
    /// No owned zero-unit cell to anchor a player's spawn.
    MissingSpawn {
        /// The player whose spawn could not be located.
        owner: Owner,
    },
    /// More than one owned zero-unit cell for a player; the spawn cannot be
    /// identified.
    AmbiguousSpawn {
        /// The player whose spawn is ambiguous.
        owner: Owner,
        /// How many candidate cells were found.
        count: usize,
    },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GridMismatch { expected, received } => write!(
                f,
                "snapshot is {}x{} but the board is {}x{}",
                received.0, received.1, expected.0, expected.1
            ),
            Self::MissingSpawn { owner } => {
                write!(f, "no zero-unit cell owned by {owner:?} to anchor its spawn")
            }
            Self::AmbiguousSpawn { owner, count } => {
                write!(f, "{count} zero-unit cells owned by {owner:?}; spawn is ambiguous")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Neighbor-derived per-turn figures, staged before write-back.
#[derive(Debug, Clone, Copy, Default)]
struct ThreatScratch {
    attacked: u32,
    max_stack: u32,
    uncaptured: u32,
}

/// The game board.
#[derive(Debug, Clone)]
pub struct Board {
    width: u16,
    height: u16,
    /// Cells in row-major order.
    cells: Vec<Cell>,
    /// Received fields as of the previous snapshot, same indexing.
    prev: Vec<PrevCell>,
    inner_border: Vec<CellId>,
    outer_border: Vec<CellId>,
    warzone: Vec<CellId>,
    /// Set after the one-time spawn pass on the first snapshot.
    spawns_fixed: bool,
    my_spawn: Option<CellId>,
    opp_spawn: Option<CellId>,
}

impl Board {
    /// Create a board of all-grass cells with adjacency wired.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        let mut cells = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(x, y));
            }
        }

        let mut board = Self {
            width,
            height,
            cells,
            prev: vec![PrevCell::default(); size],
            inner_border: Vec::new(),
            outer_border: Vec::new(),
            warzone: Vec::new(),
            spawns_fixed: false,
            my_spawn: None,
            opp_spawn: None,
        };
        board.wire_structure();
        Some(board)
    }

    /// Board width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Board height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// All cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flat id of the cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn id_at(&self, x: u16, y: u16) -> Option<CellId> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// The cell with the given id.
    #[must_use]
    #[inline]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Mutable access for the decision engine's commit counters.
    #[must_use]
    #[inline]
    pub(crate) fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    /// Received fields of the cell as of the previous snapshot.
    #[must_use]
    pub fn previous(&self, id: CellId) -> Option<&PrevCell> {
        self.prev.get(id)
    }

    /// Iterate over all cells with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate()
    }

    /// Our spawn cell, known after the first snapshot.
    #[must_use]
    pub const fn my_spawn(&self) -> Option<CellId> {
        self.my_spawn
    }

    /// The opponent's spawn cell, known after the first snapshot.
    #[must_use]
    pub const fn opp_spawn(&self) -> Option<CellId> {
        self.opp_spawn
    }

    /// Mine, movable cells with a movable non-mine orthogonal neighbor.
    #[must_use]
    pub fn inner_border(&self) -> &[CellId] {
        &self.inner_border
    }

    /// Not-mine, movable cells with a movable mine orthogonal neighbor.
    #[must_use]
    pub fn outer_border(&self) -> &[CellId] {
        &self.outer_border
    }

    /// Mine, movable cells with a movable foe orthogonal neighbor. Always a
    /// subset of the inner border.
    #[must_use]
    pub fn warzone(&self) -> &[CellId] {
        &self.warzone
    }

    /// Overwrite every cell's received fields from the snapshot, retaining
    /// the prior values in the previous-turn grid.
    ///
    /// The first snapshot additionally runs the one-time spawn pass: it
    /// locates each player's spawn (the unique owned cell with zero units)
    /// and floods raw Manhattan distances, their normalized forms, the area
    /// owner, and the positional bias to every cell. Those fields never
    /// change afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::GridMismatch`] when the snapshot's dimensions
    /// differ from the board's, and [`SnapshotError::MissingSpawn`] or
    /// [`SnapshotError::AmbiguousSpawn`] when the first snapshot does not
    /// pin down both spawn cells.
    pub fn apply_snapshot(&mut self, snapshot: &TurnSnapshot) -> Result<(), SnapshotError> {
        if snapshot.width != self.width || snapshot.height != self.height {
            return Err(SnapshotError::GridMismatch {
                expected: (self.width, self.height),
                received: (snapshot.width, snapshot.height),
            });
        }

        let first = !self.spawns_fixed;
        if first {
            // No previous turn exists yet.
            for prev in &mut self.prev {
                *prev = PrevCell::default();
            }
        } else {
            for (prev, cell) in self.prev.iter_mut().zip(&self.cells) {
                *prev = PrevCell {
                    scrap_amount: cell.scrap_amount,
                    owner: Some(cell.owner),
                    units: cell.units,
                    recycler: cell.recycler,
                };
            }
        }

        for (cell, received) in self.cells.iter_mut().zip(&snapshot.cells) {
            cell.scrap_amount = received.scrap_amount;
            cell.owner = received.owner;
            cell.units = received.units;
            cell.recycler = received.recycler;
            cell.can_build = received.can_build;
            cell.can_spawn = received.can_spawn;
            cell.in_range_of_recycler = received.in_range_of_recycler;
        }

        if first {
            self.compute_spawn_fields()?;
            self.spawns_fixed = true;
        }
        Ok(())
    }

    /// Recompute every per-turn derived field and the three border sets.
    ///
    /// Must be called after each [`Board::apply_snapshot`]. Resets the commit
    /// counters and the traffic coefficient for the new turn.
    pub fn refresh_analytics(&mut self) {
        for cell in &mut self.cells {
            cell.can_move_here = !cell.recycler
                && cell.scrap_amount > 0
                && !(cell.in_range_of_recycler && cell.scrap_amount == 1);
            cell.spawned_here = 0;
            cell.moved_here = 0;
            cell.traffic_coef = 1.0;
        }

        let mut threat = vec![ThreatScratch::default(); self.cells.len()];
        for (id, cell) in self.cells.iter().enumerate() {
            let mut scratch = ThreatScratch::default();
            for &n in cell.adjacent() {
                let neighbor = &self.cells[n];
                if neighbor.is_foe() {
                    scratch.attacked += neighbor.units;
                    scratch.max_stack = scratch.max_stack.max(neighbor.units);
                }
                if neighbor.can_move_here && !neighbor.is_mine() {
                    scratch.uncaptured += 1;
                }
            }
            threat[id] = scratch;
        }

        let economics: Vec<(u32, u32)> = (0..self.cells.len())
            .map(|id| {
                (
                    economy::scrap_to_recycle(self, id),
                    economy::tiles_to_recycle(self, id),
                )
            })
            .collect();

        for ((cell, scratch), (scrap, tiles)) in
            self.cells.iter_mut().zip(threat).zip(economics)
        {
            cell.attacked = scratch.attacked;
            cell.attacked_max_stack = scratch.max_stack;
            cell.adjacent_uncaptured = scratch.uncaptured;
            cell.scrap_to_recycle = scrap;
            cell.tiles_to_recycle = tiles;
        }

        self.refresh_borders();
    }

    /// Wire adjacency, surround, and center distance. Runs once.
    fn wire_structure(&mut self) {
        let center_x = self.width / 2;
        let center_y = self.height / 2;

        for y in 0..self.height {
            for x in 0..self.width {
                let id = usize::from(y) * usize::from(self.width) + usize::from(x);

                let mut adjacent = [0; 4];
                let mut adjacent_len = 0u8;
                let mut surround = [0; 8];
                let mut surround_len = 0u8;

                // Orthogonal neighbors: up, down, left, right.
                let orth = [
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                ];
                for (nx, ny) in orth {
                    if let Some(n) = self.id_at(nx, ny) {
                        adjacent[usize::from(adjacent_len)] = n;
                        adjacent_len += 1;
                        surround[usize::from(surround_len)] = n;
                        surround_len += 1;
                    }
                }
                // Diagonal neighbors.
                let diag = [
                    (x.wrapping_sub(1), y.wrapping_sub(1)),
                    (x + 1, y.wrapping_sub(1)),
                    (x.wrapping_sub(1), y + 1),
                    (x + 1, y + 1),
                ];
                for (nx, ny) in diag {
                    if let Some(n) = self.id_at(nx, ny) {
                        surround[usize::from(surround_len)] = n;
                        surround_len += 1;
                    }
                }

                let cell = &mut self.cells[id];
                cell.adjacent = adjacent;
                cell.adjacent_len = adjacent_len;
                cell.surround = surround;
                cell.surround_len = surround_len;
                cell.distance_to_center =
                    u32::from(x.abs_diff(center_x)) + u32::from(y.abs_diff(center_y));
            }
        }
    }

    /// The unique `owner`-owned cell with zero units.
    fn locate_spawn(&self, owner: Owner) -> Result<CellId, SnapshotError> {
        let mut found = None;
        let mut count = 0usize;
        for (id, cell) in self.cells.iter().enumerate() {
            if cell.owner == owner && cell.units == 0 {
                found = Some(id);
                count += 1;
            }
        }
        match (found, count) {
            (Some(id), 1) => Ok(id),
            (None, _) => Err(SnapshotError::MissingSpawn { owner }),
            (Some(_), _) => Err(SnapshotError::AmbiguousSpawn { owner, count }),
        }
    }

    /// One-time flood of spawn-relative fields from both spawn cells.
    fn compute_spawn_fields(&mut self) -> Result<(), SnapshotError> {
        let my_spawn = self.locate_spawn(Owner::Mine)?;
        let opp_spawn = self.locate_spawn(Owner::Foe)?;
        let (mx, my) = (self.cells[my_spawn].x, self.cells[my_spawn].y);
        let (ox, oy) = (self.cells[opp_spawn].x, self.cells[opp_spawn].y);

        let mut max_my = 0u32;
        let mut max_opp = 0u32;
        for cell in &mut self.cells {
            cell.distance_to_my_spawn =
                u32::from(cell.x.abs_diff(mx)) + u32::from(cell.y.abs_diff(my));
            cell.distance_to_opp_spawn =
                u32::from(cell.x.abs_diff(ox)) + u32::from(cell.y.abs_diff(oy));
            max_my = max_my.max(cell.distance_to_my_spawn);
            max_opp = max_opp.max(cell.distance_to_opp_spawn);
        }

        for cell in &mut self.cells {
            cell.normalized_my_spawn = normalize(cell.distance_to_my_spawn, max_my);
            cell.normalized_opp_spawn = normalize(cell.distance_to_opp_spawn, max_opp);
            cell.area_owner = match cell.distance_to_my_spawn.cmp(&cell.distance_to_opp_spawn) {
                std::cmp::Ordering::Less => AreaOwner::Mine,
                std::cmp::Ordering::Greater => AreaOwner::Foe,
                std::cmp::Ordering::Equal => AreaOwner::Midline,
            };
            let x_part = axis_part(cell.x, mx, ox, self.width - 1);
            let y_part = axis_part(cell.y, my, oy, self.height - 1);
            cell.distance_coef = 0.75 * x_part + 0.25 * y_part;
        }

        self.my_spawn = Some(my_spawn);
        self.opp_spawn = Some(opp_spawn);
        Ok(())
    }

    /// Rebuild the three border sets and the per-cell membership flags.
    fn refresh_borders(&mut self) {
        self.inner_border.clear();
        self.outer_border.clear();
        self.warzone.clear();

        let mut flags = vec![(false, false, false); self.cells.len()];
        for (id, cell) in self.cells.iter().enumerate() {
            if !cell.can_move_here {
                continue;
            }
            let mut movable_mine = false;
            let mut movable_other = false;
            let mut movable_foe = false;
            for &n in cell.adjacent() {
                let neighbor = &self.cells[n];
                if !neighbor.can_move_here {
                    continue;
                }
                if neighbor.is_mine() {
                    movable_mine = true;
                } else {
                    movable_other = true;
                    if neighbor.is_foe() {
                        movable_foe = true;
                    }
                }
            }

            if cell.is_mine() {
                if movable_other {
                    self.inner_border.push(id);
                    flags[id].0 = true;
                }
                if movable_foe {
                    self.warzone.push(id);
                    flags[id].2 = true;
                }
            } else if movable_mine {
                self.outer_border.push(id);
                flags[id].1 = true;
            }
        }

        for (cell, (inner, outer, war)) in self.cells.iter_mut().zip(flags) {
            cell.inner_border = inner;
            cell.outer_border = outer;
            cell.warzone = war;
        }
    }
}

/// `value / max` in [0, 1], with a degenerate max mapping to 0.
fn normalize(value: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        f64::from(value) / f64::from(max)
    }
}

/// Positional balance along one axis: 0 at our spawn's side, 1 at the
/// opponent's. An axis with no spread contributes a neutral 0.5.
fn axis_part(pos: u16, my: u16, opp: u16, limit: u16) -> f64 {
    let spread_my = my.max(limit - my);
    let spread_opp = opp.max(limit - opp);
    let toward_edge = if spread_my == 0 {
        0.5
    } else {
        f64::from(pos.abs_diff(my)) / f64::from(spread_my)
    };
    let toward_opp = if spread_opp == 0 {
        0.5
    } else {
        1.0 - f64::from(pos.abs_diff(opp)) / f64::from(spread_opp)
    };
    (toward_edge + toward_opp) / 2.0
}
