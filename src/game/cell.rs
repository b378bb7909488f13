//! Cell state: received fields, spawn-relative placement, per-turn analytics.

// A cell carries the arena's flag fields plus the derived border flags
#![allow(clippy::struct_excessive_bools)]

/// Index of a cell in the board's flat row-major arena.
pub type CellId = usize;

/// Owner of a cell as reported by the arena.
///
/// Wire encoding: `1` = mine, `0` = foe, `-1` = neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Owner {
    /// Controlled by us.
    Mine,
    /// Controlled by the opponent.
    Foe,
    /// Unclaimed.
    Neutral,
}

impl Owner {
    /// Decode the arena's integer encoding.
    #[must_use]
    pub const fn from_wire(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Mine),
            0 => Some(Self::Foe),
            -1 => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Encode back to the arena's integer encoding.
    #[must_use]
    pub const fn wire(self) -> i32 {
        match self {
            Self::Mine => 1,
            Self::Foe => 0,
            Self::Neutral => -1,
        }
    }
}

/// Which player's spawn a cell sits closer to, by raw grid distance.
///
/// A territorial bias independent of current occupation. Ties are `Midline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaOwner {
    /// Closer to our spawn.
    Mine,
    /// Closer to the opponent's spawn.
    Foe,
    /// Equidistant from both spawns.
    Midline,
}

/// Received fields of a cell as of the previous snapshot.
///
/// The board keeps one of these per cell in a parallel grid, overwritten
/// just before each snapshot is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrevCell {
    /// Scrap remaining last turn.
    pub scrap_amount: u32,
    /// Owner last turn (`None` until the first snapshot).
    pub owner: Option<Owner>,
    /// Unit stack last turn.
    pub units: u32,
    /// Recycler presence last turn.
    pub recycler: bool,
}

/// A single board cell.
///
/// Received fields are overwritten every turn from the snapshot. Structural
/// and spawn-relative fields are written once and never change afterwards,
/// even as the cell's content mutates. Per-turn derived fields are recomputed
/// by the board's analytics pass; the commit counters and `traffic_coef` are
/// then consumed in-place by the decision engine.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    /// Column, 0-based from the left.
    pub x: u16,
    /// Row, 0-based from the top.
    pub y: u16,

    /// Scrap remaining; 0 means permanently impassable grass.
    pub scrap_amount: u32,
    /// Current owner.
    pub owner: Owner,
    /// Unit stack currently on the cell.
    pub units: u32,
    /// Whether a recycler sits on the cell.
    pub recycler: bool,
    /// Whether the arena allows us to build here this turn.
    pub can_build: bool,
    /// Whether the arena allows us to spawn here this turn.
    pub can_spawn: bool,
    /// Whether an active recycler is consuming this cell.
    pub in_range_of_recycler: bool,

    /// Manhattan distance to the board center.
    pub distance_to_center: u32,

    /// Raw Manhattan distance to our spawn cell. Frozen after the first
    /// snapshot.
    pub distance_to_my_spawn: u32,
    /// Raw Manhattan distance to the opponent's spawn cell. Frozen after the
    /// first snapshot.
    pub distance_to_opp_spawn: u32,
    /// `distance_to_my_spawn` normalized to [0, 1] by the board-wide maximum.
    pub normalized_my_spawn: f64,
    /// `distance_to_opp_spawn` normalized to [0, 1] by the board-wide maximum.
    pub normalized_opp_spawn: f64,
    /// Which spawn this cell sits closer to.
    pub area_owner: AreaOwner,
    /// Positional bias in [0, 1], rising toward the opponent's side. Weighted
    /// 75% on the x-axis balance and 25% on the y-axis.
    pub distance_coef: f64,

    /// Whether a unit may step onto this cell this turn.
    pub can_move_here: bool,
    /// Matter a recycler built here would recover before its tiles exhaust.
    pub scrap_to_recycle: u32,
    /// Tiles a recycler built here would consume to grass.
    pub tiles_to_recycle: u32,
    /// Sum of enemy unit stacks on orthogonal neighbors.
    pub attacked: u32,
    /// Largest single enemy stack on an orthogonal neighbor.
    pub attacked_max_stack: u32,
    /// Movable orthogonal neighbors we do not own.
    pub adjacent_uncaptured: u32,
    /// Units the allocator has committed to spawn here this turn.
    pub spawned_here: u32,
    /// Units the allocator has committed to move onto (or hold at) this cell
    /// this turn.
    pub moved_here: u32,
    /// Congestion weight in [0, 1]; 1 at the start of each turn, decreased as
    /// path search consumes capacity on the cell.
    pub traffic_coef: f64,

    /// Mine, movable, with a movable non-mine orthogonal neighbor.
    pub inner_border: bool,
    /// Not mine, movable, with a movable mine orthogonal neighbor.
    pub outer_border: bool,
    /// Mine, movable, with a movable foe orthogonal neighbor.
    pub warzone: bool,

    pub(crate) adjacent: [CellId; 4],
    pub(crate) adjacent_len: u8,
    pub(crate) surround: [CellId; 8],
    pub(crate) surround_len: u8,
}

impl Cell {
    /// Create an empty (grass, neutral) cell at the given coordinates.
    ///
    /// Adjacency is wired by the board after all cells exist.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            scrap_amount: 0,
            owner: Owner::Neutral,
            units: 0,
            recycler: false,
            can_build: false,
            can_spawn: false,
            in_range_of_recycler: false,
            distance_to_center: 0,
            distance_to_my_spawn: 0,
            distance_to_opp_spawn: 0,
            normalized_my_spawn: 0.0,
            normalized_opp_spawn: 0.0,
            area_owner: AreaOwner::Midline,
            distance_coef: 0.5,
            can_move_here: false,
            scrap_to_recycle: 0,
            tiles_to_recycle: 0,
            attacked: 0,
            attacked_max_stack: 0,
            adjacent_uncaptured: 0,
            spawned_here: 0,
            moved_here: 0,
            traffic_coef: 1.0,
            inner_border: false,
            outer_border: false,
            warzone: false,
            adjacent: [0; 4],
            adjacent_len: 0,
            surround: [0; 8],
            surround_len: 0,
        }
    }

    /// Check if we control this cell.
    #[must_use]
    pub const fn is_mine(&self) -> bool {
        matches!(self.owner, Owner::Mine)
    }

    /// Check if the opponent controls this cell.
    #[must_use]
    pub const fn is_foe(&self) -> bool {
        matches!(self.owner, Owner::Foe)
    }

    /// Check if this cell is unclaimed.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        matches!(self.owner, Owner::Neutral)
    }

    /// Check if this cell's scrap is exhausted (permanently impassable).
    #[must_use]
    pub const fn is_grass(&self) -> bool {
        self.scrap_amount == 0
    }

    /// Orthogonal in-bounds neighbor ids (2 to 4 entries).
    #[must_use]
    #[inline]
    pub fn adjacent(&self) -> &[CellId] {
        &self.adjacent[..usize::from(self.adjacent_len)]
    }

    /// Orthogonal plus diagonal in-bounds neighbor ids (3 to 8 entries).
    #[must_use]
    #[inline]
    pub fn surround(&self) -> &[CellId] {
        &self.surround[..usize::from(self.surround_len)]
    }

    /// Manhattan distance to another cell.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Units already committed to defend this cell this turn, either spawned
    /// on it or moved onto / held at it.
    #[must_use]
    pub const fn defense_committed(&self) -> u32 {
        self.spawned_here + self.moved_here
    }

    /// Stable `"x:y"` key for logs and messages.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.x, self.y)
    }
}
