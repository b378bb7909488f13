//! Per-turn decision engine.
//!
//! One call to [`Engine::analyze`] turns a refreshed board into a
//! [`TurnPlan`]: builds first, then spawns in rounds, then one movement
//! assignment per unit. Allocators coordinate through the board itself,
//! committed actions mark cells and eat matter, so later passes see what
//! earlier passes did.

mod builder;
mod config;
mod mover;
mod paths;
mod spawner;
mod trace;

pub use config::EngineConfig;
pub use trace::{BufferTrace, CellNote, NullTrace, TraceEvent, TraceSink};

use crate::game::{Board, Cell, CellId, GameState};

/// A cell pinned by flat id plus its grid coordinates.
///
/// Plans outlive the borrow of the board they were made from, so actions
/// carry coordinates instead of cell references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRef {
    /// Flat arena id.
    pub id: CellId,
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl CellRef {
    /// Pin `cell` at its flat id.
    #[must_use]
    pub const fn new(id: CellId, cell: &Cell) -> Self {
        Self {
            id,
            x: cell.x,
            y: cell.y,
        }
    }
}

/// What a committed recycler is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildKind {
    /// Wall out an incoming stack.
    Blocker,
    /// Harvest a scrap-dense pocket.
    Miner,
}

/// One recycler placement in a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildAction {
    /// Why the recycler goes down.
    pub kind: BuildKind,
    /// Where it goes down.
    pub cell: CellRef,
}

/// What a committed spawn is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    /// Reinforce a threatened cell.
    Defender,
    /// Push the frontier outward.
    Explorer,
    /// Mass units on the hottest front.
    Attacker,
}

/// One spawn order in a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnAction {
    /// Why the units appear.
    pub kind: SpawnKind,
    /// Where they appear.
    pub cell: CellRef,
    /// How many appear.
    pub amount: u32,
}

/// Where one robot goes this turn.
#[derive(Clone, Debug, PartialEq)]
pub enum Assignment {
    /// No useful move was found.
    Unassigned,
    /// Stay put to cover a threatened cell.
    Hold,
    /// Step onto the first cell of a scored walk.
    Pathed {
        /// First step of the walk.
        target: CellRef,
        /// The full walk, origin included.
        path: Vec<CellId>,
        /// The walk's score when it was committed.
        score: f64,
    },
    /// March toward the outer border.
    Fallback {
        /// The border cell to head for.
        target: CellRef,
    },
}

/// One robot's origin and assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotAction {
    /// The cell the robot stands on.
    pub origin: CellRef,
    /// What it does this turn.
    pub assignment: Assignment,
}

/// Units and tiles held by each side, tallied from the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnCounters {
    /// Our units on the board.
    pub my_units: u32,
    /// Opponent units on the board.
    pub opp_units: u32,
    /// Tiles we own.
    pub my_tiles: u32,
    /// Tiles the opponent owns.
    pub opp_tiles: u32,
}

impl TurnCounters {
    /// Count units and owned tiles on both sides.
    #[must_use]
    pub fn tally(board: &Board) -> Self {
        let mut counters = Self::default();
        for (_, cell) in board.iter() {
            if cell.is_mine() {
                counters.my_tiles += 1;
                counters.my_units += cell.units;
            } else if cell.is_foe() {
                counters.opp_tiles += 1;
                counters.opp_units += cell.units;
            }
        }
        counters
    }
}

/// Everything the engine decided for one turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnPlan {
    /// Recycler placements, in commit order.
    pub builds: Vec<BuildAction>,
    /// Spawn orders, in commit order.
    pub spawns: Vec<SpawnAction>,
    /// One entry per unit on the board.
    pub robots: Vec<RobotAction>,
    /// Board totals at the start of the turn.
    pub counters: TurnCounters,
}

/// The decision engine. Holds tuning only; all per-turn state lives in
/// [`GameState`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Build an engine with the given tuning.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's tuning.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produce a full plan for the current turn.
    ///
    /// Mutates the board's per-turn commit markers and the matter budget as
    /// it goes; call once per [`GameState::update`].
    #[must_use]
    pub fn analyze(&self, state: &mut GameState, trace: &mut dyn TraceSink) -> TurnPlan {
        let mut plan = TurnPlan {
            counters: TurnCounters::tally(state.board()),
            ..TurnPlan::default()
        };

        let blocker_placed = builder::place_blocker(&self.config, state, trace, &mut plan);
        builder::place_miner(&self.config, state, trace, &mut plan, blocker_placed);

        for _ in 0..self.config.spawn_rounds {
            spawner::spawn_defender(&self.config, state, trace, &mut plan);
            spawner::spawn_explorer(&self.config, state, trace, &mut plan);
            spawner::spawn_attacker(&self.config, state, trace, &mut plan);
        }

        mover::assign_robots(&self.config, state, trace, &mut plan);
        plan
    }
}
