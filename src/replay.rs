//! Match recording and deterministic replay.
//!
//! The engine is a pure function of the snapshot stream, so a match log is
//! just the grid dimensions plus every snapshot received, one JSON value
//! per line. To view turn N, re-ingest snapshots 1..=N from scratch.
//!
//! # Time Travel
//!
//! - **Forward**: ingest the next logged snapshot
//! - **Backward**: re-run from turn 0 to (`current_turn` - 1)
//! - **Jump to turn N**: re-run from turn 0 to N

mod render;

pub use render::{render_board, render_board_plain, render_summary};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::engine::{BufferTrace, Engine, TraceEvent, TurnPlan};
use crate::game::{GameState, SnapshotError, TurnSnapshot};
use crate::protocol;

/// First line of a match log file.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
struct LogHeader {
    width: u16,
    height: u16,
}

/// A recorded match: grid dimensions plus every snapshot received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLog {
    /// Grid width.
    pub width: u16,
    /// Grid height.
    pub height: u16,
    /// Snapshots in arrival order.
    pub snapshots: Vec<TurnSnapshot>,
}

impl MatchLog {
    /// Start an empty log for a grid.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            snapshots: Vec::new(),
        }
    }

    /// Append one received snapshot.
    pub fn push(&mut self, snapshot: TurnSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Number of recorded turns.
    #[must_use]
    pub fn turns(&self) -> u32 {
        u32::try_from(self.snapshots.len()).unwrap_or(u32::MAX)
    }

    /// Whether the log holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Save the log: a JSON header line, then one JSON snapshot per line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut writer = MatchLogWriter::create(path, self.width, self.height)?;
        for snapshot in &self.snapshots {
            writer.append(snapshot)?;
        }
        Ok(())
    }

    /// Load a log saved by [`MatchLog::save`] or streamed by
    /// [`MatchLogWriter`].
    ///
    /// # Errors
    ///
    /// Returns an error if file I/O fails, a line is not valid JSON, or a
    /// snapshot's dimensions disagree with the header.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();

        let header_line = lines
            .next()
            .transpose()?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "empty match log"))?;
        let header: LogHeader = serde_json::from_str(&header_line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("bad header: {e}")))?;

        let mut snapshots = Vec::new();
        for (index, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let snapshot: TurnSnapshot = serde_json::from_str(&line).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {e}", index + 2))
            })?;
            if snapshot.width != header.width || snapshot.height != header.height {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: snapshot dimensions disagree with header", index + 2),
                ));
            }
            snapshots.push(snapshot);
        }

        Ok(Self {
            width: header.width,
            height: header.height,
            snapshots,
        })
    }
}

/// Streams a match log to disk one snapshot at a time.
///
/// Bot processes tend to be killed rather than exit cleanly, so the play
/// loop appends and flushes each turn instead of saving at the end.
#[derive(Debug)]
pub struct MatchLogWriter {
    file: File,
}

impl MatchLogWriter {
    /// Create the log file and write its header line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn create(path: &Path, width: u16, height: u16) -> io::Result<Self> {
        let mut file = File::create(path)?;
        let header = serde_json::to_string(&LogHeader { width, height })
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(file, "{header}")?;
        Ok(Self { file })
    }

    /// Append one snapshot line and flush it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    pub fn append(&mut self, snapshot: &TurnSnapshot) -> io::Result<()> {
        let line = serde_json::to_string(snapshot)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.file, "{line}")?;
        self.file.flush()
    }
}

/// Error type for replay sessions.
#[derive(Debug, Clone, Copy)]
pub enum ReplayError {
    /// The log holds no snapshots to replay.
    EmptyLog,
    /// The log's grid dimensions cannot form a board.
    InvalidDimensions {
        /// Logged width.
        width: u16,
        /// Logged height.
        height: u16,
    },
    /// Requested turn not in the log.
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Last turn in the log.
        max_turn: u32,
    },
    /// A logged snapshot no longer ingests cleanly.
    Snapshot(SnapshotError),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLog => write!(f, "Match log holds no snapshots"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "Match log has invalid dimensions {width}x{height}")
            }
            Self::TurnOutOfBounds { requested, max_turn } => {
                write!(f, "Turn {requested} out of bounds (max: {max_turn})")
            }
            Self::Snapshot(e) => write!(f, "Logged snapshot rejected: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Snapshot(e) => Some(e),
            Self::EmptyLog | Self::InvalidDimensions { .. } | Self::TurnOutOfBounds { .. } => None,
        }
    }
}

impl From<SnapshotError> for ReplayError {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}

/// Replay session: steps a logged match through the engine.
///
/// The session holds the state and plan as of the current turn. Turn 0 is
/// the blank board before the first snapshot.
#[derive(Debug)]
pub struct ReplaySession {
    log: MatchLog,
    engine: Engine,
    state: GameState,
    plan: TurnPlan,
    trace: BufferTrace,
    cursor: usize,
}

impl ReplaySession {
    /// Open a session at turn 1, the first logged snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::EmptyLog`] for a log with no snapshots,
    /// otherwise the conditions of [`ReplaySession::new_at_turn`].
    pub fn new(log: MatchLog) -> Result<Self, ReplayError> {
        if log.is_empty() {
            return Err(ReplayError::EmptyLog);
        }
        Self::new_at_turn(log, 1)
    }

    /// Open a session at a specific turn by replaying from the start.
    ///
    /// # Errors
    ///
    /// Returns an error when the turn is beyond the log, the dimensions
    /// cannot form a board, or a logged snapshot fails ingestion.
    pub fn new_at_turn(log: MatchLog, target_turn: u32) -> Result<Self, ReplayError> {
        let max_turn = log.turns();
        if target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }
        let Some(state) = GameState::new(log.width, log.height) else {
            return Err(ReplayError::InvalidDimensions {
                width: log.width,
                height: log.height,
            });
        };

        let mut session = Self {
            log,
            engine: Engine::default(),
            state,
            plan: TurnPlan::default(),
            trace: BufferTrace::new(),
            cursor: 0,
        };
        for _ in 0..target_turn {
            session.ingest_next()?;
        }
        Ok(session)
    }

    /// The replayed match log.
    #[must_use]
    pub const fn log(&self) -> &MatchLog {
        &self.log
    }

    /// Current turn number; equals the count of ingested snapshots.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.state.turn()
    }

    /// Last turn in the log.
    #[must_use]
    pub fn max_turn(&self) -> u32 {
        self.log.turns()
    }

    /// Whether the session sits on the last logged turn.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.cursor == self.log.snapshots.len()
    }

    /// Board state as of the current turn, engine commitments included.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The plan the engine produced for the current turn.
    #[must_use]
    pub const fn plan(&self) -> &TurnPlan {
        &self.plan
    }

    /// Decision trace behind the current turn's plan, oldest event first.
    #[must_use]
    pub fn trace(&self) -> &[TraceEvent] {
        self.trace.events()
    }

    /// The command line the engine would have sent this turn.
    #[must_use]
    pub fn commands(&self) -> String {
        protocol::render_commands(&self.plan, self.turn())
    }

    /// Ingest the next logged snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::TurnOutOfBounds`] at the end of the log and
    /// [`ReplayError::Snapshot`] if ingestion fails.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        if self.at_end() {
            return Err(ReplayError::TurnOutOfBounds {
                requested: self.turn() + 1,
                max_turn: self.max_turn(),
            });
        }
        self.ingest_next()
    }

    /// Go back one turn by replaying from the start.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::TurnOutOfBounds`] when already at turn 0.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        let Some(target) = self.turn().checked_sub(1) else {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.max_turn(),
            });
        };
        self.goto_turn(target)
    }

    /// Jump to a specific turn by replaying from the start.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ReplaySession::new_at_turn`].
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        *self = Self::new_at_turn(self.log.clone(), target_turn)?;
        Ok(())
    }

    fn ingest_next(&mut self) -> Result<(), ReplayError> {
        let Some(snapshot) = self.log.snapshots.get(self.cursor) else {
            return Err(ReplayError::TurnOutOfBounds {
                requested: self.turn() + 1,
                max_turn: self.max_turn(),
            });
        };
        self.state.update(snapshot)?;
        self.trace.clear();
        self.plan = self.engine.analyze(&mut self.state, &mut self.trace);
        self.cursor += 1;
        Ok(())
    }
}
