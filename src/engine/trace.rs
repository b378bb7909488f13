//! Structured decision tracing.
//!
//! The engine reports what it considered and what it committed through a
//! [`TraceSink`] injected per call. The null sink drops everything and keeps
//! the hot path allocation-free; the buffer sink backs tests and the replay
//! inspector; the CLI wires its own stderr sink.

use std::fmt;

use crate::engine::{BuildKind, SpawnKind};
use crate::game::Cell;

/// One cell in a trace event, with the figures that drove the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellNote {
    /// Cell x coordinate.
    pub x: u16,
    /// Cell y coordinate.
    pub y: u16,
    /// Short figure dump, typically the values of the sort keys.
    pub note: String,
}

impl CellNote {
    /// Note the given figures against `cell`.
    #[must_use]
    pub fn new(cell: &Cell, note: String) -> Self {
        Self {
            x: cell.x,
            y: cell.y,
            note,
        }
    }
}

/// What the engine considered or committed at one decision point.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Front-runners for a build category, best first.
    BuildCandidates {
        /// Category being allocated.
        kind: BuildKind,
        /// Best candidates, at most three.
        candidates: Vec<CellNote>,
    },
    /// A build was committed.
    BuildCommitted {
        /// Category that committed.
        kind: BuildKind,
        /// Target cell x coordinate.
        x: u16,
        /// Target cell y coordinate.
        y: u16,
    },
    /// Front-runners for a spawn category, best first.
    SpawnCandidates {
        /// Category being allocated.
        kind: SpawnKind,
        /// Best candidates, at most three.
        candidates: Vec<CellNote>,
    },
    /// A spawn was committed.
    SpawnCommitted {
        /// Category that committed.
        kind: SpawnKind,
        /// Target cell x coordinate.
        x: u16,
        /// Target cell y coordinate.
        y: u16,
        /// Units spawned.
        amount: u32,
    },
    /// A robot stays to defend its own cell.
    RobotHeld {
        /// Origin cell x coordinate.
        x: u16,
        /// Origin cell y coordinate.
        y: u16,
    },
    /// A robot committed to a scored walk.
    RobotPathed {
        /// Origin cell x coordinate.
        x: u16,
        /// Origin cell y coordinate.
        y: u16,
        /// First-step cell x coordinate.
        target_x: u16,
        /// First-step cell y coordinate.
        target_y: u16,
        /// Score of the winning walk.
        score: f64,
    },
    /// A robot found no beneficial walk and marches for the outer border.
    RobotFallback {
        /// Origin cell x coordinate.
        x: u16,
        /// Origin cell y coordinate.
        y: u16,
        /// Fallback target x coordinate.
        target_x: u16,
        /// Fallback target y coordinate.
        target_y: u16,
    },
    /// A robot found neither a walk nor a fallback target and emits no order.
    RobotStranded {
        /// Origin cell x coordinate.
        x: u16,
        /// Origin cell y coordinate.
        y: u16,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::BuildCandidates { kind, candidates } => {
                write!(f, "build {kind:?} candidates: {}", join_notes(candidates))
            }
            TraceEvent::BuildCommitted { kind, x, y } => {
                write!(f, "build {kind:?} -> ({x},{y})")
            }
            TraceEvent::SpawnCandidates { kind, candidates } => {
                write!(f, "spawn {kind:?} candidates: {}", join_notes(candidates))
            }
            TraceEvent::SpawnCommitted { kind, x, y, amount } => {
                write!(f, "spawn {kind:?} x{amount} -> ({x},{y})")
            }
            TraceEvent::RobotHeld { x, y } => write!(f, "robot ({x},{y}) holds"),
            TraceEvent::RobotPathed {
                x,
                y,
                target_x,
                target_y,
                score,
            } => {
                write!(f, "robot ({x},{y}) -> ({target_x},{target_y}) score {score:.3}")
            }
            TraceEvent::RobotFallback {
                x,
                y,
                target_x,
                target_y,
            } => {
                write!(f, "robot ({x},{y}) -> ({target_x},{target_y}) fallback")
            }
            TraceEvent::RobotStranded { x, y } => write!(f, "robot ({x},{y}) stranded"),
        }
    }
}

fn join_notes(candidates: &[CellNote]) -> String {
    let parts: Vec<String> = candidates
        .iter()
        .map(|c| format!("({},{}) {}", c.x, c.y, c.note))
        .collect();
    parts.join("  ")
}

/// Receiver for engine decision events.
pub trait TraceSink {
    /// Whether the engine should spend time assembling candidate lists.
    /// Sinks that keep or print events return `true`.
    fn enabled(&self) -> bool {
        false
    }

    /// Record one event.
    fn record(&mut self, event: TraceEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Sink that keeps every event in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct BufferTrace {
    events: Vec<TraceEvent>,
}

impl BufferTrace {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for BufferTrace {
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
