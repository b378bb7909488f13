// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Scrapper: a per-turn decision engine for simultaneous grid territory games.
//!
//! The engine plays a scrap-covered grid against one opponent. Each turn the
//! arena sends a full board snapshot; the engine rebuilds its analytics,
//! allocates the matter budget greedily, routes every unit, and answers with
//! a single command line. It provides:
//! - A flat-array board with cached adjacency and per-cell derived fields
//! - Greedy allocators for recycler builds and fresh unit spawns
//! - Bounded-depth congestion-aware path search for unit movement
//! - Match logging and deterministic turn-by-turn replay
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Protocol (wire in, commands out)  │
//! ├─────────────────────────────────────┤
//! │   Engine (build, spawn, move)       │
//! ├─────────────────────────────────────┤
//! │   Game (board, analytics, borders)  │
//! └─────────────────────────────────────┘
//! ```

pub mod engine;
pub mod game;
pub mod protocol;
pub mod replay;
pub mod scenario;

// Re-export key types at crate root for convenience
pub use engine::{Engine, EngineConfig, TurnPlan};
pub use game::{Board, GameState, TurnSnapshot};
pub use protocol::ProtocolError;
