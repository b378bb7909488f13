//! CLI command implementations for Scrapper.

pub(crate) mod play;
pub(crate) mod replay;
pub(crate) mod validate;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Interactive TUI.
    Tui,
    /// Plain text output.
    Text,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<scrapper::protocol::ProtocolError> for CliError {
    fn from(e: scrapper::protocol::ProtocolError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<scrapper::replay::ReplayError> for CliError {
    fn from(e: scrapper::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<scrapper::scenario::ScenarioError> for CliError {
    fn from(e: scrapper::scenario::ScenarioError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<scrapper::game::SnapshotError> for CliError {
    fn from(e: scrapper::game::SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}
