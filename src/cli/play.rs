//! Play command implementation.
//!
//! Speaks the arena protocol: board dimensions once on startup, then one
//! snapshot in and one command line out per turn until the arena closes
//! the stream.

use super::CliError;
use scrapper::engine::{Engine, NullTrace, TraceEvent, TraceSink};
use scrapper::game::GameState;
use scrapper::protocol::{self, ProtocolError};
use scrapper::replay::MatchLogWriter;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the arena sends a malformed stream or the match log
/// cannot be written.
pub(crate) fn execute(log: Option<PathBuf>, debug: bool) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut input = BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let (width, height) = protocol::read_init(&mut input)?;
    let Some(mut state) = GameState::new(width, height) else {
        return Err(CliError::new(format!(
            "arena sent an unusable board size {width}x{height}"
        )));
    };

    let mut match_log = match log {
        Some(path) => Some(MatchLogWriter::create(&path, width, height)?),
        None => None,
    };

    let engine = Engine::default();
    let mut stderr_trace = StderrTrace;
    let mut null_trace = NullTrace;

    loop {
        let snapshot = match protocol::read_snapshot(&mut input, width, height) {
            Ok(snapshot) => snapshot,
            // The arena ends a match by closing our stdin
            Err(ProtocolError::UnexpectedEof) => break,
            Err(e) => return Err(e.into()),
        };

        if let Some(writer) = match_log.as_mut() {
            writer.append(&snapshot)?;
        }

        state.update(&snapshot)?;
        let trace: &mut dyn TraceSink = if debug {
            &mut stderr_trace
        } else {
            &mut null_trace
        };
        let plan = engine.analyze(&mut state, trace);

        writeln!(output, "{}", protocol::render_commands(&plan, state.turn()))?;
        output.flush()?;
    }

    Ok(())
}

/// Sink that prints one compact line per engine decision to stderr.
///
/// The arena reserves stdout for commands, so diagnostics go to stderr.
#[derive(Debug, Clone, Copy)]
struct StderrTrace;

impl TraceSink for StderrTrace {
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, event: TraceEvent) {
        eprintln!("{event}");
    }
}
