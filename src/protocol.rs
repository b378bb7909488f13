//! Wire protocol: line-based snapshots in, semicolon-joined commands out.
//!
//! The arena speaks plain text. One init line carries the grid dimensions;
//! every turn thereafter sends a matter line followed by one line of seven
//! integers per cell, row-major. Replies are commands joined by `;`, always
//! ending with a `MESSAGE`.

use std::io::{self, BufRead};

use crate::engine::{Assignment, TurnPlan};
use crate::game::{CellSnapshot, Owner, TurnSnapshot};

/// Errors from reading or decoding arena input.
#[derive(Debug)]
pub enum ProtocolError {
    /// The underlying reader failed.
    Io(io::Error),
    /// Input ended before a complete block arrived.
    UnexpectedEof,
    /// A line did not match the wire format.
    Malformed {
        /// One-based line number within the block being parsed.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "Protocol error: {err}"),
            Self::UnexpectedEof => write!(f, "Protocol error: unexpected end of input"),
            Self::Malformed { line, reason } => {
                write!(f, "Protocol error: line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::UnexpectedEof | Self::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Parse the init line, `width height`.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] unless the line is exactly two
/// positive integers.
pub fn parse_init(line: &str) -> Result<(u16, u16), ProtocolError> {
    let fields = split_fields(line, 2, 1)?;
    let width: u16 = parse_int(fields[0], 1)?;
    let height: u16 = parse_int(fields[1], 1)?;
    if width == 0 || height == 0 {
        return Err(ProtocolError::Malformed {
            line: 1,
            reason: "grid dimensions must be positive".to_owned(),
        });
    }
    Ok((width, height))
}

/// Read and parse the init line from `reader`.
///
/// # Errors
///
/// Returns [`ProtocolError::UnexpectedEof`] on a closed stream, otherwise
/// whatever [`parse_init`] returns.
pub fn read_init(reader: &mut impl BufRead) -> Result<(u16, u16), ProtocolError> {
    let mut line = String::new();
    if !next_line(reader, &mut line)? {
        return Err(ProtocolError::UnexpectedEof);
    }
    parse_init(&line)
}

/// Read one full turn block: a matter line, then `width * height` cell
/// lines in row-major order.
///
/// # Errors
///
/// Returns [`ProtocolError::UnexpectedEof`] when the stream closes mid-turn
/// and [`ProtocolError::Malformed`] for lines that do not decode. Line
/// numbers in errors count from the matter line.
pub fn read_snapshot(
    reader: &mut impl BufRead,
    width: u16,
    height: u16,
) -> Result<TurnSnapshot, ProtocolError> {
    let mut line = String::new();
    if !next_line(reader, &mut line)? {
        return Err(ProtocolError::UnexpectedEof);
    }
    let mut snapshot = TurnSnapshot::empty(width, height);
    {
        let fields = split_fields(&line, 2, 1)?;
        snapshot.my_matter = parse_int(fields[0], 1)?;
        snapshot.opp_matter = parse_int(fields[1], 1)?;
    }
    for (index, cell) in snapshot.cells.iter_mut().enumerate() {
        let line_no = index + 2;
        if !next_line(reader, &mut line)? {
            return Err(ProtocolError::UnexpectedEof);
        }
        *cell = parse_cell(&line, line_no)?;
    }
    Ok(snapshot)
}

/// Parse a full turn block from an in-memory string.
///
/// # Errors
///
/// Same conditions as [`read_snapshot`].
pub fn parse_snapshot(text: &str, width: u16, height: u16) -> Result<TurnSnapshot, ProtocolError> {
    read_snapshot(&mut text.as_bytes(), width, height)
}

/// Render a plan as the arena's command line.
///
/// Builds come first, then spawns, then one `MOVE` per walking robot. Held
/// and unassigned robots emit nothing. The trailing `MESSAGE` carries the
/// unit and tile diffs plus the turn number; an idle plan renders as the
/// `MESSAGE` alone.
#[must_use]
pub fn render_commands(plan: &TurnPlan, turn: u32) -> String {
    let mut commands: Vec<String> = Vec::new();
    for build in &plan.builds {
        commands.push(format!("BUILD {} {}", build.cell.x, build.cell.y));
    }
    for spawn in &plan.spawns {
        commands.push(format!(
            "SPAWN {} {} {}",
            spawn.amount, spawn.cell.x, spawn.cell.y
        ));
    }
    for robot in &plan.robots {
        let target = match &robot.assignment {
            Assignment::Pathed { target, .. } | Assignment::Fallback { target } => target,
            Assignment::Hold | Assignment::Unassigned => continue,
        };
        commands.push(format!(
            "MOVE 1 {} {} {} {}",
            robot.origin.x, robot.origin.y, target.x, target.y
        ));
    }
    commands.push(format!(
        "MESSAGE Units: {}, Tiles: {}, Turn: {turn}",
        signed_diff(plan.counters.my_units, plan.counters.opp_units),
        signed_diff(plan.counters.my_tiles, plan.counters.opp_tiles),
    ));
    commands.join(";")
}

/// Render a snapshot back into wire form, matter line included.
///
/// The output feeds [`parse_snapshot`] unchanged, which is what match logs
/// and replays rely on.
#[must_use]
pub fn render_snapshot(snapshot: &TurnSnapshot) -> String {
    let mut out = format!("{} {}\n", snapshot.my_matter, snapshot.opp_matter);
    for cell in &snapshot.cells {
        out.push_str(&format!(
            "{} {} {} {} {} {} {}\n",
            cell.scrap_amount,
            cell.owner.wire(),
            cell.units,
            u8::from(cell.recycler),
            u8::from(cell.can_build),
            u8::from(cell.can_spawn),
            u8::from(cell.in_range_of_recycler),
        ));
    }
    out
}

/// Format `mine - theirs` with an explicit `+` when we are not behind.
fn signed_diff(mine: u32, theirs: u32) -> String {
    let diff = i64::from(mine) - i64::from(theirs);
    if mine < theirs {
        diff.to_string()
    } else {
        format!("+{diff}")
    }
}

fn parse_cell(line: &str, line_no: usize) -> Result<CellSnapshot, ProtocolError> {
    let fields = split_fields(line, 7, line_no)?;
    let owner_code: i32 = parse_int(fields[1], line_no)?;
    let owner = Owner::from_wire(owner_code).ok_or_else(|| ProtocolError::Malformed {
        line: line_no,
        reason: format!("unknown owner code {owner_code}"),
    })?;
    Ok(CellSnapshot {
        scrap_amount: parse_int(fields[0], line_no)?,
        owner,
        units: parse_int(fields[2], line_no)?,
        recycler: parse_flag(fields[3], line_no)?,
        can_build: parse_flag(fields[4], line_no)?,
        can_spawn: parse_flag(fields[5], line_no)?,
        in_range_of_recycler: parse_flag(fields[6], line_no)?,
    })
}

fn split_fields(line: &str, expected: usize, line_no: usize) -> Result<Vec<&str>, ProtocolError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() == expected {
        Ok(fields)
    } else {
        Err(ProtocolError::Malformed {
            line: line_no,
            reason: format!("expected {expected} fields, found {}", fields.len()),
        })
    }
}

fn parse_int<T: std::str::FromStr>(token: &str, line_no: usize) -> Result<T, ProtocolError> {
    token.parse().map_err(|_| ProtocolError::Malformed {
        line: line_no,
        reason: format!("not an integer: {token:?}"),
    })
}

fn parse_flag(token: &str, line_no: usize) -> Result<bool, ProtocolError> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ProtocolError::Malformed {
            line: line_no,
            reason: format!("not a 0/1 flag: {token:?}"),
        }),
    }
}

fn next_line(reader: &mut impl BufRead, buffer: &mut String) -> Result<bool, ProtocolError> {
    buffer.clear();
    Ok(reader.read_line(buffer)? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        BuildAction, BuildKind, CellRef, RobotAction, SpawnAction, SpawnKind, TurnCounters,
    };

    #[test]
    fn test_parse_init_accepts_dimensions() {
        assert_eq!(parse_init("13 7\n").unwrap(), (13, 7));
    }

    #[test]
    fn test_parse_init_rejects_bad_lines() {
        assert!(matches!(
            parse_init("13"),
            Err(ProtocolError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_init("a b"),
            Err(ProtocolError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_init("0 5"),
            Err(ProtocolError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_init_on_closed_stream() {
        let mut reader: &[u8] = b"";
        assert!(matches!(
            read_init(&mut reader),
            Err(ProtocolError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_snapshot_survives_wire_round_trip() {
        let mut snapshot = TurnSnapshot::empty(2, 1);
        snapshot.my_matter = 17;
        snapshot.opp_matter = 23;
        snapshot.cells[0] = CellSnapshot::owned(Owner::Mine, 5, 2);
        snapshot.cells[0].can_build = true;
        snapshot.cells[0].can_spawn = true;
        snapshot.cells[1] = CellSnapshot::neutral(8);
        snapshot.cells[1].in_range_of_recycler = true;

        let wire = render_snapshot(&snapshot);
        assert_eq!(wire, "17 23\n5 1 2 0 1 1 0\n8 -1 0 0 0 0 1\n");
        assert_eq!(parse_snapshot(&wire, 2, 1).unwrap(), snapshot);
    }

    #[test]
    fn test_parse_snapshot_flags_bad_owner() {
        let text = "10 10\n5 3 0 0 0 0 0\n";
        assert!(matches!(
            parse_snapshot(text, 1, 1),
            Err(ProtocolError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_snapshot_wants_every_cell() {
        let text = "10 10\n5 1 0 0 0 0 0\n5 0 0 0 0 0 0\n5 -1 0 0 0 0 0\n";
        assert!(matches!(
            parse_snapshot(text, 2, 2),
            Err(ProtocolError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_render_commands_orders_and_message() {
        let at = |id: usize, x: u16, y: u16| CellRef { id, x, y };
        let plan = TurnPlan {
            builds: vec![BuildAction {
                kind: BuildKind::Blocker,
                cell: at(7, 3, 1),
            }],
            spawns: vec![SpawnAction {
                kind: SpawnKind::Defender,
                cell: at(4, 2, 0),
                amount: 1,
            }],
            robots: vec![
                RobotAction {
                    origin: at(1, 1, 0),
                    assignment: Assignment::Fallback { target: at(2, 2, 0) },
                },
                RobotAction {
                    origin: at(4, 2, 0),
                    assignment: Assignment::Hold,
                },
                RobotAction {
                    origin: at(4, 2, 0),
                    assignment: Assignment::Unassigned,
                },
            ],
            counters: TurnCounters {
                my_units: 5,
                opp_units: 3,
                my_tiles: 10,
                opp_tiles: 12,
            },
        };

        assert_eq!(
            render_commands(&plan, 4),
            "BUILD 3 1;SPAWN 1 2 0;MOVE 1 1 0 2 0;MESSAGE Units: +2, Tiles: -2, Turn: 4"
        );
    }

    #[test]
    fn test_render_commands_idle_is_message_only() {
        let plan = TurnPlan::default();
        assert_eq!(
            render_commands(&plan, 3),
            "MESSAGE Units: +0, Tiles: +0, Turn: 3"
        );
    }
}
