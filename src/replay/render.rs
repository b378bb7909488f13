//! ASCII renderer for terminal viewing with ANSI colors.

use crate::engine::{Assignment, TurnPlan};
use crate::game::{Cell, GameState, Owner};

const MINE_COLOR: &str = "\x1b[32m"; // Green
const FOE_COLOR: &str = "\x1b[31m"; // Red
const NEUTRAL_COLOR: &str = "\x1b[90m"; // Gray

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render board state to ASCII with ANSI colors.
///
/// Output format:
/// ```text
/// Turn 12    me 40 vs opp 30 matter
/// ┌───────────────┐
/// │ # 2 . .   1 # │
/// │ # R . . . . # │
/// └───────────────┘
///
/// Legend: R=recycler  1-9=units  #=owned  .=scrap  blank=grass
/// ```
#[must_use]
pub fn render_board(state: &GameState) -> String {
    let mut output = String::new();

    render_header(&mut output, state);
    render_grid(&mut output, state, true);
    output.push_str(&format!(
        "\n{DIM}Legend: R=recycler  1-9=units  #=owned  .=scrap  blank=grass{RESET}\n"
    ));

    output
}

/// Render board state to ASCII without escape codes, for embedding in
/// widgets that do their own styling.
#[must_use]
pub fn render_board_plain(state: &GameState) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Turn {}    me {} vs opp {} matter\n",
        state.turn(),
        state.my_matter(),
        state.opp_matter(),
    ));
    render_grid(&mut output, state, false);
    output.push_str("\nLegend: R=recycler  1-9=units  #=owned  .=scrap  blank=grass\n");

    output
}

/// One line per action category of a plan.
#[must_use]
pub fn render_summary(plan: &TurnPlan) -> String {
    let mut output = String::new();

    let builds: Vec<String> = plan
        .builds
        .iter()
        .map(|build| format!("{:?} @ ({}, {})", build.kind, build.cell.x, build.cell.y))
        .collect();
    push_group(&mut output, "Builds", &builds);

    let spawns: Vec<String> = plan
        .spawns
        .iter()
        .map(|spawn| {
            format!(
                "{:?} x{} @ ({}, {})",
                spawn.kind, spawn.amount, spawn.cell.x, spawn.cell.y
            )
        })
        .collect();
    push_group(&mut output, "Spawns", &spawns);

    let mut pathed = 0_u32;
    let mut held = 0_u32;
    let mut fallback = 0_u32;
    let mut stranded = 0_u32;
    for robot in &plan.robots {
        match &robot.assignment {
            Assignment::Pathed { .. } => pathed += 1,
            Assignment::Hold => held += 1,
            Assignment::Fallback { .. } => fallback += 1,
            Assignment::Unassigned => stranded += 1,
        }
    }
    output.push_str(&format!(
        "Robots:  {pathed} pathed, {held} held, {fallback} fallback, {stranded} stranded\n"
    ));

    output
}

/// Append one labelled action group, or "none" when the group is empty.
fn push_group(output: &mut String, label: &str, entries: &[String]) {
    if entries.is_empty() {
        output.push_str(&format!("{label}:  none\n"));
    } else {
        output.push_str(&format!("{label}:  {}\n", entries.join(", ")));
    }
}

/// Render the header line with turn number and matter banks.
fn render_header(output: &mut String, state: &GameState) {
    output.push_str(&format!(
        "{BOLD}Turn {}{RESET}    {MINE_COLOR}me {}{RESET} vs {FOE_COLOR}opp {}{RESET} matter\n",
        state.turn(),
        state.my_matter(),
        state.opp_matter(),
    ));
}

/// Render the board grid with box-drawing borders.
fn render_grid(output: &mut String, state: &GameState, colors: bool) {
    let board = state.board();
    let width = usize::from(board.width());

    output.push('┌');
    for _ in 0..(width * 2 + 1) {
        output.push('─');
    }
    output.push_str("┐\n");

    for row in board.cells().chunks(width.max(1)) {
        output.push_str("│ ");
        for cell in row {
            render_cell(output, cell, colors);
            output.push(' ');
        }
        output.push_str("│\n");
    }

    output.push('└');
    for _ in 0..(width * 2 + 1) {
        output.push('─');
    }
    output.push_str("┘\n");
}

/// Render a single cell.
fn render_cell(output: &mut String, cell: &Cell, colors: bool) {
    if !colors {
        output.push(cell_symbol(cell));
        return;
    }
    if cell.is_grass() {
        output.push(' ');
        return;
    }

    let color = owner_color(cell.owner);
    if cell.recycler {
        output.push_str(&format!("{color}{BOLD}R{RESET}"));
    } else if cell.units > 0 {
        output.push_str(&format!("{color}{}{RESET}", unit_char(cell.units)));
    } else if cell.is_neutral() {
        output.push_str(&format!("{NEUTRAL_COLOR}.{RESET}"));
    } else {
        output.push_str(&format!("{color}#{RESET}"));
    }
}

/// The display character for a cell, without styling.
fn cell_symbol(cell: &Cell) -> char {
    if cell.is_grass() {
        ' '
    } else if cell.recycler {
        'R'
    } else if cell.units > 0 {
        unit_char(cell.units)
    } else if cell.is_neutral() {
        '.'
    } else {
        '#'
    }
}

/// Convert a unit count to a display character.
fn unit_char(units: u32) -> char {
    match units {
        0 => ' ',
        1..=9 => char::from_digit(units, 10).unwrap_or('9'),
        _ => '+', // More than 9
    }
}

/// Get the ANSI color for an owner.
const fn owner_color(owner: Owner) -> &'static str {
    match owner {
        Owner::Mine => MINE_COLOR,
        Owner::Foe => FOE_COLOR,
        Owner::Neutral => NEUTRAL_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CellRef, RobotAction};
    use crate::scenario::generate_scenario;

    fn rendered_scenario() -> String {
        let snapshot = generate_scenario(3, 8, 4).unwrap();
        let mut state = GameState::new(8, 4).unwrap();
        state.update(&snapshot).unwrap();
        render_board(&state)
    }

    #[test]
    fn test_render_board_basic() {
        let output = rendered_scenario();

        // Should contain turn and matter info
        assert!(output.contains("Turn 1"));
        assert!(output.contains("matter"));

        // Should contain border characters
        assert!(output.contains("┌"));
        assert!(output.contains("┘"));

        // Should contain legend
        assert!(output.contains("Legend"));

        // Starting units show up as digits
        assert!(output.contains('1'));
    }

    #[test]
    fn test_render_board_plain_has_no_escapes() {
        let snapshot = generate_scenario(3, 8, 4).unwrap();
        let mut state = GameState::new(8, 4).unwrap();
        state.update(&snapshot).unwrap();

        let output = render_board_plain(&state);
        assert!(!output.contains('\u{1b}'));
        assert!(output.contains("Turn 1"));
        assert!(output.contains("Legend"));
    }

    #[test]
    fn test_unit_char() {
        assert_eq!(unit_char(0), ' ');
        assert_eq!(unit_char(1), '1');
        assert_eq!(unit_char(5), '5');
        assert_eq!(unit_char(9), '9');
        assert_eq!(unit_char(10), '+');
        assert_eq!(unit_char(100), '+');
    }

    #[test]
    fn test_owner_color_distinct() {
        assert_ne!(owner_color(Owner::Mine), owner_color(Owner::Foe));
        assert_ne!(owner_color(Owner::Mine), owner_color(Owner::Neutral));
    }

    #[test]
    fn test_render_summary_counts_assignments() {
        let plan = TurnPlan {
            robots: vec![
                RobotAction {
                    origin: CellRef { id: 0, x: 0, y: 0 },
                    assignment: Assignment::Hold,
                },
                RobotAction {
                    origin: CellRef { id: 0, x: 0, y: 0 },
                    assignment: Assignment::Unassigned,
                },
            ],
            ..TurnPlan::default()
        };

        let output = render_summary(&plan);
        assert!(output.contains("Builds:  none"));
        assert!(output.contains("Spawns:  none"));
        assert!(output.contains("0 pathed, 1 held, 0 fallback, 1 stranded"));
    }
}
