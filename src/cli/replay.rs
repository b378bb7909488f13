//! Replay command implementation.

use super::{CliError, ReplayFormat};
use scrapper::replay::{render_board, render_board_plain, render_summary, MatchLog, ReplaySession};
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the match log cannot be loaded or replayed.
pub(crate) fn execute(
    log_path: &Path,
    format: ReplayFormat,
    turn: Option<u32>,
    speed: u64,
) -> Result<(), CliError> {
    let log = MatchLog::load(log_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load match log {}: {e}",
            log_path.display()
        ))
    })?;

    let session = if let Some(target_turn) = turn {
        ReplaySession::new_at_turn(log, target_turn)?
    } else {
        ReplaySession::new(log)?
    };

    match format {
        ReplayFormat::Tui => run_replay_tui(session, speed),
        ReplayFormat::Text => print_text_replay(session),
    }
}

fn run_replay_tui(session: ReplaySession, speed_ms: u64) -> Result<(), CliError> {
    use crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{backend::CrosstermBackend, Terminal};
    use std::io::stdout;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(&mut terminal, session, speed_ms);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_tui_loop(
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    session: ReplaySession,
    speed_ms: u64,
) -> Result<(), CliError> {
    use crossterm::event::{self, Event, KeyCode, KeyEventKind};
    use std::time::{Duration, Instant};

    struct ReplayApp {
        session: ReplaySession,
        paused: bool,
        speed: Duration,
        last_step: Instant,
    }

    let mut app = ReplayApp {
        session,
        paused: false,
        speed: Duration::from_millis(speed_ms),
        last_step: Instant::now(),
    };

    loop {
        // Auto-advance while playing
        if !app.paused && !app.session.at_end() && app.last_step.elapsed() >= app.speed {
            let _ = app.session.step_forward();
            app.last_step = Instant::now();
        }

        terminal.draw(|f| {
            use ratatui::layout::{Constraint, Direction, Layout};
            use ratatui::style::{Color, Modifier, Style};
            use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(10),
                    Constraint::Length(6),
                    Constraint::Length(3),
                ])
                .split(f.area());

            // Header
            let status = if app.session.at_end() {
                "END"
            } else if app.paused {
                "PAUSED"
            } else {
                "PLAYING"
            };
            let title = format!(
                " Scrapper Replay | Turn {}/{} | {} ",
                app.session.turn(),
                app.session.max_turn(),
                status
            );
            let header = Paragraph::new(title)
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(header, chunks[0]);

            // Board
            let board = render_board_plain(app.session.state());
            let board_widget = Paragraph::new(board)
                .block(Block::default().borders(Borders::ALL).title(" Board "))
                .wrap(Wrap { trim: false });
            f.render_widget(board_widget, chunks[1]);

            // Plan for this turn
            let mut summary = render_summary(app.session.plan());
            summary.push_str(&format!("Commands: {}", app.session.commands()));
            let plan_widget = Paragraph::new(summary)
                .block(Block::default().borders(Borders::ALL).title(" Plan "))
                .wrap(Wrap { trim: false });
            f.render_widget(plan_widget, chunks[2]);

            // Footer
            let controls = " [q] Quit  [space] Play/Pause  [←/→] Step ";
            let footer = Paragraph::new(controls)
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(footer, chunks[3]);
        })?;

        // Handle input
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char(' ') => {
                app.paused = !app.paused;
                app.last_step = Instant::now();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let _ = app.session.step_forward();
                app.paused = true;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let _ = app.session.step_backward();
                app.paused = true;
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_text_replay(mut session: ReplaySession) -> Result<(), CliError> {
    println!(
        "Replay of {} turns on a {}x{} board",
        session.max_turn(),
        session.log().width,
        session.log().height
    );
    println!();

    loop {
        println!("{}", render_board(session.state()));
        print!("{}", render_summary(session.plan()));
        for event in session.trace() {
            println!("  {event}");
        }
        println!("Commands: {}", session.commands());
        println!();

        if session.at_end() {
            break;
        }
        session.step_forward()?;
    }

    Ok(())
}
