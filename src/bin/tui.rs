//! Gatemon TUI - live timing gate dashboard
//!
//! Runs the poll driver in-process and renders the engine's derived view:
//! - Ordered gate table with activity coloring and in-order deltas
//! - Selection panel with pairwise sequence deltas
//! - Aggregate stats (total / fastest split / average split)
//!
//! Keys: ↑/↓ move cursor, u/d reorder gate, space toggle selection,
//! a select all, c clear, f first two, l last two, q quit.

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gatemon::domain::types::{ActivityClass, GateView, SequenceDelta, SequenceStats};
use gatemon::infra::{Config, Metrics};
use gatemon::io::HttpSnapshotSource;
use gatemon::services::{GateEngine, PollDriver};
use parking_lot::Mutex;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Gatemon TUI - interactive timing gate dashboard
#[derive(Parser, Debug)]
#[command(name = "gatemon-tui", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

type SharedEngine = Arc<Mutex<GateEngine>>;

/// Cursor and display state owned by the UI loop
struct UiState {
    cursor: usize,
}

impl UiState {
    fn clamp_cursor(&mut self, gate_count: usize) {
        if gate_count == 0 {
            self.cursor = 0;
        } else if self.cursor >= gate_count {
            self.cursor = gate_count - 1;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    let engine: SharedEngine = Arc::new(Mutex::new(GateEngine::new(config.activity_thresholds())));
    let metrics = Arc::new(Metrics::new());
    let source = Arc::new(HttpSnapshotSource::new(&config)?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver = PollDriver::new(
        source,
        engine.clone(),
        metrics,
        Duration::from_millis(config.poll_interval_ms()),
    );
    let driver_handle = tokio::spawn(driver.run(shutdown_rx));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, engine).await;

    let _ = shutdown_tx.send(true);
    let _ = driver_handle.await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: SharedEngine,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut ui = UiState { cursor: 0 };

    loop {
        {
            let e = engine.lock();
            ui.clamp_cursor(e.gate_count());
            terminal.draw(|f| draw_ui(f, &e, &ui))?;
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(key.code, &engine, &mut ui) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

/// Returns true when the UI should exit
fn handle_key(code: KeyCode, engine: &SharedEngine, ui: &mut UiState) -> bool {
    let mut e = engine.lock();
    let count = e.gate_count();

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Up => {
            ui.cursor = ui.cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            if count > 0 && ui.cursor < count - 1 {
                ui.cursor += 1;
            }
        }
        // Reorder the gate under the cursor; cursor follows the gate
        KeyCode::Char('u') => {
            if ui.cursor > 0 {
                e.move_gate(ui.cursor, ui.cursor - 1);
                ui.cursor -= 1;
            }
        }
        KeyCode::Char('d') => {
            if count > 0 && ui.cursor < count - 1 {
                e.move_gate(ui.cursor, ui.cursor + 1);
                ui.cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            let id = e.view().get(ui.cursor).map(|g| g.id.clone());
            if let Some(id) = id {
                e.toggle(&id);
            }
        }
        KeyCode::Char('a') => e.select_all(),
        KeyCode::Char('c') => e.clear_selection(),
        KeyCode::Char('f') => e.select_first_n(2),
        KeyCode::Char('l') => e.select_last_n(2),
        _ => {}
    }
    false
}

fn draw_ui(f: &mut Frame, engine: &GateEngine, ui: &UiState) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
        ])
        .split(f.area());

    draw_header(f, main_chunks[0], engine);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[1]);

    draw_gate_table(f, body[0], engine, ui);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(body[1]);

    draw_sequence_panel(f, right[0], engine);
    draw_stats_panel(f, right[1], engine.stats());
}

fn draw_header(f: &mut Frame, area: Rect, engine: &GateEngine) {
    let status_color = if engine.connected() { Color::Green } else { Color::Red };
    let status_text = if engine.connected() { "CONNECTED" } else { "DISCONNECTED" };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Gatemon ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw(format!(" | Gates: {}", engine.gate_count())),
        Span::raw(format!(" | Selected: {}", engine.selection().len())),
        Span::raw(" | ↑↓ move cursor, u/d reorder, space select, a/c/f/l bulk, q quit"),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn activity_color(activity: ActivityClass) -> Color {
    match activity {
        ActivityClass::Fresh => Color::Green,
        ActivityClass::Recent => Color::Yellow,
        ActivityClass::Moderate => Color::LightRed,
        ActivityClass::Stale => Color::Red,
    }
}

/// Format seconds the way the device UI does: sub-second values in
/// milliseconds, everything else with millisecond precision in seconds
fn format_secs(secs: f64) -> String {
    if secs.abs() < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.3}s", secs)
    }
}

fn draw_gate_table(f: &mut Frame, area: Rect, engine: &GateEngine, ui: &UiState) {
    let rows: Vec<Row> = engine
        .view()
        .iter()
        .map(|gate: &GateView| {
            let selected = engine.is_selected(&gate.id);
            let cursor = gate.rank == ui.cursor;

            let marker = match (cursor, selected) {
                (true, true) => "▶●",
                (true, false) => "▶ ",
                (false, true) => " ●",
                (false, false) => "  ",
            };
            let delta = gate
                .delta_from_previous_secs
                .map(format_secs)
                .unwrap_or_else(|| "-".to_string());

            let style = Style::default().fg(activity_color(gate.activity));
            let style = if cursor { style.add_modifier(Modifier::BOLD) } else { style };

            Row::new(vec![
                marker.to_string(),
                format!("{}", gate.rank + 1),
                gate.id.0.to_uppercase(),
                format_secs(gate.since_last_trigger_secs),
                delta,
                gate.activity.as_str().to_string(),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Cursor/selection marker
            Constraint::Length(3),  // Rank
            Constraint::Length(18), // Address
            Constraint::Length(10), // Since last
            Constraint::Length(10), // Delta prev
            Constraint::Length(9),  // Activity
        ],
    )
    .header(
        Row::new(vec!["", "#", "Gate", "Last", "Δ Prev", "Activity"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .title(" Gate Order ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(table, area);
}

fn draw_sequence_panel(f: &mut Frame, area: Rect, engine: &GateEngine) {
    let items: Vec<ListItem> = if engine.selection().is_empty() {
        vec![ListItem::new(Span::styled(
            "Select gates to see timing analysis",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        engine
            .deltas()
            .iter()
            .map(|d: &SequenceDelta| {
                let sign = if d.delta_secs >= 0.0 { "+" } else { "-" };
                let magnitude = format_secs(d.delta_secs.abs());
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} → {}  ", short_addr(&d.from.0), short_addr(&d.to.0))),
                    Span::styled(
                        format!("{}{}", sign, magnitude),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .title(" Sequence Deltas ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(list, area);
}

fn draw_stats_panel(f: &mut Frame, area: Rect, stats: Option<SequenceStats>) {
    let lines = match stats {
        Some(stats) => vec![
            Line::from(format!("Total:    {}", format_secs(stats.total_secs))),
            Line::from(format!("Fastest:  {}", format_secs(stats.fastest_abs_secs))),
            Line::from(format!("Average:  {}", format_secs(stats.average_abs_secs))),
        ],
        None => vec![Line::from(Span::styled(
            "Select at least two gates",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Sequence Stats ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(panel, area);
}

/// Last segment of a MAC-style address for compact display
fn short_addr(addr: &str) -> String {
    let tail: String = addr.chars().rev().take(8).collect::<Vec<_>>().into_iter().rev().collect();
    tail.to_uppercase()
}
