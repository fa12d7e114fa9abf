use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset, GraphType,
    Paragraph, Row, Table,
};

use wc_goals_dashboard::goal_stats::{CategoryCounts, GoalHistogram, OverGoalsTable};
use wc_goals_dashboard::match_dataset::{MatchDataset, default_dataset_path};
use wc_goals_dashboard::state::{AppState, ControlEvent, ControlFocus, apply_event};

const SLICE_COLORS: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Green];

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.cycle_focus_next(),
            KeyCode::BackTab => self.state.cycle_focus_prev(),
            KeyCode::Char('h') | KeyCode::Left => {
                let event = self.state.nudge_focused(-1);
                self.dispatch(event);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let event = self.state.nudge_focused(1);
                self.dispatch(event);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.dispatch(ControlEvent::Reset),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn dispatch(&mut self, event: ControlEvent) {
        if apply_event(&mut self.state, event) && !self.state.view.has_data() {
            self.state
                .push_log("[INFO] No matches for this filter");
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    // A bad dataset is fatal before the terminal is touched.
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_dataset_path);
    let dataset = MatchDataset::load(&path)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(AppState::new(dataset));
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_dashboard(frame, chunks[1], &app.state);

    let footer = Paragraph::new(
        "Tab/Shift-Tab Focus | ←/→ h/l Adjust | r Reset | ? Help | q Quit",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let filter = &state.view.filter;
    let line1 = format!(
        "  .-.  WORLD CUP DASHBOARD | Analyzing the Goals | {}-{} | {} | {} matches",
        filter.years.start, filter.years.end, filter.stage, state.view.match_count
    );
    let line2 = " /___\\".to_string();
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    render_overview(frame, rows[0], state);

    let widths = [
        Constraint::Length(30),
        Constraint::Min(24),
        Constraint::Length(22),
        Constraint::Length(34),
    ];
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(rows[1]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(rows[2]);

    let view = &state.view;
    render_filters(frame, top[0], state);
    render_histogram(frame, top[1], &view.ft_histogram, view.has_data(), "Fulltime Total Goals");
    render_over_table(frame, top[2], &view.ft_over_goals, "FT Over");
    render_donut(frame, top[3], &view.which_half, "Which Half Has More Goals?");

    render_console(frame, bottom[0], state);
    render_histogram(frame, bottom[1], &view.ht_histogram, view.has_data(), "Halftime Total Goals");
    render_over_table(frame, bottom[2], &view.ht_over_goals, "HT Over");
    render_donut(frame, bottom[3], &view.both_teams_score, "Both Teams To Score?");
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Average Goals per Game")
        .borders(Borders::ALL);
    if state.overview.is_empty() {
        frame.render_widget(Paragraph::new("No overview").block(block), area);
        return;
    }

    let ft: Vec<(f64, f64)> = state
        .overview
        .iter()
        .map(|y| (f64::from(y.year), y.avg_ft_goals))
        .collect();
    let ht: Vec<(f64, f64)> = state
        .overview
        .iter()
        .map(|y| (f64::from(y.year), y.avg_ht_goals))
        .collect();

    let (min_year, max_year) = state.dataset().year_bounds();
    let x_max = if max_year > min_year {
        f64::from(max_year)
    } else {
        f64::from(min_year) + 1.0
    };
    let y_max = state
        .overview
        .iter()
        .map(|y| y.avg_ft_goals.max(y.avg_ht_goals))
        .fold(0.0_f64, f64::max)
        .ceil()
        .max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("Fulltime")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&ft),
        Dataset::default()
            .name("Halftime")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&ht),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds([f64::from(min_year), x_max])
                .labels(vec![
                    Span::raw(min_year.to_string()),
                    Span::raw(max_year.to_string()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Avg Goals")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.1}", y_max / 2.0)),
                    Span::raw(format!("{y_max:.1}")),
                ]),
        );
    frame.render_widget(chart, area);
}

fn render_filters(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Filters").borders(Borders::ALL);
    let filter = &state.filter;

    let focus_style = |focus: ControlFocus| {
        if state.focus == focus {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        }
    };
    let years = state.years();
    let marks = match (years.first(), years.last()) {
        (Some(first), Some(last)) => format!("{} steps, {first}..{last}", years.len()),
        _ => "no years".to_string(),
    };

    let lines = vec![
        Line::from("Explore the goal stats in depth"),
        Line::from(""),
        Line::from(vec![
            Span::raw("From  "),
            Span::styled(
                format!("◀ {} ▶", filter.years.start),
                focus_style(ControlFocus::StartYear),
            ),
        ]),
        Line::from(vec![
            Span::raw("To    "),
            Span::styled(
                format!("◀ {} ▶", filter.years.end),
                focus_style(ControlFocus::EndYear),
            ),
        ]),
        Line::from(Span::styled(marks, Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::raw("Stage "),
            Span::styled(
                format!("◀ {} ▶", filter.stage),
                focus_style(ControlFocus::Stage),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "r Reset",
            Style::default().fg(Color::Cyan),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_histogram(
    frame: &mut Frame,
    area: Rect,
    hist: &GoalHistogram,
    has_data: bool,
    title: &str,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if !has_data {
        let empty = Paragraph::new("No matches for this filter")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = hist
        .buckets
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.matches as u64)
                .label(Line::from(b.goals.to_string()))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let slots = hist.buckets.len().max(1) as u16;
    let bar_width = (inner_width / slots).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(hist.max_count().max(1) as u64);
    frame.render_widget(chart, area);
}

fn render_over_table(frame: &mut Frame, area: Rect, table: &OverGoalsTable, title: &str) {
    let header = Row::new(vec![Cell::from("Total Goals"), Cell::from("%")])
        .style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray));
    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.label.clone()),
                Cell::from(format!("{:.3}", row.proportion)),
            ])
        })
        .collect();

    let widget = Table::new(rows, [Constraint::Length(12), Constraint::Min(6)])
        .header(header)
        .block(
            Block::default()
                .title(format!("{title} ({})", table.period.label()))
                .borders(Borders::ALL),
        );
    frame.render_widget(widget, area);
}

/// Donut stand-in: one ring-like band split by share, then a legend.
fn render_donut<T: Copy + std::fmt::Display>(
    frame: &mut Frame,
    area: Rect,
    counts: &CategoryCounts<T>,
    title: &str,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let shares = counts.shares();
    if shares.is_empty() {
        let empty = Paragraph::new("No matches for this filter")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let band = share_band(&shares, width);

    let mut lines = vec![band.clone(), Line::from(""), band, Line::from("")];
    for (idx, ((cat, share), (_, n))) in shares.iter().zip(&counts.counts).enumerate() {
        let color = SLICE_COLORS[idx % SLICE_COLORS.len()];
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::raw(format!("{cat}: {n} ({:.1}%)", share * 100.0)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn share_band<T>(shares: &[(T, f64)], width: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(shares.len());
    let mut used = 0usize;
    for (idx, (_, share)) in shares.iter().enumerate() {
        let cells = if idx + 1 == shares.len() {
            width.saturating_sub(used)
        } else {
            ((share * width as f64).round() as usize).min(width.saturating_sub(used))
        };
        used += cells;
        let color = SLICE_COLORS[idx % SLICE_COLORS.len()];
        spans.push(Span::styled("█".repeat(cells), Style::default().fg(color)));
    }
    Line::from(spans)
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let text = if state.logs.is_empty() {
        "No alerts yet".to_string()
    } else {
        let start = state.logs.len().saturating_sub(visible.max(1));
        state
            .logs
            .iter()
            .skip(start)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    };
    let console = Paragraph::new(text)
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "World Cup Dashboard - Help",
        "",
        "Filters:",
        "  Tab / Shift-Tab   Focus From / To / Stage",
        "  ← / → or h / l    Move year handle or cycle stage",
        "  r                 Reset to full range and All",
        "",
        "Global:",
        "  ?                 Toggle help",
        "  q                 Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
