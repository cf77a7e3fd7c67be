use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use crate::compare::{ComparisonOutcome, Registry};
use super::state::SelectorState;

/// Run the comparison dashboard on the given registry.
pub fn run_app(registry: Registry) -> Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut state = SelectorState::new(registry);
    let result = run_loop(&mut terminal, &mut state);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut SelectorState,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, state))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Up => state.move_up(),
                KeyCode::Down => state.move_down(),
                KeyCode::Enter | KeyCode::Char(' ') => state.toggle_current(),
                KeyCode::Backspace => state.pop_filter(),
                KeyCode::Char(c) => state.push_filter(c),
                _ => {}
            }
        }
    }
}

fn draw(f: &mut Frame, state: &SelectorState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_title(f, chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_leader_list(f, content[0], state);
    render_comparison(f, content[1], state);
    render_status_bar(f, chunks[2], state);
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![Span::styled(
        "🏛️ Polistats",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_leader_list(f: &mut Frame, area: Rect, state: &SelectorState) {
    let items: Vec<ListItem> = state
        .visible()
        .iter()
        .map(|name| {
            let checked = if state.is_selected(name) { "[x]" } else { "[ ]" };
            ListItem::new(format!("{} {}", checked, name))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select two leaders"),
        )
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_comparison(f: &mut Frame, area: Rect, state: &SelectorState) {
    let outcome = state.outcome();
    match outcome {
        ComparisonOutcome::Table(table) => {
            let header = Row::new(vec![
                "Metric".to_string(),
                table.left.clone(),
                table.right.clone(),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD));

            let rows: Vec<Row> = table
                .rows
                .iter()
                .map(|row| {
                    Row::new(vec![
                        row.metric.clone(),
                        format!("{:.1}", row.left),
                        format!("{:.1}", row.right),
                    ])
                })
                .collect();

            let widget = Table::new(
                rows,
                [
                    Constraint::Percentage(50),
                    Constraint::Percentage(25),
                    Constraint::Percentage(25),
                ],
            )
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Comparison between {} and {}",
                table.left, table.right
            )));

            f.render_widget(widget, area);
        }
        other => {
            let message = other.message().unwrap_or_default();
            let paragraph = Paragraph::new(message)
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL).title("Comparison"));
            f.render_widget(paragraph, area);
        }
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, state: &SelectorState) {
    let hints = format!(
        "Filter: {}▏  ↑/↓ move · Space select · Backspace clear · Esc quit · {} selected",
        state.filter,
        state.selected_count()
    );
    let bar = Paragraph::new(hints)
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
}
