//! Terminal view
//!
//! Pure functions of [`State`]: `render` draws it and `map_event` turns key
//! presses into actions. Neither touches the store.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tally_core::{EventKind, EventOutcome};

use crate::action::Action;
use crate::state::State;

pub const LOADING_TEXT: &str = "Loading fact...";
const HELP: &str = "-/j: -1  +/k: +1  f: fact  t: timer  q: quit";
const PANEL_WIDTH: u16 = 50;

pub fn render(frame: &mut Frame, area: Rect, state: &State) {
    let [body, help_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    let [_, column, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(PANEL_WIDTH),
        Constraint::Fill(1),
    ])
    .flex(Flex::Center)
    .areas(body);

    let [counter_area, fact_area, timer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(column);

    render_counter(frame, counter_area, state);
    render_fact(frame, fact_area, state);
    render_timer(frame, timer_area, state);

    let help = Paragraph::new(HELP)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

fn render_counter(frame: &mut Frame, area: Rect, state: &State) {
    let block = Block::default()
        .title(" Counter ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = Line::from(vec![
        Span::styled("-  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            state.count.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  +", Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_fact(frame: &mut Frame, area: Rect, state: &State) {
    let block = Block::default().title(" Get fact ").borders(Borders::ALL);

    let line = if state.is_loading_fact {
        Line::styled(LOADING_TEXT, Style::default().fg(Color::Yellow))
    } else if let Some(error) = &state.error_message {
        Line::styled(error.as_str(), Style::default().fg(Color::Red))
    } else if let Some(fact) = &state.fact {
        Line::raw(fact.as_str())
    } else {
        Line::styled("Press f for a fact", Style::default().fg(Color::DarkGray))
    };

    frame.render_widget(
        Paragraph::new(line).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn render_timer(frame: &mut Frame, area: Rect, state: &State) {
    let color = if state.is_timer_on {
        Color::Green
    } else {
        Color::Gray
    };
    let block = Block::default()
        .title(" Timer ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    frame.render_widget(
        Paragraph::new(state.timer_label())
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Map a terminal event to actions or quit.
pub fn map_event(event: &EventKind, _state: &State) -> EventOutcome<Action> {
    match event {
        EventKind::Key(key) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return match key.code {
                    KeyCode::Char('c') => EventOutcome::quit(),
                    _ => EventOutcome::ignored(),
                };
            }
            match key.code {
                KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => {
                    EventOutcome::action(Action::Decrement)
                }
                KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('k') | KeyCode::Up => {
                    EventOutcome::action(Action::Increment)
                }
                KeyCode::Char('f') => EventOutcome::action(Action::GetFact),
                KeyCode::Char('t') => EventOutcome::action(Action::ToggleTimer),
                KeyCode::Char('q') | KeyCode::Esc => EventOutcome::quit(),
                _ => EventOutcome::ignored(),
            }
        }
        EventKind::Resize(..) => EventOutcome::ignored().with_render(),
    }
}
