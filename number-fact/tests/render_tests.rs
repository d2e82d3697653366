use ratatui::buffer::Buffer;
use ratatui::style::Color;
use tally_core::testing::buffer_to_string_plain;
use tally_core::RenderHarness;

use number_fact::ui::{render, LOADING_TEXT};
use number_fact::State;

fn draw(state: &State) -> String {
    let mut harness = RenderHarness::new(60, 14);
    harness.render_to_string_plain(|frame| render(frame, frame.area(), state))
}

/// Foreground color of the first cell of `text` in `buffer`.
fn fg_of(buffer: &Buffer, text: &str) -> Option<Color> {
    let plain = buffer_to_string_plain(buffer);
    let width = buffer.area.width as usize;
    plain.lines().enumerate().find_map(|(y, line)| {
        line.find(text).map(|byte_x| {
            let x = line[..byte_x].chars().count();
            buffer.content[y * width + x].fg
        })
    })
}

#[test]
fn test_initial_screen() {
    let screen = draw(&State::default());
    assert!(screen.contains("Counter"));
    assert!(screen.contains("-  0  +"));
    assert!(screen.contains("Start timer"));
    assert!(screen.contains("Press f for a fact"));
}

#[test]
fn test_count_and_running_timer() {
    let state = State {
        count: -12,
        is_timer_on: true,
        ..Default::default()
    };
    let screen = draw(&state);
    assert!(screen.contains("-12"));
    assert!(screen.contains("Stop timer"));
    assert!(!screen.contains("Start timer"));
}

#[test]
fn test_loading_indicator() {
    let state = State {
        is_loading_fact: true,
        ..Default::default()
    };
    let screen = draw(&state);
    assert!(screen.contains(LOADING_TEXT));
}

#[test]
fn test_fact_text() {
    let state = State {
        count: 3,
        fact: Some("3 is the number of spatial dimensions".into()),
        ..Default::default()
    };
    let screen = draw(&state);
    assert!(screen.contains("3 is the number of spatial dimensions"));
    assert!(!screen.contains(LOADING_TEXT));
}

#[test]
fn test_error_is_red() {
    let state = State {
        error_message: Some("Failed to fetch fact".into()),
        ..Default::default()
    };
    let mut harness = RenderHarness::new(60, 14);
    let buffer = harness.render(|frame| render(frame, frame.area(), &state));

    assert_eq!(fg_of(buffer, "Failed to fetch fact"), Some(Color::Red));
}
