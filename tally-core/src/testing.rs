//! Test utilities for tally applications
//!
//! - [`TestStore`]: exhaustive store assertions for reducers and their effects
//! - [`RenderHarness`]: render into a ratatui `TestBackend` and read it back
//! - [`char_key`], [`ctrl_key`], [`key`]: build key events
//!
//! # Example
//!
//! ```ignore
//! #[tokio::test(start_paused = true)]
//! async fn timer_counts_up() {
//!     let env = Environment::new(StubFacts::ok("fact"), IntervalTicker);
//!     let mut store = TestStore::new(State::default(), reducer, env.handler());
//!
//!     store.send(Action::ToggleTimer, |s| s.is_timer_on = true);
//!     tokio::time::advance(Duration::from_secs(1)).await;
//!     store.receive(Action::TimerTicked, |s| s.count = 1).await;
//!     store.send(Action::ToggleTimer, |s| s.is_timer_on = false);
//!     store.finish().await;
//! }
//! ```

use std::fmt::Debug;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::effect::EffectReducer;
use crate::runtime::{recv_live, EffectContext};
use crate::tasks::{DeliveryRx, TaskManager};
use crate::Action;

/// How many times the test task yields to let effect tasks run before
/// concluding that nothing else is coming.
const SETTLE_YIELDS: usize = 16;

/// How long [`TestStore::receive`] waits for an effect action.
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a `KeyEvent` for a key code with no modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Create a `KeyEvent` for a character with no modifiers.
///
/// # Examples
///
/// ```
/// use tally_core::testing::char_key;
/// use crossterm::event::KeyCode;
///
/// let k = char_key('f');
/// assert_eq!(k.code, KeyCode::Char('f'));
/// ```
pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

/// Create a `KeyEvent` for a character with Ctrl modifier.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent {
        modifiers: KeyModifiers::CONTROL,
        ..char_key(c)
    }
}

/// Exhaustive test store.
///
/// Every [`send`](Self::send) and [`receive`](Self::receive) states the full
/// expected state change; any difference fails the test. Effects run for real
/// through the supplied handler, so effect-produced actions must be
/// acknowledged with `receive` in the order they arrive.
pub struct TestStore<S, A: Action, E, H> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    handler: H,
    action_rx: DeliveryRx<A>,
    tasks: TaskManager<A>,
}

impl<S, A, E, H> TestStore<S, A, E, H>
where
    S: Clone + PartialEq + Debug,
    A: Action + PartialEq,
    H: FnMut(E, &mut EffectContext<A>),
{
    /// Create a test store from state, reducer and effect handler.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>, handler: H) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let tasks = TaskManager::new(action_tx);
        Self {
            state,
            reducer,
            handler,
            action_rx,
            tasks,
        }
    }

    /// Current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Running effect tasks.
    pub fn tasks(&self) -> &TaskManager<A> {
        &self.tasks
    }

    /// Send an action and assert the resulting state.
    ///
    /// `update` receives a copy of the previous state and must turn it into the
    /// expected one.
    #[track_caller]
    pub fn send(&mut self, action: A, update: impl FnOnce(&mut S)) {
        let mut expected = self.state.clone();
        update(&mut expected);
        let label = format!("{action:?}");
        self.reduce(action);
        assert_eq!(
            self.state, expected,
            "state after sending {label} did not match"
        );
    }

    /// Wait for the next effect action, assert it, reduce it and assert the
    /// resulting state.
    ///
    /// # Panics
    ///
    /// Panics if no action arrives within the timeout or if the action or the
    /// state differs from what was expected.
    pub async fn receive(&mut self, expected_action: A, update: impl FnOnce(&mut S)) {
        let received = tokio::time::timeout(RECEIVE_TIMEOUT, recv_live(&mut self.action_rx)).await;
        let action = match received {
            Ok(Some(action)) => action,
            Ok(None) => panic!("action channel closed while waiting for {expected_action:?}"),
            Err(_) => panic!(
                "expected to receive {expected_action:?} within {RECEIVE_TIMEOUT:?}, got nothing"
            ),
        };
        assert_eq!(action, expected_action, "received an unexpected action");

        let mut expected = self.state.clone();
        update(&mut expected);
        self.reduce(action);
        assert_eq!(
            self.state, expected,
            "state after receiving {expected_action:?} did not match"
        );
    }

    /// Let effect tasks run, then assert that none of them produced an
    /// action that is still waiting to be received.
    ///
    /// Does not advance time.
    pub async fn assert_no_received(&mut self) {
        for _ in 0..SETTLE_YIELDS {
            tokio::task::yield_now().await;
        }
        let mut pending = Vec::new();
        while let Ok(delivery) = self.action_rx.try_recv() {
            if !delivery.is_revoked() {
                pending.push(delivery.into_action());
            }
        }
        assert!(
            pending.is_empty(),
            "expected no further actions, but received: {pending:?}"
        );
    }

    /// Assert that nothing is pending and no effect task is still running.
    ///
    /// A detached task that has not finished would deliver an action nobody
    /// received, so it fails the test just like a running keyed task.
    pub async fn finish(mut self) {
        self.assert_no_received().await;
        let in_flight = self.tasks.detached_in_flight();
        assert!(
            in_flight == 0,
            "{in_flight} detached effect task(s) still in flight at end of test"
        );
        let running: Vec<_> = self
            .tasks
            .running_keys()
            .map(|key| key.name().to_string())
            .collect();
        assert!(
            running.is_empty(),
            "effect tasks still running at end of test: {running:?}"
        );
    }

    fn reduce(&mut self, action: A) {
        let result = (self.reducer)(&mut self.state, action);
        let mut ctx = EffectContext::new(&mut self.tasks);
        for effect in result.effects {
            (self.handler)(effect, &mut ctx);
        }
    }
}

/// Renders into an in-memory terminal.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// Create a harness with the given terminal size.
    ///
    /// # Panics
    ///
    /// Panics if the test terminal cannot be created.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|e| panic!("failed to create test terminal: {e}"));
        Self { terminal }
    }

    /// Render a frame and return the resulting buffer.
    pub fn render(&mut self, draw: impl FnOnce(&mut Frame)) -> &Buffer {
        self.terminal
            .draw(draw)
            .unwrap_or_else(|e| panic!("failed to draw test frame: {e}"));
        self.terminal.backend().buffer()
    }

    /// Render a frame and return its text, one line per row, trailing
    /// whitespace trimmed.
    pub fn render_to_string_plain(&mut self, draw: impl FnOnce(&mut Frame)) -> String {
        buffer_to_string_plain(self.render(draw))
    }
}

/// Convert a buffer into plain text, one line per row.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
