//! Terminal input events
//!
//! A background task polls crossterm and forwards the events the runtime cares
//! about. Polling happens on its own task so the action loop never blocks on
//! terminal I/O.

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Terminal events forwarded to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

impl EventKind {
    /// Convert a crossterm event, dropping the kinds the runtime ignores.
    ///
    /// Key release/repeat events are dropped so each key press maps to exactly
    /// one event on every platform.
    pub fn from_crossterm(event: event::Event) -> Option<Self> {
        match event {
            event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                Some(EventKind::Key(key))
            }
            event::Event::Resize(w, h) => Some(EventKind::Resize(w, h)),
            _ => None,
        }
    }
}

/// Configuration for the event poller.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Timeout passed to each `crossterm::event::poll` call.
    pub poll_timeout: Duration,
    /// Sleep between poll cycles.
    pub loop_sleep: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            loop_sleep: Duration::from_millis(16),
        }
    }
}

/// Spawn a task that polls crossterm until `cancel_token` fires.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<EventKind>,
    config: PollerConfig,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(config.loop_sleep) => {
                    let mut events_processed = 0;
                    while events_processed < MAX_EVENTS_PER_BATCH
                        && event::poll(config.poll_timeout).unwrap_or(false)
                    {
                        events_processed += 1;
                        let Ok(evt) = event::read() else {
                            continue;
                        };
                        if let Some(kind) = EventKind::from_crossterm(evt) {
                            if tx.send(kind).is_err() {
                                debug!("Event channel closed, stopping poller");
                                return;
                            }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key_with_kind(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('k'),
            modifiers: KeyModifiers::empty(),
            kind,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_key_press_is_forwarded() {
        let key = key_with_kind(KeyEventKind::Press);
        assert_eq!(
            EventKind::from_crossterm(event::Event::Key(key)),
            Some(EventKind::Key(key))
        );
    }

    #[test]
    fn test_key_release_is_dropped() {
        let key = key_with_kind(KeyEventKind::Release);
        assert_eq!(EventKind::from_crossterm(event::Event::Key(key)), None);
    }

    #[test]
    fn test_resize_and_focus() {
        assert_eq!(
            EventKind::from_crossterm(event::Event::Resize(80, 24)),
            Some(EventKind::Resize(80, 24))
        );
        assert_eq!(EventKind::from_crossterm(event::Event::FocusGained), None);
    }
}
