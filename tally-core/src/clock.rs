//! Periodic tick sources
//!
//! Effects that repeat on a schedule ask a [`Ticker`] for a stream instead of
//! calling `tokio::time` directly, so tests can swap the clock.
//!
//! - [`IntervalTicker`] follows tokio's clock. Under a paused test runtime
//!   (`#[tokio::test(start_paused = true)]`) it becomes a virtual clock driven
//!   by `tokio::time::advance`.
//! - [`ManualTicker`] ignores time entirely and ticks when told to.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::{IntervalStream, UnboundedReceiverStream};
use tokio_stream::{Stream, StreamExt};

/// Stream of tick signals.
pub type TickStream = Pin<Box<dyn Stream<Item = ()> + Send + 'static>>;

/// A source of periodic ticks.
pub trait Ticker: Send + Sync + 'static {
    /// Start a tick stream with the given period.
    ///
    /// The schedule starts when this is called, not when the stream is first
    /// polled; the first tick arrives one period later.
    fn ticks(&self, period: Duration) -> TickStream;
}

impl<T: Ticker + ?Sized> Ticker for Arc<T> {
    fn ticks(&self, period: Duration) -> TickStream {
        (**self).ticks(period)
    }
}

/// Shortest period [`IntervalTicker`] will schedule.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Ticker backed by `tokio::time::interval_at`.
///
/// Ticks missed while the consumer was busy are delivered in a burst, so the
/// number of ticks always matches elapsed time. Periods shorter than
/// [`MIN_PERIOD`] (including zero) are raised to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    fn ticks(&self, period: Duration) -> TickStream {
        let period = period.max(MIN_PERIOD);
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Box::pin(IntervalStream::new(interval).map(|_| ()))
    }
}

/// Ticker that fires only when [`tick`](ManualTicker::tick) is called.
///
/// Clones share the same set of streams.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<()>>>>,
}

impl ManualTicker {
    /// Create a ticker with no streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one tick to every live stream.
    ///
    /// Returns how many streams received it. Dropped streams are forgotten.
    pub fn tick(&self) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(()).is_ok());
        subscribers.len()
    }

    /// Number of streams that are still being consumed.
    pub fn live_streams(&self) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<()>>> {
        // Poisoning is ignored: the list stays valid across a panic
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Ticker for ManualTicker {
    fn ticks(&self, _period: Duration) -> TickStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}
