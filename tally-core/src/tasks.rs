//! Task manager for async effects
//!
//! Keyed tasks are mutually exclusive: spawning under a key that is already
//! running cancels the old task first. Cancelling a task also revokes every
//! action it already queued but that has not been reduced yet, so a cancelled
//! timer can never bump the counter after the cancel was processed.
//!
//! # Example
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(tx);
//!
//! // One-shot task, result is sent back as an action
//! tasks.spawn("fact", async move { Action::FactResponse(client.fetch(3).await) });
//!
//! // Long-lived stream, every item is sent back
//! tasks.stream("timer", ticks.map(|_| Action::TimerTicked));
//!
//! // Stop the stream; ticks still sitting in the queue are revoked
//! tasks.cancel(&TaskKey::new("timer"));
//! ```

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::Action;

/// Identifies a task for cancellation and replacement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    /// Create a new task key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An action travelling through the runtime queue.
///
/// Actions produced by keyed tasks carry the task's cancellation token; once
/// the task is cancelled the delivery is revoked and must not be reduced.
#[derive(Debug)]
pub struct Delivery<A> {
    action: A,
    token: Option<CancellationToken>,
}

impl<A> Delivery<A> {
    /// Wrap an action that cannot be revoked (user input, detached tasks).
    pub fn new(action: A) -> Self {
        Self {
            action,
            token: None,
        }
    }

    fn from_task(action: A, token: CancellationToken) -> Self {
        Self {
            action,
            token: Some(token),
        }
    }

    /// Whether the task that produced this action has been cancelled.
    pub fn is_revoked(&self) -> bool {
        self.token.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Borrow the carried action.
    pub fn action(&self) -> &A {
        &self.action
    }

    /// Unwrap the carried action.
    pub fn into_action(self) -> A {
        self.action
    }
}

/// Sending half of the runtime action queue.
pub type DeliveryTx<A> = mpsc::UnboundedSender<Delivery<A>>;

/// Receiving half of the runtime action queue.
pub type DeliveryRx<A> = mpsc::UnboundedReceiver<Delivery<A>>;

struct Running {
    abort: AbortHandle,
    token: CancellationToken,
}

impl Running {
    fn stop(self) {
        self.token.cancel();
        self.abort.abort();
    }
}

/// Manages async task lifecycle with keyed cancellation.
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, Running>,
    detached: Vec<AbortHandle>,
    action_tx: DeliveryTx<A>,
}

impl<A> TaskManager<A>
where
    A: Action,
{
    /// Create a new task manager sending results into `action_tx`.
    pub fn new(action_tx: DeliveryTx<A>) -> Self {
        Self {
            tasks: HashMap::new(),
            detached: Vec::new(),
            action_tx,
        }
    }

    /// Spawn a one-shot task, cancelling any existing task with the same key.
    ///
    /// The future's output is sent as an action when it completes. A task
    /// cancelled before completion sends nothing.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let token = CancellationToken::new();
        let task_token = token.clone();
        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            if !task_token.is_cancelled() {
                let _ = tx.send(Delivery::from_task(action, task_token));
            }
        });

        debug!(task = key.name(), "Spawned task");
        self.tasks.insert(
            key,
            Running {
                abort: handle.abort_handle(),
                token,
            },
        );
        self
    }

    /// Run a stream under a key, sending every item as an action.
    ///
    /// Any existing task with the same key is cancelled first, so at most one
    /// stream per key is ever delivering.
    pub fn stream<S>(&mut self, key: impl Into<TaskKey>, stream: S) -> &mut Self
    where
        S: Stream<Item = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let token = CancellationToken::new();
        let task_token = token.clone();
        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::pin!(stream);
            while let Some(action) = stream.next().await {
                if task_token.is_cancelled() {
                    break;
                }
                if tx
                    .send(Delivery::from_task(action, task_token.clone()))
                    .is_err()
                {
                    // Runtime gone
                    break;
                }
            }
        });

        debug!(task = key.name(), "Started stream task");
        self.tasks.insert(
            key,
            Running {
                abort: handle.abort_handle(),
                token,
            },
        );
        self
    }

    /// Spawn an untracked one-shot task.
    ///
    /// Detached tasks are never replaced or revoked; they are only aborted by
    /// [`cancel_all`](Self::cancel_all) or when the manager is dropped.
    pub fn detach<F>(&mut self, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.detached.retain(|h| !h.is_finished());

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            let _ = tx.send(Delivery::new(action));
        });
        self.detached.push(handle.abort_handle());
        self
    }

    /// Cancel a task by key. No-op if nothing runs under that key.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(running) = self.tasks.remove(key) {
            debug!(task = key.name(), "Cancelled task");
            running.stop();
        }
    }

    /// Cancel all running tasks, keyed and detached.
    pub fn cancel_all(&mut self) {
        for (_, running) in self.tasks.drain() {
            running.stop();
        }
        for handle in self.detached.drain(..) {
            handle.abort();
        }
    }

    /// Check if a keyed task is still running.
    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks
            .get(key)
            .is_some_and(|running| !running.abort.is_finished())
    }

    /// Number of keyed tasks still running.
    pub fn len(&self) -> usize {
        self.tasks
            .values()
            .filter(|running| !running.abort.is_finished())
            .count()
    }

    /// Check if there are no keyed tasks running.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of detached tasks that have not finished yet.
    pub fn detached_in_flight(&self) -> usize {
        self.detached.iter().filter(|h| !h.is_finished()).count()
    }

    /// Keys of all keyed tasks still running.
    pub fn running_keys(&self) -> impl Iterator<Item = &TaskKey> {
        self.tasks
            .iter()
            .filter(|(_, running)| !running.abort.is_finished())
            .map(|(key, _)| key)
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, running) in self.tasks.drain() {
            running.stop();
        }
        for handle in self.detached.drain(..) {
            handle.abort();
        }
    }
}
