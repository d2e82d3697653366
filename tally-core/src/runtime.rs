//! Effect runtime: the single point where state is mutated.
//!
//! Every action, whether it came from the terminal or from an effect task,
//! goes through one unbounded queue and is reduced one at a time in queue
//! order. Effects returned by the reducer are handed to an effect handler
//! together with an [`EffectContext`], which is the only way effect code can
//! start or cancel tasks.

use std::io;
use std::marker::PhantomData;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
use crate::event::{spawn_event_poller, EventKind, PollerConfig};
use crate::store::Middleware;
use crate::tasks::{Delivery, DeliveryRx, DeliveryTx, TaskManager};
use crate::Action;

/// Result of mapping a terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome<A> {
    /// Actions to enqueue.
    pub actions: Vec<A>,
    /// Whether to force a re-render.
    pub needs_render: bool,
    /// Whether the runtime should stop.
    pub quit: bool,
}

impl<A> EventOutcome<A> {
    /// No actions and no render.
    pub fn ignored() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: false,
            quit: false,
        }
    }

    /// Wrap a single action.
    pub fn action(action: A) -> Self {
        Self {
            actions: vec![action],
            ..Self::ignored()
        }
    }

    /// Stop the runtime.
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::ignored()
        }
    }

    /// Mark that a render is needed.
    pub fn with_render(mut self) -> Self {
        self.needs_render = true;
        self
    }
}

impl<A> Default for EventOutcome<A> {
    fn default() -> Self {
        Self::ignored()
    }
}

impl<A> From<A> for EventOutcome<A> {
    fn from(action: A) -> Self {
        Self::action(action)
    }
}

impl<A> From<Option<A>> for EventOutcome<A> {
    fn from(action: Option<A>) -> Self {
        match action {
            Some(action) => Self::action(action),
            None => Self::ignored(),
        }
    }
}

/// Effect store interface used by [`EffectRuntime`].
pub trait EffectStoreLike<S, A: Action, E> {
    /// Dispatch an action and return state changes plus effects.
    fn dispatch(&mut self, action: A) -> DispatchResult<E>;
    /// Get the current state.
    fn state(&self) -> &S;
}

impl<S, A: Action, E> EffectStoreLike<S, A, E> for EffectStore<S, A, E> {
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStore::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStore::state(self)
    }
}

impl<S, A: Action, E, M: Middleware<A>> EffectStoreLike<S, A, E>
    for EffectStoreWithMiddleware<S, A, E, M>
{
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStoreWithMiddleware::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStoreWithMiddleware::state(self)
    }
}

/// Context passed to effect handlers.
pub struct EffectContext<'a, A: Action> {
    tasks: &'a mut TaskManager<A>,
}

impl<'a, A: Action> EffectContext<'a, A> {
    /// Wrap the task manager that effect tasks are started on.
    pub fn new(tasks: &'a mut TaskManager<A>) -> Self {
        Self { tasks }
    }

    /// Access the task manager.
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        self.tasks
    }
}

/// Owns the store, the action queue and the running effect tasks.
pub struct EffectRuntime<S, A: Action, E, St: EffectStoreLike<S, A, E> = EffectStore<S, A, E>> {
    store: St,
    action_tx: DeliveryTx<A>,
    action_rx: DeliveryRx<A>,
    tasks: TaskManager<A>,
    _marker: PhantomData<(S, E)>,
}

impl<S: 'static, A: Action, E> EffectRuntime<S, A, E, EffectStore<S, A, E>> {
    /// Create a runtime from state + effect reducer.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self::from_store(EffectStore::new(state, reducer))
    }
}

impl<S: 'static, A: Action, E, St: EffectStoreLike<S, A, E>> EffectRuntime<S, A, E, St> {
    /// Create a runtime from an existing effect store.
    pub fn from_store(store: St) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let tasks = TaskManager::new(action_tx.clone());

        Self {
            store,
            action_tx,
            action_rx,
            tasks,
            _marker: PhantomData,
        }
    }

    /// Send an action into the runtime queue.
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(Delivery::new(action));
    }

    /// Access the current state.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Access the task manager.
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        &mut self.tasks
    }

    /// Reduce one action and hand its effects to `handle_effect`.
    ///
    /// Returns whether the state changed.
    pub fn dispatch<F>(&mut self, action: A, handle_effect: &mut F) -> bool
    where
        F: FnMut(E, &mut EffectContext<A>),
    {
        reduce::<S, A, E, St, F>(
            &mut self.store,
            &mut self.tasks,
            action,
            handle_effect,
        )
    }

    /// Wait for the next action that is still valid to reduce.
    ///
    /// Actions from cancelled tasks are skipped. Returns `None` only if the
    /// queue is closed, which cannot happen while the runtime is alive.
    pub async fn next_action(&mut self) -> Option<A> {
        recv_live(&mut self.action_rx).await
    }

    /// Reduce every action that is already queued, without waiting.
    ///
    /// Returns whether any of them changed the state.
    pub fn process_pending<F>(&mut self, handle_effect: &mut F) -> bool
    where
        F: FnMut(E, &mut EffectContext<A>),
    {
        let mut changed = false;
        while let Ok(delivery) = self.action_rx.try_recv() {
            if delivery.is_revoked() {
                trace!(action = delivery.action().name(), "Dropped revoked action");
                continue;
            }
            changed |= self.dispatch(delivery.into_action(), handle_effect);
        }
        changed
    }

    /// Cancel every running effect task.
    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
    }

    /// Run the event/action loop until `map_event` asks to quit.
    pub async fn run<B, FRender, FEvent, FEffect, R>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut render: FRender,
        mut map_event: FEvent,
        mut handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &S),
        FEvent: FnMut(&EventKind, &S) -> R,
        R: Into<EventOutcome<A>>,
        FEffect: FnMut(E, &mut EffectContext<A>),
    {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<EventKind>();
        let cancel_token = CancellationToken::new();
        let _handle = spawn_event_poller(event_tx, PollerConfig::default(), cancel_token.clone());

        let mut should_render = true;

        loop {
            if should_render {
                let state = self.store.state();
                terminal.draw(|frame| render(frame, frame.area(), state))?;
                should_render = false;
            }

            tokio::select! {
                Some(event) = event_rx.recv() => {
                    let outcome: EventOutcome<A> = map_event(&event, self.store.state()).into();
                    if outcome.quit {
                        debug!("Quit requested");
                        break;
                    }
                    if outcome.needs_render {
                        should_render = true;
                    }
                    for action in outcome.actions {
                        let _ = self.action_tx.send(Delivery::new(action));
                    }
                }

                Some(action) = recv_live(&mut self.action_rx) => {
                    let changed = reduce::<S, A, E, St, FEffect>(
                        &mut self.store,
                        &mut self.tasks,
                        action,
                        &mut handle_effect,
                    );
                    if changed {
                        should_render = true;
                    }
                }

                else => {
                    break;
                }
            }
        }

        cancel_token.cancel();
        self.shutdown();

        Ok(())
    }
}

fn reduce<S, A, E, St, F>(
    store: &mut St,
    tasks: &mut TaskManager<A>,
    action: A,
    handle_effect: &mut F,
) -> bool
where
    A: Action,
    St: EffectStoreLike<S, A, E>,
    F: FnMut(E, &mut EffectContext<A>),
{
    let result = store.dispatch(action);
    if result.has_effects() {
        let mut ctx = EffectContext::new(tasks);
        for effect in result.effects {
            handle_effect(effect, &mut ctx);
        }
    }
    result.changed
}

pub(crate) async fn recv_live<A: Action>(action_rx: &mut DeliveryRx<A>) -> Option<A> {
    loop {
        let delivery = action_rx.recv().await?;
        if delivery.is_revoked() {
            trace!(action = delivery.action().name(), "Dropped revoked action");
            continue;
        }
        return Some(delivery.into_action());
    }
}
