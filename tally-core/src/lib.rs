//! Core traits and types for tally
//!
//! tally is a small unidirectional state-management runtime: a reducer owns
//! every state change, and async work is described as effects that the
//! runtime runs on tokio and feeds back as actions.
//!
//! # Core Concepts
//!
//! - **Action**: events that describe state changes
//! - **EffectStore**: state plus a reducer returning [`DispatchResult`]
//! - **TaskManager**: keyed, cancellable effect tasks
//! - **Ticker**: swappable periodic clock for timer effects
//! - **EffectRuntime**: serializes all actions through one queue
//!
//! # Basic Example
//!
//! ```ignore
//! use tally_core::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     ToggleTimer,
//!     TimerTicked,
//! }
//!
//! enum Effect {
//!     StartTimer,
//!     CancelTimer,
//! }
//!
//! fn reducer(state: &mut State, action: CounterAction) -> DispatchResult<Effect> {
//!     match action {
//!         CounterAction::Increment | CounterAction::TimerTicked => {
//!             state.count += 1;
//!             DispatchResult::changed()
//!         }
//!         CounterAction::ToggleTimer => {
//!             state.is_timer_on = !state.is_timer_on;
//!             let effect = if state.is_timer_on { Effect::StartTimer } else { Effect::CancelTimer };
//!             DispatchResult::changed_with(effect)
//!         }
//!     }
//! }
//!
//! fn handle_effect(effect: Effect, ctx: &mut EffectContext<CounterAction>) {
//!     match effect {
//!         Effect::StartTimer => {
//!             let ticks = IntervalTicker.ticks(Duration::from_secs(1));
//!             ctx.tasks().stream("timer", ticks.map(|_| CounterAction::TimerTicked));
//!         }
//!         Effect::CancelTimer => ctx.tasks().cancel(&TaskKey::new("timer")),
//!     }
//! }
//! ```

pub mod action;
pub mod clock;
pub mod effect;
pub mod event;
pub mod runtime;
pub mod store;
pub mod tasks;
pub mod testing;

// Core trait exports
pub use action::Action;

// Derive macro (same name as the trait, different namespace)
pub use tally_macros::Action;

// Store exports
pub use store::{LoggingMiddleware, Middleware};

// Effect exports
pub use effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};

// Task exports
pub use tasks::{Delivery, TaskKey, TaskManager};

// Clock exports
pub use clock::{IntervalTicker, ManualTicker, TickStream, Ticker};

// Runtime exports
pub use event::{spawn_event_poller, EventKind, PollerConfig};
pub use runtime::{EffectContext, EffectRuntime, EffectStoreLike, EventOutcome};

// Testing exports
pub use testing::{RenderHarness, TestStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::clock::{IntervalTicker, ManualTicker, Ticker};
    pub use crate::effect::{DispatchResult, EffectStore, EffectStoreWithMiddleware};
    pub use crate::event::EventKind;
    pub use crate::runtime::{EffectContext, EffectRuntime, EventOutcome};
    pub use crate::store::{LoggingMiddleware, Middleware};
    pub use crate::tasks::{TaskKey, TaskManager};
    pub use tally_macros::Action;
}
