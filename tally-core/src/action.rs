//! Action trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions describe either a user intent (`Increment`, `GetFact`) or the
/// result of an async effect (`FactResponse`, `TimerTicked`). They should be:
/// - Clone: the runtime may hand them to middleware before the reducer
/// - Debug: for logging and test failure messages
/// - Send + 'static: effects produce them on other tasks
///
/// Use `#[derive(Action)]` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}
