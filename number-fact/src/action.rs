//! Actions: user intents and effect results
//!
//! `GetFact` and `ToggleTimer` start effects; `FactResponse` and `TimerTicked`
//! are only ever produced by those effects.

use crate::api::FactFetchFailed;

#[derive(tally_core::Action, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Subtract one from the counter
    Decrement,

    /// Add one to the counter
    Increment,

    /// Fetch a fact about the current count
    GetFact,

    /// Result of the fetch started by `GetFact`
    FactResponse(Result<String, FactFetchFailed>),

    /// Start or stop the auto-increment timer
    ToggleTimer,

    /// One timer period elapsed
    TimerTicked,
}
