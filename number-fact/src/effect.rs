//! Effects - side effects declared by the reducer
//!
//! The reducer returns these; [`Environment`](crate::environment::Environment)
//! turns them into tasks.

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch a fact for the count captured when `GetFact` was reduced
    FetchFact { number: i64 },

    /// Start the repeating timer, replacing any running one
    StartTimer,

    /// Stop the repeating timer
    CancelTimer,
}
