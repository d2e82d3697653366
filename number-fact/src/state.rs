//! Application state - single source of truth
//!
//! Only the reducer mutates it; the view and the tests read it.

/// Counter state
///
/// `fact` and `error_message` are never both set: a fact response carries
/// exactly one of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    /// Current counter value
    pub count: i64,

    /// Trivia about the number the last fetch was issued for
    pub fact: Option<String>,

    /// A fetch is in flight
    pub is_loading_fact: bool,

    /// The auto-increment timer is running
    pub is_timer_on: bool,

    /// User-facing message from the last failed fetch
    pub error_message: Option<String>,
}

impl State {
    /// Label for the timer control.
    pub fn timer_label(&self) -> &'static str {
        if self.is_timer_on {
            "Stop timer"
        } else {
            "Start timer"
        }
    }

    /// Drop any fact or error from the previous fetch.
    pub(crate) fn clear_fact(&mut self) {
        self.fact = None;
        self.error_message = None;
    }
}
