//! Middleware hooks around store dispatch

use crate::Action;

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging or other cross-cutting concerns to an
/// [`EffectStoreWithMiddleware`](crate::EffectStoreWithMiddleware).
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// Middleware that logs actions through `tracing`
///
/// Actions whose name is listed in `quiet` are logged at `trace` instead of
/// `debug`, which keeps timer ticks out of the default log.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
    /// Action names demoted to `trace`
    pub quiet: Vec<&'static str>,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
            quiet: Vec::new(),
        }
    }

    /// Create a logging middleware that logs both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            ..Self::new()
        }
    }

    /// Demote the named action to `trace` level.
    pub fn quiet(mut self, name: &'static str) -> Self {
        self.quiet.push(name);
        self
    }

    fn is_quiet(&self, name: &str) -> bool {
        self.quiet.iter().any(|q| *q == name)
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if !self.log_before {
            return;
        }
        if self.is_quiet(action.name()) {
            tracing::trace!(action = %action.name(), "Dispatching action");
        } else {
            tracing::debug!(action = %action.name(), "Dispatching action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if !self.log_after {
            return;
        }
        if self.is_quiet(action.name()) {
            tracing::trace!(action = %action.name(), state_changed, "Action processed");
        } else {
            tracing::debug!(action = %action.name(), state_changed, "Action processed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Tick,
        Load,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Tick => "Tick",
                TestAction::Load => "Load",
            }
        }
    }

    #[test]
    fn test_quiet_names() {
        let mw = LoggingMiddleware::new().quiet("Tick");
        assert!(mw.is_quiet(TestAction::Tick.name()));
        assert!(!mw.is_quiet(TestAction::Load.name()));
    }

    #[test]
    fn test_verbose_logs_both_sides() {
        let mw = LoggingMiddleware::verbose();
        assert!(mw.log_before);
        assert!(mw.log_after);

        let mw = LoggingMiddleware::new();
        assert!(!mw.log_before);
        assert!(mw.log_after);
    }

    #[test]
    fn test_logging_middleware_hooks_run_without_subscriber() {
        let mut mw = LoggingMiddleware::verbose().quiet("Tick");
        mw.before(&TestAction::Tick);
        mw.after(&TestAction::Tick, true);
        mw.before(&TestAction::Load);
        mw.after(&TestAction::Load, false);
    }
}
