//! Reducer - (state, action) -> (state, effects)
//!
//! All state transitions live here. The reducer never performs I/O: fetches
//! and timers are returned as [`Effect`] values for the environment to run.

use tally_core::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::State;

/// The reducer handles all state transitions
pub fn reducer(state: &mut State, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Decrement => {
            state.count -= 1;
            state.clear_fact();
            DispatchResult::changed()
        }

        Action::Increment => {
            state.count += 1;
            state.clear_fact();
            DispatchResult::changed()
        }

        Action::GetFact => {
            state.clear_fact();
            state.is_loading_fact = true;
            // Capture the count now; later increments must not change the request
            DispatchResult::changed_with(Effect::FetchFact {
                number: state.count,
            })
        }

        Action::FactResponse(Ok(fact)) => {
            state.fact = Some(fact);
            state.error_message = None;
            state.is_loading_fact = false;
            DispatchResult::changed()
        }

        Action::FactResponse(Err(error)) => {
            state.fact = None;
            state.error_message = Some(error.to_string());
            state.is_loading_fact = false;
            DispatchResult::changed()
        }

        Action::ToggleTimer => {
            state.is_timer_on = !state.is_timer_on;
            let effect = if state.is_timer_on {
                Effect::StartTimer
            } else {
                Effect::CancelTimer
            };
            DispatchResult::changed_with(effect)
        }

        Action::TimerTicked => {
            state.count += 1;
            DispatchResult::changed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FactFetchFailed;

    fn with_fact() -> State {
        State {
            count: 7,
            fact: Some("7 is lucky".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_increment_and_decrement_clear_fact() {
        let mut state = with_fact();

        let result = reducer(&mut state, Action::Increment);
        assert!(result.changed);
        assert!(!result.has_effects());
        assert_eq!(state.count, 8);
        assert_eq!(state.fact, None);

        state.error_message = Some("Failed to fetch fact".into());
        reducer(&mut state, Action::Decrement);
        reducer(&mut state, Action::Decrement);
        assert_eq!(state.count, 6);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_decrement_goes_negative() {
        let mut state = State::default();
        reducer(&mut state, Action::Decrement);
        assert_eq!(state.count, -1);
    }

    #[test]
    fn test_get_fact_sets_loading_and_requests_current_count() {
        let mut state = with_fact();
        state.error_message = None;

        let result = reducer(&mut state, Action::GetFact);

        assert!(state.is_loading_fact);
        assert_eq!(state.fact, None);
        assert_eq!(state.error_message, None);
        assert_eq!(result.effects, vec![Effect::FetchFact { number: 7 }]);
    }

    #[test]
    fn test_fact_response_success() {
        let mut state = State {
            is_loading_fact: true,
            ..Default::default()
        };

        reducer(&mut state, Action::FactResponse(Ok("0 is nothing".into())));

        assert!(!state.is_loading_fact);
        assert_eq!(state.fact.as_deref(), Some("0 is nothing"));
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_fact_response_failure_uses_fixed_message() {
        let mut state = State {
            is_loading_fact: true,
            fact: Some("stale".into()),
            ..Default::default()
        };

        reducer(&mut state, Action::FactResponse(Err(FactFetchFailed)));

        assert!(!state.is_loading_fact);
        assert_eq!(state.fact, None);
        assert_eq!(state.error_message.as_deref(), Some("Failed to fetch fact"));
    }

    #[test]
    fn test_toggle_timer_alternates_effects() {
        let mut state = State::default();

        let result = reducer(&mut state, Action::ToggleTimer);
        assert!(state.is_timer_on);
        assert_eq!(result.effects, vec![Effect::StartTimer]);

        let result = reducer(&mut state, Action::ToggleTimer);
        assert!(!state.is_timer_on);
        assert_eq!(result.effects, vec![Effect::CancelTimer]);
    }

    #[test]
    fn test_timer_tick_keeps_fact() {
        let mut state = with_fact();
        reducer(&mut state, Action::TimerTicked);
        assert_eq!(state.count, 8);
        assert_eq!(state.fact.as_deref(), Some("7 is lucky"));
    }

    #[test]
    fn test_fact_and_error_never_both_set() {
        let actions = [
            Action::GetFact,
            Action::FactResponse(Ok("a".into())),
            Action::Increment,
            Action::FactResponse(Err(FactFetchFailed)),
            Action::TimerTicked,
            Action::FactResponse(Ok("b".into())),
            Action::Decrement,
        ];

        let mut state = State::default();
        for action in actions {
            reducer(&mut state, action);
            assert!(
                !(state.fact.is_some() && state.error_message.is_some()),
                "fact and error both set: {state:?}"
            );
        }
    }
}
