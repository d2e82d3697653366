//! Effect-aware store
//!
//! The reducer mutates state synchronously and describes any async work it
//! wants done as effect values. It never performs the work itself:
//!
//! ```ignore
//! fn reducer(state: &mut S, action: A) -> DispatchResult<E>
//! ```
//!
//! The runtime (or a [`TestStore`](crate::testing::TestStore)) hands the
//! returned effects to an effect handler, which spawns tasks that send
//! follow-up actions back into the queue.
//!
//! # Example
//!
//! ```ignore
//! enum Effect {
//!     FetchFact { number: i64 },
//! }
//!
//! fn reducer(state: &mut State, action: Action) -> DispatchResult<Effect> {
//!     match action {
//!         Action::GetFact => {
//!             state.is_loading_fact = true;
//!             DispatchResult::changed_with(Effect::FetchFact { number: state.count })
//!         }
//!         Action::Increment => {
//!             state.count += 1;
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//!
//! let mut store = EffectStore::new(State::default(), reducer);
//! let result = store.dispatch(Action::GetFact);
//! assert_eq!(result.effects.len(), 1);
//! ```

use std::marker::PhantomData;

use crate::action::Action;
use crate::store::Middleware;

/// Result of dispatching an action to an effect-aware store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch, in order.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// State changed and a single effect should run.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// Append an effect.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Single owner of the state; every mutation goes through [`dispatch`](Self::dispatch).
pub struct EffectStore<S, A, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A, E> EffectStore<S, A, E>
where
    A: Action,
{
    /// Create a new effect store with the given initial state and reducer.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Get a reference to the current state.
    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Run the reducer for one action.
    #[inline]
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        (self.reducer)(&mut self.state, action)
    }
}

/// An effect store that calls middleware hooks around each dispatch.
///
/// The middleware sees the action and the change flag, not the effects.
pub struct EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: EffectStore<S, A, E>,
    middleware: M,
}

impl<S, A, E, M> EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    /// Create a new effect store with middleware.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            middleware,
        }
    }

    /// Get a reference to the current state.
    #[inline]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a reference to the middleware.
    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Dispatch an action through middleware and store.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = self.store.dispatch(action.clone());
        self.middleware.after(&action, result.changed);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Bump,
        Ignore,
        Fetch,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Bump => "Bump",
                TestAction::Ignore => "Ignore",
                TestAction::Fetch => "Fetch",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestEffect {
        Load(i32),
        Announce,
    }

    #[derive(Default)]
    struct TestState {
        value: i32,
        loading: bool,
    }

    fn test_reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Bump => {
                state.value += 1;
                DispatchResult::changed()
            }
            TestAction::Ignore => DispatchResult::unchanged(),
            TestAction::Fetch => {
                state.loading = true;
                DispatchResult::changed_with(TestEffect::Load(state.value))
                    .with(TestEffect::Announce)
            }
        }
    }

    #[test]
    fn test_dispatch_result_builders() {
        let r: DispatchResult<TestEffect> = DispatchResult::unchanged();
        assert!(!r.changed);
        assert!(!r.has_effects());

        let r: DispatchResult<TestEffect> = DispatchResult::default();
        assert_eq!(r, DispatchResult::unchanged());

        let r: DispatchResult<TestEffect> = DispatchResult::changed();
        assert!(r.changed);
        assert!(!r.has_effects());

        let r = DispatchResult::changed_with(TestEffect::Announce).with(TestEffect::Load(2));
        assert!(r.changed);
        assert_eq!(r.effects, vec![TestEffect::Announce, TestEffect::Load(2)]);
    }

    #[test]
    fn test_effect_store_dispatch() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);

        let result = store.dispatch(TestAction::Bump);
        assert!(result.changed);
        assert_eq!(store.state().value, 1);

        let result = store.dispatch(TestAction::Ignore);
        assert!(!result.changed);
        assert_eq!(store.state().value, 1);
    }

    #[test]
    fn test_effects_capture_state_at_dispatch() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);
        store.dispatch(TestAction::Bump);
        store.dispatch(TestAction::Bump);

        let result = store.dispatch(TestAction::Fetch);
        assert!(store.state().loading);
        assert_eq!(
            result.effects,
            vec![TestEffect::Load(2), TestEffect::Announce]
        );
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(&'static str, bool)>,
    }

    impl Middleware<TestAction> for Recorder {
        fn before(&mut self, _action: &TestAction) {}

        fn after(&mut self, action: &TestAction, state_changed: bool) {
            self.seen.push((action.name(), state_changed));
        }
    }

    #[test]
    fn test_store_with_middleware_sees_change_flag() {
        let mut store =
            EffectStoreWithMiddleware::new(TestState::default(), test_reducer, Recorder::default());

        store.dispatch(TestAction::Bump);
        store.dispatch(TestAction::Ignore);

        assert_eq!(
            store.middleware().seen,
            vec![("Bump", true), ("Ignore", false)]
        );
        assert_eq!(store.state().value, 1);
    }
}
