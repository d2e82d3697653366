//! Effect handler and the capabilities it depends on
//!
//! The reducer describes work as [`Effect`] values; [`Environment`] turns them
//! into tasks. The fact client and the ticker are injected so tests can run
//! without a network or a wall clock.

use std::sync::Arc;
use std::time::Duration;

use tally_core::{EffectContext, IntervalTicker, TaskKey, Ticker};
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::action::Action;
use crate::api::{FactFetchFailed, HttpNumberFactClient, NumberFactClient};
use crate::config::Config;
use crate::effect::Effect;

/// Task key of the auto-increment timer.
pub const TIMER: &str = "timer";

/// Injected capabilities for effects.
#[derive(Clone)]
pub struct Environment {
    facts: Arc<dyn NumberFactClient>,
    ticker: Arc<dyn Ticker>,
    tick_interval: Duration,
}

impl Environment {
    /// Environment with a one second timer period.
    pub fn new(facts: impl NumberFactClient + 'static, ticker: impl Ticker) -> Self {
        Self {
            facts: Arc::new(facts),
            ticker: Arc::new(ticker),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// HTTP client and wall-clock ticker, as configured.
    pub fn live(config: &Config) -> Self {
        Self::new(HttpNumberFactClient::new(&config.base_url), IntervalTicker)
            .with_tick_interval(config.tick_interval())
    }

    pub fn handle_effect(&self, effect: Effect, ctx: &mut EffectContext<Action>) {
        match effect {
            Effect::FetchFact { number } => {
                let facts = Arc::clone(&self.facts);
                ctx.tasks().detach(async move {
                    let result = facts.fetch(number).await.map_err(|e| {
                        warn!(number, error = %e, "Fact fetch failed");
                        FactFetchFailed::from(e)
                    });
                    Action::FactResponse(result)
                });
            }

            Effect::StartTimer => {
                debug!(period = ?self.tick_interval, "Starting timer");
                let ticks = self
                    .ticker
                    .ticks(self.tick_interval)
                    .map(|()| Action::TimerTicked);
                ctx.tasks().stream(TIMER, ticks);
            }

            Effect::CancelTimer => ctx.tasks().cancel(&TaskKey::new(TIMER)),
        }
    }

    /// Consume the environment into a handler closure for the runtime.
    pub fn handler(self) -> impl FnMut(Effect, &mut EffectContext<Action>) {
        move |effect, ctx| self.handle_effect(effect, ctx)
    }
}
