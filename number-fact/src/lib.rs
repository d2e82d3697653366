//! Number-fact counter
//!
//! A counter that can fetch trivia about its current value and count up on
//! its own with a timer. State changes happen in [`reducer::reducer`]; the
//! fetch and the timer run as effects in [`environment::Environment`].

pub mod action;
pub mod api;
pub mod config;
pub mod effect;
pub mod environment;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod ui;

pub use action::Action;
pub use api::{FactError, FactFetchFailed, HttpNumberFactClient, NumberFactClient};
pub use config::{Args, Config, ConfigError};
pub use effect::Effect;
pub use environment::{Environment, TIMER};
pub use reducer::reducer;
pub use state::State;
