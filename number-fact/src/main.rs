//! number-fact - counter with number trivia and an auto-increment timer
//!
//! # Usage
//!
//! ```sh
//! cargo run -p number-fact
//!
//! # Faster timer, logs to a file
//! cargo run -p number-fact -- --tick-interval-ms 250 --log-file /tmp/number-fact.log
//! ```

use std::io::{self, Stdout};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tally_core::{EffectRuntime, EffectStoreWithMiddleware, LoggingMiddleware};
use tracing::info;

use number_fact::{logging, reducer, ui, Args, Config, Environment, State};

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = &config.log_file {
        if let Err(e) = logging::init_tracing(path) {
            eprintln!("Warning: failed to open log file {}: {e}", path.display());
        }
    }
    info!(base_url = %config.base_url, tick_ms = config.tick_interval_ms, "Starting");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut terminal = undo_on_error(enter_terminal(), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })?;

    let result = run_app(&mut terminal, &config).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Run `undo` if `result` is an error, then pass it through.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    result.inspect_err(|_| undo())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, config: &Config) -> io::Result<()> {
    let middleware = LoggingMiddleware::new().quiet("TimerTicked");
    let store = EffectStoreWithMiddleware::new(State::default(), reducer, middleware);
    let mut runtime = EffectRuntime::from_store(store);

    let env = Environment::live(config);
    runtime
        .run(terminal, ui::render, ui::map_event, env.handler())
        .await?;

    info!(count = runtime.state().count, "Exiting");
    Ok(())
}
