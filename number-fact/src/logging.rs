//! File logging
//!
//! The terminal UI owns stdout, so logs only go to a file and only when one is
//! configured.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber writing to `path`.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Fails if the
/// file cannot be created or a global subscriber is already installed.
pub fn init_tracing(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        let dir = std::env::temp_dir();
        let first = dir.join(format!("number-fact-log-{}-a.log", std::process::id()));
        let second = dir.join(format!("number-fact-log-{}-b.log", std::process::id()));

        // Only one global subscriber per process; whichever call comes second fails
        let results = [init_tracing(&first), init_tracing(&second)];
        assert!(results[1].is_err());

        let _ = std::fs::remove_file(first);
        let _ = std::fs::remove_file(second);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        assert!(init_tracing(Path::new("/nonexistent-dir/number-fact.log")).is_err());
    }
}
