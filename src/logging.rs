//! Logging setup built on `tracing-subscriber`.
//!
//! Console output goes to stderr so stdout stays reserved for command
//! results. `RUST_LOG` always wins over the verbosity flags.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Map `-v` / `-q` flags to a default filter directive.
#[must_use]
pub const fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the global subscriber.
///
/// When `log_file` is given, events are additionally appended to it as JSON
/// lines at the same level.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// has already been installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .without_time();

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().json().with_writer(Mutex::new(file)))
        }
        None => None,
    };

    Registry::default()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Install a subscriber that writes through the libtest capture.
///
/// Safe to call from every test; only the first call takes effect.
pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .with_test_writer()
        .try_init();
}
