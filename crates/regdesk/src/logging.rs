//! Diagnostic logging.
//!
//! Everything logs through `tracing`; the binary installs one stderr
//! subscriber so stdout carries only command output.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How chatty the `regdesk` target is, picked from `-q` / `-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings, such as skipped stored records.
    #[default]
    Normal,
    /// Debug detail for each store and session step.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Maximum level emitted for the `regdesk` target.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Install the stderr subscriber.
///
/// A set `RUST_LOG` wins over `verbosity`. Calling this again is harmless;
/// the first subscriber stays installed.
///
/// # Examples
///
/// ```no_run
/// use regdesk::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("regdesk={}", verbosity.to_level_filter()))
    });

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Capture warnings in test output, e.g. from fail-soft loads.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
