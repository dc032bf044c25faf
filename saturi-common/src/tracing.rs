//! Tracing initialization for the saturi services.
//!
//! Filtering is driven by the `RUST_LOG` environment variable, for example:
//!
//! - `RUST_LOG=debug` - Enable debug logging for all modules
//! - `RUST_LOG=saturi_convert=debug` - Enable debug for a specific crate
//! - `RUST_LOG=warn,saturi_common=debug` - Warn by default, debug for common
//!
//! ```no_run
//! use saturi_common::tracing::init_tracing;
//!
//! init_tracing();
//! tracing::info!("Application started");
//! ```

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Build the filter, falling back to `default_level` when `RUST_LOG` is unset or invalid.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Defaults to `info` when `RUST_LOG` is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Initialize tracing with a custom default level.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_tracing_with_default(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer)
        .init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Useful in tests, where several cases may race to install the subscriber.
pub fn try_init_tracing() -> Result<(), ()> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_test_writer()
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt_layer)
        .try_init()
        .map_err(|_| ())
}
