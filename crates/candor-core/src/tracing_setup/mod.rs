//! Tracing setup: subscriber initialisation and span definitions.

pub mod spans;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Candor tracing/logging system.
///
/// Reads the `CANDOR_LOG` environment variable for per-module log levels,
/// e.g. `CANDOR_LOG=candor_storage=debug,candor_engine=info`.
/// Falls back to `candor=info` if unset or invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CANDOR_LOG")
            .unwrap_or_else(|_| EnvFilter::new("candor=info"));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}

/// Initialize tracing with a custom filter string and JSON output
/// (for embedding or tests). Ignored if a subscriber is already set.
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init();
}
