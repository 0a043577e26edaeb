/*!
 * Structured Tracing
 * Subscriber setup for the sandbox's `tracing` events
 *
 * Events emitted by the crate:
 * - `warn`: every containment violation, with attempted and resolved paths
 * - `info`: sandbox creation
 * - `debug`: validated constructions and escape-hatch use
 * - `trace`: symlink expansion and per-operation spans
 */

use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

/// Environment variable switching the output to JSON
pub const TRACE_JSON_ENV: &str = "PATH_SANDBOX_TRACE_JSON";

fn json_requested() -> bool {
    std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

/// Install the global subscriber, failing if one is already set
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PATH_SANDBOX_TRACE_JSON: Enable JSON output (default: false)
pub fn try_init_tracing() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_requested() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?;
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .compact(),
            )
            .try_init()?;
        info!("Structured tracing initialized");
    }
    Ok(())
}

/// Install the global subscriber, ignoring one that is already set
pub fn init_tracing() {
    if try_init_tracing().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
