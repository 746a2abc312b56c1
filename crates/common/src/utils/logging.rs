use std::io;

use tracing_subscriber::{fmt, EnvFilter};

const SERVER_FILTER: &str = "info,tower_http=info,axum=info";

/// `RUST_LOG` when set, `fallback` otherwise.
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Compact server logs on stdout.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(env_filter(SERVER_FILTER))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event on stdout.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(env_filter(SERVER_FILTER))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// `LOG_FORMAT=json` selects JSON output; anything else is compact.
pub fn init_logging_from_env() {
    match std::env::var("LOG_FORMAT") {
        Ok(v) if v.eq_ignore_ascii_case("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}

/// Warnings only on stderr, so command output stays clean.
pub fn init_logging_cli() {
    let _ = fmt()
        .with_env_filter(env_filter("warn"))
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
