// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber
// Level from RUST_LOG, format from PARKING_OCCUPANCY_LOG_FORMAT
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "PARKING_OCCUPANCY_LOG_FORMAT";

/// Initialize the global subscriber.
///
/// # Environment
/// - RUST_LOG: filter (default: info), e.g. `RUST_LOG=parking_occupancy=debug`
/// - PARKING_OCCUPANCY_LOG_FORMAT=json: one JSON object per line
///
/// # Example
/// ```no_run
/// use parking_occupancy::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .init();
    }
}

/// Verbose subscriber for tests; safe to call repeatedly
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
