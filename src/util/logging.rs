// ShipSearch - util/logging.rs
//
// tracing subscriber setup for the CLI.
//
// The level comes from the first source that sets one: RUST_LOG, then the
// --debug flag, then `[logging] level` in config.toml, then "info".
// Log lines go to stderr; stdout carries the result table only. Events
// record counts, paths and column names, never cell values.

use super::constants;
use tracing_subscriber::EnvFilter;

/// Level directive chosen when RUST_LOG is unset.
fn fallback_directive(debug_flag: bool, config_level: Option<&str>) -> &str {
    if debug_flag {
        "debug"
    } else {
        config_level.unwrap_or(constants::DEFAULT_LOG_LEVEL)
    }
}

/// Install the global subscriber. Call once, before the first event.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directive(debug_flag, config_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .init();

    tracing::debug!(
        app = constants::APP_NAME,
        version = constants::APP_VERSION,
        "Logging ready"
    );
}
