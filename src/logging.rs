//! Logger setup for native and browser builds.

use crate::config::LogLevel;

/// Install the global logger at `level`.
///
/// Natively `RUST_LOG` overrides the configured level. Calling this more
/// than once keeps the first logger and only adjusts the max level.
pub fn init(level: LogLevel) {
    let filter = level.to_level_filter();

    #[cfg(not(target_arch = "wasm32"))]
    let installed = env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init()
        .is_ok();

    #[cfg(target_arch = "wasm32")]
    let installed = filter
        .to_level()
        .map(|level| console_log::init_with_level(level).is_ok())
        .unwrap_or(false);

    if installed {
        log::debug!("Logging initialized at {}", level.name());
    } else {
        log::set_max_level(filter);
    }
}
