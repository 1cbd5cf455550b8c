//! The `log` module defines the crate's internal logging facilities. This
//! module (re)exports the five logging macros: `error!`, `warn!`, `info!`,
//! `debug!` and `trace!` where `error!` represents the highest-priority log
//! messages and `trace!` the lowest. To emit a log message, simply use one of
//! these macros in your code:
//!
//! ```rust
//! use tickwork::info;
//!
//! pub fn do_a_thing() {
//!     info!("A thing is being done.");
//! }
//! ```
//!
//! Logging is _disabled_ by default. Log messages are enabled/disabled using
//! the functions:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with
//!    priority at least `level`
//!
//! Per-module filtering can be configured once, before the first call to any
//! of the functions above, using `set_module_filter()`:
//!
//! ```rust
//! use tickwork::log::{set_module_filter, set_log_level, LevelFilter};
//!
//! pub fn setup_logging() {
//!     // Disable the crate's own messages, keep everything else at `info`.
//!     set_module_filter("tickwork", LevelFilter::Off);
//!     set_log_level(LevelFilter::Info);
//! }
//! ```

use env_logger::{Builder, WriteStyle};
pub use log::{debug, error, info, trace, warn, LevelFilter};

use std::collections::HashMap;
use std::sync::{Mutex, Once};

// Logging disabled.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;
// Automatically determine if output supports color.
const DEFAULT_LOG_STYLE: WriteStyle = WriteStyle::Auto;

/// Module ("target") specific level filters, applied when the logger is
/// installed.
static MODULE_FILTERS: Mutex<Option<HashMap<String, LevelFilter>>> = Mutex::new(None);

/// The global logger can only be installed once per process.
static INSTALL: Once = Once::new();

/// Enables the logger with no global level filter / full logging. Equivalent
/// to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to
/// `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A level of `LevelFilter::Off` disables logging.
///
/// The first call installs the backing logger; later calls only adjust the
/// level.
pub fn set_log_level(level: LevelFilter) {
    install_logger();
    log::set_max_level(level);
}

/// Sets a level filter for the given module path. Module filters are baked
/// into the logger when it is installed, so calls made after the first
/// `set_log_level()`/`enable_logging()` have no effect.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    let mut filters = MODULE_FILTERS.lock().unwrap();
    filters
        .get_or_insert_with(HashMap::new)
        .insert(module_path.to_string(), level_filter);
}

/// Installs the backing `env_logger` logger, once. The logger itself is built
/// wide open (`Trace`); the effective verbosity is governed entirely by
/// `log::set_max_level`, which is cheap to change at runtime.
fn install_logger() {
    INSTALL.call_once(|| {
        let mut builder = Builder::new();
        builder
            .filter_level(LevelFilter::Trace)
            .write_style(DEFAULT_LOG_STYLE);

        if let Some(filters) = MODULE_FILTERS.lock().unwrap().as_ref() {
            for (module, filter) in filters {
                builder.filter(Some(module), *filter);
            }
        }

        let logger = builder.build();
        // Fails when the embedding application installed its own logger; in
        // that case only the max level is driven from here.
        let _ = log::set_boxed_logger(Box::new(logger));
        log::set_max_level(DEFAULT_LOG_LEVEL);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_changes_are_idempotent() {
        set_log_level(LevelFilter::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);

        disable_logging();
        assert_eq!(log::max_level(), LevelFilter::Off);

        enable_logging();
        assert_eq!(log::max_level(), LevelFilter::Trace);

        disable_logging();
    }
}
