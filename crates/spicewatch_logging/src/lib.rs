#![deny(missing_docs)]
//! Shared logging utilities for the spicewatch workspace.
//!
//! This crate provides the `watch_*` logging macros used by the engine and the
//! app, and a minimal test initializer for the global logger. The pure core
//! crate does not log.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized, so every
/// test may call it. Output from the HTTP stack and the mock server is
/// filtered out.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut config = ConfigBuilder::new();
    for target in ["hyper", "reqwest", "wiremock"] {
        config.add_filter_ignore_str(target);
    }

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config.build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
