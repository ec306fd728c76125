#![deny(missing_docs)]
//! Shared logging utilities for the docsim workspace.
//!
//! This crate provides the `sim_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every message is
//! prefixed with the current loop tick so interleaved simulator output can be
//! lined up with the message loop that produced or consumed it.

use std::sync::atomic::{AtomicU64, Ordering};

#[doc(hidden)]
pub use log;

/// Process-wide loop tick. Written by the app loop, read by every logger call.
static LOOP_TICK: AtomicU64 = AtomicU64::new(0);

/// Sets the loop tick count.
/// This should be called by the message loop once per iteration.
pub fn set_sim_tick(tick: u64) {
    LOOP_TICK.store(tick, Ordering::Relaxed);
}

/// Retrieves the loop tick count.
/// Returns 0 if the tick has not been set.
pub fn get_sim_tick() -> u64 {
    LOOP_TICK.load(Ordering::Relaxed)
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! sim_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[tick {}] {}", $crate::get_sim_tick(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! sim_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[tick {}] {}", $crate::get_sim_tick(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! sim_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[tick {}] {}", $crate::get_sim_tick(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! sim_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[tick {}] {}", $crate::get_sim_tick(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! sim_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[tick {}] {}", $crate::get_sim_tick(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
