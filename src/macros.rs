//! Logging macros for ergonomic log message formatting.
//!
//! These macros take a [`Logger`](crate::Logger) and `format!`-style
//! arguments. The arguments are only formatted when the level passes the
//! logger's effective level.
//!
//! # Examples
//!
//! ```
//! use logtree::prelude::*;
//! use logtree::info;
//!
//! let hierarchy = Hierarchy::new();
//! let logger = hierarchy.get_logger("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use logtree::prelude::*;
/// # let logger = Hierarchy::new().root();
/// use logtree::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use logtree::prelude::*;
/// # let logger = Hierarchy::new().root();
/// use logtree::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use logtree::prelude::*;
/// # let logger = Hierarchy::new().root();
/// use logtree::warning;
/// warning!(logger, "Low disk space");
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Alias of [`warning!`]
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::warning!($logger, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only logs; the process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Formatter, Handler, Hierarchy, Level};
    use crate::handlers::SharedBuffer;

    fn capture(level: Level) -> (Hierarchy, SharedBuffer) {
        let hierarchy = Hierarchy::new();
        let buffer = SharedBuffer::new();
        let root = hierarchy.root();
        root.add_handler(
            Handler::stream(buffer.clone())
                .with_formatter(Formatter::new("{level}:{message}").unwrap())
                .into_shared(),
        );
        root.set_level(level);
        (hierarchy, buffer)
    }

    #[test]
    fn test_log_macro() {
        let (hierarchy, buffer) = capture(Level::Debug);
        let logger = hierarchy.root();
        log!(logger, Level::Info, "Test message");
        log!(logger, Level::Info, "Formatted: {}", 42);
        hierarchy.shutdown();
        assert_eq!(buffer.lines(), vec!["INFO:Test message", "INFO:Formatted: 42"]);
    }

    #[test]
    fn test_leveled_macros() {
        let (hierarchy, buffer) = capture(Level::Debug);
        let logger = hierarchy.get_logger("macros");
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warning!(logger, "Retry {} of {}", 1, 3);
        warn!(logger, "alias");
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");
        hierarchy.shutdown();

        // the child has no handlers of its own
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_filtered_macro_skips_formatting() {
        struct Explodes;
        impl std::fmt::Display for Explodes {
            fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                panic!("formatted a filtered record");
            }
        }

        let (hierarchy, buffer) = capture(Level::Error);
        let logger = hierarchy.root();
        debug!(logger, "{}", Explodes);
        warning!(logger, "{}", Explodes);
        error!(logger, "kept");
        hierarchy.shutdown();
        assert_eq!(buffer.lines(), vec!["ERROR:kept"]);
    }

    #[test]
    fn test_all_levels_reach_root_handler() {
        let (hierarchy, buffer) = capture(Level::Debug);
        let logger = hierarchy.root();
        debug!(logger, "d");
        info!(logger, "i");
        warning!(logger, "w");
        error!(logger, "e");
        fatal!(logger, "f");
        hierarchy.shutdown();
        assert_eq!(
            buffer.lines(),
            vec!["DEBUG:d", "INFO:i", "WARNING:w", "ERROR:e", "FATAL:f"]
        );
    }
}
