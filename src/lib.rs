//! # logtree
//!
//! Hierarchical named loggers with asynchronous delivery.
//!
//! ## Features
//!
//! - **Dotted hierarchy**: `app.db` inherits its level from `app`, then the root
//! - **Templates**: `{name} {level} {message}` with optional `<width>` padding
//! - **Coloring**: per-level and regex-driven ANSI styles, off by default
//! - **Non-blocking callers**: one background worker writes every record, in order
//!
//! ## Example
//!
//! ```
//! use logtree::{BasicConfig, Hierarchy, Level, SharedBuffer};
//!
//! let hierarchy = Hierarchy::new();
//! let buffer = SharedBuffer::new();
//! hierarchy
//!     .basic_config(BasicConfig::new().level(Level::Info).writer(buffer.clone()))
//!     .unwrap();
//!
//! logtree::info!(hierarchy.root(), "listening on port {}", 8080);
//! hierarchy.shutdown();
//!
//! assert_eq!(buffer.lines(), vec!["root INFO listening on port 8080"]);
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        BasicConfig, Formatter, Handler, Hierarchy, Level, Logger, LoggerError, Result,
        SharedHandler, Style, Template,
    };
    pub use crate::handlers::{FileOptions, SharedBuffer};
}

pub use crate::core::{
    basic_config, default_level_styles, get_logger, global, root_logger, shutdown, BasicConfig,
    BasicConfigFile, Field, Formatter, Handler, Hierarchy, Level, Logger, LoggerError,
    LoggerMetrics, PatternColor, Record, Result, Segment, SharedHandler, Sink, Style, Template,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TEMPLATE, LINE_ENDING, ROOT_DISPLAY_NAME, ROOT_NAME,
};
pub use handlers::{FileOptions, FileSink, SharedBuffer, StreamSink};
