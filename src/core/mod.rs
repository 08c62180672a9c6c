//! Core logger types and traits

pub mod config;
pub mod error;
pub mod formatter;
pub mod global;
pub mod handler;
pub mod hierarchy;
pub mod level;
pub mod logger;
pub mod metrics;
mod pipeline;
pub mod record;
pub mod style;
pub mod template;

pub use config::{BasicConfig, BasicConfigFile};
pub use error::{LoggerError, Result};
pub use formatter::{default_level_styles, Formatter, PatternColor, LINE_ENDING};
pub use global::{basic_config, get_logger, global, root_logger, shutdown};
pub use handler::{Handler, SharedHandler, Sink};
pub use hierarchy::{Hierarchy, ROOT_NAME};
pub use level::Level;
pub use logger::{Logger, ROOT_DISPLAY_NAME};
pub use metrics::LoggerMetrics;
pub use pipeline::DEFAULT_QUEUE_CAPACITY;
pub use record::Record;
pub use style::Style;
pub use template::{Field, Segment, Template, DEFAULT_TEMPLATE};
