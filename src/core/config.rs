//! One-call setup of the root logger
//!
//! [`BasicConfig`] describes a single handler (a writer or a file), its
//! template and the root level. Applying it replaces whatever handlers the
//! root had. Invalid combinations fail here, never at the first log call.

use super::error::{LoggerError, Result};
use super::formatter::Formatter;
use super::handler::Handler;
use super::hierarchy::Hierarchy;
use super::level::Level;
use super::template::Template;
use crate::handlers::FileOptions;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// Options for [`Hierarchy::basic_config`]
///
/// # Example
///
/// ```
/// use logtree::{BasicConfig, Hierarchy, Level, SharedBuffer, Template};
///
/// let hierarchy = Hierarchy::new();
/// let buffer = SharedBuffer::new();
///
/// hierarchy
///     .basic_config(
///         BasicConfig::new()
///             .level(Level::Debug)
///             .writer(buffer.clone())
///             .format(Template::parse("{level} {message}").unwrap()),
///     )
///     .unwrap();
///
/// hierarchy.root().debug(format_args!("answer is {}", 42));
/// hierarchy.shutdown();
/// assert_eq!(buffer.lines(), vec!["DEBUG answer is 42"]);
/// ```
#[derive(Default)]
pub struct BasicConfig {
    /// Root level, WARNING when unset
    pub level: Option<Level>,
    pub writer: Option<Box<dyn Write + Send>>,
    pub file_name: Option<PathBuf>,
    pub file_append: bool,
    pub write_start_header: bool,
    pub format: Option<Template>,
    /// Only meaningful together with `file_name`
    pub watch_file: bool,
}

impl BasicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_name = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_append(mut self, append: bool) -> Self {
        self.file_append = append;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn write_start_header(mut self, enabled: bool) -> Self {
        self.write_start_header = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, template: Template) -> Self {
        self.format = Some(template);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn watch_file(mut self, enabled: bool) -> Self {
        self.watch_file = enabled;
        self
    }

    /// Build the handler these options describe
    pub fn into_handler(self) -> Result<Handler> {
        let formatter = Formatter::with_template(self.format.unwrap_or_default());

        let handler = match (self.writer, self.file_name) {
            (Some(_), Some(_)) => {
                return Err(LoggerError::config(
                    "BasicConfig",
                    "writer and file_name are mutually exclusive",
                ));
            }
            (None, None) => {
                return Err(LoggerError::config(
                    "BasicConfig",
                    "either a writer or a file_name is required",
                ));
            }
            (Some(writer), None) => Handler::stream(writer),
            (None, Some(path)) => Handler::file(
                FileOptions::new(path)
                    .with_append(self.file_append)
                    .with_start_header(self.write_start_header)
                    .with_watch(self.watch_file),
            )?,
        };

        Ok(handler.with_formatter(formatter))
    }
}

impl Hierarchy {
    /// Replace the root logger's handlers with the one `config` describes
    /// and set the root level
    ///
    /// On error the root is left untouched.
    pub fn basic_config(&self, config: BasicConfig) -> Result<()> {
        let level = config.level.unwrap_or_default();
        let handler = config.into_handler()?.into_shared();

        let root = self.root();
        root.remove_handlers();
        root.add_handler(handler);
        root.set_level(level);
        Ok(())
    }
}

/// Serializable form of [`BasicConfig`] for configuration files
///
/// Only file output can be described this way.
///
/// # Example
///
/// ```
/// use logtree::BasicConfigFile;
///
/// let config = BasicConfigFile::from_json(
///     r#"{ "level": "INFO", "file_name": "/tmp/app.log", "format": "{level} {message}" }"#,
/// )
/// .unwrap();
/// assert!(config.into_basic_config().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BasicConfigFile {
    pub level: Option<Level>,
    pub file_name: Option<PathBuf>,
    pub file_append: bool,
    pub write_start_header: bool,
    pub format: Option<String>,
    pub watch_file: bool,
}

impl BasicConfigFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the template and convert to [`BasicConfig`]
    pub fn into_basic_config(self) -> Result<BasicConfig> {
        let format = self.format.as_deref().map(Template::parse).transpose()?;
        Ok(BasicConfig {
            level: self.level,
            writer: None,
            file_name: self.file_name,
            file_append: self.file_append,
            write_start_header: self.write_start_header,
            format,
            watch_file: self.watch_file,
        })
    }
}
