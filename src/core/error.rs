//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Template failed to parse; `offset` is a byte offset into `template`
    #[error("Invalid log format {template:?} at offset {offset}: {reason}")]
    Format {
        template: String,
        offset: usize,
        reason: String,
    },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File handler error with path
    #[error("File handler error for '{path}': {message}")]
    FileHandlerError { path: String, message: String },

    /// Handler was already closed
    #[error("Handler '{0}' is closed")]
    HandlerClosed(String),

    /// Delivery worker is gone
    #[error("Failed to send log record to delivery worker")]
    ChannelSendError,
}

impl LoggerError {
    /// Create a template format error
    pub fn format(template: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        LoggerError::Format {
            template: template.into(),
            offset,
            reason: reason.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file handler error
    pub fn file_handler(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileHandlerError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn handler_closed(name: impl Into<String>) -> Self {
        LoggerError::HandlerClosed(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::format("{nme}", 1, "unknown placeholder 'nme'");
        assert!(matches!(err, LoggerError::Format { offset: 1, .. }));

        let err = LoggerError::config("BasicConfig", "no writer");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_handler("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileHandlerError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::format("{nme}", 1, "unknown placeholder 'nme'");
        assert_eq!(
            err.to_string(),
            "Invalid log format \"{nme}\" at offset 1: unknown placeholder 'nme'"
        );

        let err = LoggerError::config("BasicConfig", "either a writer or a file name is required");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for BasicConfig: either a writer or a file name is required"
        );

        let err = LoggerError::handler_closed("file:app.log");
        assert_eq!(err.to_string(), "Handler 'file:app.log' is closed");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("reopening log file", "cannot open", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("reopening log file"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
