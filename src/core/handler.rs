//! Handlers: a sink plus the formatter that renders records for it

use super::error::{LoggerError, Result};
use super::formatter::Formatter;
use super::record::Record;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Destination for rendered lines
///
/// Implementations only move bytes; rendering happens in the owning
/// [`Handler`] before `emit` is called.
pub trait Sink: Send {
    fn emit(&mut self, line: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Flush and release the destination. Called at most once by [`Handler`].
    fn close(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Handlers are shared between logger nodes
pub type SharedHandler = Arc<Handler>;

struct HandlerState {
    formatter: Formatter,
    sink: Box<dyn Sink>,
    closed: bool,
    line: String,
}

/// A sink and its formatter
///
/// All access goes through one lock, so concurrent records never interleave
/// bytes within a line.
///
/// # Example
///
/// ```
/// use logtree::{Formatter, Handler, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let handler = Handler::stream(buffer.clone())
///     .with_formatter(Formatter::new("{level}: {message}").unwrap());
/// assert_eq!(handler.name(), "stream");
/// ```
pub struct Handler {
    name: String,
    state: Mutex<HandlerState>,
}

impl Handler {
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self {
            name: sink.name().to_string(),
            state: Mutex::new(HandlerState {
                formatter: Formatter::default(),
                sink: Box::new(sink),
                closed: false,
                line: String::new(),
            }),
        }
    }

    /// Handler writing to any byte sink
    pub fn stream<W: Write + Send + 'static>(writer: W) -> Self {
        Self::new(crate::handlers::StreamSink::new(writer))
    }

    /// Handler writing to a file, opened immediately
    pub fn file(options: crate::handlers::FileOptions) -> Result<Self> {
        Ok(Self::new(crate::handlers::FileSink::open(options)?))
    }

    #[must_use]
    pub fn with_formatter(self, formatter: Formatter) -> Self {
        self.set_formatter(formatter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_formatter(&self, formatter: Formatter) {
        self.state.lock().formatter = formatter;
    }

    /// Copy of the active formatter
    pub fn formatter(&self) -> Formatter {
        self.state.lock().formatter.clone()
    }

    /// Mutate the formatter in place, e.g. to toggle coloring
    pub fn update_formatter<R>(&self, f: impl FnOnce(&mut Formatter) -> R) -> R {
        f(&mut self.state.lock().formatter)
    }

    /// Render `record` and write it to the sink
    pub fn handle(&self, record: &Record) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.closed {
            return Err(LoggerError::handler_closed(&self.name));
        }

        state.line.clear();
        state.formatter.render_into(record, &mut state.line);
        state.sink.emit(state.line.as_bytes())
    }

    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }
        state.sink.flush()
    }

    /// Flush and release the sink; later calls are no-ops
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        state.sink.close()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn into_shared(self) -> SharedHandler {
        Arc::new(self)
    }
}

impl Drop for Handler {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.closed {
            state.closed = true;
            if let Err(e) = state.sink.close() {
                eprintln!("[LOGGER ERROR] Failed to close handler '{}': {}", self.name, e);
            }
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::handlers::SharedBuffer;

    struct CountingSink {
        lines: Arc<Mutex<Vec<Vec<u8>>>>,
        closes: Arc<Mutex<usize>>,
    }

    impl Sink for CountingSink {
        fn emit(&mut self, line: &[u8]) -> Result<()> {
            self.lines.lock().push(line.to_vec());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            *self.closes.lock() += 1;
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn record(message: &str) -> Record {
        Record::new(Arc::from("test"), Level::Info, message.to_string())
    }

    #[test]
    fn test_handle_renders_with_formatter() {
        let buffer = SharedBuffer::new();
        let handler = Handler::stream(buffer.clone())
            .with_formatter(Formatter::new("<{message}>").unwrap());

        handler.handle(&record("hello")).unwrap();
        handler.flush().unwrap();
        assert_eq!(buffer.lines(), vec!["<hello>".to_string()]);
    }

    #[test]
    fn test_close_is_idempotent() {
        let closes = Arc::new(Mutex::new(0));
        let handler = Handler::new(CountingSink {
            lines: Arc::new(Mutex::new(Vec::new())),
            closes: Arc::clone(&closes),
        });

        handler.close().unwrap();
        handler.close().unwrap();
        assert_eq!(*closes.lock(), 1);
        assert!(handler.is_closed());
    }

    #[test]
    fn test_handle_after_close_is_rejected() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let handler = Handler::new(CountingSink {
            lines: Arc::clone(&lines),
            closes: Arc::new(Mutex::new(0)),
        });

        handler.close().unwrap();
        let err = handler.handle(&record("late")).unwrap_err();
        assert!(matches!(err, LoggerError::HandlerClosed(_)));
        assert!(lines.lock().is_empty());
    }

    #[test]
    fn test_update_formatter() {
        let buffer = SharedBuffer::new();
        let handler = Handler::stream(buffer.clone());
        let rejected = handler.update_formatter(|f| f.set_format("{bogus}"));
        assert!(rejected.is_err());

        handler.update_formatter(|f| f.set_format("{message}")).unwrap();
        handler.handle(&record("m")).unwrap();
        assert_eq!(buffer.to_string_lossy(), format!("m{}", crate::core::formatter::LINE_ENDING));
    }
}
