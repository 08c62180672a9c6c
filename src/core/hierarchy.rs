//! Logger registry and process lifecycle
//!
//! A [`Hierarchy`] owns the name → node registry, the delivery pipeline and
//! the list of handlers it must close on shutdown. Parent/child relations are
//! never stored: the parent of `a.b.c` is whatever node is registered as
//! `a.b`, then `a`, then the root (`""`).

use super::handler::SharedHandler;
use super::level::Level;
use super::logger::{Logger, LoggerNode};
use super::metrics::LoggerMetrics;
use super::pipeline::{Pipeline, DEFAULT_QUEUE_CAPACITY};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry key of the root logger
pub const ROOT_NAME: &str = "";

/// Name of the next level up, `None` for the root
pub(crate) fn parent_name(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    match name.rfind('.') {
        Some(idx) => Some(&name[..idx]),
        None => Some(ROOT_NAME),
    }
}

pub(crate) struct Shared {
    registry: RwLock<HashMap<Arc<str>, Arc<LoggerNode>>>,
    pub(crate) pipeline: Pipeline,
    /// Every handler ever attached, closed once on shutdown
    handlers: Mutex<Vec<SharedHandler>>,
}

impl Shared {
    /// Nearest existing ancestors of `name`, closest first
    pub(crate) fn ancestors(&self, name: &str) -> Vec<Arc<LoggerNode>> {
        let registry = self.registry.read();
        let mut nodes = Vec::new();
        let mut current = name;
        while let Some(parent) = parent_name(current) {
            if let Some(node) = registry.get(parent) {
                nodes.push(Arc::clone(node));
            }
            current = parent;
        }
        nodes
    }

    /// Level of the nearest ancestor that sets one
    pub(crate) fn inherited_level(&self, name: &str) -> Level {
        let registry = self.registry.read();
        let mut current = name;
        while let Some(parent) = parent_name(current) {
            if let Some(level) = registry.get(parent).and_then(|node| node.level()) {
                return level;
            }
            current = parent;
        }
        Level::default()
    }

    pub(crate) fn register_handler(&self, handler: &SharedHandler) {
        let mut handlers = self.handlers.lock();
        if !handlers.iter().any(|h| Arc::ptr_eq(h, handler)) {
            handlers.push(Arc::clone(handler));
        }
    }

    /// Forget handlers no logger references any more
    ///
    /// Queued jobs and caller clones keep such a handler alive; it closes
    /// when the last of them is dropped.
    pub(crate) fn release_detached(&self) {
        let registry = self.registry.read();
        self.handlers
            .lock()
            .retain(|handler| registry.values().any(|node| node.has_handler(handler)));
    }

    fn shutdown(&self) {
        self.pipeline.shutdown();

        let handlers = std::mem::take(&mut *self.handlers.lock());
        for handler in handlers {
            if let Err(e) = handler.close() {
                eprintln!(
                    "[LOGGER ERROR] Failed to close handler '{}' during shutdown: {}",
                    handler.name(),
                    e
                );
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.shutdown();

        let dropped = self.pipeline.metrics().dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger hierarchy shutting down with {} undelivered records (drop rate: {:.2}%)",
                dropped,
                self.pipeline.metrics().drop_rate()
            );
        }
    }
}

/// A tree of named loggers sharing one delivery pipeline
///
/// Most programs use the process-wide instance through
/// [`get_logger`](crate::get_logger) and [`shutdown`](crate::shutdown).
/// A separate `Hierarchy` is useful for tests and embedding; dropping its
/// last handle (including [`Logger`] handles) drains it like `shutdown`.
///
/// # Example
///
/// ```
/// use logtree::{Formatter, Handler, Hierarchy, Level, SharedBuffer};
///
/// let hierarchy = Hierarchy::new();
/// let buffer = SharedBuffer::new();
///
/// let db = hierarchy.get_logger("app.db");
/// db.add_handler(
///     Handler::stream(buffer.clone())
///         .with_formatter(Formatter::new("{name} {level} {message}").unwrap())
///         .into_shared(),
/// );
/// db.set_level(Level::Info);
/// db.info(format_args!("connected to {}", "primary"));
/// db.debug("filtered out");
///
/// hierarchy.shutdown();
/// assert_eq!(buffer.lines(), vec!["app.db INFO connected to primary"]);
/// ```
#[derive(Clone)]
pub struct Hierarchy {
    shared: Arc<Shared>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Hierarchy whose delivery queue buffers up to `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        let root = Arc::new(LoggerNode::new(ROOT_NAME, Some(Level::default())));
        let mut registry = HashMap::new();
        registry.insert(Arc::from(ROOT_NAME), root);

        Self {
            shared: Arc::new(Shared {
                registry: RwLock::new(registry),
                pipeline: Pipeline::new(capacity),
                handlers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The logger registered as `name`, created on first use
    ///
    /// `""` is the root logger.
    pub fn get_logger(&self, name: &str) -> Logger {
        if let Some(node) = self.shared.registry.read().get(name) {
            return Logger::new(Arc::clone(node), Arc::clone(&self.shared));
        }

        let node = {
            let mut registry = self.shared.registry.write();
            let node = registry
                .entry(Arc::from(name))
                .or_insert_with(|| Arc::new(LoggerNode::new(name, None)));
            Arc::clone(node)
        };
        Logger::new(node, Arc::clone(&self.shared))
    }

    pub fn root(&self) -> Logger {
        self.get_logger(ROOT_NAME)
    }

    /// Names of every registered logger, sorted; the root is `""`
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .shared
            .registry
            .read()
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Write out every record submitted so far and close all handlers
    ///
    /// Blocks until the delivery worker has drained its queue. Calling it
    /// again is harmless. Logging afterwards starts a new worker, but
    /// handlers closed here stay closed.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.shared.pipeline.metrics()
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BasicConfig;
    use crate::core::formatter::Formatter;
    use crate::core::handler::Handler;
    use crate::handlers::SharedBuffer;
    use tempfile::TempDir;

    #[test]
    fn test_removed_handler_is_released() {
        let hierarchy = Hierarchy::new();
        let handler = Handler::stream(SharedBuffer::new()).into_shared();
        let weak = Arc::downgrade(&handler);

        let root = hierarchy.root();
        root.add_handler(handler);
        assert!(weak.upgrade().is_some());

        root.remove_handlers();
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_handler_still_used_elsewhere_is_kept() {
        let hierarchy = Hierarchy::new();
        let handler = Handler::stream(SharedBuffer::new()).into_shared();
        let weak = Arc::downgrade(&handler);

        hierarchy.root().add_handler(Arc::clone(&handler));
        hierarchy.get_logger("other").add_handler(handler);
        hierarchy.root().remove_handlers();

        let kept = weak.upgrade().expect("handler dropped while attached");
        assert!(!kept.is_closed());
    }

    #[test]
    fn test_queued_records_survive_removal() {
        let hierarchy = Hierarchy::new();
        let buffer = SharedBuffer::new();
        let root = hierarchy.root();
        root.add_handler(
            Handler::stream(buffer.clone())
                .with_formatter(Formatter::new("{message}").unwrap())
                .into_shared(),
        );

        for i in 0..100 {
            root.error(i);
        }
        root.remove_handlers();
        hierarchy.shutdown();

        assert_eq!(buffer.lines().len(), 100);
        assert_eq!(buffer.lines()[99], "99");
    }

    #[test]
    fn test_reconfigure_releases_previous_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let first = temp_dir.path().join("first.log");
        let second = temp_dir.path().join("second.log");

        let hierarchy = Hierarchy::new();
        hierarchy
            .basic_config(BasicConfig::new().file_name(&first))
            .unwrap();
        let weak = Arc::downgrade(&hierarchy.root().handlers()[0]);

        hierarchy
            .basic_config(BasicConfig::new().file_name(&second))
            .unwrap();
        assert!(weak.upgrade().is_none());
        assert_eq!(hierarchy.shared.handlers.lock().len(), 1);
    }

    #[test]
    fn test_parent_name() {
        assert_eq!(parent_name("a.b.c"), Some("a.b"));
        assert_eq!(parent_name("a"), Some(""));
        assert_eq!(parent_name(""), None);
    }

    #[test]
    fn test_get_logger_is_idempotent() {
        let hierarchy = Hierarchy::new();
        let first = hierarchy.get_logger("svc");
        let second = hierarchy.get_logger("svc");
        first.set_level(Level::Debug);
        assert_eq!(second.level(), Some(Level::Debug));
        assert_eq!(hierarchy.logger_names(), vec!["", "svc"]);
    }

    #[test]
    fn test_root_exists_with_default_level() {
        let hierarchy = Hierarchy::new();
        let root = hierarchy.root();
        assert!(root.is_root());
        assert_eq!(root.level(), Some(Level::Warning));
    }

    #[test]
    fn test_concurrent_get_logger_creates_one_node() {
        let hierarchy = Hierarchy::new();
        let threads: Vec<_> = (0..16)
            .map(|_| {
                let hierarchy = hierarchy.clone();
                std::thread::spawn(move || {
                    let logger = hierarchy.get_logger("shared.name");
                    logger.set_level(Level::Error);
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(hierarchy.logger_names(), vec!["", "shared.name"]);
    }
}
