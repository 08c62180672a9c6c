//! Logger nodes and the `Logger` handle

use super::handler::SharedHandler;
use super::hierarchy::{Shared, ROOT_NAME};
use super::level::Level;
use super::pipeline::Job;
use super::record::Record;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Name the root logger renders as
pub const ROOT_DISPLAY_NAME: &str = "root";

struct NodeState {
    level: Option<Level>,
    handlers: Arc<[SharedHandler]>,
    propagate: bool,
}

/// One registry entry; mutated only through its own lock
pub(crate) struct LoggerNode {
    name: Arc<str>,
    display_name: Arc<str>,
    state: RwLock<NodeState>,
}

impl LoggerNode {
    pub(crate) fn new(name: &str, level: Option<Level>) -> Self {
        let display_name = if name == ROOT_NAME {
            ROOT_DISPLAY_NAME
        } else {
            name
        };
        Self {
            name: Arc::from(name),
            display_name: Arc::from(display_name),
            state: RwLock::new(NodeState {
                level,
                handlers: Arc::from(Vec::new()),
                propagate: false,
            }),
        }
    }

    pub(crate) fn level(&self) -> Option<Level> {
        self.state.read().level
    }

    pub(crate) fn has_handler(&self, handler: &SharedHandler) -> bool {
        self.state
            .read()
            .handlers
            .iter()
            .any(|h| Arc::ptr_eq(h, handler))
    }
}

/// Handle to a named logger
///
/// Cheap to clone; all clones refer to the same node. Configuration calls
/// take `&self` and may come from any thread.
#[derive(Clone)]
pub struct Logger {
    node: Arc<LoggerNode>,
    shared: Arc<Shared>,
}

impl Logger {
    pub(crate) fn new(node: Arc<LoggerNode>, shared: Arc<Shared>) -> Self {
        Self { node, shared }
    }

    /// Registry name; `""` for the root
    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn is_root(&self) -> bool {
        self.node.name.is_empty()
    }

    /// Next existing logger up the dotted name, `None` for the root
    pub fn parent(&self) -> Option<Logger> {
        if self.is_root() {
            return None;
        }
        self.shared
            .ancestors(&self.node.name)
            .into_iter()
            .next()
            .map(|node| Logger::new(node, Arc::clone(&self.shared)))
    }

    pub fn set_level(&self, level: Level) {
        self.node.state.write().level = Some(level);
    }

    /// Go back to inheriting the level; the root falls back to WARNING
    pub fn clear_level(&self) {
        let level = if self.is_root() {
            Some(Level::default())
        } else {
            None
        };
        self.node.state.write().level = level;
    }

    /// Explicitly set level, if any
    pub fn level(&self) -> Option<Level> {
        self.node.level()
    }

    pub fn effective_level(&self) -> Level {
        match self.node.level() {
            Some(level) => level,
            None => self.shared.inherited_level(&self.node.name),
        }
    }

    #[inline]
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level.passes(self.effective_level())
    }

    /// Attach `handler`; records go to handlers in attachment order
    pub fn add_handler(&self, handler: SharedHandler) {
        {
            let mut state = self.node.state.write();
            let mut handlers = state.handlers.to_vec();
            handlers.push(Arc::clone(&handler));
            state.handlers = Arc::from(handlers);
        }
        self.shared.register_handler(&handler);
    }

    /// Detach every handler from this logger only
    ///
    /// A handler no other logger uses is released by the hierarchy and
    /// closed once records already queued for it have been written.
    pub fn remove_handlers(&self) {
        self.node.state.write().handlers = Arc::from(Vec::new());
        self.shared.release_detached();
    }

    pub fn handlers(&self) -> Vec<SharedHandler> {
        self.node.state.read().handlers.to_vec()
    }

    /// Also hand records to ancestors' handlers
    ///
    /// Off by default: a logger writes only to its own handlers. When on, the
    /// walk continues up the tree until an ancestor with propagation off has
    /// been visited. A handler reachable twice is written once.
    pub fn set_propagate(&self, propagate: bool) {
        self.node.state.write().propagate = propagate;
    }

    pub fn propagates(&self) -> bool {
        self.node.state.read().propagate
    }

    /// Handlers a record logged here is delivered to
    fn targets(&self) -> Arc<[SharedHandler]> {
        let (own, propagate) = {
            let state = self.node.state.read();
            (Arc::clone(&state.handlers), state.propagate)
        };
        if !propagate {
            return own;
        }

        let mut targets = own.to_vec();
        for ancestor in self.shared.ancestors(&self.node.name) {
            let state = ancestor.state.read();
            for handler in state.handlers.iter() {
                if !targets.iter().any(|h| Arc::ptr_eq(h, handler)) {
                    targets.push(Arc::clone(handler));
                }
            }
            if !state.propagate {
                break;
            }
        }
        Arc::from(targets)
    }

    /// Log `message` at `level`
    ///
    /// `message` is only rendered to a string once the level check passed,
    /// so `format_args!` costs nothing for filtered calls.
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        if !self.is_enabled_for(level) {
            return;
        }

        let handlers = self.targets();
        if handlers.is_empty() {
            return;
        }

        let record = Record::new(
            Arc::clone(&self.node.display_name),
            level,
            message.to_string(),
        );
        self.shared.pipeline.submit(Job { record, handlers });
    }

    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(Level::Fatal, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.node.name)
            .field("level", &self.level())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::formatter::Formatter;
    use crate::core::handler::{Handler, SharedHandler};
    use crate::core::hierarchy::Hierarchy;
    use crate::core::level::Level;
    use crate::handlers::SharedBuffer;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn buffer_handler() -> (SharedBuffer, SharedHandler) {
        let buffer = SharedBuffer::new();
        let handler = Handler::stream(buffer.clone())
            .with_formatter(Formatter::new("{name} {level} {message}").unwrap())
            .into_shared();
        (buffer, handler)
    }

    #[test]
    fn test_effective_level_inherits_through_missing_nodes() {
        let hierarchy = Hierarchy::new();
        let app = hierarchy.get_logger("app");
        let deep = hierarchy.get_logger("app.net.http");

        assert_eq!(deep.effective_level(), Level::Warning);
        app.set_level(Level::Debug);
        assert_eq!(deep.effective_level(), Level::Debug);

        hierarchy.get_logger("app.net").set_level(Level::Error);
        assert_eq!(deep.effective_level(), Level::Error);

        deep.set_level(Level::Info);
        assert_eq!(deep.effective_level(), Level::Info);
        deep.clear_level();
        assert_eq!(deep.effective_level(), Level::Error);
    }

    #[test]
    fn test_root_clear_level_restores_warning() {
        let hierarchy = Hierarchy::new();
        let root = hierarchy.root();
        root.set_level(Level::Debug);
        root.clear_level();
        assert_eq!(root.effective_level(), Level::Warning);
    }

    #[test]
    fn test_filtered_call_does_not_format() {
        struct Counting<'a>(&'a AtomicUsize);
        impl fmt::Display for Counting<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                f.write_str("counted")
            }
        }

        let hierarchy = Hierarchy::new();
        let (_buffer, handler) = buffer_handler();
        let root = hierarchy.root();
        root.add_handler(handler);

        let calls = AtomicUsize::new(0);
        root.info(Counting(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        root.error(Counting(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        hierarchy.shutdown();
    }

    #[test]
    fn test_levels_below_threshold_produce_nothing() {
        let hierarchy = Hierarchy::new();
        let (buffer, handler) = buffer_handler();
        let logger = hierarchy.get_logger("svc");
        logger.add_handler(handler);
        logger.set_level(Level::Error);

        logger.debug("d");
        logger.info("i");
        logger.warning("w");
        logger.error("e");
        logger.fatal("f");
        hierarchy.shutdown();

        assert_eq!(buffer.lines(), vec!["svc ERROR e", "svc FATAL f"]);
    }

    #[test]
    fn test_root_renders_as_root() {
        let hierarchy = Hierarchy::new();
        let (buffer, handler) = buffer_handler();
        hierarchy.root().add_handler(handler);
        hierarchy.root().warning("careful");
        hierarchy.shutdown();

        assert_eq!(buffer.lines(), vec!["root WARNING careful"]);
    }

    #[test]
    fn test_handlers_are_not_inherited_by_default() {
        let hierarchy = Hierarchy::new();
        let (buffer, handler) = buffer_handler();
        hierarchy.root().add_handler(handler);
        hierarchy.root().set_level(Level::Debug);

        hierarchy.get_logger("child").error("dropped");
        hierarchy.shutdown();

        assert!(buffer.is_empty());
    }

    #[test]
    fn test_remove_handlers_on_root_leaves_child_alone() {
        let hierarchy = Hierarchy::new();
        let (root_buffer, root_handler) = buffer_handler();
        let (child_buffer, child_handler) = buffer_handler();

        let root = hierarchy.root();
        root.add_handler(root_handler);
        let child = hierarchy.get_logger("child");
        child.add_handler(child_handler);

        root.remove_handlers();
        root.error("silenced");
        child.error("still here");
        hierarchy.shutdown();

        assert!(root_buffer.is_empty());
        assert_eq!(child_buffer.lines(), vec!["child ERROR still here"]);
    }

    #[test]
    fn test_propagation_reaches_ancestors_once() {
        let hierarchy = Hierarchy::new();
        let (root_buffer, root_handler) = buffer_handler();
        let (app_buffer, app_handler) = buffer_handler();

        hierarchy.root().add_handler(Arc::clone(&root_handler));
        let app = hierarchy.get_logger("app");
        app.add_handler(app_handler);
        app.set_propagate(true);

        let leaf = hierarchy.get_logger("app.leaf");
        leaf.add_handler(root_handler);
        leaf.set_propagate(true);
        leaf.error("up");
        hierarchy.shutdown();

        assert_eq!(root_buffer.lines(), vec!["app.leaf ERROR up"]);
        assert_eq!(app_buffer.lines(), vec!["app.leaf ERROR up"]);
    }

    #[test]
    fn test_propagation_stops_at_non_propagating_ancestor() {
        let hierarchy = Hierarchy::new();
        let (root_buffer, root_handler) = buffer_handler();
        let (app_buffer, app_handler) = buffer_handler();

        hierarchy.root().add_handler(root_handler);
        hierarchy.get_logger("app").add_handler(app_handler);

        let leaf = hierarchy.get_logger("app.leaf");
        leaf.set_propagate(true);
        leaf.error("one level");
        hierarchy.shutdown();

        assert_eq!(app_buffer.lines(), vec!["app.leaf ERROR one level"]);
        assert!(root_buffer.is_empty());
    }

    #[test]
    fn test_parent_skips_unregistered_levels() {
        let hierarchy = Hierarchy::new();
        let a = hierarchy.get_logger("a");
        let abc = hierarchy.get_logger("a.b.c");
        assert_eq!(abc.parent().unwrap().name(), a.name());
        assert!(a.parent().unwrap().is_root());
        assert!(hierarchy.root().parent().is_none());
    }

    #[test]
    fn test_handlers_keep_attachment_order() {
        let hierarchy = Hierarchy::new();
        let (_b1, h1) = buffer_handler();
        let (_b2, h2) = buffer_handler();
        let logger = hierarchy.get_logger("ordered");
        logger.add_handler(Arc::clone(&h1));
        logger.add_handler(Arc::clone(&h2));

        let handlers = logger.handlers();
        assert!(Arc::ptr_eq(&handlers[0], &h1));
        assert!(Arc::ptr_eq(&handlers[1], &h2));
    }
}
