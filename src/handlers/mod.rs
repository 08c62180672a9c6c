//! Sink implementations

pub mod file;
pub mod memory;
pub mod stream;

pub use file::{FileOptions, FileSink};
pub use memory::SharedBuffer;
pub use stream::StreamSink;

pub use crate::core::{Handler, SharedHandler, Sink};
