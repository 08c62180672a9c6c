//! Stream sink: any `Write` destination

use crate::core::{Result, Sink};
use std::io::{self, Write};

pub struct StreamSink<W: Write + Send> {
    writer: Option<W>,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }
}

impl StreamSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl StreamSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {
    fn emit(&mut self, line: &[u8]) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.write_all(line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let result = self.flush();
        self.writer = None;
        result
    }

    fn name(&self) -> &str {
        "stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::SharedBuffer;

    #[test]
    fn test_emit_and_close() {
        let buffer = SharedBuffer::new();
        let mut sink = StreamSink::new(buffer.clone());

        sink.emit(b"one\n").unwrap();
        sink.close().unwrap();
        sink.emit(b"two\n").unwrap();

        assert_eq!(buffer.to_string_lossy(), "one\n");
    }
}
