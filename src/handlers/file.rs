//! File sink with append/truncate, start header and watch mode
//!
//! In watch mode the sink checks before every write whether the file at its
//! path is still the one it holds open. When an external tool has moved or
//! deleted it (log rotation), the sink reopens the path and carries on.

use crate::core::formatter::LINE_ENDING;
use crate::core::{LoggerError, Result, Sink};
use chrono::Local;
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options for opening a [`FileSink`]
///
/// # Example
///
/// ```
/// use logtree::FileOptions;
///
/// let options = FileOptions::new("/var/log/app.log")
///     .with_append(true)
///     .with_start_header(true)
///     .with_watch(true);
/// assert!(options.append());
/// ```
#[derive(Debug, Clone)]
pub struct FileOptions {
    path: PathBuf,
    append: bool,
    start_header: bool,
    watch: bool,
}

impl FileOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: false,
            start_header: false,
            watch: false,
        }
    }

    /// Append to an existing file instead of truncating it
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Write a header line every time the file is opened
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_start_header(mut self, start_header: bool) -> Self {
        self.start_header = start_header;
        self
    }

    /// Reopen the file when it is replaced or removed externally
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self) -> bool {
        self.append
    }

    pub fn start_header(&self) -> bool {
        self.start_header
    }

    pub fn watch(&self) -> bool {
        self.watch
    }
}

/// Identity of an opened file, used to notice external replacement
#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    dev: u64,
    ino: u64,
}

#[cfg(unix)]
impl FileIdentity {
    fn of(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }
    }
}

// Without inode numbers only removal of the file can be detected.
#[cfg(not(unix))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity;

#[cfg(not(unix))]
impl FileIdentity {
    fn of(_metadata: &Metadata) -> Self {
        FileIdentity
    }
}

pub struct FileSink {
    options: FileOptions,
    name: String,
    /// `None` after `close`, or while a watched reopen keeps failing
    writer: Option<BufWriter<File>>,
    identity: Option<FileIdentity>,
    closed: bool,
}

impl FileSink {
    /// Open the file according to `options`, writing the header if requested
    pub fn open(options: FileOptions) -> Result<Self> {
        let name = format!("file:{}", options.path.display());
        let mut sink = Self {
            options,
            name,
            writer: None,
            identity: None,
            closed: false,
        };
        let append = sink.options.append;
        sink.open_file(append)?;
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.options.path
    }

    fn open_file(&mut self, append: bool) -> Result<()> {
        let path = &self.options.path;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|e| LoggerError::file_handler(path.display().to_string(), e.to_string()))?;

        self.identity = Some(FileIdentity::of(&file.metadata()?));
        let mut writer = BufWriter::new(file);

        if self.options.start_header {
            let header = format!(
                "=== log started {} ==={}",
                Local::now().to_rfc3339(),
                LINE_ENDING
            );
            writer.write_all(header.as_bytes())?;
            writer.flush()?;
        }

        self.writer = Some(writer);
        Ok(())
    }

    /// Whether the path no longer points at the file we hold open
    fn replaced(&self) -> Result<bool> {
        match fs::metadata(&self.options.path) {
            Ok(metadata) => Ok(self.identity != Some(FileIdentity::of(&metadata))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(LoggerError::io_operation(
                "checking log file",
                self.options.path.display().to_string(),
                e,
            )),
        }
    }

    fn reopen_if_replaced(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        // A previous reopen failed; try again now the path may be usable.
        if self.writer.is_none() {
            return self.open_file(true);
        }
        if !self.replaced()? {
            return Ok(());
        }

        // Bytes still buffered belong to the old file.
        if let Some(mut old) = self.writer.take() {
            let _ = old.flush();
        }
        self.open_file(true)
    }
}

impl Sink for FileSink {
    fn emit(&mut self, line: &[u8]) -> Result<()> {
        if self.options.watch {
            self.reopen_if_replaced()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::file_handler(self.name.clone(), "file is closed"))?;
        writer.write_all(line)?;
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
        self.closed = true;
        self.writer = None;
        self.identity = None;
        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
