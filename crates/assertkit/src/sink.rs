//! Output targets for failure reports.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone)]
enum Target {
    Stderr,
    Stdout,
    Discard,
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
}

/// A cloneable, synchronized writable target.
///
/// Clones share the underlying writer.
#[derive(Clone)]
pub struct Sink {
    target: Target,
}

impl Sink {
    /// Standard error.
    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            target: Target::Stderr,
        }
    }

    /// Standard output.
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            target: Target::Stdout,
        }
    }

    /// Swallows everything.
    #[must_use]
    pub const fn discard() -> Self {
        Self {
            target: Target::Discard,
        }
    }

    /// Wrap an arbitrary writer (a file, a socket, ...).
    #[must_use]
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            target: Target::Writer(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// An in-memory sink plus a handle for reading back what was written.
    #[must_use]
    pub fn buffer() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::from_writer(buffer.clone()), buffer)
    }

    /// Write `text` in one call and flush.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the write or flush fails.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        match &self.target {
            Target::Stderr => {
                let mut out = io::stderr().lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
            Target::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
            Target::Discard => Ok(()),
            Target::Writer(writer) => {
                let mut out = writer.lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
        }
    }

    /// Write `text` and report failures through `tracing` instead of returning them.
    pub(crate) fn emit(&self, text: &str) {
        if let Err(e) = self.write_str(text) {
            tracing::error!(error = %e, sink = ?self, "failed to write assertion output");
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.target {
            Target::Stderr => "Sink::Stderr",
            Target::Stdout => "Sink::Stdout",
            Target::Discard => "Sink::Discard",
            Target::Writer(_) => "Sink::Writer",
        })
    }
}

/// In-memory byte buffer shared between a [`Sink`] and a reader.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
