//! Output destinations.
//!
//! A [`Destination`] is anything the handler can write rendered events to.
//! Separately from writing, it may report a terminal file descriptor; only
//! destinations that do are measured and tracked for resizes.

use crate::terminal::is_tty;
use std::fs::File;
use std::io::{self, Stderr, Stdout, Write};
use std::os::unix::io::RawFd;
use std::sync::{Arc, Mutex, PoisonError};

/// A writable sink for rendered log text.
pub trait Destination: Write + Send {
    /// File descriptor of the terminal this destination writes to, if any.
    fn terminal_fd(&self) -> Option<RawFd> {
        None
    }
}

impl Destination for Stdout {
    fn terminal_fd(&self) -> Option<RawFd> {
        is_tty(self).then_some(libc::STDOUT_FILENO)
    }
}

impl Destination for Stderr {
    fn terminal_fd(&self) -> Option<RawFd> {
        is_tty(self).then_some(libc::STDERR_FILENO)
    }
}

// Files are never measured, even when they happen to be a TTY device.
impl Destination for File {}

impl Destination for Vec<u8> {}

impl<D: Destination + ?Sized> Destination for Box<D> {
    fn terminal_fd(&self) -> Option<RawFd> {
        (**self).terminal_fd()
    }
}

/// In-memory destination whose clones share one buffer.
///
/// Useful in tests and for capturing output to forward elsewhere.
#[derive(Clone, Debug, Default)]
pub struct MemoryDestination {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryDestination {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Return and clear everything written so far.
    pub fn take(&self) -> String {
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        let out = String::from_utf8_lossy(&buf).into_owned();
        buf.clear();
        out
    }
}

impl Write for MemoryDestination {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Destination for MemoryDestination {}
