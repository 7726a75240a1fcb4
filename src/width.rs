//! Terminal width tracking.
//!
//! [`SharedWidth`] is the one piece of mutable state shared by every clone
//! of a handler. It holds the current column count, or `0` when the output
//! is not a terminal (bracket-fallback mode). [`WidthTracker`] owns it,
//! initialises it from the terminal and keeps it current from a background
//! thread that listens for `SIGWINCH`.

use crate::diag::{DiagLevel, emit_diag};
use crate::terminal::{clamp_width, terminal_width};
use signal_hook::consts::SIGWINCH;
use signal_hook::iterator::{Handle, Signals};
use std::fmt;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Current rendering width guarded by a mutex.
///
/// Clones share the same cell. Only the tracker writes to it.
#[derive(Clone, Debug, Default)]
pub struct SharedWidth {
    inner: Arc<Mutex<usize>>,
}

impl SharedWidth {
    /// Create a cell holding `width`.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(width)),
        }
    }

    /// Last known width; `0` means "not a terminal".
    #[must_use]
    pub fn current(&self) -> usize {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn update(&self, width: usize) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = width;
    }
}

/// Apply the outcome of a terminal query to `width`.
///
/// A failed query or a zero width keeps the previous value.
fn apply_query(width: &SharedWidth, result: io::Result<u16>) {
    match result {
        Ok(cols) => {
            let cols = clamp_width(usize::from(cols));
            if cols > 0 {
                width.update(cols);
            }
        }
        Err(e) => emit_diag(
            DiagLevel::Debug,
            &format!("terminal width query failed: {e}"),
        ),
    }
}

/// Background `SIGWINCH` listener. Dropping it stops and joins the thread.
struct ResizeListener {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl ResizeListener {
    fn spawn(fd: RawFd, width: SharedWidth) -> io::Result<Self> {
        let mut signals = Signals::new([SIGWINCH])?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("aligned-log-resize".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    apply_query(&width, terminal_width(fd));
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Owner of a [`SharedWidth`] and, for terminals, its resize listener.
pub struct WidthTracker {
    width: SharedWidth,
    listener: Option<ResizeListener>,
}

impl WidthTracker {
    /// A tracker with a static width and no listener.
    #[must_use]
    pub fn fixed(width: usize) -> Self {
        Self {
            width: SharedWidth::new(width),
            listener: None,
        }
    }

    /// Query the terminal behind `fd` and follow its resizes.
    ///
    /// `None`, a failed query or a zero width leaves the tracker at `0`
    /// without a listener. Widths below [`MIN_WIDTH`](crate::terminal::MIN_WIDTH)
    /// are raised to it.
    #[must_use]
    pub fn detect(fd: Option<RawFd>) -> Self {
        let Some(fd) = fd else {
            return Self::fixed(0);
        };
        let width = SharedWidth::default();
        apply_query(&width, terminal_width(fd));
        if width.current() == 0 {
            return Self {
                width,
                listener: None,
            };
        }

        let listener = match ResizeListener::spawn(fd, width.clone()) {
            Ok(listener) => Some(listener),
            Err(e) => {
                emit_diag(
                    DiagLevel::Warn,
                    &format!("cannot listen for terminal resizes: {e}"),
                );
                None
            }
        };
        Self { width, listener }
    }

    /// Shared handle to the tracked width.
    #[must_use]
    pub fn shared(&self) -> SharedWidth {
        self.width.clone()
    }

    /// Last known width.
    #[must_use]
    pub fn current(&self) -> usize {
        self.width.current()
    }

    /// Whether a resize listener is running.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.listener.is_some()
    }
}

impl fmt::Debug for WidthTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidthTracker")
            .field("width", &self.current())
            .field("tracking", &self.is_tracking())
            .finish()
    }
}
