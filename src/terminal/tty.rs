//! TTY detection and window-size queries.
//!
//! # Safety
//! This module uses unsafe code for FFI calls to libc (`isatty`, `ioctl`).

#![allow(unsafe_code)]

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

/// Narrowest width used for alignment; smaller terminals are treated as this wide.
pub const MIN_WIDTH: usize = 60;

/// Check if the given file descriptor is a TTY.
#[must_use]
pub fn is_tty<F: AsRawFd>(fd: &F) -> bool {
    // SAFETY: isatty is safe to call with any fd
    unsafe { libc::isatty(fd.as_raw_fd()) == 1 }
}

/// Get the column count of the terminal attached to `fd`.
///
/// Returns an error if the ioctl fails or the terminal reports zero columns.
pub fn terminal_width(fd: RawFd) -> io::Result<u16> {
    // SAFETY: winsize is a plain C struct, all-zero is a valid value
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };

    // SAFETY: ioctl with TIOCGWINSZ is safe when passed a valid winsize struct
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };

    if result == -1 {
        Err(io::Error::last_os_error())
    } else if size.ws_col == 0 {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "terminal reported zero columns",
        ))
    } else {
        Ok(size.ws_col)
    }
}

/// Raise a positive width below [`MIN_WIDTH`] to the minimum; zero stays zero.
#[must_use]
pub const fn clamp_width(cols: usize) -> usize {
    if cols > 0 && cols < MIN_WIDTH {
        MIN_WIDTH
    } else {
        cols
    }
}
