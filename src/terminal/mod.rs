//! Terminal queries: TTY detection and column count.

mod tty;

pub use tty::{MIN_WIDTH, clamp_width, is_tty, terminal_width};
