//! `aligned_log` - column-aligned terminal rendering for structured log events
//!
//! Each event is printed as a colour-coded header line with its source
//! location pushed to the right edge of the terminal, followed by one line
//! per attribute with keys padded to a common width. When the output is not
//! a terminal, the location is appended in brackets instead.

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (required for ioctl FFI)
#![allow(clippy::module_name_repetitions)] // Allow AlignedHandler in handler etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests

pub mod ansi;
pub mod color;
pub mod destination;
pub mod diag;
pub mod error;
pub mod handler;
pub mod layer;
pub mod location;
pub mod pretty;
pub mod record;
pub mod render;
pub mod style;
pub mod terminal;
pub mod unicode;
pub mod value;
pub mod width;

// Re-export core types at crate root
pub use color::Color;
pub use destination::{Destination, MemoryDestination};
pub use diag::{DiagLevel, clear_diag_callback, set_diag_callback};
pub use error::{Error, Result};
pub use handler::{
    AlignedHandler, DEFAULT_TIME_FORMAT, HandlerOptions, RendererState, ReplaceAttr, WidthMode,
};
pub use layer::AlignedLayer;
pub use record::{Attr, Level, Record, SourceLocation};
pub use style::{Style, TextAttributes};
pub use value::Value;

// Re-export width handling
pub use terminal::{MIN_WIDTH, is_tty};
pub use unicode::{WidthMethod, display_width};
pub use width::{SharedWidth, WidthTracker};
