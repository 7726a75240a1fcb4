//! Display width of text in terminal columns.

mod width;

pub use width::{WidthMethod, display_width, display_width_with_method};
