//! Text styling with attributes and colors.
//!
//! - [`TextAttributes`]: Bitflags for bold and dim
//! - [`Style`]: Colors plus attributes, able to paint a piece of text
//!
//! # Examples
//!
//! ```
//! use aligned_log::{Color, Style};
//!
//! let mut out = String::new();
//! Style::bg(Color::CYAN).paint_into(&mut out, " ");
//! Style::NONE.paint_into(&mut out, "text");
//! assert_eq!(out, "\x1b[48;5;51m \x1b[0mtext");
//! ```

use crate::ansi;
use crate::color::Color;
use bitflags::bitflags;

bitflags! {
    /// Text rendering attributes.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        /// Bold/increased intensity.
        const BOLD      = 0x01;
        /// Dim/decreased intensity.
        const DIM       = 0x02;
    }
}

/// Complete text style: optional colors and attributes.
///
/// `None` for a color means "terminal default".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Text rendering attributes.
    pub attributes: TextAttributes,
}

impl Style {
    /// Empty style with no colors or attributes.
    pub const NONE: Self = Self {
        fg: None,
        bg: None,
        attributes: TextAttributes::empty(),
    };

    /// Create a style with only background color.
    #[must_use]
    pub const fn bg(color: Color) -> Self {
        Self {
            fg: None,
            bg: Some(color),
            attributes: TextAttributes::empty(),
        }
    }

    /// Create a bold style.
    #[must_use]
    pub const fn bold() -> Self {
        Self {
            fg: None,
            bg: None,
            attributes: TextAttributes::BOLD,
        }
    }

    /// Create a dim style.
    #[must_use]
    pub const fn dim() -> Self {
        Self {
            fg: None,
            bg: None,
            attributes: TextAttributes::DIM,
        }
    }

    /// Check if this style changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attributes.is_empty()
    }

    /// Append `text` to `out` wrapped in this style's escape sequences.
    ///
    /// An empty style appends the text unchanged, without a trailing reset.
    pub fn paint_into(&self, out: &mut String, text: &str) {
        if self.is_empty() {
            out.push_str(text);
            return;
        }
        let _ = ansi::write_attributes(out, self.attributes);
        if let Some(fg) = self.fg {
            let _ = ansi::write_fg_color(out, fg);
        }
        if let Some(bg) = self.bg {
            let _ = ansi::write_bg_color(out, bg);
        }
        out.push_str(text);
        out.push_str(ansi::RESET);
    }
}
