//! Terminal colours.
//!
//! Log output only needs a handful of fixed colours, so [`Color`] is either
//! an index into the xterm 256-colour palette or a 24-bit RGB triple. The
//! level swatches use palette indices, which every 256-colour terminal
//! renders the same way.

use crate::record::Level;

/// A terminal colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Index into the 256-colour palette.
    Indexed(u8),
    /// True colour.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Light gray (palette 250).
    pub const LIGHT_GRAY: Self = Self::Indexed(250);
    /// Bright cyan (palette 51).
    pub const CYAN: Self = Self::Indexed(51);
    /// Orange (palette 214).
    pub const ORANGE: Self = Self::Indexed(214);
    /// Light red / pink (palette 210).
    pub const PINK: Self = Self::Indexed(210);

    /// Swatch colour for a log level.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Debug => Self::LIGHT_GRAY,
            Level::Info => Self::CYAN,
            Level::Warn => Self::ORANGE,
            Level::Error => Self::PINK,
        }
    }
}
