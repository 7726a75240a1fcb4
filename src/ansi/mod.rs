//! ANSI escape sequence generation.

pub mod sequences;

pub use sequences::RESET;

use crate::color::Color;
use crate::style::TextAttributes;
use std::fmt::{self, Write};

/// Write a u8 as decimal digits without going through the formatter.
#[inline]
fn write_u8_decimal(w: &mut impl Write, n: u8) -> fmt::Result {
    if n >= 100 {
        w.write_char(char::from(b'0' + n / 100))?;
    }
    if n >= 10 {
        w.write_char(char::from(b'0' + (n / 10) % 10))?;
    }
    w.write_char(char::from(b'0' + n % 10))
}

fn write_color(w: &mut impl Write, color: Color, base: &str) -> fmt::Result {
    w.write_str("\x1b[")?;
    w.write_str(base)?;
    match color {
        Color::Indexed(idx) => {
            w.write_str(";5;")?;
            write_u8_decimal(w, idx)?;
        }
        Color::Rgb(r, g, b) => {
            w.write_str(";2;")?;
            write_u8_decimal(w, r)?;
            w.write_char(';')?;
            write_u8_decimal(w, g)?;
            w.write_char(';')?;
            write_u8_decimal(w, b)?;
        }
    }
    w.write_char('m')
}

/// Write the SGR sequence selecting `color` as foreground.
pub fn write_fg_color(w: &mut impl Write, color: Color) -> fmt::Result {
    write_color(w, color, "38")
}

/// Write the SGR sequence selecting `color` as background.
pub fn write_bg_color(w: &mut impl Write, color: Color) -> fmt::Result {
    write_color(w, color, "48")
}

/// Write SGR sequence for text attributes.
///
/// Writes nothing for an empty attribute set.
pub fn write_attributes(w: &mut impl Write, attrs: TextAttributes) -> fmt::Result {
    let code = match (
        attrs.contains(TextAttributes::BOLD),
        attrs.contains(TextAttributes::DIM),
    ) {
        (false, false) => return Ok(()),
        (true, false) => "1",
        (false, true) => "2",
        (true, true) => "1;2",
    };
    w.write_str("\x1b[")?;
    w.write_str(code)?;
    w.write_char('m')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sgr(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
        let mut out = String::new();
        write(&mut out).unwrap();
        out
    }

    #[test]
    fn test_indexed_colors() {
        assert_eq!(sgr(|w| write_bg_color(w, Color::Indexed(210))), "\x1b[48;5;210m");
        assert_eq!(sgr(|w| write_bg_color(w, Color::Indexed(51))), "\x1b[48;5;51m");
        assert_eq!(sgr(|w| write_fg_color(w, Color::Indexed(7))), "\x1b[38;5;7m");
    }

    #[test]
    fn test_rgb_colors() {
        assert_eq!(
            sgr(|w| write_fg_color(w, Color::Rgb(255, 128, 0))),
            "\x1b[38;2;255;128;0m"
        );
        assert_eq!(
            sgr(|w| write_bg_color(w, Color::Rgb(0, 10, 100))),
            "\x1b[48;2;0;10;100m"
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(sgr(|w| write_attributes(w, TextAttributes::BOLD)), "\x1b[1m");
        assert_eq!(sgr(|w| write_attributes(w, TextAttributes::DIM)), "\x1b[2m");
        assert_eq!(sgr(|w| write_attributes(w, TextAttributes::all())), "\x1b[1;2m");
        assert_eq!(sgr(|w| write_attributes(w, TextAttributes::empty())), "");
    }
}
