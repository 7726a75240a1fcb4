//! Display width calculation for column alignment.

use unicode_width::UnicodeWidthStr;

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Get the display width of a string in terminal columns.
#[must_use]
pub fn display_width(s: &str) -> usize {
    display_width_with_method(s, WidthMethod::WcWidth)
}

/// Get the display width of a string in terminal columns using a specific method.
#[must_use]
pub fn display_width_with_method(s: &str, method: WidthMethod) -> usize {
    if s.is_ascii() && s.bytes().all(|b| (b' '..=b'~').contains(&b)) {
        return s.len();
    }
    match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(s),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_cjk_width() {
        assert_eq!(display_width("漢字"), 4);
        assert_eq!(display_width("key漢"), 5);
    }

    #[test]
    fn test_emoji_width() {
        assert_eq!(display_width("😀"), 2);
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(display_width("\u{0301}"), 0);
        assert_eq!(display_width("e\u{0301}"), 1);
    }

    #[test]
    fn test_width_methods() {
        // U+2460 CIRCLED DIGIT ONE is ambiguous width
        assert_eq!(display_width_with_method("①", WidthMethod::WcWidth), 1);
        assert_eq!(display_width_with_method("①", WidthMethod::Unicode), 2);
        assert_eq!(display_width_with_method("①①", WidthMethod::Unicode), 4);
    }
}
