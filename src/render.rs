//! Event formatting.
//!
//! Everything here is pure: given a record, the accumulated state and the
//! current layout it produces the exact text block for one event. Nothing is
//! written and no lock is held while formatting.
//!
//! ```text
//!  08:26 INFO  server: listening                      src/main.rs:41
//!              addr  = 127.0.0.1:8080
//!              tls   = false
//! ```

use crate::color::Color;
use crate::error::Result;
use crate::handler::{ReplaceAttr, RendererState};
use crate::location::format_location;
use crate::pretty::PrettyPrinter;
use crate::record::{Attr, Record};
use crate::style::Style;
use crate::unicode::{WidthMethod, display_width_with_method};
use crate::value::Value;
use std::borrow::Cow;
use std::fmt::Write;

/// Separator between group names in the message prefix.
pub const GROUP_SEPARATOR: &str = "·";

/// Width of the level badge; fits `DEBUG`.
const LEVEL_WIDTH: usize = 5;

/// Per-call layout inputs that do not belong to the derived state.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    /// Terminal width, or `0` for bracket-fallback mode.
    pub width: usize,
    /// Emit escape sequences (only honoured when `width > 0`).
    pub color: bool,
    pub width_method: WidthMethod,
    /// Style for attribute keys in colour mode.
    pub key_style: Style,
}

impl Layout {
    /// Layout for non-terminal output.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            width: 0,
            color: false,
            width_method: WidthMethod::WcWidth,
            key_style: Style::NONE,
        }
    }

    fn terminal(&self) -> bool {
        self.width > 0
    }

    fn styled(&self) -> bool {
        self.terminal() && self.color
    }
}

/// Number of spaces between header and location in terminal mode.
///
/// When the two do not fit in `width` the location overflows past the edge
/// with a single space in front of it instead of being truncated.
#[must_use]
pub fn gap_width(width: usize, header_width: usize, location_width: usize) -> usize {
    width
        .checked_sub(header_width + location_width)
        .unwrap_or(1)
}

/// Render the full text block for `record`, trailing newline included.
pub fn render(
    record: &Record,
    state: &RendererState,
    replace: Option<&dyn ReplaceAttr>,
    layout: &Layout,
) -> Result<String> {
    let mut out = String::with_capacity(128);
    write_header(&mut out, record, state, layout);
    out.push('\n');

    let attrs = collect_attrs(record, state, replace);
    write_attrs(&mut out, &attrs, state.indent(), layout)?;
    Ok(out)
}

/// Write the header line (without newline): swatch, time, level, message,
/// gap and location.
pub fn write_header(out: &mut String, record: &Record, state: &RendererState, layout: &Layout) {
    let mut plain = String::with_capacity(64);
    if let Some(time) = record.time {
        if !state.time_format().is_empty() {
            let _ = write!(plain, "{} ", time.format(state.time_format()));
        }
    }
    let _ = write!(plain, "{:<width$} ", record.level, width = LEVEL_WIDTH);
    let badge_end = plain.len();

    let mut message = String::with_capacity(record.message.len() + 16);
    if !state.groups().is_empty() {
        message.push_str(&state.groups().join(GROUP_SEPARATOR));
        message.push_str(": ");
    }
    message.push_str(&record.message);
    plain.push_str(&message);

    let mut header_width = display_width_with_method(&plain, layout.width_method);
    if layout.terminal() {
        // The swatch occupies one cell; its escape codes take no columns.
        header_width += 1;
        if layout.styled() {
            Style::bg(Color::for_level(record.level)).paint_into(out, " ");
        } else {
            out.push(' ');
        }
    }
    out.push_str(&plain[..badge_end]);
    if layout.styled() {
        Style::bold().paint_into(out, &message);
    } else {
        out.push_str(&message);
    }

    let location = format_location(record.location.as_ref(), state.module_prefix());
    if layout.terminal() {
        let location_width = display_width_with_method(&location, layout.width_method);
        let gap = gap_width(layout.width, header_width, location_width);
        out.extend(std::iter::repeat_n(' ', gap));
        out.push_str(&location);
    } else {
        out.push_str("  [");
        out.push_str(&location);
        out.push(']');
    }
}

/// Record attributes followed by inherited ones, passed through `replace`.
///
/// Attributes the rewrite drops, and attributes with an empty key, are
/// removed here so they never reach the width computation.
pub fn collect_attrs<'a>(
    record: &'a Record,
    state: &'a RendererState,
    replace: Option<&dyn ReplaceAttr>,
) -> Vec<Cow<'a, Attr>> {
    record
        .attrs
        .iter()
        .chain(state.attrs().iter())
        .filter_map(|attr| {
            let attr = match replace {
                Some(replace) => Cow::Owned(replace.replace(state.groups(), attr.clone())?),
                None => Cow::Borrowed(attr),
            };
            (!attr.is_empty()).then_some(attr)
        })
        .collect()
}

/// Write one `key = value` line per attribute, values aligned on the widest key.
pub fn write_attrs(
    out: &mut String,
    attrs: &[Cow<'_, Attr>],
    indent: &str,
    layout: &Layout,
) -> Result<()> {
    let key_width = attrs
        .iter()
        .map(|a| display_width_with_method(&a.key, layout.width_method))
        .max()
        .unwrap_or(0);

    let continuation = format!("\n{indent}");
    for attr in attrs {
        let value = format_value(&attr.value)?;
        out.push_str(indent);
        if layout.styled() {
            layout.key_style.paint_into(out, &attr.key);
        } else {
            out.push_str(&attr.key);
        }
        let pad = key_width - display_width_with_method(&attr.key, layout.width_method);
        out.extend(std::iter::repeat_n(' ', pad));
        out.push_str(" = ");
        out.push_str(&value.trim_end_matches('\n').replace('\n', &continuation));
        out.push('\n');
    }
    Ok(())
}

/// Textual form of a value. Mappings are encoded to JSON and pretty-printed.
pub fn format_value(value: &Value) -> Result<String> {
    match value {
        Value::Map(_) => {
            let json = serde_json::to_string(value)?;
            PrettyPrinter::default().format_str(&json)
        }
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Level;
    use chrono::{Local, TimeZone};

    fn state() -> RendererState {
        RendererState::new(Level::Debug, "%H:%M", "/home/dev/app/").unwrap()
    }

    fn record(level: Level, msg: &str) -> Record {
        Record::new(level, msg)
            .with_time(Local.with_ymd_and_hms(2023, 3, 20, 8, 26, 0).unwrap())
            .with_location("/home/dev/app/src/main.rs", 23)
    }

    fn terminal(width: usize) -> Layout {
        Layout {
            width,
            color: true,
            width_method: WidthMethod::WcWidth,
            key_style: Style::NONE,
        }
    }

    #[test]
    fn test_gap_width() {
        assert_eq!(gap_width(80, 18, 14), 48);
        assert_eq!(gap_width(80, 66, 14), 0);
        assert_eq!(gap_width(80, 70, 14), 1);
        assert_eq!(gap_width(60, 100, 100), 1);
    }

    #[test]
    fn test_header_terminal_mode() {
        let mut out = String::new();
        write_header(&mut out, &record(Level::Error, "error"), &state(), &terminal(80));
        let expected = format!(
            "\x1b[48;5;210m \x1b[0m08:26 ERROR \x1b[1merror\x1b[0m{}src/main.rs:23",
            " ".repeat(80 - 18 - 14)
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_header_terminal_mode_without_color() {
        let mut out = String::new();
        let layout = Layout {
            color: false,
            ..terminal(60)
        };
        write_header(&mut out, &record(Level::Info, "info"), &state(), &layout);
        assert_eq!(out.len(), 60);
        assert!(out.starts_with(" 08:26 INFO  info "));
        assert!(out.ends_with(" src/main.rs:23"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_header_fallback_mode() {
        let mut out = String::new();
        write_header(&mut out, &record(Level::Warn, "warn"), &state(), &Layout::fallback());
        assert_eq!(out, "08:26 WARN  warn  [src/main.rs:23]");
    }

    #[test]
    fn test_header_groups_and_no_time() {
        let state = state().with_group("http").with_group("auth");
        let rec = record(Level::Debug, "denied").without_time();
        let mut out = String::new();
        write_header(&mut out, &rec, &state, &Layout::fallback());
        assert_eq!(out, "DEBUG http·auth: denied  [src/main.rs:23]");
    }

    #[test]
    fn test_header_overflow_keeps_full_location() {
        let long = "x".repeat(70);
        let mut out = String::new();
        let layout = Layout {
            color: false,
            ..terminal(60)
        };
        write_header(&mut out, &record(Level::Info, &long), &state(), &layout);
        assert!(out.ends_with(&format!("{long} src/main.rs:23")));
    }

    #[test]
    fn test_header_wide_characters_align() {
        let mut out = String::new();
        let layout = Layout {
            color: false,
            ..terminal(60)
        };
        write_header(&mut out, &record(Level::Info, "日本語"), &state(), &layout);
        assert_eq!(crate::unicode::display_width(&out), 60);
    }

    #[test]
    fn test_attrs_align_on_widest_key() {
        let rec = record(Level::Info, "m").attr("str", "foo").attr("struct", 1);
        let st = state();
        let attrs = collect_attrs(&rec, &st, None);
        let mut out = String::new();
        write_attrs(&mut out, &attrs, "  ", &Layout::fallback()).unwrap();
        assert_eq!(out, "  str    = foo\n  struct = 1\n");
    }

    #[test]
    fn test_collect_attrs_order_and_empty_keys() {
        let st = state().with_attrs([Attr::new("inherited", 1), Attr::new("", 2)]);
        let rec = record(Level::Info, "m").attr("own", 3).attr("", 4);
        let keys: Vec<String> = collect_attrs(&rec, &st, None)
            .iter()
            .map(|a| a.key.clone())
            .collect();
        assert_eq!(keys, ["own", "inherited"]);
    }

    #[test]
    fn test_collect_attrs_with_replace() {
        let replace = |groups: &[String], attr: Attr| -> Option<Attr> {
            if attr.key == "secret" {
                return None;
            }
            Some(Attr::new(format!("{}.{}", groups.join("."), attr.key), attr.value))
        };
        let st = state().with_group("g").with_attrs([Attr::new("secret", "x")]);
        let rec = record(Level::Info, "m").attr("a", 1);
        let attrs = collect_attrs(&rec, &st, Some(&replace as &dyn ReplaceAttr));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].key, "g.a");
    }

    #[test]
    fn test_multiline_values_reindent() {
        let rec = record(Level::Info, "m").attr("k", "one\ntwo\n");
        let st = state();
        let attrs = collect_attrs(&rec, &st, None);
        let mut out = String::new();
        write_attrs(&mut out, &attrs, "    ", &Layout::fallback()).unwrap();
        assert_eq!(out, "    k = one\n    two\n");
    }

    #[test]
    fn test_format_value_map() {
        let v = Value::map([("key", Value::from("value")), ("another", Value::from(true))]);
        assert_eq!(
            format_value(&v).unwrap(),
            "{\n    \"another\": true,\n    \"key\": \"value\"\n}"
        );
    }

    #[test]
    fn test_format_value_map_encoding_failure() {
        let v = Value::map([("nan", Value::from(f64::NAN))]);
        assert!(matches!(
            format_value(&v),
            Err(crate::error::Error::Encoding(_))
        ));
    }

    #[test]
    fn test_key_style_only_in_color_mode() {
        let rec = record(Level::Info, "m").attr("k", 1);
        let st = state();
        let attrs = collect_attrs(&rec, &st, None);
        let layout = Layout {
            key_style: Style::dim(),
            ..terminal(80)
        };
        let mut out = String::new();
        write_attrs(&mut out, &attrs, "", &layout).unwrap();
        assert_eq!(out, "\x1b[2mk\x1b[0m = 1\n");

        let mut out = String::new();
        let layout = Layout {
            key_style: Style::dim(),
            ..Layout::fallback()
        };
        write_attrs(&mut out, &attrs, "", &layout).unwrap();
        assert_eq!(out, "k = 1\n");
    }
}
