//! Deterministic JSON pretty-printing for nested attribute values.
//!
//! Input is JSON text; output puts the top-level container one entry per
//! line and keeps nested containers on a single line as long as they fit in
//! the wrap width. Object keys are always emitted in lexicographic order so
//! the same mapping renders identically no matter how it was built.

use crate::error::Result;
use crate::unicode::display_width;
use serde_json::Value as Json;

/// Default wrap width for nested values.
pub const WRAP_WIDTH: usize = 100;

/// Default indent per nesting level.
pub const INDENT: &str = "    ";

/// JSON pretty-printer.
#[derive(Clone, Debug)]
pub struct PrettyPrinter {
    width: usize,
    prefix: String,
    indent: String,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new(WRAP_WIDTH, "", INDENT)
    }
}

impl PrettyPrinter {
    /// Create a printer that wraps at `width` columns, starts every line
    /// after the first with `prefix` and indents each level by `indent`.
    pub fn new(width: usize, prefix: impl Into<String>, indent: impl Into<String>) -> Self {
        Self {
            width,
            prefix: prefix.into(),
            indent: indent.into(),
        }
    }

    /// Parse `json` and pretty-print it.
    pub fn format_str(&self, json: &str) -> Result<String> {
        let value: Json = serde_json::from_str(json)?;
        self.format(&value)
    }

    /// Pretty-print an already parsed value.
    pub fn format(&self, value: &Json) -> Result<String> {
        let mut out = String::new();
        self.write_value(&mut out, value, 0, None)?;
        Ok(out)
    }

    /// `trailer` is the punctuation that will follow `value` on its line
    /// (`","` or nothing); `None` marks the top level, which always expands.
    fn write_value(
        &self,
        out: &mut String,
        value: &Json,
        depth: usize,
        trailer: Option<&str>,
    ) -> Result<()> {
        match value {
            Json::Array(items) if !items.is_empty() => {
                if self.fits(out, value, trailer)? {
                    return write_compact(out, value);
                }
                out.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    let trailer = if i + 1 < items.len() { "," } else { "" };
                    self.write_indent(out, depth + 1);
                    self.write_value(out, item, depth + 1, Some(trailer))?;
                    out.push_str(trailer);
                    out.push('\n');
                }
                self.write_indent(out, depth);
                out.push(']');
                Ok(())
            }
            Json::Object(map) if !map.is_empty() => {
                if self.fits(out, value, trailer)? {
                    return write_compact(out, value);
                }
                out.push_str("{\n");
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for (i, key) in keys.iter().enumerate() {
                    let trailer = if i + 1 < keys.len() { "," } else { "" };
                    self.write_indent(out, depth + 1);
                    out.push_str(&serde_json::to_string(key)?);
                    out.push_str(": ");
                    self.write_value(out, &map[key.as_str()], depth + 1, Some(trailer))?;
                    out.push_str(trailer);
                    out.push('\n');
                }
                self.write_indent(out, depth);
                out.push('}');
                Ok(())
            }
            _ => write_compact(out, value),
        }
    }

    fn write_indent(&self, out: &mut String, depth: usize) {
        out.push_str(&self.prefix);
        for _ in 0..depth {
            out.push_str(&self.indent);
        }
    }

    /// Whether the compact form of `value`, followed by `trailer`, fits on
    /// the current line. Never true at the top level.
    fn fits(&self, out: &str, value: &Json, trailer: Option<&str>) -> Result<bool> {
        let Some(trailer) = trailer else {
            return Ok(false);
        };
        let line = out.rsplit('\n').next().unwrap_or("");
        let mut compact = String::new();
        write_compact(&mut compact, value)?;
        Ok(display_width(line) + display_width(&compact) + trailer.len() <= self.width)
    }
}

/// Single-line form with sorted keys and a space after `,` and `:`.
fn write_compact(out: &mut String, value: &Json) -> Result<()> {
    match value {
        Json::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_compact(out, item)?;
            }
            out.push(']');
        }
        Json::Object(map) => {
            out.push('{');
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push_str(": ");
                write_compact(out, &map[key.as_str()])?;
            }
            out.push('}');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}
