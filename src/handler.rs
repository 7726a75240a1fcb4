//! The aligned handler.
//!
//! [`AlignedHandler`] is the sink a logging front end calls once per event.
//! It pairs an immutable [`RendererState`] (level, time format, group path,
//! inherited attributes) with resources shared by every handler derived from
//! the same root: the destination, the width tracker and the attribute
//! rewrite strategy.
//!
//! # Example
//!
//! ```
//! use aligned_log::{AlignedHandler, Attr, HandlerOptions, Level, MemoryDestination, Record, WidthMode};
//!
//! let out = MemoryDestination::new();
//! let handler = AlignedHandler::new(
//!     out.clone(),
//!     HandlerOptions::default().width(WidthMode::Fixed(0)).time_format(""),
//! )?;
//!
//! let request = handler.with_group("http").with_attrs([Attr::new("method", "GET")]);
//! request.handle(&Record::new(Level::Info, "served").without_location())?;
//!
//! assert_eq!(out.contents(), "INFO  http: served  [:0]\n      method = GET\n");
//! # Ok::<(), aligned_log::Error>(())
//! ```

use crate::destination::Destination;
use crate::error::{Error, Result};
use crate::location::{module_root, root_prefix};
use crate::record::{Attr, Level, Record};
use crate::render::{self, Layout};
use crate::style::Style;
use crate::unicode::{WidthMethod, display_width};
use crate::width::WidthTracker;
use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use std::fmt::{self, Write as _};
use std::io::{Stderr, Stdout, Write as _};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Default timestamp format (`15:04` style hours and minutes).
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Attribute indent used when timestamps are disabled.
const NO_TIME_INDENT: &str = "      ";

/// Rewrites or drops attributes before they are rendered.
///
/// Called with the current group path for every record attribute and every
/// inherited attribute. Returning `None` drops the attribute.
pub trait ReplaceAttr: Send + Sync {
    fn replace(&self, groups: &[String], attr: Attr) -> Option<Attr>;
}

impl<F> ReplaceAttr for F
where
    F: Fn(&[String], Attr) -> Option<Attr> + Send + Sync,
{
    fn replace(&self, groups: &[String], attr: Attr) -> Option<Attr> {
        self(groups, attr)
    }
}

/// How the rendering width is determined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMode {
    /// Query the terminal if the destination is one, and follow resizes.
    #[default]
    Detect,
    /// Use a static width; `0` selects bracket-fallback mode.
    Fixed(usize),
}

/// Handler configuration.
#[derive(Clone)]
pub struct HandlerOptions {
    /// Minimum level to emit.
    pub level: Level,
    /// Attribute rewrite strategy.
    pub replace_attr: Option<Arc<dyn ReplaceAttr>>,
    /// chrono strftime format; empty disables timestamps.
    pub time_format: String,
    pub width: WidthMode,
    /// Write escape sequences in terminal mode.
    pub color: bool,
    pub width_method: WidthMethod,
    /// Style applied to attribute keys in colour mode.
    pub key_style: Style,
    /// Overrides the discovered module root used to shorten paths.
    pub module_root: Option<PathBuf>,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            level: Level::Info,
            replace_attr: None,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            width: WidthMode::Detect,
            color: true,
            width_method: WidthMethod::WcWidth,
            key_style: Style::NONE,
            module_root: None,
        }
    }
}

impl HandlerOptions {
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn replace_attr<R: ReplaceAttr + 'static>(mut self, replace: R) -> Self {
        self.replace_attr = Some(Arc::new(replace));
        self
    }

    #[must_use]
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    #[must_use]
    pub fn width(mut self, width: WidthMode) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn width_method(mut self, method: WidthMethod) -> Self {
        self.width_method = method;
        self
    }

    #[must_use]
    pub fn key_style(mut self, style: Style) -> Self {
        self.key_style = style;
        self
    }

    #[must_use]
    pub fn module_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.module_root = Some(root.into());
        self
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level)
            .field("replace_attr", &self.replace_attr.is_some())
            .field("time_format", &self.time_format)
            .field("width", &self.width)
            .field("color", &self.color)
            .field("width_method", &self.width_method)
            .field("key_style", &self.key_style)
            .field("module_root", &self.module_root)
            .finish()
    }
}

fn validate_time_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::InvalidTimeFormat(format.to_string()));
    }
    Ok(())
}

/// Indent for attribute lines: the width of a formatted timestamp plus 8.
fn indent_for(format: &str) -> String {
    if format.is_empty() {
        return NO_TIME_INDENT.to_string();
    }
    let mut stamp = String::new();
    let _ = write!(stamp, "{}", Local::now().format(format));
    " ".repeat(display_width(&stamp) + 8)
}

/// Per-handler rendering state.
///
/// Derivation (`with_attrs`, `with_group`) builds a new state from copies of
/// the parent's sequences; the parent is never touched, so siblings derived
/// concurrently from one parent never see each other's additions.
#[derive(Clone, Debug)]
pub struct RendererState {
    min_level: Level,
    time_format: String,
    indent: String,
    groups: Arc<[String]>,
    attrs: Arc<[Attr]>,
    module_prefix: Arc<str>,
}

impl RendererState {
    /// Create a root state. Fails if `time_format` is not a valid strftime format.
    pub fn new(min_level: Level, time_format: &str, module_prefix: &str) -> Result<Self> {
        validate_time_format(time_format)?;
        Ok(Self {
            min_level,
            time_format: time_format.to_string(),
            indent: indent_for(time_format),
            groups: Arc::from([]),
            attrs: Arc::from([]),
            module_prefix: Arc::from(module_prefix),
        })
    }

    /// A state whose inherited attributes are this state's plus `attrs`.
    #[must_use]
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let mut combined = self.attrs.to_vec();
        combined.extend(attrs);
        Self {
            attrs: combined.into(),
            ..self.clone()
        }
    }

    /// A state nested one group deeper. An empty name returns an unchanged copy.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }
        let mut groups = self.groups.to_vec();
        groups.push(name);
        Self {
            groups: groups.into(),
            ..self.clone()
        }
    }

    /// Change the timestamp format; empty disables timestamps.
    pub fn set_time_format(&mut self, format: &str) -> Result<()> {
        validate_time_format(format)?;
        self.time_format = format.to_string();
        self.indent = indent_for(format);
        Ok(())
    }

    #[must_use]
    pub fn min_level(&self) -> Level {
        self.min_level
    }

    #[must_use]
    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    #[must_use]
    pub fn indent(&self) -> &str {
        &self.indent
    }

    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    #[must_use]
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    #[must_use]
    pub fn module_prefix(&self) -> &str {
        &self.module_prefix
    }
}

/// Resources shared by a root handler and everything derived from it.
struct Shared {
    out: Mutex<Box<dyn Destination>>,
    tracker: WidthTracker,
    replace: Option<Arc<dyn ReplaceAttr>>,
    color: bool,
    width_method: WidthMethod,
    key_style: Style,
}

/// Log handler printing column-aligned, colour-coded events.
///
/// Cloning is cheap; clones and derived handlers share the destination and
/// the width tracker. Formatting runs without locks, only the final write is
/// serialized per destination.
#[derive(Clone)]
pub struct AlignedHandler {
    state: RendererState,
    shared: Arc<Shared>,
}

impl AlignedHandler {
    /// Create a handler writing to `dest`.
    ///
    /// With [`WidthMode::Detect`] the terminal width is queried only when the
    /// destination reports a terminal (stdout or stderr attached to a TTY).
    pub fn new<D: Destination + 'static>(dest: D, options: HandlerOptions) -> Result<Self> {
        let tracker = match options.width {
            WidthMode::Detect => WidthTracker::detect(dest.terminal_fd()),
            WidthMode::Fixed(width) => WidthTracker::fixed(width),
        };
        let root = options.module_root.or_else(module_root);
        let state = RendererState::new(
            options.level,
            &options.time_format,
            &root_prefix(root.as_deref()),
        )?;

        Ok(Self {
            state,
            shared: Arc::new(Shared {
                out: Mutex::new(Box::new(dest)),
                tracker,
                replace: options.replace_attr,
                color: options.color,
                width_method: options.width_method,
                key_style: options.key_style,
            }),
        })
    }

    /// Handler writing to standard output.
    pub fn stdout(options: HandlerOptions) -> Result<Self> {
        Self::new::<Stdout>(std::io::stdout(), options)
    }

    /// Handler writing to standard error.
    pub fn stderr(options: HandlerOptions) -> Result<Self> {
        Self::new::<Stderr>(std::io::stderr(), options)
    }

    /// Whether records at `level` are emitted.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.state.min_level
    }

    /// Format `record` without writing it. `None` if its level is disabled.
    pub fn render(&self, record: &Record) -> Result<Option<String>> {
        if !self.enabled(record.level) {
            return Ok(None);
        }
        let layout = self.layout();
        render::render(
            record,
            &self.state,
            self.shared.replace.as_deref(),
            &layout,
        )
        .map(Some)
    }

    /// Format `record` and write it to the destination in a single write.
    ///
    /// On error nothing is written.
    pub fn handle(&self, record: &Record) -> Result<()> {
        let Some(text) = self.render(record)? else {
            return Ok(());
        };
        let mut out = self
            .shared
            .out
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// A handler that also renders `attrs` with every record.
    #[must_use]
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self {
            state: self.state.with_attrs(attrs),
            shared: Arc::clone(&self.shared),
        }
    }

    /// A handler whose messages are prefixed by one more group name.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        Self {
            state: self.state.with_group(name),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Change the timestamp format of this handler; empty disables timestamps.
    pub fn set_time_format(&mut self, format: &str) -> Result<()> {
        self.state.set_time_format(format)
    }

    #[must_use]
    pub fn state(&self) -> &RendererState {
        &self.state
    }

    /// Current rendering width; `0` in bracket-fallback mode.
    #[must_use]
    pub fn width(&self) -> usize {
        self.shared.tracker.current()
    }

    fn layout(&self) -> Layout {
        Layout {
            width: self.width(),
            color: self.shared.color,
            width_method: self.shared.width_method,
            key_style: self.shared.key_style,
        }
    }
}

impl fmt::Debug for AlignedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedHandler")
            .field("state", &self.state)
            .field("tracker", &self.shared.tracker)
            .finish_non_exhaustive()
    }
}
