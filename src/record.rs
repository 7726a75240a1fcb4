//! Log records: level, attributes, source location.

use crate::value::Value;
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Severity of a log record, ordered `Debug < Info < Warn < Error`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    /// Upper-case name as printed in the header badge.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width/alignment flags like {:<5} apply
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {other:?}")),
        }
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

/// A key/value pair attached to a record or inherited from a derived handler.
#[derive(Clone, Debug, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    /// Create an attribute.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Attributes with an empty key are never rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// Where a record was emitted from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl From<&'static std::panic::Location<'static>> for SourceLocation {
    fn from(loc: &'static std::panic::Location<'static>) -> Self {
        Self::new(loc.file(), loc.line())
    }
}

/// One log event, built by a front end and consumed by a handler.
#[derive(Clone, Debug)]
pub struct Record {
    /// `None` means the timestamp is omitted.
    pub time: Option<DateTime<Local>>,
    pub level: Level,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Create a record stamped with the current time and the caller's location.
    #[track_caller]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Some(Local::now()),
            level,
            message: message.into(),
            location: Some(std::panic::Location::caller().into()),
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn without_time(mut self) -> Self {
        self.time = None;
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        self.location = Some(SourceLocation::new(file, line));
        self
    }

    #[must_use]
    pub fn without_location(mut self) -> Self {
        self.location = None;
        self
    }

    /// Append an attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.push(Attr::new(key, value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert_eq!(Level::default(), Level::Info);
    }

    #[test]
    fn test_level_padding() {
        assert_eq!(format!("{:<5}|", Level::Info), "INFO |");
        assert_eq!(format!("{:<5}|", Level::Debug), "DEBUG|");
        assert_eq!(format!("{:<5}|", Level::Warn), "WARN |");
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!(" ERROR ".parse::<Level>(), Ok(Level::Error));
        assert_eq!("trace".parse::<Level>(), Ok(Level::Debug));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_from_tracing() {
        assert_eq!(Level::from(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(Level::from(&tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from(&tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn test_record_captures_caller() {
        let line = line!() + 1;
        let record = Record::new(Level::Info, "hi");
        let loc = record.location.expect("location");
        assert!(loc.file.ends_with("record.rs"));
        assert_eq!(loc.line, line);
        assert!(record.time.is_some());
    }

    #[test]
    fn test_record_builders() {
        let record = Record::new(Level::Warn, "msg")
            .without_time()
            .with_location("src/lib.rs", 9)
            .attr("a", 1)
            .attr("b", "two");
        assert!(record.time.is_none());
        assert_eq!(record.location, Some(SourceLocation::new("src/lib.rs", 9)));
        assert_eq!(record.attrs.len(), 2);
        assert_eq!(record.attrs[1], Attr::new("b", "two"));
    }

    #[test]
    fn test_attr_is_empty() {
        assert!(Attr::new("", 1).is_empty());
        assert!(!Attr::new("k", 1).is_empty());
    }
}
