//! Attribute values.

use chrono::{DateTime, Local, SecondsFormat};
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// The value half of an [`Attr`](crate::Attr).
///
/// Scalars render through their natural textual form. [`Value::Map`] is the
/// one structured kind: it renders as pretty-printed JSON with sorted keys.
/// Anything else (lists, structs) is captured up front as [`Value::Any`]
/// holding its `Debug` text.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Local>),
    /// Unordered key/value mapping.
    Map(HashMap<String, Value>),
    /// Opaque value in its default textual form.
    Any(String),
}

impl Value {
    /// Capture any `Debug` value as an opaque value.
    #[must_use]
    pub fn any<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::Any(format!("{value:?}"))
    }

    /// Build a mapping value from key/value pairs.
    #[must_use]
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this value is rendered through the JSON pretty-printer.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Any(s) => f.write_str(s),
            Self::I64(n) => write!(f, "{n}"),
            Self::U64(n) => write!(f, "{n}"),
            Self::F64(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Duration(d) => write!(f, "{d:?}"),
            Self::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Map(m) => {
                let mut keys: Vec<&String> = m.keys().collect();
                keys.sort();
                f.write_str("{")?;
                for (i, k) in keys.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {}", m[k])?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) | Self::Any(s) => serializer.serialize_str(s),
            Self::I64(n) => serializer.serialize_i64(*n),
            Self::U64(n) => serializer.serialize_u64(*n),
            Self::F64(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::F64(n) => Err(S::Error::custom(format_args!(
                "{n} has no JSON representation"
            ))),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Duration(d) => serializer.collect_str(&format_args!("{d:?}")),
            Self::Time(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

macro_rules! value_from_int {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::$variant(<$target>::from(n))
                }
            }
        )*
    };
}

value_from_int!(I64, i64: i8, i16, i32, i64);
value_from_int!(U64, u64: u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::U64(n as u64)
    }
}

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        Self::I64(n as i64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::F64(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::F64(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<DateTime<Local>> for Value {
    fn from(t: DateTime<Local>) -> Self {
        Self::Time(t)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(m: HashMap<String, Value>) -> Self {
        Self::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Value::from("foo").to_string(), "foo");
        assert_eq!(Value::from(123).to_string(), "123");
        assert_eq!(Value::from(7u8).to_string(), "7");
        assert_eq!(Value::from(-4i64).to_string(), "-4");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(
            Value::from(Duration::from_millis(1500)).to_string(),
            "1.5s"
        );
    }

    #[test]
    fn test_any_uses_debug() {
        assert_eq!(Value::any(&["a", "b"]).to_string(), r#"["a", "b"]"#);

        #[derive(Debug)]
        #[allow(dead_code)]
        struct Point {
            x: i32,
        }
        assert_eq!(Value::any(&Point { x: 3 }).to_string(), "Point { x: 3 }");
    }

    #[test]
    fn test_map_display_is_sorted() {
        let v = Value::map([("key", Value::from("value")), ("another", Value::from(true))]);
        assert!(v.is_map());
        assert_eq!(v.to_string(), "{another: true, key: value}");
    }

    #[test]
    fn test_serialize_map() {
        let v = Value::map([("n", Value::from(1)), ("s", Value::from("x"))]);
        let json: serde_json::Value = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({"n": 1, "s": "x"}));
    }

    #[test]
    fn test_serialize_non_finite_fails() {
        let v = Value::map([("bad", Value::from(f64::NAN))]);
        assert!(serde_json::to_string(&v).is_err());

        let v = Value::map([("inf", Value::from(f64::INFINITY))]);
        assert!(serde_json::to_string(&v).is_err());
    }

    #[test]
    fn test_serialize_duration_as_string() {
        let v = Value::map([("d", Value::from(Duration::from_secs(2)))]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"d":"2s"}"#);
    }
}
