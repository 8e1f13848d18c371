//! Dynamically typed call-time values.
//!
//! Route tables and call sites pass loosely typed values: integers, strings,
//! flags, lists of tags, and the occasional `null`. [`ParamValue`] models
//! them and defines how each one turns into URL text.
//!
//! # String forms
//!
//! | Value | String form |
//! |-------|-------------|
//! | `Undefined` | `undefined` |
//! | `Null` | `null` |
//! | `Bool(true)` | `true` |
//! | `Int(42)` | `42` |
//! | `Float(2.0)` | `2` |
//! | `Float(2.5)` | `2.5` |
//! | `List([a, b])` | `a,b` |
//! | `Object(..)` | `[object Object]` |

use std::fmt;

/// A single call-time argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A value that was never assigned.
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A non-integer (or out of `i64` range) number.
    Float(f64),
    /// A string.
    Str(String),
    /// A list; serialized as repeated query parameters.
    List(Vec<ParamValue>),
    /// A plain object; never serialized into a query string.
    Object(Vec<(String, ParamValue)>),
}

impl ParamValue {
    /// Returns `true` for the empty string, which call sites use to mean
    /// "not provided".
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }

    /// Returns `true` for [`ParamValue::Object`].
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns the numeric reading of a scalar, if it has one.
    ///
    /// Booleans read as `1`/`0`. Strings are trimmed; an empty string reads
    /// as `0` and anything that does not parse as a number has no reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            Self::Undefined | Self::Null | Self::List(_) | Self::Object(_) => None,
        }
    }

    /// Returns the integer held by this value, accepting integral floats and
    /// digit strings.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(*f as i64),
            Self::Str(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Converts this value into JSON for diagnostics. `Undefined` becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::json!(i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        format!("{f}")
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => f.write_str(&format_number(*v)),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // Nested null-ish entries print empty inside a list
                    if !matches!(item, Self::Undefined | Self::Null) {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Object(_) => f.write_str("[object Object]"),
        }
    }
}

/// Compares a passed value against a rule default.
///
/// The comparison is deliberately loose, and this is the only place that
/// defines it:
///
/// - `Undefined` and `Null` equal each other and nothing else.
/// - Strings compare exactly with strings.
/// - Lists compare structurally with lists, objects with objects.
/// - A list or object compared with a scalar is replaced by its string form.
/// - Any other pair compares numerically via [`ParamValue::as_number`]
///   (so `"5" == 5`, `true == 1`, `"" == 0`); a side without a numeric
///   reading makes the pair unequal.
///
/// # Examples
///
/// ```
/// use routemap_urls::value::{loosely_equal, ParamValue};
///
/// assert!(loosely_equal(&ParamValue::from("1"), &ParamValue::from(1)));
/// assert!(!loosely_equal(&ParamValue::from("html"), &ParamValue::from("json")));
/// ```
pub fn loosely_equal(a: &ParamValue, b: &ParamValue) -> bool {
    use ParamValue::{Bool, List, Null, Object, Str, Undefined};

    match (a, b) {
        (Undefined | Null, Undefined | Null) => true,
        (Undefined | Null, _) | (_, Undefined | Null) => false,
        (Str(x), Str(y)) => x == y,
        (Bool(x), Bool(y)) => x == y,
        (List(x), List(y)) => x == y,
        (Object(x), Object(y)) => x == y,
        (List(_) | Object(_), _) => loosely_equal(&Str(a.to_string()), b),
        (_, List(_) | Object(_)) => loosely_equal(a, &Str(b.to_string())),
        #[allow(clippy::float_cmp)]
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for ParamValue {
    fn from(value: &serde_json::Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
