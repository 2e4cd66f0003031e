//! Number-or-string leaf values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A scalar that arrived as a JSON number or a JSON string. The held form
/// is re-emitted unchanged: `"42"` stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(Number),
    String(String),
}

impl NumberOrString {
    /// Numeric reading. Strings are read as numbers when they spell one,
    /// including `NaN`, `Infinity`, `+Infinity` and `-Infinity`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => n.as_f64(),
            NumberOrString::String(s) => match s.trim() {
                "NaN" => Some(f64::NAN),
                "Infinity" | "+Infinity" => Some(f64::INFINITY),
                "-Infinity" => Some(f64::NEG_INFINITY),
                other => other.parse().ok(),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NumberOrString::String(s) => Some(s),
            NumberOrString::Number(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, NumberOrString::Number(_))
    }
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrString::Number(n) => write!(f, "{n}"),
            NumberOrString::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NumberOrString {
    fn from(v: i64) -> Self {
        NumberOrString::Number(v.into())
    }
}

impl From<&str> for NumberOrString {
    fn from(v: &str) -> Self {
        NumberOrString::String(v.to_owned())
    }
}

impl From<String> for NumberOrString {
    fn from(v: String) -> Self {
        NumberOrString::String(v)
    }
}
