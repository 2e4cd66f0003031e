//! ISO-8601 instants, interval bounds and intervals.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::error::VariantError;

/// A date-time with its offset, parsed from RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeInstant(DateTime<FixedOffset>);

impl TimeInstant {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    pub fn parse(text: &str) -> Result<Self, VariantError> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(Self)
            .map_err(|_| VariantError::InvalidTime(text.to_owned()))
    }

    pub fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// RFC 3339, with `Z` for a zero offset.
    pub fn to_rfc3339(&self) -> String {
        if self.0.offset().local_minus_utc() == 0 {
            self.to_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true)
        } else {
            self.0.to_rfc3339_opts(SecondsFormat::AutoSi, false)
        }
    }
}

impl From<DateTime<Utc>> for TimeInstant {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at.fixed_offset())
    }
}

impl FromStr for TimeInstant {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for TimeInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for TimeInstant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}

/// One end of a time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBound {
    At(TimeInstant),
    /// The moment of evaluation.
    Now,
    /// Unbounded. Written `..` inside interval text and `null` in JSON.
    Open,
}

impl TimeBound {
    pub fn parse(text: &str) -> Result<Self, VariantError> {
        match text.trim() {
            "now" => Ok(TimeBound::Now),
            ".." | "" => Ok(TimeBound::Open),
            other => TimeInstant::parse(other).map(TimeBound::At),
        }
    }

    fn from_json(value: &Value) -> Result<Self, VariantError> {
        match value {
            Value::Null => Ok(TimeBound::Open),
            Value::String(text) => Self::parse(text),
            other => Err(VariantError::InvalidTime(other.to_string())),
        }
    }

    /// The concrete instant, with `Now` read from the clock.
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeBound::At(at) => Some(at.to_utc()),
            TimeBound::Now => Some(Utc::now()),
            TimeBound::Open => None,
        }
    }

    fn interval_text(&self) -> String {
        match self {
            TimeBound::At(at) => at.to_rfc3339(),
            TimeBound::Now => "now".to_owned(),
            TimeBound::Open => "..".to_owned(),
        }
    }
}

impl Serialize for TimeBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeBound::At(at) => at.serialize(serializer),
            TimeBound::Now => serializer.serialize_str("now"),
            TimeBound::Open => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TimeBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(de::Error::custom)
    }
}

/// A closed, half-open or open time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub start: TimeBound,
    pub end: TimeBound,
}

impl TimeInterval {
    pub fn new(start: TimeBound, end: TimeBound) -> Self {
        Self { start, end }
    }

    /// Parses `start/end` text.
    pub fn parse(text: &str) -> Result<Self, VariantError> {
        let (start, end) = text
            .split_once('/')
            .ok_or_else(|| VariantError::InvalidTime(text.to_owned()))?;
        Ok(Self::new(TimeBound::parse(start)?, TimeBound::parse(end)?))
    }

    /// Reads `"start/end"`, `[start, end]` or `{"start"|"begin": .., "end": ..}`.
    pub fn from_json(value: &Value) -> Result<Self, VariantError> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Array(items) if items.len() == 2 => Ok(Self::new(
                TimeBound::from_json(&items[0])?,
                TimeBound::from_json(&items[1])?,
            )),
            Value::Object(fields) => {
                let start = fields
                    .get("start")
                    .or_else(|| fields.get("begin"))
                    .ok_or_else(|| VariantError::InvalidTime(value.to_string()))?;
                let end = fields
                    .get("end")
                    .ok_or_else(|| VariantError::InvalidTime(value.to_string()))?;
                Ok(Self::new(TimeBound::from_json(start)?, TimeBound::from_json(end)?))
            }
            other => Err(VariantError::InvalidTime(other.to_string())),
        }
    }

    /// `start/end` text with `..` for open ends.
    pub fn to_iso_string(&self) -> String {
        format!("{}/{}", self.start.interval_text(), self.end.interval_text())
    }

    /// Whether `at` lies within the interval, ends included.
    pub fn contains(&self, at: &TimeInstant) -> bool {
        let at = at.to_utc();
        let after_start = self.start.resolve().map_or(true, |start| start <= at);
        let before_end = self.end.resolve().map_or(true, |end| at <= end);
        after_start && before_end
    }
}

impl Serialize for TimeInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.start, self.end].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TimeInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(de::Error::custom)
    }
}
