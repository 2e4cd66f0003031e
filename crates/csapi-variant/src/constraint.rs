//! Constraint family: `AllowedTokens`, `AllowedValues`, `AllowedTimes`.
//!
//! Constraints are produced server-side, so they always emit from the
//! resolved shape.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scalar::NumberOrString;
use crate::time::{TimeInstant, TimeInterval};
use crate::variant::{decode_as, EmitPolicy, Family, Variant};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowedTokens {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl AllowedTokens {
    /// A token is permitted when it is listed or matches the whole pattern.
    /// With neither set, every token is permitted.
    pub fn permits(&self, token: &str) -> Result<bool, regex::Error> {
        if self.values.iter().any(|v| v == token) {
            return Ok(true);
        }
        match &self.pattern {
            Some(pattern) => Ok(Regex::new(&format!("^(?:{pattern})$"))?.is_match(token)),
            None => Ok(self.values.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedValues {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<NumberOrString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intervals: Vec<[NumberOrString; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_figures: Option<u32>,
}

impl AllowedValues {
    /// Listed values compare numerically; intervals are closed.
    pub fn permits(&self, x: f64) -> bool {
        if self.values.is_empty() && self.intervals.is_empty() {
            return true;
        }
        self.values.iter().any(|v| v.as_f64() == Some(x))
            || self.intervals.iter().any(|[lo, hi]| {
                matches!((lo.as_f64(), hi.as_f64()), (Some(lo), Some(hi)) if lo <= x && x <= hi)
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedTimes {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<TimeInstant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intervals: Vec<TimeInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_figures: Option<u32>,
}

impl AllowedTimes {
    pub fn permits(&self, at: &TimeInstant) -> bool {
        if self.values.is_empty() && self.intervals.is_empty() {
            return true;
        }
        self.values.iter().any(|v| v.to_utc() == at.to_utc())
            || self.intervals.iter().any(|i| i.contains(at))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintTag {
    AllowedTokens,
    AllowedValues,
    AllowedTimes,
}

impl ConstraintTag {
    pub fn name(self) -> &'static str {
        match self {
            ConstraintTag::AllowedTokens => "AllowedTokens",
            ConstraintTag::AllowedValues => "AllowedValues",
            ConstraintTag::AllowedTimes => "AllowedTimes",
        }
    }
}

impl fmt::Display for ConstraintTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Constraint {
    AllowedTokens(AllowedTokens),
    AllowedValues(AllowedValues),
    AllowedTimes(AllowedTimes),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintFamily;

impl Family for ConstraintFamily {
    const NAME: &'static str = "constraint";
    const DISCRIMINATOR: Option<&'static str> = Some("type");
    const EMIT: EmitPolicy = EmitPolicy::Reconstruct;

    type Tag = ConstraintTag;
    type Shape = Constraint;
    type Shared = ();

    fn tag_of(name: &str) -> Option<ConstraintTag> {
        match name {
            "AllowedTokens" => Some(ConstraintTag::AllowedTokens),
            "AllowedValues" => Some(ConstraintTag::AllowedValues),
            "AllowedTimes" => Some(ConstraintTag::AllowedTimes),
            _ => None,
        }
    }

    fn shape_tag(shape: &Constraint) -> ConstraintTag {
        match shape {
            Constraint::AllowedTokens(_) => ConstraintTag::AllowedTokens,
            Constraint::AllowedValues(_) => ConstraintTag::AllowedValues,
            Constraint::AllowedTimes(_) => ConstraintTag::AllowedTimes,
        }
    }

    fn decode(tag: ConstraintTag, raw: &[u8], _value: &Value) -> Result<Constraint, String> {
        match tag {
            ConstraintTag::AllowedTokens => decode_as(raw).map(Constraint::AllowedTokens),
            ConstraintTag::AllowedValues => decode_as(raw).map(Constraint::AllowedValues),
            ConstraintTag::AllowedTimes => decode_as(raw).map(Constraint::AllowedTimes),
        }
    }

    fn probe(value: &Value) -> Vec<ConstraintTag> {
        let has = |key: &str| value.get(key).is_some();
        if has("pattern") {
            vec![ConstraintTag::AllowedTokens]
        } else if has("values") || has("intervals") {
            vec![ConstraintTag::AllowedValues, ConstraintTag::AllowedTimes]
        } else {
            Vec::new()
        }
    }

    fn shared(_value: &Value) {}

    fn reconstruct(shape: &Constraint, _shared: &()) -> Value {
        serde_json::to_value(shape).unwrap_or_default()
    }
}

impl Variant<ConstraintFamily> {
    pub fn as_allowed_tokens(&self) -> Option<&AllowedTokens> {
        match self.shape() {
            Some(Constraint::AllowedTokens(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_allowed_values(&self) -> Option<&AllowedValues> {
        match self.shape() {
            Some(Constraint::AllowedValues(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_allowed_times(&self) -> Option<&AllowedTimes> {
        match self.shape() {
            Some(Constraint::AllowedTimes(c)) => Some(c),
            _ => None,
        }
    }
}
