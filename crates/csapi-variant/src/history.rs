//! History timestamp family: one instant or one interval, with no
//! discriminator.

use std::fmt;

use serde_json::Value;

use crate::time::{TimeInstant, TimeInterval};
use crate::variant::{EmitPolicy, Family, Variant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryTag {
    Instant,
    Interval,
}

impl fmt::Display for HistoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HistoryTag::Instant => "Instant",
            HistoryTag::Interval => "Interval",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryTime {
    Instant(TimeInstant),
    Interval(TimeInterval),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFamily;

impl Family for HistoryFamily {
    const NAME: &'static str = "history-time";
    const DISCRIMINATOR: Option<&'static str> = None;
    const EMIT: EmitPolicy = EmitPolicy::Replay;

    type Tag = HistoryTag;
    type Shape = HistoryTime;
    type Shared = ();

    fn tag_of(_name: &str) -> Option<HistoryTag> {
        None
    }

    fn shape_tag(shape: &HistoryTime) -> HistoryTag {
        match shape {
            HistoryTime::Instant(_) => HistoryTag::Instant,
            HistoryTime::Interval(_) => HistoryTag::Interval,
        }
    }

    fn decode(tag: HistoryTag, _raw: &[u8], value: &Value) -> Result<HistoryTime, String> {
        match (tag, value) {
            (HistoryTag::Instant, Value::String(text)) => TimeInstant::parse(text)
                .map(HistoryTime::Instant)
                .map_err(|err| err.to_string()),
            (HistoryTag::Instant, _) => Err("an instant must be a string".to_owned()),
            (HistoryTag::Interval, value) => TimeInterval::from_json(value)
                .map(HistoryTime::Interval)
                .map_err(|err| err.to_string()),
        }
    }

    /// Strings try an instant before `start/end` text.
    fn probe(value: &Value) -> Vec<HistoryTag> {
        match value {
            Value::String(_) => vec![HistoryTag::Instant, HistoryTag::Interval],
            _ => vec![HistoryTag::Interval],
        }
    }

    fn shared(_value: &Value) {}

    fn reconstruct(shape: &HistoryTime, _shared: &()) -> Value {
        match shape {
            HistoryTime::Instant(at) => Value::String(at.to_rfc3339()),
            HistoryTime::Interval(interval) => serde_json::to_value(interval).unwrap_or_default(),
        }
    }
}

impl Variant<HistoryFamily> {
    pub fn as_instant(&self) -> Option<&TimeInstant> {
        match self.shape() {
            Some(HistoryTime::Instant(at)) => Some(at),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<&TimeInterval> {
        match self.shape() {
            Some(HistoryTime::Interval(interval)) => Some(interval),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeBound;
    use crate::variant::Resolution;

    type HistoryVariant = Variant<HistoryFamily>;

    #[test]
    fn instant_first() {
        let v = HistoryVariant::resolve(br#""2023-05-01T10:00:00Z""#).unwrap();
        assert_eq!(v.resolution(), &Resolution::Probed(HistoryTag::Instant));
        assert_eq!(v.as_instant().unwrap().to_string(), "2023-05-01T10:00:00Z");
    }

    #[test]
    fn compact_interval_string() {
        let v = HistoryVariant::resolve(br#""2023-05-01T10:00:00Z/now""#).unwrap();
        assert_eq!(v.resolution(), &Resolution::Probed(HistoryTag::Interval));
        assert_eq!(v.as_interval().unwrap().end, TimeBound::Now);
    }

    #[test]
    fn array_and_object_intervals() {
        let v = HistoryVariant::resolve(br#"["2023-01-01T00:00:00Z", null]"#).unwrap();
        assert_eq!(v.as_interval().unwrap().end, TimeBound::Open);
        let v = HistoryVariant::resolve(
            br#"{"start":"2023-01-01T00:00:00Z","end":"2023-02-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(v.tag(), Some(HistoryTag::Interval));
        // Replayed as received.
        assert_eq!(
            v.to_vec(),
            br#"{"start":"2023-01-01T00:00:00Z","end":"2023-02-01T00:00:00Z"}"#.to_vec()
        );
    }

    #[test]
    fn garbage_is_opaque() {
        let v = HistoryVariant::resolve(br#""last tuesday""#).unwrap();
        match v.resolution() {
            Resolution::Opaque { attempts, .. } => assert_eq!(attempts.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn constructed_interval_emits_array() {
        let interval = TimeInterval::parse("2023-01-01T00:00:00Z/..").unwrap();
        let v = HistoryVariant::from_shape(HistoryTime::Interval(interval));
        assert_eq!(
            String::from_utf8(v.to_vec()).unwrap(),
            r#"["2023-01-01T00:00:00Z",null]"#
        );
    }
}
