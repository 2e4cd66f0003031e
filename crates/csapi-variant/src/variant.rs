//! The `Variant<F>` container and the [`Family`] trait each oneOf family
//! implements.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::VariantError;

/// How a family writes a decoded value back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitPolicy {
    /// Emit from the resolved shape. Raw bytes are replayed only when the
    /// value is opaque.
    Reconstruct,
    /// Emit the retained raw bytes when present, else reconstruct.
    Replay,
}

/// A closed set of JSON shapes sharing one wire slot.
pub trait Family: Sized + 'static {
    /// Human-readable family name.
    const NAME: &'static str;
    /// Member naming the shape, when the family has one.
    const DISCRIMINATOR: Option<&'static str>;
    const EMIT: EmitPolicy;

    type Tag: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync;
    type Shape: Clone + fmt::Debug + PartialEq + Send + Sync;
    type Shared: Clone + fmt::Debug + PartialEq + Default + Send + Sync;

    /// Maps a discriminator value to a tag.
    fn tag_of(name: &str) -> Option<Self::Tag>;

    /// The tag of an already resolved shape.
    fn shape_tag(shape: &Self::Shape) -> Self::Tag;

    /// Decodes `raw` (already parsed as `value`) into the shape for `tag`.
    /// The error is a human-readable reason.
    fn decode(tag: Self::Tag, raw: &[u8], value: &Value) -> Result<Self::Shape, String>;

    /// Candidate tags for structural probing, highest priority first.
    fn probe(value: &Value) -> Vec<Self::Tag>;

    /// Fields common to every shape. Never fails; unreadable fields are left
    /// unset.
    fn shared(value: &Value) -> Self::Shared;

    /// Rebuilds JSON from a shape and the shared fields.
    fn reconstruct(shape: &Self::Shape, shared: &Self::Shared) -> Value;
}

/// One shape decode that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeAttempt<T> {
    pub tag: T,
    pub reason: String,
}

impl<T: fmt::Display> fmt::Display for ShapeAttempt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.reason)
    }
}

/// How a `Variant` came to hold its shape, or why it holds none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Built in memory, not decoded.
    Constructed,
    /// Selected by the discriminator.
    Discriminated(T),
    /// Selected by structural probing.
    Probed(T),
    /// No shape matched. `declared` is the discriminator value, if any.
    Opaque {
        declared: Option<String>,
        attempts: Vec<ShapeAttempt<T>>,
    },
}

impl<T> Resolution<T> {
    pub fn is_opaque(&self) -> bool {
        matches!(self, Resolution::Opaque { .. })
    }
}

impl<T: fmt::Display> fmt::Display for Resolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Constructed => f.write_str("constructed"),
            Resolution::Discriminated(tag) => write!(f, "discriminated {tag}"),
            Resolution::Probed(tag) => write!(f, "probed {tag}"),
            Resolution::Opaque { declared: Some(name), .. } => write!(f, "opaque {name}"),
            Resolution::Opaque { declared: None, .. } => f.write_str("opaque"),
        }
    }
}

/// A value of family `F`: at most one resolved shape, the shared fields, and
/// the bytes it was decoded from.
pub struct Variant<F: Family> {
    raw: Option<Box<[u8]>>,
    shape: Option<F::Shape>,
    shared: F::Shared,
    resolution: Resolution<F::Tag>,
}

impl<F: Family> Variant<F> {
    /// An in-memory value. It has no raw bytes, so it always reconstructs.
    pub fn new(shape: F::Shape, shared: F::Shared) -> Self {
        Self {
            raw: None,
            shape: Some(shape),
            shared,
            resolution: Resolution::Constructed,
        }
    }

    pub fn from_shape(shape: F::Shape) -> Self {
        Self::new(shape, F::Shared::default())
    }

    /// Decodes `bytes`, keeping them verbatim.
    ///
    /// A recognised discriminator is authoritative: when its shape fails to
    /// decode, probing does not pick a different shape and the value is
    /// opaque. Probing runs only when the discriminator is absent or names
    /// no known shape.
    ///
    /// # Errors
    ///
    /// [`VariantError::MalformedJson`] when `bytes` is not JSON.
    pub fn resolve(bytes: &[u8]) -> Result<Self, VariantError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::resolve_parsed(bytes, &value))
    }

    /// Like [`Variant::resolve`] for an already parsed value. The retained
    /// bytes are its compact serialization.
    pub fn from_value(value: &Value) -> Self {
        let bytes = serde_json::to_vec(value).unwrap_or_default();
        Self::resolve_parsed(&bytes, value)
    }

    fn resolve_parsed(bytes: &[u8], value: &Value) -> Self {
        let shared = F::shared(value);
        let declared = F::DISCRIMINATOR
            .and_then(|key| value.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let recognised = declared.as_deref().and_then(F::tag_of);

        let mut attempts = Vec::new();
        let decoded = match recognised {
            Some(tag) => try_decode::<F>(tag, bytes, value, &mut attempts)
                .map(|shape| (shape, Resolution::Discriminated(tag))),
            None => F::probe(value).into_iter().find_map(|tag| {
                try_decode::<F>(tag, bytes, value, &mut attempts)
                    .map(|shape| (shape, Resolution::Probed(tag)))
            }),
        };

        let (shape, resolution) = match decoded {
            Some((shape, resolution)) => (Some(shape), resolution),
            None => {
                trace!(
                    family = F::NAME,
                    declared = ?declared,
                    attempts = attempts.len(),
                    "variant resolved opaque"
                );
                (None, Resolution::Opaque { declared, attempts })
            }
        };
        Self {
            raw: Some(bytes.into()),
            shape,
            shared,
            resolution,
        }
    }

    /// The bytes this value was decoded from.
    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    pub fn shape(&self) -> Option<&F::Shape> {
        self.shape.as_ref()
    }

    pub fn into_shape(self) -> Option<F::Shape> {
        self.shape
    }

    pub fn shared(&self) -> &F::Shared {
        &self.shared
    }

    pub fn resolution(&self) -> &Resolution<F::Tag> {
        &self.resolution
    }

    pub fn tag(&self) -> Option<F::Tag> {
        self.shape.as_ref().map(F::shape_tag)
    }

    pub fn is_opaque(&self) -> bool {
        self.shape.is_none()
    }

    /// The retained bytes when the family's policy replays them.
    fn replayed(&self) -> Option<&[u8]> {
        match (F::EMIT, &self.shape) {
            (EmitPolicy::Replay, _) | (EmitPolicy::Reconstruct, None) => self.raw(),
            (EmitPolicy::Reconstruct, Some(_)) => None,
        }
    }

    fn reconstructed(&self) -> Value {
        self.shape
            .as_ref()
            .map(|shape| F::reconstruct(shape, &self.shared))
            .unwrap_or_default()
    }

    /// The JSON this value emits under its family's policy.
    pub fn to_json_value(&self) -> Value {
        self.replayed()
            .and_then(|raw| serde_json::from_slice(raw).ok())
            .unwrap_or_else(|| self.reconstructed())
    }

    /// The bytes this value emits. Replayed bytes are returned unchanged.
    pub fn to_vec(&self) -> Vec<u8> {
        match self.replayed() {
            Some(raw) => raw.to_vec(),
            None => serde_json::to_vec(&self.reconstructed()).unwrap_or_default(),
        }
    }
}

fn try_decode<F: Family>(
    tag: F::Tag,
    bytes: &[u8],
    value: &Value,
    attempts: &mut Vec<ShapeAttempt<F::Tag>>,
) -> Option<F::Shape> {
    match F::decode(tag, bytes, value) {
        Ok(shape) => Some(shape),
        Err(reason) => {
            trace!(family = F::NAME, %tag, %reason, "variant shape rejected");
            attempts.push(ShapeAttempt { tag, reason });
            None
        }
    }
}

/// Decodes `raw` as `T` with serde, reporting the error as text.
pub(crate) fn decode_as<T: serde::de::DeserializeOwned>(raw: &[u8]) -> Result<T, String> {
    serde_json::from_slice(raw).map_err(|err| err.to_string())
}

/// Builds `{ <key>: <tag>, ...parts }`. Later parts never overwrite earlier
/// members, and a `key` member inside a part is dropped.
pub(crate) fn tagged_object(key: &str, tag: &str, parts: &[Value]) -> Value {
    let mut out = Map::new();
    out.insert(key.to_owned(), Value::from(tag));
    for part in parts {
        if let Value::Object(fields) = part {
            for (k, v) in fields {
                if k != key && !out.contains_key(k) {
                    out.insert(k.clone(), v.clone());
                }
            }
        }
    }
    Value::Object(out)
}

impl<F: Family> Clone for Variant<F> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            shape: self.shape.clone(),
            shared: self.shared.clone(),
            resolution: self.resolution.clone(),
        }
    }
}

impl<F: Family> fmt::Debug for Variant<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("family", &F::NAME)
            .field("shape", &self.shape)
            .field("shared", &self.shared)
            .field("resolution", &self.resolution)
            .field("raw_len", &self.raw.as_ref().map(|raw| raw.len()))
            .finish()
    }
}

impl<F: Family> PartialEq for Variant<F> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
            && self.shape == other.shape
            && self.shared == other.shared
            && self.resolution == other.resolution
    }
}

impl<F: Family> Serialize for Variant<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Replayed bytes go out verbatim through serde_json's raw value.
        if let Some(raw) = self.replayed() {
            if let Ok(raw) = serde_json::from_slice::<&RawValue>(raw) {
                return raw.serialize(serializer);
            }
        }
        self.reconstructed().serialize(serializer)
    }
}

impl<'de, F: Family> Deserialize<'de> for Variant<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Self::resolve(raw.get().as_bytes()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A two-shape family used to exercise the resolution rules alone.
    struct Pets;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PetTag {
        Cat,
        Dog,
    }

    impl fmt::Display for PetTag {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                PetTag::Cat => "Cat",
                PetTag::Dog => "Dog",
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Pet {
        Cat { lives: u8 },
        Dog { good: bool },
    }

    #[derive(serde::Deserialize)]
    struct CatFields {
        lives: u8,
    }

    #[derive(serde::Deserialize)]
    struct DogFields {
        good: bool,
    }

    impl Family for Pets {
        const NAME: &'static str = "pet";
        const DISCRIMINATOR: Option<&'static str> = Some("type");
        const EMIT: EmitPolicy = EmitPolicy::Reconstruct;
        type Tag = PetTag;
        type Shape = Pet;
        type Shared = Option<String>;

        fn tag_of(name: &str) -> Option<PetTag> {
            match name {
                "Cat" => Some(PetTag::Cat),
                "Dog" => Some(PetTag::Dog),
                _ => None,
            }
        }

        fn shape_tag(shape: &Pet) -> PetTag {
            match shape {
                Pet::Cat { .. } => PetTag::Cat,
                Pet::Dog { .. } => PetTag::Dog,
            }
        }

        fn decode(tag: PetTag, raw: &[u8], _value: &Value) -> Result<Pet, String> {
            match tag {
                PetTag::Cat => decode_as::<CatFields>(raw).map(|c| Pet::Cat { lives: c.lives }),
                PetTag::Dog => decode_as::<DogFields>(raw).map(|d| Pet::Dog { good: d.good }),
            }
        }

        fn probe(_value: &Value) -> Vec<PetTag> {
            vec![PetTag::Cat, PetTag::Dog]
        }

        fn shared(value: &Value) -> Option<String> {
            value.get("name").and_then(Value::as_str).map(str::to_owned)
        }

        fn reconstruct(shape: &Pet, shared: &Option<String>) -> Value {
            let fields = match shape {
                Pet::Cat { lives } => json!({"lives": lives}),
                Pet::Dog { good } => json!({"good": good}),
            };
            let name = json!({"name": shared});
            tagged_object("type", &Pets::shape_tag(shape).to_string(), &[name, fields])
        }
    }

    #[test]
    fn discriminator_selects_shape() {
        let v = Variant::<Pets>::resolve(br#"{"type":"Dog","good":true,"name":"Rex"}"#).unwrap();
        assert_eq!(v.shape(), Some(&Pet::Dog { good: true }));
        assert_eq!(v.resolution(), &Resolution::Discriminated(PetTag::Dog));
        assert_eq!(v.shared().as_deref(), Some("Rex"));
    }

    #[test]
    fn probing_runs_without_a_recognised_discriminator() {
        let v = Variant::<Pets>::resolve(br#"{"good":false}"#).unwrap();
        assert_eq!(v.resolution(), &Resolution::Probed(PetTag::Dog));
        let v = Variant::<Pets>::resolve(br#"{"type":"Ferret","lives":3}"#).unwrap();
        assert_eq!(v.resolution(), &Resolution::Probed(PetTag::Cat));
    }

    #[test]
    fn recognised_discriminator_is_never_overridden() {
        // Valid as a Dog, but declared a Cat.
        let v = Variant::<Pets>::resolve(br#"{"type":"Cat","good":true}"#).unwrap();
        assert!(v.is_opaque());
        match v.resolution() {
            Resolution::Opaque { declared, attempts } => {
                assert_eq!(declared.as_deref(), Some("Cat"));
                assert_eq!(attempts.len(), 1);
                assert_eq!(attempts[0].tag, PetTag::Cat);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reconstruct_policy_replays_only_opaque_values() {
        let text = br#"{ "lives" : 9, "extra": 1 }"#;
        let v = Variant::<Pets>::resolve(text).unwrap();
        assert_eq!(v.to_json_value(), json!({"type": "Cat", "name": null, "lives": 9}));

        let opaque = br#"{ "type": "Cat" }"#;
        let v = Variant::<Pets>::resolve(opaque).unwrap();
        assert_eq!(v.to_vec(), opaque.to_vec());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Variant::<Pets>::resolve(b"{\"type\":"),
            Err(VariantError::MalformedJson(_))
        ));
    }

    #[test]
    fn constructed_values_have_no_raw_bytes() {
        let v = Variant::<Pets>::from_shape(Pet::Cat { lives: 1 });
        assert_eq!(v.raw(), None);
        assert_eq!(v.resolution(), &Resolution::Constructed);
        assert_eq!(v.tag(), Some(PetTag::Cat));
    }
}
