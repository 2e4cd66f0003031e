//! `GeoValue` serializes as GeoJSON and deserializes from GeoJSON or from a
//! string in any textual encoding.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::codec::decode;
use crate::geojson::geometry_from_value;
use crate::options::{DecodeOptions, DEFAULT_MAX_DEPTH};
use crate::types::GeoValue;

impl Serialize for GeoValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_geojson().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => {
                decode(text.as_bytes(), &DecodeOptions::default()).map_err(de::Error::custom)
            }
            value @ Value::Object(_) => geometry_from_value(&value, DEFAULT_MAX_DEPTH)
                .map(GeoValue::new)
                .map_err(de::Error::custom),
            _ => Err(de::Error::custom(
                "expected a GeoJSON geometry object or an encoded geometry string",
            )),
        }
    }
}
