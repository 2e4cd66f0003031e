//! GeoJSON geometry objects (RFC 7946 §3.1).
//!
//! Only geometry objects are understood; `Feature` and `FeatureCollection`
//! wrappers are rejected as unknown types. GeoJSON has no SRID slot.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::{decode_geojson, geometry_from_value};
pub use encoder::{encode_geojson, geometry_to_value};
pub use error::GeoJsonError;
