//! `csapi-geometry` — polymorphic geometry codec.
//!
//! Decodes GeoJSON, WKT/EWKT, and WKB/EWKB (raw or hex) into one geometry
//! tree without being told which encoding it is looking at, and encodes that
//! tree back into any of them.
//!
//! ```
//! use csapi_geometry::{decode, DecodeOptions, Form, EncodeOptions, encode};
//!
//! let value = decode(b"SRID=4326;POINT(-122.4 37.8)", &DecodeOptions::default()).unwrap();
//! assert_eq!(value.srid, Some(4326));
//! let wkt = encode(&value, Form::Wkt, &EncodeOptions::default());
//! assert_eq!(wkt, b"SRID=4326;POINT(-122.4 37.8)");
//! ```

mod codec;
mod serde_impl;

pub mod error;
pub mod geojson;
pub mod options;
pub mod trial;
pub mod types;
pub mod wkb;
pub mod wkt;

pub use codec::{decode, decode_detailed, encode, Detected};
pub use error::{Attempt, Encoding, GeometryError, TrialError};
pub use options::{DecodeOptions, EncodeOptions, Form, Hint, DEFAULT_MAX_DEPTH, DEFAULT_PRECISION};
pub use types::{
    Collection, Coord, GeoValue, Geometry, GeometryKind, LineString, Polygon, Ring,
    MIN_RING_POINTS,
};
