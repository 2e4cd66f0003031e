//! `csapi-codec` — the interchange codec layer for Connected Systems
//! metadata.
//!
//! Re-exports the geometry codec ([`geometry`]) and the oneOf variant
//! decoder ([`variant`]), and holds the logic behind the `geom-convert` and
//! `variant-resolve` command-line tools ([`cli`]).

pub mod cli;

pub use csapi_geometry as geometry;
pub use csapi_variant as variant;

pub use csapi_geometry::{decode, decode_detailed, encode, GeoValue, GeometryError};
pub use csapi_variant::{Resolution, Variant, VariantError};
