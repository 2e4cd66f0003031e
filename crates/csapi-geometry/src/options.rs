//! Per-call decoder and encoder settings.

use crate::error::Encoding;

/// Where the input came from. Only changes the order in which encodings are
/// tried; the decoded value is the same for every hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hint {
    #[default]
    Unknown,
    /// A database geometry column (hex EWKB, WKB, WKT or degraded GeoJSON).
    Column,
    /// A JSON document property.
    Document,
}

impl Hint {
    /// Trial order for this hint.
    pub fn trial_order(self) -> &'static [Encoding] {
        match self {
            Hint::Unknown | Hint::Column => &[
                Encoding::HexWkb,
                Encoding::Ewkt,
                Encoding::Wkb,
                Encoding::Wkt,
                Encoding::GeoJson,
            ],
            Hint::Document => &[
                Encoding::GeoJson,
                Encoding::HexWkb,
                Encoding::Ewkt,
                Encoding::Wkb,
                Encoding::Wkt,
            ],
        }
    }
}

/// Default ceiling on `GeometryCollection` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub hint: Hint,
    /// Maximum `GeometryCollection` nesting accepted by every decoder.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            hint: Hint::Unknown,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn with_hint(hint: Hint) -> Self {
        Self {
            hint,
            ..Self::default()
        }
    }
}

/// Output representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Form {
    #[default]
    GeoJson,
    /// WKT, prefixed with `SRID=<n>;` when an SRID is attached.
    Wkt,
    /// ISO WKB, little-endian, 2D, no SRID.
    Wkb,
    /// PostGIS extended WKB carrying the SRID when attached.
    Ewkb,
}

/// Default number of fractional digits written for WKT ordinates.
pub const DEFAULT_PRECISION: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Fractional digits for WKT ordinates before trailing zeros are trimmed.
    pub precision: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}
