//! Well-Known Binary, ISO and PostGIS extended (EWKB) flavours.
//!
//! Decoding accepts either byte order, the EWKB flag bits and the ISO
//! dimension offsets. Z and M ordinates are read and dropped. Encoding always
//! writes little-endian 2D.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::{decode_wkb, decode_wkb_after_srid_word, has_plausible_header, WkbDecoder};
pub use encoder::{encode_ewkb, encode_wkb, WkbEncoder};
pub use error::WkbError;

use crate::types::GeometryKind;

pub const BIG_ENDIAN: u8 = 0;
pub const LITTLE_ENDIAN: u8 = 1;

pub const EWKB_Z_FLAG: u32 = 0x8000_0000;
pub const EWKB_M_FLAG: u32 = 0x4000_0000;
pub const EWKB_SRID_FLAG: u32 = 0x2000_0000;
const EWKB_FLAGS: u32 = EWKB_Z_FLAG | EWKB_M_FLAG | EWKB_SRID_FLAG;

/// Decoded type word of a WKB geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: GeometryKind,
    /// Ordinates per point: 2, 3 or 4.
    pub ordinates: usize,
    /// An SRID word follows the type word.
    pub has_srid: bool,
}

impl Header {
    /// Splits a type word into kind, dimensionality and SRID presence.
    ///
    /// # Errors
    ///
    /// [`WkbError::UnknownGeometryType`] when the word matches neither the
    /// ISO nor the EWKB scheme.
    pub fn parse(code: u32) -> Result<Self, WkbError> {
        let has_z = code & EWKB_Z_FLAG != 0;
        let has_m = code & EWKB_M_FLAG != 0;
        let has_srid = code & EWKB_SRID_FLAG != 0;
        let iso = code & !EWKB_FLAGS;
        let (dims, base) = (iso / 1000, iso % 1000);
        if dims > 3 || (dims != 0 && (has_z || has_m)) {
            return Err(WkbError::UnknownGeometryType(code));
        }
        let kind = GeometryKind::from_code(base).ok_or(WkbError::UnknownGeometryType(code))?;
        let extra = match dims {
            1 | 2 => 1,
            3 => 2,
            _ => usize::from(has_z) + usize::from(has_m),
        };
        Ok(Self {
            kind,
            ordinates: 2 + extra,
            has_srid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_and_ewkb_type_words() {
        let h = Header::parse(1).unwrap();
        assert_eq!((h.kind, h.ordinates, h.has_srid), (GeometryKind::Point, 2, false));

        let h = Header::parse(1003).unwrap();
        assert_eq!((h.kind, h.ordinates), (GeometryKind::Polygon, 3));

        let h = Header::parse(3006).unwrap();
        assert_eq!((h.kind, h.ordinates), (GeometryKind::MultiPolygon, 4));

        let h = Header::parse(EWKB_SRID_FLAG | EWKB_Z_FLAG | 2).unwrap();
        assert_eq!((h.kind, h.ordinates, h.has_srid), (GeometryKind::LineString, 3, true));
    }

    #[test]
    fn rejects_unknown_type_words() {
        assert_eq!(Header::parse(0), Err(WkbError::UnknownGeometryType(0)));
        assert_eq!(Header::parse(8), Err(WkbError::UnknownGeometryType(8)));
        assert_eq!(Header::parse(4001), Err(WkbError::UnknownGeometryType(4001)));
        assert!(Header::parse(EWKB_Z_FLAG | 1001).is_err());
    }
}
