//! WKB / EWKB decoder.

use super::error::WkbError;
use super::{Header, BIG_ENDIAN, LITTLE_ENDIAN};
use crate::error::GeometryError;
use crate::types::{
    finite_coord, Collection, Coord, GeoValue, Geometry, GeometryKind, LineString, Polygon, Ring,
};

/// Smallest encoded member geometry: byte order plus type word.
const MIN_MEMBER_BYTES: usize = 5;

/// Cursor over a WKB buffer.
pub struct WkbDecoder<'a> {
    data: &'a [u8],
    x: usize,
    max_depth: usize,
}

impl<'a> WkbDecoder<'a> {
    pub fn new(data: &'a [u8], max_depth: usize) -> Self {
        Self {
            data,
            x: 0,
            max_depth,
        }
    }

    /// Decodes exactly one geometry spanning the whole buffer.
    pub fn decode(&mut self) -> Result<GeoValue, WkbError> {
        if self.data.is_empty() {
            return Err(WkbError::Empty);
        }
        self.x = 0;
        let (geometry, srid) = self.read_geometry(0)?;
        if self.x != self.data.len() {
            return Err(WkbError::TrailingBytes(self.data.len() - self.x));
        }
        Ok(GeoValue { geometry, srid })
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), WkbError> {
        if self.data.len() - self.x < n {
            Err(WkbError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    fn u8(&mut self) -> Result<u8, WkbError> {
        self.check(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    fn u32(&mut self, le: bool) -> Result<u32, WkbError> {
        self.check(4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.x..self.x + 4]);
        self.x += 4;
        Ok(if le {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    fn f64(&mut self, le: bool) -> Result<f64, WkbError> {
        self.check(8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[self.x..self.x + 8]);
        self.x += 8;
        Ok(if le {
            f64::from_le_bytes(bytes)
        } else {
            f64::from_be_bytes(bytes)
        })
    }

    fn byte_order(&mut self) -> Result<bool, WkbError> {
        match self.u8()? {
            LITTLE_ENDIAN => Ok(true),
            BIG_ENDIAN => Ok(false),
            other => Err(WkbError::InvalidByteOrder(other)),
        }
    }

    /// Reads an element count and checks the buffer can hold that many
    /// elements of at least `min_bytes` each.
    fn count(&mut self, le: bool, min_bytes: usize) -> Result<usize, WkbError> {
        let n = self.u32(le)? as usize;
        let remaining = self.data.len() - self.x;
        if n.saturating_mul(min_bytes) > remaining {
            return Err(WkbError::UnexpectedEof);
        }
        Ok(n)
    }

    /// Byte order, type word and optional SRID word.
    fn read_header(&mut self) -> Result<(bool, Header, Option<u32>), WkbError> {
        let le = self.byte_order()?;
        let header = Header::parse(self.u32(le)?)?;
        let srid = if header.has_srid {
            Some(self.u32(le)?)
        } else {
            None
        };
        Ok((le, header, srid))
    }

    /// Header of a multi-geometry member. The kind is checked before any of
    /// the member body is read, so members never nest.
    fn member(&mut self, expected: GeometryKind) -> Result<(bool, usize), WkbError> {
        let (le, header, _) = self.read_header()?;
        if header.kind != expected {
            return Err(WkbError::UnexpectedMember {
                expected: expected.keyword(),
                found: header.kind.keyword(),
            });
        }
        Ok((le, header.ordinates))
    }

    fn read_geometry(&mut self, depth: usize) -> Result<(Geometry, Option<u32>), WkbError> {
        let (le, header, srid) = self.read_header()?;
        let ords = header.ordinates;
        let geometry = match header.kind {
            GeometryKind::Point => Geometry::Point(self.point(le, ords)?),
            GeometryKind::LineString => Geometry::LineString(LineString(self.points(le, ords)?)),
            GeometryKind::Polygon => Geometry::Polygon(self.polygon(le, ords)?),
            GeometryKind::MultiPoint => {
                let n = self.count(le, MIN_MEMBER_BYTES)?;
                let mut points = Vec::with_capacity(n);
                for _ in 0..n {
                    let (le, ords) = self.member(GeometryKind::Point)?;
                    points.push(self.point(le, ords)?);
                }
                Geometry::MultiPoint(points)
            }
            GeometryKind::MultiLineString => {
                let n = self.count(le, MIN_MEMBER_BYTES)?;
                let mut lines = Vec::with_capacity(n);
                for _ in 0..n {
                    let (le, ords) = self.member(GeometryKind::LineString)?;
                    lines.push(LineString(self.points(le, ords)?));
                }
                Geometry::MultiLineString(lines)
            }
            GeometryKind::MultiPolygon => {
                let n = self.count(le, MIN_MEMBER_BYTES)?;
                let mut polygons = Vec::with_capacity(n);
                for _ in 0..n {
                    let (le, ords) = self.member(GeometryKind::Polygon)?;
                    polygons.push(self.polygon(le, ords)?);
                }
                Geometry::MultiPolygon(polygons)
            }
            GeometryKind::GeometryCollection => {
                if depth >= self.max_depth {
                    return Err(GeometryError::DepthLimitExceeded {
                        limit: self.max_depth,
                    }
                    .into());
                }
                let n = self.count(le, MIN_MEMBER_BYTES)?;
                let mut members = Vec::with_capacity(n);
                for _ in 0..n {
                    members.push(self.read_geometry(depth + 1)?.0);
                }
                Geometry::GeometryCollection(Collection::new(members)?)
            }
        };
        Ok((geometry, srid))
    }

    fn point(&mut self, le: bool, ordinates: usize) -> Result<Coord, WkbError> {
        let coord = self.coord(le, ordinates)?;
        if coord[0].is_nan() && coord[1].is_nan() {
            return Err(GeometryError::malformed(None, "empty point").into());
        }
        Ok(finite_coord(coord)?)
    }

    fn coord(&mut self, le: bool, ordinates: usize) -> Result<Coord, WkbError> {
        let x = self.f64(le)?;
        let y = self.f64(le)?;
        for _ in 2..ordinates {
            self.f64(le)?;
        }
        Ok([x, y])
    }

    fn points(&mut self, le: bool, ordinates: usize) -> Result<Vec<Coord>, WkbError> {
        let n = self.count(le, ordinates * 8)?;
        let mut points = Vec::with_capacity(n);
        for _ in 0..n {
            points.push(finite_coord(self.coord(le, ordinates)?)?);
        }
        Ok(points)
    }

    fn polygon(&mut self, le: bool, ordinates: usize) -> Result<Polygon, WkbError> {
        let n = self.count(le, 4)?;
        let mut rings = Vec::with_capacity(n);
        for _ in 0..n {
            rings.push(Ring::new(self.points(le, ordinates)?)?);
        }
        Ok(Polygon(rings))
    }
}

/// Decodes a WKB or EWKB buffer.
pub fn decode_wkb(data: &[u8], max_depth: usize) -> Result<GeoValue, WkbError> {
    WkbDecoder::new(data, max_depth).decode()
}

/// True when `data` starts with a byte-order marker followed by a type word
/// this decoder understands.
pub fn has_plausible_header(data: &[u8]) -> bool {
    if data.len() < MIN_MEMBER_BYTES {
        return false;
    }
    let mut word = [0u8; 4];
    word.copy_from_slice(&data[1..5]);
    let code = match data[0] {
        LITTLE_ENDIAN => u32::from_le_bytes(word),
        BIG_ENDIAN => u32::from_be_bytes(word),
        _ => return false,
    };
    Header::parse(code).is_ok()
}

/// Decodes a buffer laid out as a little-endian 4-byte SRID word followed by
/// WKB. An SRID carried inside the WKB wins over the leading word; a zero
/// word is treated as unspecified.
pub fn decode_wkb_after_srid_word(data: &[u8], max_depth: usize) -> Result<GeoValue, WkbError> {
    if data.len() < 4 {
        return Err(WkbError::UnexpectedEof);
    }
    let mut word = [0u8; 4];
    word.copy_from_slice(&data[..4]);
    let mut value = decode_wkb(&data[4..], max_depth)?;
    if value.srid.is_none() {
        value.srid = Some(u32::from_le_bytes(word)).filter(|srid| *srid != 0);
    }
    Ok(value)
}
