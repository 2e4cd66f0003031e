//! WKB / EWKB encoder. Always little-endian, always 2D.

use super::{EWKB_SRID_FLAG, LITTLE_ENDIAN};
use crate::types::{Coord, Geometry, GeometryKind, Polygon};

#[derive(Default)]
pub struct WkbEncoder {
    out: Vec<u8>,
}

impl WkbEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `geometry`. When `srid` is given the top-level header carries
    /// the EWKB SRID flag and word; nested members never do.
    pub fn encode(&mut self, geometry: &Geometry, srid: Option<u32>) -> Vec<u8> {
        self.out.clear();
        self.write_geometry(geometry, srid);
        std::mem::take(&mut self.out)
    }

    fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn count(&mut self, n: usize) {
        // Counts past u32::MAX cannot be represented in WKB.
        self.u32(u32::try_from(n).unwrap_or(u32::MAX));
    }

    fn coord(&mut self, c: &Coord) {
        self.out.extend_from_slice(&c[0].to_le_bytes());
        self.out.extend_from_slice(&c[1].to_le_bytes());
    }

    fn coords(&mut self, points: &[Coord]) {
        self.count(points.len());
        for p in points {
            self.coord(p);
        }
    }

    fn header(&mut self, kind: GeometryKind, srid: Option<u32>) {
        self.out.push(LITTLE_ENDIAN);
        match srid {
            Some(srid) => {
                self.u32(kind.code() | EWKB_SRID_FLAG);
                self.u32(srid);
            }
            None => self.u32(kind.code()),
        }
    }

    fn polygon_body(&mut self, polygon: &Polygon) {
        self.count(polygon.rings().len());
        for ring in polygon.rings() {
            self.coords(&ring.closed());
        }
    }

    fn write_geometry(&mut self, geometry: &Geometry, srid: Option<u32>) {
        self.header(geometry.kind(), srid);
        match geometry {
            Geometry::Point(c) => self.coord(c),
            Geometry::LineString(line) => self.coords(line.points()),
            Geometry::Polygon(polygon) => self.polygon_body(polygon),
            Geometry::MultiPoint(points) => {
                self.count(points.len());
                for p in points {
                    self.header(GeometryKind::Point, None);
                    self.coord(p);
                }
            }
            Geometry::MultiLineString(lines) => {
                self.count(lines.len());
                for line in lines {
                    self.header(GeometryKind::LineString, None);
                    self.coords(line.points());
                }
            }
            Geometry::MultiPolygon(polygons) => {
                self.count(polygons.len());
                for polygon in polygons {
                    self.header(GeometryKind::Polygon, None);
                    self.polygon_body(polygon);
                }
            }
            Geometry::GeometryCollection(collection) => {
                self.count(collection.geometries().len());
                for member in collection.geometries() {
                    self.write_geometry(member, None);
                }
            }
        }
    }
}

/// ISO WKB without SRID.
pub fn encode_wkb(geometry: &Geometry) -> Vec<u8> {
    WkbEncoder::new().encode(geometry, None)
}

/// PostGIS EWKB; identical to [`encode_wkb`] when `srid` is `None`.
pub fn encode_ewkb(geometry: &Geometry, srid: Option<u32>) -> Vec<u8> {
    WkbEncoder::new().encode(geometry, srid)
}
