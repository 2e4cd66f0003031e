//! WKT encoder.
//!
//! Output is stable: the same geometry and precision always produce the same
//! text.

use std::fmt::Write;

use crate::types::{Coord, Geometry, Polygon};

/// Formats one ordinate with `precision` fractional digits, then trims
/// trailing zeros and a bare decimal point. `-0` is written as `0`.
pub fn format_ordinate(value: f64, precision: usize) -> String {
    let mut s = format!("{value:.precision$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

pub struct WktEncoder {
    out: String,
    precision: usize,
}

impl WktEncoder {
    pub fn new(precision: usize) -> Self {
        Self {
            out: String::new(),
            precision,
        }
    }

    /// Encodes `geometry`, prefixed with `SRID=<n>;` when `srid` is given.
    pub fn encode(&mut self, geometry: &Geometry, srid: Option<u32>) -> String {
        self.out.clear();
        if let Some(srid) = srid {
            // Writing to a String cannot fail.
            let _ = write!(self.out, "SRID={srid};");
        }
        self.write_geometry(geometry);
        std::mem::take(&mut self.out)
    }

    fn coord(&mut self, c: &Coord) {
        self.out.push_str(&format_ordinate(c[0], self.precision));
        self.out.push(' ');
        self.out.push_str(&format_ordinate(c[1], self.precision));
    }

    fn coords(&mut self, points: &[Coord]) {
        self.out.push('(');
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.coord(p);
        }
        self.out.push(')');
    }

    fn polygon_body(&mut self, polygon: &Polygon) {
        self.out.push('(');
        for (i, ring) in polygon.rings().iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.coords(&ring.closed());
        }
        self.out.push(')');
    }

    fn empty(&mut self) {
        self.out.push_str(" EMPTY");
    }

    fn write_geometry(&mut self, geometry: &Geometry) {
        self.out.push_str(geometry.kind().keyword());
        match geometry {
            Geometry::Point(c) => {
                self.out.push('(');
                self.coord(c);
                self.out.push(')');
            }
            Geometry::LineString(line) if line.is_empty() => self.empty(),
            Geometry::LineString(line) => self.coords(line.points()),
            Geometry::Polygon(polygon) if polygon.rings().is_empty() => self.empty(),
            Geometry::Polygon(polygon) => self.polygon_body(polygon),
            Geometry::MultiPoint(points) if points.is_empty() => self.empty(),
            Geometry::MultiPoint(points) => {
                self.out.push('(');
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.out.push('(');
                    self.coord(p);
                    self.out.push(')');
                }
                self.out.push(')');
            }
            Geometry::MultiLineString(lines) if lines.is_empty() => self.empty(),
            Geometry::MultiLineString(lines) => {
                self.out.push('(');
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    if line.is_empty() {
                        self.out.push_str("EMPTY");
                    } else {
                        self.coords(line.points());
                    }
                }
                self.out.push(')');
            }
            Geometry::MultiPolygon(polygons) if polygons.is_empty() => self.empty(),
            Geometry::MultiPolygon(polygons) => {
                self.out.push('(');
                for (i, polygon) in polygons.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    if polygon.rings().is_empty() {
                        self.out.push_str("EMPTY");
                    } else {
                        self.polygon_body(polygon);
                    }
                }
                self.out.push(')');
            }
            Geometry::GeometryCollection(collection) => {
                self.out.push('(');
                for (i, member) in collection.geometries().iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_geometry(member);
                }
                self.out.push(')');
            }
        }
    }
}

/// Encodes `geometry` as WKT, or EWKT when `srid` is given.
pub fn encode_wkt(geometry: &Geometry, srid: Option<u32>, precision: usize) -> String {
    WktEncoder::new(precision).encode(geometry, srid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collection, LineString, Ring};

    #[test]
    fn ordinate_formatting_is_trimmed_and_stable() {
        assert_eq!(format_ordinate(-122.4, 9), "-122.4");
        assert_eq!(format_ordinate(37.8, 9), "37.8");
        assert_eq!(format_ordinate(10.0, 9), "10");
        assert_eq!(format_ordinate(-0.0, 9), "0");
        assert_eq!(format_ordinate(-0.0000000001, 9), "0");
        assert_eq!(format_ordinate(1.23456789012, 4), "1.2346");
    }

    #[test]
    fn ewkt_point() {
        let text = encode_wkt(&Geometry::Point([-122.4, 37.8]), Some(4326), 9);
        assert_eq!(text, "SRID=4326;POINT(-122.4 37.8)");
    }

    #[test]
    fn polygon_ring_is_closed_on_output() {
        let ring = Ring::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]).unwrap();
        let g = Geometry::Polygon(Polygon::new(vec![ring]));
        assert_eq!(encode_wkt(&g, None, 9), "POLYGON((0 0,1 0,1 1,0 0))");
    }

    #[test]
    fn multi_and_collection_layout() {
        let g = Geometry::GeometryCollection(
            Collection::new(vec![
                Geometry::MultiPoint(vec![[1.0, 2.0], [3.0, 4.0]]),
                Geometry::LineString(LineString::default()),
            ])
            .unwrap(),
        );
        assert_eq!(
            encode_wkt(&g, None, 9),
            "GEOMETRYCOLLECTION(MULTIPOINT((1 2),(3 4)),LINESTRING EMPTY)"
        );
    }
}
