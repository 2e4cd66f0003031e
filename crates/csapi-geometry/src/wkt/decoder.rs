//! WKT decoder.

use super::error::WktError;
use crate::error::GeometryError;
use crate::types::{
    finite_coord, Collection, Coord, Geometry, GeometryKind, LineString, Polygon, Ring,
};

/// Recursive-descent reader over WKT text.
pub struct WktDecoder<'a> {
    data: &'a [u8],
    x: usize,
    max_depth: usize,
}

impl<'a> WktDecoder<'a> {
    pub fn new(text: &'a str, max_depth: usize) -> Self {
        Self {
            data: text.as_bytes(),
            x: 0,
            max_depth,
        }
    }

    /// Decodes exactly one geometry; only whitespace may follow it.
    pub fn decode(&mut self) -> Result<Geometry, WktError> {
        self.x = 0;
        let geometry = self.read_geometry(0)?;
        self.skip_ws();
        if self.x != self.data.len() {
            return Err(WktError::TrailingInput(self.x));
        }
        Ok(geometry)
    }

    fn skip_ws(&mut self) {
        while self.x < self.data.len() && self.data[self.x].is_ascii_whitespace() {
            self.x += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.data.get(self.x).copied()
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), WktError> {
        match self.peek() {
            Some(b) if b == byte => {
                self.x += 1;
                Ok(())
            }
            Some(b) => Err(WktError::Unexpected {
                expected,
                offset: self.x,
                found: char::from(b),
            }),
            None => Err(WktError::UnexpectedEnd),
        }
    }

    /// Consumes `,` and returns true, or returns false at `)`.
    fn next_item(&mut self) -> Result<bool, WktError> {
        match self.peek() {
            Some(b',') => {
                self.x += 1;
                Ok(true)
            }
            Some(b')') => {
                self.x += 1;
                Ok(false)
            }
            Some(b) => Err(WktError::Unexpected {
                expected: "',' or ')'",
                offset: self.x,
                found: char::from(b),
            }),
            None => Err(WktError::UnexpectedEnd),
        }
    }

    fn peek_word(&mut self) -> &'a str {
        self.skip_ws();
        let data = self.data;
        let start = self.x;
        let mut end = start;
        while end < data.len() && data[end].is_ascii_alphabetic() {
            end += 1;
        }
        // ASCII letters only, so the slice is valid UTF-8.
        std::str::from_utf8(&data[start..end]).unwrap_or_default()
    }

    fn take_word_if(&mut self, accept: impl Fn(&str) -> bool) -> Option<&'a str> {
        let word = self.peek_word();
        if !word.is_empty() && accept(word) {
            self.x += word.len();
            Some(word)
        } else {
            None
        }
    }

    fn take_empty(&mut self) -> bool {
        self.take_word_if(|w| w.eq_ignore_ascii_case("EMPTY")).is_some()
    }

    /// Reads the keyword and an optional dimension tag. Returns the kind and
    /// the declared ordinate count, if any.
    fn read_keyword(&mut self) -> Result<(GeometryKind, Option<usize>), WktError> {
        let word = self.peek_word();
        if word.is_empty() {
            return match self.data.get(self.x) {
                Some(&b) => Err(WktError::Unexpected {
                    expected: "geometry keyword",
                    offset: self.x,
                    found: char::from(b),
                }),
                None => Err(WktError::UnexpectedEnd),
            };
        }
        self.x += word.len();
        if let Some(kind) = GeometryKind::from_keyword(word) {
            let declared = self
                .take_word_if(|w| dims_tag(w).is_some())
                .and_then(dims_tag);
            return Ok((kind, declared));
        }
        // Glued tags such as `POINTZ`.
        for tag in ["ZM", "Z", "M"] {
            if word.len() > tag.len() && word[word.len() - tag.len()..].eq_ignore_ascii_case(tag) {
                if let Some(kind) = GeometryKind::from_keyword(&word[..word.len() - tag.len()]) {
                    return Ok((kind, dims_tag(tag)));
                }
            }
        }
        Err(WktError::UnknownKeyword(word.to_string()))
    }

    fn read_geometry(&mut self, depth: usize) -> Result<Geometry, WktError> {
        let (kind, dims) = self.read_keyword()?;
        let empty = self.take_empty();
        let geometry = match kind {
            GeometryKind::Point => {
                if empty {
                    return Err(GeometryError::malformed(None, "empty point").into());
                }
                self.expect(b'(', "'('")?;
                let c = self.coord(dims)?;
                self.expect(b')', "')'")?;
                Geometry::Point(c)
            }
            GeometryKind::LineString => Geometry::LineString(if empty {
                LineString::default()
            } else {
                LineString(self.coord_list(dims)?)
            }),
            GeometryKind::Polygon => Geometry::Polygon(if empty {
                Polygon::default()
            } else {
                self.polygon(dims)?
            }),
            GeometryKind::MultiPoint => Geometry::MultiPoint(if empty {
                Vec::new()
            } else {
                self.multi_point(dims)?
            }),
            GeometryKind::MultiLineString => {
                let mut lines = Vec::new();
                if !empty {
                    self.expect(b'(', "'('")?;
                    loop {
                        if self.take_empty() {
                            lines.push(LineString::default());
                        } else {
                            lines.push(LineString(self.coord_list(dims)?));
                        }
                        if !self.next_item()? {
                            break;
                        }
                    }
                }
                Geometry::MultiLineString(lines)
            }
            GeometryKind::MultiPolygon => {
                let mut polygons = Vec::new();
                if !empty {
                    self.expect(b'(', "'('")?;
                    loop {
                        if self.take_empty() {
                            polygons.push(Polygon::default());
                        } else {
                            polygons.push(self.polygon(dims)?);
                        }
                        if !self.next_item()? {
                            break;
                        }
                    }
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
                let mut members = Vec::new();
                if !empty {
                    self.expect(b'(', "'('")?;
                    loop {
                        members.push(self.read_geometry(depth + 1)?);
                        if !self.next_item()? {
                            break;
                        }
                    }
                }
                Geometry::GeometryCollection(Collection::new(members)?)
            }
        };
        Ok(geometry)
    }

    fn number(&mut self) -> Result<Option<f64>, WktError> {
        let start = self.x;
        let mut end = start;
        let d = self.data;
        if end < d.len() && (d[end] == b'+' || d[end] == b'-') {
            end += 1;
        }
        let digits_start = end;
        while end < d.len() && (d[end].is_ascii_digit() || d[end] == b'.') {
            end += 1;
        }
        if end == digits_start {
            return Ok(None);
        }
        if end < d.len() && (d[end] == b'e' || d[end] == b'E') {
            end += 1;
            if end < d.len() && (d[end] == b'+' || d[end] == b'-') {
                end += 1;
            }
            while end < d.len() && d[end].is_ascii_digit() {
                end += 1;
            }
        }
        let text = std::str::from_utf8(&d[start..end]).unwrap_or_default();
        let value = text
            .parse::<f64>()
            .map_err(|_| WktError::InvalidNumber(text.to_string()))?;
        self.x = end;
        Ok(Some(value))
    }

    fn coord(&mut self, declared: Option<usize>) -> Result<Coord, WktError> {
        let mut ordinates = Vec::with_capacity(4);
        loop {
            self.skip_ws();
            match self.number()? {
                Some(v) => ordinates.push(v),
                None => break,
            }
        }
        let n = ordinates.len();
        let arity_ok = match declared {
            Some(d) => n == d,
            None => (2..=4).contains(&n),
        };
        if !arity_ok {
            let expected = declared.map_or_else(|| "2 to 4".to_string(), |d| d.to_string());
            return Err(GeometryError::malformed(
                None,
                format!("expected {expected} ordinates, found {n}"),
            )
            .into());
        }
        Ok(finite_coord([ordinates[0], ordinates[1]])?)
    }

    /// `( c, c, ... )`
    fn coord_list(&mut self, dims: Option<usize>) -> Result<Vec<Coord>, WktError> {
        self.expect(b'(', "'('")?;
        let mut points = Vec::new();
        loop {
            points.push(self.coord(dims)?);
            if !self.next_item()? {
                break;
            }
        }
        Ok(points)
    }

    /// `( (ring), (ring), ... )`
    fn polygon(&mut self, dims: Option<usize>) -> Result<Polygon, WktError> {
        self.expect(b'(', "'('")?;
        let mut rings = Vec::new();
        loop {
            let points = if self.take_empty() {
                Vec::new()
            } else {
                self.coord_list(dims)?
            };
            rings.push(Ring::new(points)?);
            if !self.next_item()? {
                break;
            }
        }
        Ok(Polygon(rings))
    }

    /// Accepts both `MULTIPOINT(1 2, 3 4)` and `MULTIPOINT((1 2), (3 4))`.
    fn multi_point(&mut self, dims: Option<usize>) -> Result<Vec<Coord>, WktError> {
        self.expect(b'(', "'('")?;
        let mut points = Vec::new();
        loop {
            if self.take_empty() {
                return Err(GeometryError::malformed(None, "empty point in multipoint").into());
            }
            if self.peek() == Some(b'(') {
                self.x += 1;
                points.push(self.coord(dims)?);
                self.expect(b')', "')'")?;
            } else {
                points.push(self.coord(dims)?);
            }
            if !self.next_item()? {
                break;
            }
        }
        Ok(points)
    }
}

fn dims_tag(word: &str) -> Option<usize> {
    if word.eq_ignore_ascii_case("Z") || word.eq_ignore_ascii_case("M") {
        Some(3)
    } else if word.eq_ignore_ascii_case("ZM") {
        Some(4)
    } else {
        None
    }
}

/// Decodes plain WKT (no SRID prefix).
pub fn decode_wkt(text: &str, max_depth: usize) -> Result<Geometry, WktError> {
    WktDecoder::new(text, max_depth).decode()
}

/// Splits a leading `SRID=<digits>;` (case-insensitive) from `text`.
///
/// Returns `Ok(None)` when there is no prefix.
pub fn strip_srid_prefix(text: &str) -> Result<Option<(u32, &str)>, WktError> {
    let trimmed = text.trim_start();
    let has_prefix = trimmed
        .get(..5)
        .is_some_and(|p| p.eq_ignore_ascii_case("SRID="));
    if !has_prefix {
        return Ok(None);
    }
    let rest = &trimmed[5..];
    let Some(semi) = rest.find(';') else {
        return Err(WktError::InvalidSrid(rest.to_string()));
    };
    let digits = &rest[..semi];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WktError::InvalidSrid(digits.to_string()));
    }
    let srid = digits
        .parse::<u32>()
        .map_err(|_| WktError::InvalidSrid(digits.to_string()))?;
    Ok(Some((srid, &rest[semi + 1..])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wkt(text: &str) -> Result<Geometry, WktError> {
        decode_wkt(text, 8)
    }

    #[test]
    fn point_variants() {
        assert_eq!(wkt("POINT(12.5 41.9)").unwrap(), Geometry::Point([12.5, 41.9]));
        assert_eq!(wkt("  point ( 1e2  -2.5 ) ").unwrap(), Geometry::Point([100.0, -2.5]));
        assert_eq!(wkt("POINT Z (1 2 3)").unwrap(), Geometry::Point([1.0, 2.0]));
        assert_eq!(wkt("POINTZM(1 2 3 4)").unwrap(), Geometry::Point([1.0, 2.0]));
        assert_eq!(wkt("POINT(1 2 3)").unwrap(), Geometry::Point([1.0, 2.0]));
    }

    #[test]
    fn wrong_arity_is_malformed() {
        for text in ["POINT(1)", "POINT Z (1 2)", "POINT(1 2 3 4 5)"] {
            assert!(
                matches!(
                    wkt(text),
                    Err(WktError::Geometry(GeometryError::MalformedCoordinates { .. }))
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn multipoint_accepts_both_styles() {
        let expected = Geometry::MultiPoint(vec![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(wkt("MULTIPOINT(1 2, 3 4)").unwrap(), expected);
        assert_eq!(wkt("MULTIPOINT((1 2),(3 4))").unwrap(), expected);
    }

    #[test]
    fn polygon_with_hole() {
        let g = wkt("POLYGON((0 0,10 0,10 10,0 10,0 0),(2 2,4 2,4 4,2 2))").unwrap();
        let Geometry::Polygon(p) = g else {
            panic!("expected polygon");
        };
        assert_eq!(p.rings().len(), 2);
        assert_eq!(p.holes()[0].points().len(), 4);
    }

    #[test]
    fn short_ring_is_unclosable() {
        assert_eq!(
            wkt("POLYGON((0 0,1 1))"),
            Err(WktError::Geometry(GeometryError::UnclosableRing { points: 2 }))
        );
    }

    #[test]
    fn empties() {
        assert_eq!(wkt("LINESTRING EMPTY").unwrap(), Geometry::LineString(LineString::default()));
        assert_eq!(wkt("MULTIPOLYGON EMPTY").unwrap(), Geometry::MultiPolygon(Vec::new()));
        assert!(wkt("POINT EMPTY").is_err());
        assert!(wkt("GEOMETRYCOLLECTION EMPTY").is_err());
    }

    #[test]
    fn collection_depth_limit() {
        let text = "GEOMETRYCOLLECTION(GEOMETRYCOLLECTION(GEOMETRYCOLLECTION(POINT(0 0))))";
        assert!(decode_wkt(text, 3).is_ok());
        assert_eq!(
            decode_wkt(text, 2),
            Err(WktError::Geometry(GeometryError::DepthLimitExceeded { limit: 2 }))
        );
    }

    #[test]
    fn syntax_errors_are_not_structural() {
        assert_eq!(wkt("POINT(1 2"), Err(WktError::UnexpectedEnd));
        assert_eq!(wkt("POINT(1 2) x"), Err(WktError::TrailingInput(11)));
        assert_eq!(wkt("CIRCLE(1 2)"), Err(WktError::UnknownKeyword("CIRCLE".into())));
        assert!(matches!(wkt("{\"type\":1}"), Err(WktError::Unexpected { .. })));
    }

    #[test]
    fn srid_prefix() {
        assert_eq!(
            strip_srid_prefix("SRID=4326;POINT(1 2)").unwrap(),
            Some((4326, "POINT(1 2)"))
        );
        assert_eq!(
            strip_srid_prefix("srid=3857;POINT(1 2)").unwrap(),
            Some((3857, "POINT(1 2)"))
        );
        assert_eq!(strip_srid_prefix("POINT(1 2)").unwrap(), None);
        assert!(strip_srid_prefix("SRID=abc;POINT(1 2)").is_err());
        assert!(strip_srid_prefix("SRID=4326 POINT(1 2)").is_err());
    }
}
