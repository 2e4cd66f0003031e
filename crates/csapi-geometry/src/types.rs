//! Internal geometry tree.
//!
//! Only X/Y are modelled. Constructors that carry an invariant (`Ring::new`,
//! `Collection::new`) validate it, so every value reachable through the public
//! API is encodable without failure.

use std::borrow::Cow;

use crate::error::GeometryError;

/// A 2D position: `[x, y]` (longitude, latitude for geographic SRIDs).
pub type Coord = [f64; 2];

/// Accepts `coord` when both ordinates are finite. Every decoder builds its
/// positions through this check.
pub fn finite_coord(coord: Coord) -> Result<Coord, GeometryError> {
    if coord.iter().all(|v| v.is_finite()) {
        Ok(coord)
    } else {
        Err(GeometryError::malformed(
            None,
            format!("non-finite ordinate in [{}, {}]", coord[0], coord[1]),
        ))
    }
}

/// Minimum number of points a ring must hold.
pub const MIN_RING_POINTS: usize = 3;

/// An ordered sequence of points. May be empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString(pub Vec<Coord>);

impl LineString {
    pub fn new(points: Vec<Coord>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Coord] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Coord>> for LineString {
    fn from(points: Vec<Coord>) -> Self {
        Self(points)
    }
}

/// A polygon boundary: at least three points, stored open or closed.
///
/// Output always closes the ring through [`Ring::closed`]; the stored points
/// are never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring(Vec<Coord>);

impl Ring {
    /// # Errors
    ///
    /// [`GeometryError::UnclosableRing`] when fewer than three points are given.
    pub fn new(points: Vec<Coord>) -> Result<Self, GeometryError> {
        if points.len() < MIN_RING_POINTS {
            return Err(GeometryError::UnclosableRing {
                points: points.len(),
            });
        }
        Ok(Self(points))
    }

    /// The points exactly as stored.
    pub fn points(&self) -> &[Coord] {
        &self.0
    }

    pub fn is_closed(&self) -> bool {
        self.0.first() == self.0.last()
    }

    /// The ring with its first point repeated at the end when it is not
    /// already there. Borrows when no closing point is needed.
    pub fn closed(&self) -> Cow<'_, [Coord]> {
        if self.is_closed() {
            return Cow::Borrowed(&self.0);
        }
        let mut points = Vec::with_capacity(self.0.len() + 1);
        points.extend_from_slice(&self.0);
        points.push(self.0[0]);
        Cow::Owned(points)
    }

    /// The ring without its closing point.
    pub fn open(&self) -> &[Coord] {
        if self.is_closed() {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0
        }
    }

    pub fn into_points(self) -> Vec<Coord> {
        self.0
    }
}

/// Rings of a polygon: the first is the exterior, the rest are holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon(pub Vec<Ring>);

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self(rings)
    }

    pub fn rings(&self) -> &[Ring] {
        &self.0
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.0.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.0.get(1..).unwrap_or(&[])
    }
}

/// Members of a geometry collection. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection(Vec<Geometry>);

impl Collection {
    /// # Errors
    ///
    /// [`GeometryError::MalformedCoordinates`] when `geometries` is empty.
    pub fn new(geometries: Vec<Geometry>) -> Result<Self, GeometryError> {
        if geometries.is_empty() {
            return Err(GeometryError::malformed(
                None,
                "geometry collection must not be empty",
            ));
        }
        Ok(Self(geometries))
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.0
    }

    pub fn into_geometries(self) -> Vec<Geometry> {
        self.0
    }
}

/// Geometry type codes shared by WKB and WKT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryKind {
    /// Base WKB type code (1–7).
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => Self::Point,
            2 => Self::LineString,
            3 => Self::Polygon,
            4 => Self::MultiPoint,
            5 => Self::MultiLineString,
            6 => Self::MultiPolygon,
            7 => Self::GeometryCollection,
            _ => return None,
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Upper-case WKT keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Case-insensitive WKT keyword lookup.
    pub fn from_keyword(word: &str) -> Option<Self> {
        [
            Self::Point,
            Self::LineString,
            Self::Polygon,
            Self::MultiPoint,
            Self::MultiLineString,
            Self::MultiPolygon,
            Self::GeometryCollection,
        ]
        .into_iter()
        .find(|kind| kind.keyword().eq_ignore_ascii_case(word))
    }
}

/// The internal geometry tree.
///
/// Ordinates must be finite. Decoded values always are; for values built in
/// memory, check with [`Geometry::is_finite`] before encoding, since no
/// encoding can carry NaN or infinity.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Collection),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Collection nesting depth; 0 for anything that is not a collection.
    pub fn depth(&self) -> usize {
        match self {
            Geometry::GeometryCollection(c) => {
                1 + c.geometries().iter().map(Geometry::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// True when every ordinate in the tree is finite.
    pub fn is_finite(&self) -> bool {
        let all = |coords: &[Coord]| coords.iter().all(|c| finite_coord(*c).is_ok());
        let polygon = |p: &Polygon| p.rings().iter().all(|r| all(r.points()));
        match self {
            Geometry::Point(c) => all(std::slice::from_ref(c)),
            Geometry::LineString(l) => all(l.points()),
            Geometry::Polygon(p) => polygon(p),
            Geometry::MultiPoint(points) => all(points),
            Geometry::MultiLineString(lines) => lines.iter().all(|l| all(l.points())),
            Geometry::MultiPolygon(polygons) => polygons.iter().all(polygon),
            Geometry::GeometryCollection(c) => c.geometries().iter().all(Geometry::is_finite),
        }
    }

    /// Coordinate-wise comparison within `tolerance`.
    ///
    /// A ring's closing point is ignored, so an open ring equals its closed
    /// form.
    pub fn approx_eq(&self, other: &Geometry, tolerance: f64) -> bool {
        match (self, other) {
            (Geometry::Point(a), Geometry::Point(b)) => coord_eq(a, b, tolerance),
            (Geometry::LineString(a), Geometry::LineString(b)) => {
                coords_eq(a.points(), b.points(), tolerance)
            }
            (Geometry::Polygon(a), Geometry::Polygon(b)) => polygon_eq(a, b, tolerance),
            (Geometry::MultiPoint(a), Geometry::MultiPoint(b)) => coords_eq(a, b, tolerance),
            (Geometry::MultiLineString(a), Geometry::MultiLineString(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|(x, y)| coords_eq(x.points(), y.points(), tolerance))
            }
            (Geometry::MultiPolygon(a), Geometry::MultiPolygon(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| polygon_eq(x, y, tolerance))
            }
            (Geometry::GeometryCollection(a), Geometry::GeometryCollection(b)) => {
                let (a, b) = (a.geometries(), b.geometries());
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.approx_eq(y, tolerance))
            }
            _ => false,
        }
    }
}

impl From<Coord> for Geometry {
    fn from(coord: Coord) -> Self {
        Geometry::Point(coord)
    }
}

impl From<LineString> for Geometry {
    fn from(line: LineString) -> Self {
        Geometry::LineString(line)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

impl From<Collection> for Geometry {
    fn from(collection: Collection) -> Self {
        Geometry::GeometryCollection(collection)
    }
}

fn coord_eq(a: &Coord, b: &Coord, tolerance: f64) -> bool {
    (a[0] - b[0]).abs() <= tolerance && (a[1] - b[1]).abs() <= tolerance
}

fn coords_eq(a: &[Coord], b: &[Coord], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| coord_eq(x, y, tolerance))
}

fn polygon_eq(a: &Polygon, b: &Polygon, tolerance: f64) -> bool {
    a.rings().len() == b.rings().len()
        && a
            .rings()
            .iter()
            .zip(b.rings())
            .all(|(x, y)| coords_eq(x.open(), y.open(), tolerance))
}

/// A geometry together with its optional spatial reference identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoValue {
    pub geometry: Geometry,
    /// `None` means unspecified, not zero.
    pub srid: Option<u32>,
}

impl GeoValue {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            srid: None,
        }
    }

    pub fn with_srid(geometry: Geometry, srid: u32) -> Self {
        Self {
            geometry,
            srid: Some(srid),
        }
    }
}

impl From<Geometry> for GeoValue {
    fn from(geometry: Geometry) -> Self {
        Self::new(geometry)
    }
}
