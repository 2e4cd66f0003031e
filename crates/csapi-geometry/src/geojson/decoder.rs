//! GeoJSON decoder.

use serde_json::{Map, Value};

use super::error::GeoJsonError;
use crate::error::GeometryError;
use crate::types::{finite_coord, Collection, Coord, Geometry, LineString, Polygon, Ring};

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn array<'v>(value: &'v Value, what: &str) -> Result<&'v Vec<Value>, GeometryError> {
    value.as_array().ok_or_else(|| {
        GeometryError::malformed(
            None,
            format!("{what} must be an array, found {}", json_kind(value)),
        )
    })
}

/// A position: two or more numbers. Ordinates past the second are dropped.
fn position(value: &Value) -> Result<Coord, GeometryError> {
    let items = array(value, "position")?;
    if items.len() < 2 {
        return Err(GeometryError::malformed(
            None,
            format!("position needs at least 2 numbers, found {}", items.len()),
        ));
    }
    let mut coord = [0.0; 2];
    for (slot, item) in coord.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(|| {
            GeometryError::malformed(None, format!("non-numeric ordinate {item}"))
        })?;
    }
    for item in &items[2..] {
        if !item.is_number() {
            return Err(GeometryError::malformed(
                None,
                format!("non-numeric ordinate {item}"),
            ));
        }
    }
    finite_coord(coord)
}

fn positions(value: &Value) -> Result<Vec<Coord>, GeometryError> {
    array(value, "position list")?.iter().map(position).collect()
}

fn polygon(value: &Value) -> Result<Polygon, GeometryError> {
    array(value, "polygon")?
        .iter()
        .map(|ring| Ring::new(positions(ring)?))
        .collect::<Result<Vec<_>, _>>()
        .map(Polygon::new)
}

fn coordinates(object: &Map<String, Value>) -> Result<&Value, GeometryError> {
    object
        .get("coordinates")
        .ok_or_else(|| GeometryError::malformed(None, "missing \"coordinates\" member"))
}

fn read(value: &Value, depth: usize, max_depth: usize) -> Result<Geometry, GeoJsonError> {
    let object = value
        .as_object()
        .ok_or_else(|| GeoJsonError::NotAnObject(json_kind(value)))?;
    let ty = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(GeoJsonError::MissingType)?;
    let geometry = match ty {
        "Point" => Geometry::Point(position(coordinates(object)?)?),
        "LineString" => Geometry::LineString(LineString::new(positions(coordinates(object)?)?)),
        "Polygon" => Geometry::Polygon(polygon(coordinates(object)?)?),
        "MultiPoint" => Geometry::MultiPoint(positions(coordinates(object)?)?),
        "MultiLineString" => Geometry::MultiLineString(
            array(coordinates(object)?, "coordinates")?
                .iter()
                .map(|line| positions(line).map(LineString::new))
                .collect::<Result<_, _>>()?,
        ),
        "MultiPolygon" => Geometry::MultiPolygon(
            array(coordinates(object)?, "coordinates")?
                .iter()
                .map(polygon)
                .collect::<Result<_, _>>()?,
        ),
        "GeometryCollection" => {
            if depth >= max_depth {
                return Err(GeometryError::DepthLimitExceeded { limit: max_depth }.into());
            }
            let members = object.get("geometries").ok_or_else(|| {
                GeometryError::malformed(None, "missing \"geometries\" member")
            })?;
            let mut geometries = Vec::new();
            for (i, member) in array(members, "geometries")?.iter().enumerate() {
                // Inside a recognised collection every failure is structural.
                let geometry = read(member, depth + 1, max_depth).map_err(|err| match err {
                    GeoJsonError::Geometry(err) => err,
                    other => GeometryError::malformed(None, format!("geometries[{i}]: {other}")),
                })?;
                geometries.push(geometry);
            }
            Geometry::GeometryCollection(Collection::new(geometries)?)
        }
        other => return Err(GeoJsonError::UnknownType(other.to_string())),
    };
    Ok(geometry)
}

/// Reads a geometry from an already parsed JSON value.
pub fn geometry_from_value(value: &Value, max_depth: usize) -> Result<Geometry, GeoJsonError> {
    read(value, 0, max_depth)
}

/// Parses `data` as JSON and reads a geometry object from it.
pub fn decode_geojson(data: &[u8], max_depth: usize) -> Result<Geometry, GeoJsonError> {
    let value: Value =
        serde_json::from_slice(data).map_err(|err| GeoJsonError::Json(err.to_string()))?;
    geometry_from_value(&value, max_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn geo(value: Value) -> Result<Geometry, GeoJsonError> {
        geometry_from_value(&value, 4)
    }

    #[test]
    fn point_with_altitude_keeps_xy() {
        let g = geo(json!({"type": "Point", "coordinates": [12.5, 41.9, 30.0]})).unwrap();
        assert_eq!(g, Geometry::Point([12.5, 41.9]));
    }

    #[test]
    fn wrong_arity_is_malformed() {
        for bad in [
            json!({"type": "Point", "coordinates": [12.5]}),
            json!({"type": "Point", "coordinates": [[12.5, 41.9]]}),
            json!({"type": "LineString", "coordinates": [12.5, 41.9]}),
            json!({"type": "Point", "coordinates": ["12.5", 41.9]}),
            json!({"type": "Point"}),
        ] {
            assert!(
                matches!(
                    geo(bad.clone()),
                    Err(GeoJsonError::Geometry(GeometryError::MalformedCoordinates { .. }))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn short_ring_is_unclosable() {
        let err = geo(json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 1]]]})).unwrap_err();
        assert_eq!(
            err,
            GeoJsonError::Geometry(GeometryError::UnclosableRing { points: 2 })
        );
    }

    #[test]
    fn envelope_errors_are_not_structural() {
        assert_eq!(geo(json!([1, 2])), Err(GeoJsonError::NotAnObject("array")));
        assert_eq!(geo(json!({"coordinates": [1, 2]})), Err(GeoJsonError::MissingType));
        assert_eq!(
            geo(json!({"type": "Feature", "geometry": null})),
            Err(GeoJsonError::UnknownType("Feature".into()))
        );
        assert!(matches!(decode_geojson(b"POINT(1 2)", 4), Err(GeoJsonError::Json(_))));
    }

    #[test]
    fn collections() {
        let g = geo(json!({"type": "GeometryCollection", "geometries": [
            {"type": "Point", "coordinates": [1, 2]},
            {"type": "MultiPoint", "coordinates": [[3, 4], [5, 6]]}
        ]}))
        .unwrap();
        assert_eq!(g.depth(), 1);

        let empty = geo(json!({"type": "GeometryCollection", "geometries": []}));
        assert!(matches!(
            empty,
            Err(GeoJsonError::Geometry(GeometryError::MalformedCoordinates { .. }))
        ));

        let bad_member = geo(json!({"type": "GeometryCollection", "geometries": [{"type": "Circle"}]}));
        assert!(matches!(
            bad_member,
            Err(GeoJsonError::Geometry(GeometryError::MalformedCoordinates { .. }))
        ));
    }

    #[test]
    fn depth_limit() {
        let mut value = json!({"type": "Point", "coordinates": [0, 0]});
        for _ in 0..5 {
            value = json!({"type": "GeometryCollection", "geometries": [value]});
        }
        assert_eq!(
            geo(value),
            Err(GeoJsonError::Geometry(GeometryError::DepthLimitExceeded { limit: 4 }))
        );
    }
}
