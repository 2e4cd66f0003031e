//! GeoJSON encoder. Keys are written `type` first.

use serde_json::{json, Value};

use crate::types::{Coord, Geometry, Polygon};

fn position(c: &Coord) -> Value {
    // Non-finite ordinates become null, as serde_json does for f64.
    json!([c[0], c[1]])
}

fn positions(points: &[Coord]) -> Value {
    Value::Array(points.iter().map(position).collect())
}

fn polygon(p: &Polygon) -> Value {
    Value::Array(p.rings().iter().map(|r| positions(&r.closed())).collect())
}

/// Builds the GeoJSON geometry object for `geometry`.
pub fn geometry_to_value(geometry: &Geometry) -> Value {
    let ty = geometry.type_name();
    match geometry {
        Geometry::Point(c) => json!({"type": ty, "coordinates": position(c)}),
        Geometry::LineString(line) => json!({"type": ty, "coordinates": positions(line.points())}),
        Geometry::Polygon(p) => json!({"type": ty, "coordinates": polygon(p)}),
        Geometry::MultiPoint(points) => json!({"type": ty, "coordinates": positions(points)}),
        Geometry::MultiLineString(lines) => json!({
            "type": ty,
            "coordinates": lines.iter().map(|l| positions(l.points())).collect::<Vec<_>>(),
        }),
        Geometry::MultiPolygon(polygons) => json!({
            "type": ty,
            "coordinates": polygons.iter().map(polygon).collect::<Vec<_>>(),
        }),
        Geometry::GeometryCollection(collection) => json!({
            "type": ty,
            "geometries": collection.geometries().iter().map(geometry_to_value).collect::<Vec<_>>(),
        }),
    }
}

/// Compact GeoJSON bytes.
pub fn encode_geojson(geometry: &Geometry) -> Vec<u8> {
    serde_json::to_vec(&geometry_to_value(geometry)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collection, LineString, Ring};

    #[test]
    fn point_bytes() {
        let bytes = encode_geojson(&Geometry::Point([-122.4, 37.8]));
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"type":"Point","coordinates":[-122.4,37.8]}"#
        );
    }

    #[test]
    fn polygon_is_closed_and_input_untouched() {
        let ring = Ring::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]).unwrap();
        let polygon = Polygon::new(vec![ring]);
        let value = geometry_to_value(&Geometry::Polygon(polygon.clone()));
        assert_eq!(
            value,
            json!({"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]})
        );
        assert_eq!(polygon.rings()[0].points().len(), 3);
    }

    #[test]
    fn collection_uses_geometries_member() {
        let g = Geometry::GeometryCollection(
            Collection::new(vec![Geometry::LineString(LineString(vec![[1.0, 2.0], [3.0, 4.0]]))])
                .unwrap(),
        );
        assert_eq!(
            geometry_to_value(&g),
            json!({"type": "GeometryCollection", "geometries": [
                {"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}
            ]})
        );
    }
}
