use csapi_geometry::wkb::{encode_ewkb, encode_wkb};
use csapi_geometry::{
    decode, decode_detailed, encode, DecodeOptions, EncodeOptions, Encoding, Form, GeoValue,
    Geometry, GeometryError, Hint, Polygon, Ring,
};
use serde_json::{json, Value};

const POINT_HEX: &str = "010100000000000000000029403333333333F34440";

fn hints() -> [DecodeOptions; 3] {
    [
        DecodeOptions::with_hint(Hint::Unknown),
        DecodeOptions::with_hint(Hint::Column),
        DecodeOptions::with_hint(Hint::Document),
    ]
}

#[test]
fn same_point_from_every_encoding_and_hint() {
    let expected = GeoValue::new(Geometry::Point([12.5, 41.9]));
    let raw = hex::decode(POINT_HEX).unwrap();
    let inputs: Vec<(&str, Vec<u8>, Encoding)> = vec![
        (
            "geojson",
            br#"{"type":"Point","coordinates":[12.5,41.9]}"#.to_vec(),
            Encoding::GeoJson,
        ),
        ("wkt", b"POINT(12.5 41.9)".to_vec(), Encoding::Wkt),
        ("wkt-lower", b"point (12.5 41.9)".to_vec(), Encoding::Wkt),
        ("hex", POINT_HEX.as_bytes().to_vec(), Encoding::HexWkb),
        ("wkb", raw, Encoding::Wkb),
    ];
    for options in hints() {
        for (name, input, encoding) in &inputs {
            let detected = decode_detailed(input, &options)
                .unwrap_or_else(|e| panic!("{name} with {:?}: {e}", options.hint));
            assert_eq!(detected.value, expected, "{name}");
            assert_eq!(detected.encoding, *encoding, "{name}");
        }
    }
}

#[test]
fn ewkb_srid_word_is_stripped() {
    let geometry = Geometry::LineString(vec![[1.0, 2.0], [3.0, 4.0]].into());
    let plain = encode_wkb(&geometry);
    let mut prefixed = 4326u32.to_le_bytes().to_vec();
    prefixed.extend_from_slice(&plain);

    let options = DecodeOptions::with_hint(Hint::Column);
    let from_plain = decode(&plain, &options).unwrap();
    let from_prefixed = decode(&prefixed, &options).unwrap();
    assert_eq!(from_prefixed.geometry, from_plain.geometry);
    assert_eq!(from_prefixed.srid, Some(4326));

    let flagged = encode_ewkb(&geometry, Some(4326));
    assert_eq!(decode(&flagged, &options).unwrap(), from_prefixed);
    let hex = hex::encode(&prefixed);
    assert_eq!(decode(hex.as_bytes(), &options).unwrap(), from_prefixed);
}

#[test]
fn ewkt_end_to_end() {
    let value = decode(b"SRID=4326;POINT(-122.4 37.8)", &DecodeOptions::default()).unwrap();
    assert_eq!(value, GeoValue::with_srid(Geometry::Point([-122.4, 37.8]), 4326));

    let geojson: Value =
        serde_json::from_slice(&encode(&value, Form::GeoJson, &EncodeOptions::default())).unwrap();
    assert_eq!(geojson, json!({"type": "Point", "coordinates": [-122.4, 37.8]}));

    let ewkb = encode(&value, Form::Ewkb, &EncodeOptions::default());
    assert_eq!(decode(&ewkb, &DecodeOptions::default()).unwrap().srid, Some(4326));
    assert_eq!(
        encode(&value, Form::Wkt, &EncodeOptions::default()),
        b"SRID=4326;POINT(-122.4 37.8)"
    );
    assert_eq!(
        decode(&encode(&value, Form::Wkb, &EncodeOptions::default()), &DecodeOptions::default())
            .unwrap()
            .srid,
        None
    );
}

#[test]
fn rings_close_on_output_only() {
    let open = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
    let value = GeoValue::new(Geometry::Polygon(Polygon::new(vec![
        Ring::new(open.clone()).unwrap(),
    ])));
    for form in [Form::GeoJson, Form::Wkt, Form::Wkb, Form::Ewkb] {
        let bytes = encode(&value, form, &EncodeOptions::default());
        let back = decode(&bytes, &DecodeOptions::default()).unwrap();
        match &back.geometry {
            Geometry::Polygon(p) => {
                let ring = p.exterior().unwrap();
                assert!(ring.is_closed(), "{form:?}");
                assert_eq!(ring.points().len(), open.len() + 1, "{form:?}");
            }
            other => panic!("{form:?} decoded to {other:?}"),
        }
        assert!(back.geometry.approx_eq(&value.geometry, 0.0));
    }
    match &value.geometry {
        Geometry::Polygon(p) => assert_eq!(p.exterior().unwrap().points(), open.as_slice()),
        _ => unreachable!(),
    }
}

#[test]
fn malformed_input_matrix() {
    let malformed = [
        (&br#"{"type":"Point","coordinates":[1]}"#[..], Encoding::GeoJson),
        (&br#"{"type":"LineString","coordinates":[[1,2],["a",3]]}"#[..], Encoding::GeoJson),
        (&b"POINT(1)"[..], Encoding::Wkt),
        (&b"LINESTRING(1 2 3 4 5)"[..], Encoding::Wkt),
        (&b"SRID=4326;POINT(1)"[..], Encoding::Ewkt),
    ];
    for (input, encoding) in malformed {
        match decode(input, &DecodeOptions::default()) {
            Err(GeometryError::MalformedCoordinates { encoding: found, .. }) => {
                assert_eq!(found, Some(encoding), "{}", String::from_utf8_lossy(input));
            }
            other => panic!("{}: {other:?}", String::from_utf8_lossy(input)),
        }
    }

    assert_eq!(
        decode(b"POLYGON((0 0,1 1))", &DecodeOptions::default()),
        Err(GeometryError::UnclosableRing { points: 2 })
    );
    assert!(matches!(
        decode(b"GEOMETRYCOLLECTION EMPTY", &DecodeOptions::default()),
        Err(GeometryError::MalformedCoordinates { .. })
    ));

    let deep = "GEOMETRYCOLLECTION(".repeat(3) + "POINT(0 0)" + &")".repeat(3);
    let options = DecodeOptions {
        max_depth: 2,
        ..DecodeOptions::default()
    };
    assert_eq!(
        decode(deep.as_bytes(), &options),
        Err(GeometryError::DepthLimitExceeded { limit: 2 })
    );
}

#[test]
fn unrecognized_input_matrix() {
    let inputs: [&[u8]; 5] = [
        b"",
        b"not a geometry",
        br#"{"type":"Feature","geometry":null}"#,
        b"CIRCLE(1 2)",
        b"\x05\x06\x07",
    ];
    for input in inputs {
        let err = decode(input, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.attempts().len(), 5, "{err}");
        assert!(matches!(err, GeometryError::UnrecognizedGeometryEncoding { .. }));
    }
}

#[test]
fn hint_never_changes_the_result() {
    let inputs: [&[u8]; 4] = [
        b"MULTIPOINT(1 2, 3 4)",
        b"SRID=3857;LINESTRING(0 0,10 10)",
        br#"{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1]]]]}"#,
        b"0101000020E6100000000000000000F03F0000000000000040",
    ];
    for input in inputs {
        let results: Vec<_> = hints().iter().map(|o| decode(input, o)).collect();
        assert!(results[0].is_ok(), "{results:?}");
        assert!(results.windows(2).all(|w| w[0] == w[1]), "{results:?}");
    }
}

#[test]
fn nested_multi_members_fail_cleanly() {
    let mut bytes = Vec::new();
    for _ in 0..200_000 {
        bytes.extend_from_slice(&[1, 4, 0, 0, 0, 1, 0, 0, 0]);
    }
    bytes.extend_from_slice(&[1, 1, 0, 0, 0]);
    bytes.extend_from_slice(&0.0f64.to_le_bytes());
    bytes.extend_from_slice(&0.0f64.to_le_bytes());
    let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();

    match decode(hex.as_bytes(), &DecodeOptions::default()) {
        Err(GeometryError::UnrecognizedGeometryEncoding { attempts, .. }) => {
            let hex_attempt = attempts
                .iter()
                .find(|a| a.encoding == Encoding::HexWkb)
                .unwrap();
            assert_eq!(hex_attempt.reason, "expected POINT member, found MULTIPOINT");
        }
        other => panic!("unexpected {other:?}"),
    }
}
