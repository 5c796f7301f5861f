//! End-to-end conversion tests over GeoJSON input

use geojson_svg::{
    convert, convert_source, AttributeSpec, ConvertError, ConvertOptions, Coordinate, Extent,
    Feature, FitTo, GeoSource, Geometry, GeometryError, OutputMode,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn square_options() -> ConvertOptions {
    ConvertOptions::new(Extent::new(0.0, 10.0, 0.0, 10.0)).with_viewport(100.0, 100.0)
}

fn feature(geometry: Value, properties: Value) -> Value {
    json!({"type": "Feature", "geometry": geometry, "properties": properties})
}

fn collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

#[test]
fn test_line_string_end_to_end() {
    let conversion = convert(
        &json!({"type": "LineString", "coordinates": [[0, 0], [10, 0], [10, 10]]}),
        &square_options().with_fit_to(FitTo::Width),
    )
    .expect("Should convert");
    assert_eq!(
        conversion.markup(),
        r#"<path d="M0,100 L100,100 L100,0"/>"#
    );
}

#[test]
fn test_point_circle_end_to_end() {
    let conversion = convert(
        &json!({"type": "Point", "coordinates": [5, 5]}),
        &square_options()
            .with_point_as_circle(true)
            .with_circle_radius(2.0),
    )
    .expect("Should convert");
    assert_eq!(conversion.markup(), r#"<circle cx="50" cy="50" r="2"/>"#);
}

#[test]
fn test_extent_corners_for_any_precision() {
    let extent = Extent::new(-73.99, -73.91, 40.70, 40.80);
    for precision in [None, Some(0), Some(1), Some(3), Some(7)] {
        let mut options = ConvertOptions::new(extent)
            .with_viewport(640.0, 480.0)
            .with_fit_to(FitTo::Width)
            .with_output_mode(OutputMode::Path);
        options.precision = precision;

        let conversion = convert(
            &json!({"type": "LineString", "coordinates": [[-73.99, 40.80], [-73.91, 40.80]]}),
            &options,
        )
        .unwrap();
        assert_eq!(conversion.markup(), "M0,0 L640,0", "precision {:?}", precision);
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let input = collection(vec![
        feature(
            json!({"type": "Polygon", "coordinates": [[[1, 1], [4, 1], [4, 3], [1, 1]]]}),
            json!({"name": "a", "rank": 1}),
        ),
        feature(
            json!({"type": "MultiPoint", "coordinates": [[2, 2], [3, 3]]}),
            json!({"name": "b"}),
        ),
    ]);
    let options = square_options()
        .with_precision(3)
        .with_point_as_circle(true)
        .with_attribute(AttributeSpec::dynamic("name"))
        .with_attribute(AttributeSpec::dynamic("rank"));

    let first = convert(&input, &options).unwrap().markup();
    let second = convert(&input, &options).unwrap().markup();
    assert_eq!(first, second);
}

#[test]
fn test_multi_line_string_explode_counts() {
    let lines = json!({
        "type": "MultiLineString",
        "coordinates": [
            [[0, 0], [1, 1]],
            [[2, 2], [3, 3]],
            [[4, 4], [5, 5]],
            [[6, 6], [7, 7]]
        ]
    });

    let exploded = convert(&lines, &square_options().with_explode(true)).unwrap();
    assert_eq!(exploded.fragments().len(), 4);

    let joined = convert(&lines, &square_options()).unwrap();
    assert_eq!(joined.fragments().len(), 1);
    assert_eq!(joined.fragments()[0].markup.matches('M').count(), 4);
}

#[test]
fn test_multi_polygon_explode_counts() {
    let polygons = json!({
        "type": "MultiPolygon",
        "coordinates": [
            [[[0, 0], [1, 0], [1, 1], [0, 0]]],
            [[[2, 2], [3, 2], [3, 3], [2, 2]]],
            [[[4, 4], [5, 4], [5, 5], [4, 4]]]
        ]
    });

    let exploded = convert(&polygons, &square_options().with_explode(true)).unwrap();
    assert_eq!(exploded.fragments().len(), 3);

    let joined = convert(&polygons, &square_options()).unwrap();
    assert_eq!(joined.fragments().len(), 1);
    assert_eq!(joined.fragments()[0].markup.matches(" Z").count(), 3);
}

#[test]
fn test_multi_point_explode_counts() {
    let points = json!({"type": "MultiPoint", "coordinates": [[1, 1], [2, 2], [3, 3], [4, 4]]});
    let options = square_options()
        .with_point_as_circle(true)
        .with_attribute(AttributeSpec::fixed("class", "city"));

    let exploded = convert(&points, &options.clone().with_explode(true)).unwrap();
    assert_eq!(exploded.fragments().len(), 4);
    assert!(exploded
        .fragments()
        .iter()
        .all(|f| f.markup.starts_with("<circle") && f.markup.contains(r#"class="city""#)));

    let grouped = convert(&points, &options).unwrap();
    assert_eq!(grouped.fragments().len(), 1);
    assert_eq!(grouped.fragments()[0].markup.matches("<circle").count(), 4);
}

#[test]
fn test_malformed_tagged_attribute_is_rejected() {
    for spec in [
        json!({"type": "dynamic"}),
        json!({"type": "static", "property": "class"}),
        json!({"type": "dynamic", "propery": "name"}),
    ] {
        let result = serde_json::from_value::<Vec<AttributeSpec>>(json!([spec.clone()]));
        assert!(result.is_err(), "accepted {}", spec);
    }
}

#[test]
fn test_malformed_feature_among_valid_ones() {
    let input = collection(vec![
        feature(
            json!({"type": "Point", "coordinates": [1, 1]}),
            json!({"name": "first"}),
        ),
        feature(
            json!({"type": "Hexagon", "coordinates": [[0, 0]]}),
            json!({"name": "broken"}),
        ),
        feature(
            json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]}),
            json!({"name": "third"}),
        ),
    ]);
    let options = square_options().with_attribute(AttributeSpec::dynamic("name"));
    let conversion = convert(&input, &options).expect("Collection should not abort");

    let fragments = conversion.fragments();
    assert_eq!(fragments.len(), 2);
    assert!(fragments[0].markup.contains(r#"name="first""#));
    assert!(fragments[1].markup.contains(r#"name="third""#));

    assert_eq!(conversion.diagnostics().len(), 1);
    let diagnostic = &conversion.diagnostics()[0];
    assert_eq!(diagnostic.index, 1);
    assert_eq!(
        diagnostic.error,
        GeometryError::UnknownKind {
            kind: "Hexagon".to_string()
        }
    );
}

#[test]
fn test_null_geometry_is_reported() {
    let input = collection(vec![
        feature(Value::Null, json!({})),
        feature(json!({"type": "Point", "coordinates": [1, 1]}), json!({})),
    ]);
    let conversion = convert(&input, &square_options()).unwrap();
    assert_eq!(conversion.fragments().len(), 1);
    assert_eq!(conversion.diagnostics()[0].index, 0);
    assert_eq!(
        conversion.diagnostics()[0].error,
        GeometryError::MissingGeometry
    );
}

#[test]
fn test_bad_coordinate_is_reported() {
    let input = collection(vec![
        feature(
            json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, null], [0, 0]]]}),
            json!({}),
        ),
        feature(
            json!({"type": "LineString", "coordinates": [[0, 0], [1]]}),
            json!({}),
        ),
    ]);
    let conversion = convert(&input, &square_options()).unwrap();
    assert!(conversion.fragments().is_empty());
    assert_eq!(
        conversion.diagnostics()[0].to_string(),
        "feature 0: geometry: coordinate is not a number"
    );
    assert_eq!(conversion.diagnostics()[1].index, 1);
}

#[test]
fn test_degenerate_extent_is_rejected() {
    let options = ConvertOptions::new(Extent::new(0.0, 10.0, 5.0, 5.0));
    let result = convert(
        &json!({"type": "Point", "coordinates": [1, 1]}),
        &options,
    );
    match result {
        Err(ConvertError::InvalidExtent { low, high, .. }) => {
            assert_eq!(low, 5.0);
            assert_eq!(high, 5.0);
        }
        other => panic!("expected InvalidExtent, got {:?}", other),
    }
}

#[test]
fn test_bad_attribute_spec_fails_before_rendering() {
    let options = square_options().with_attribute(AttributeSpec::Dynamic {
        property: String::new(),
        key: Some("x".to_string()),
    });
    let result = convert(&json!({"type": "Point", "coordinates": [1, 1]}), &options);
    assert!(matches!(result, Err(ConvertError::Config(_))));
}

#[test]
fn test_attributes_from_all_spec_kinds() {
    let specs: Vec<AttributeSpec> = serde_json::from_value(json!([
        {"type": "static", "property": "class", "value": "country"},
        {"type": "dynamic", "property": "iso_a3", "key": "id"},
        "missing",
        {"data-source": "natural earth"},
        {"type": "static", "property": "class", "value": "highlight"}
    ]))
    .unwrap();
    let input = feature(
        json!({"type": "LineString", "coordinates": [[0, 0], [10, 10]]}),
        json!({"iso_a3": "FRA"}),
    );
    let conversion = convert(&input, &square_options().with_attributes(specs)).unwrap();
    assert_eq!(
        conversion.markup(),
        r#"<path d="M0,100 L100,0" class="highlight" id="FRA" data-source="natural earth"/>"#
    );
}

#[test]
fn test_typed_source() {
    let source = GeoSource::FeatureCollection(vec![
        Feature::new(Geometry::Point(Coordinate::new(0.0, 10.0))).with_property("kind", "origin"),
        Feature::new(Geometry::polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])),
    ]);
    let conversion = convert_source(
        &source,
        &square_options().with_attribute(AttributeSpec::renamed("kind", "class")),
    )
    .unwrap();
    assert_eq!(
        conversion.markup(),
        concat!(
            r#"<path d="M0,0 m-1,0 a1,1 0 1,1 2,0 a1,1 0 1,1 -2,0" class="origin"/>"#,
            r#"<path d="M0,100 L100,100 L100,0 Z"/>"#
        )
    );
}

#[test]
fn test_fit_to_height_overflows_width() {
    let options = ConvertOptions::new(Extent::world())
        .with_viewport(100.0, 50.0)
        .with_fit_to(FitTo::Height)
        .with_output_mode(OutputMode::Path);
    let conversion = convert(
        &json!({"type": "LineString", "coordinates": [[-180, -90], [180, 90]]}),
        &options,
    )
    .unwrap();
    assert_eq!(conversion.markup(), "M0,50 L100,0");

    let wide = ConvertOptions::new(Extent::new(0.0, 40.0, 0.0, 10.0))
        .with_viewport(100.0, 100.0)
        .with_fit_to(FitTo::Height)
        .with_output_mode(OutputMode::Path);
    let conversion = convert(
        &json!({"type": "LineString", "coordinates": [[0, 0], [40, 10]]}),
        &wide,
    )
    .unwrap();
    assert_eq!(conversion.markup(), "M0,100 L400,0");
}
