//! Document assembly, optimization and settings files

use std::fs;

use geojson_svg::{
    render_document, CompactOptimizer, ConvertOptions, DocumentStyle, Extent, MarkupOptimizer,
    Settings,
};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample() -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "A & B"},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 0]]]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Point", "coordinates": [2.5, 7.5]}
            }
        ]
    })
}

fn options() -> ConvertOptions {
    ConvertOptions::new(Extent::new(0.0, 10.0, 0.0, 10.0))
        .with_viewport(100.0, 100.0)
        .with_point_as_circle(true)
        .with_attribute(geojson_svg::AttributeSpec::dynamic("name"))
}

#[test]
fn test_pretty_document() {
    let style = DocumentStyle::new().with_size(100.0, 100.0);
    let document = render_document(&sample(), &options(), &style).expect("Should render");
    assert!(document.diagnostics.is_empty());
    assert_snapshot!(document.svg, @r###"
    <?xml version="1.0"?>
    <svg xmlns="http://www.w3.org/2000/svg" fill="#7c7c7c" width="100" height="100" stroke="#ffffff" stroke-linecap="round" stroke-linejoin="round" stroke-width="0.1" viewBox="0 0 100 100">
      <path d="M0,100 L100,100 L100,0 L0,100 Z" name="A &amp; B"/>
      <circle cx="25" cy="25" r="1"/>
    </svg>
    "###);
}

#[test]
fn test_optimized_document() {
    let style = DocumentStyle::new().with_size(100.0, 100.0);
    let document = render_document(&sample(), &options(), &style).unwrap();
    let optimized = CompactOptimizer::default()
        .optimize(&document.svg)
        .expect("Should optimize");
    assert_snapshot!(optimized, @r###"<svg xmlns="http://www.w3.org/2000/svg" fill="#7c7c7c" width="100" height="100" stroke="#ffffff" stroke-linecap="round" stroke-linejoin="round" stroke-width="0.1" viewBox="0 0 100 100"><path d="M0,100 L100,100 L100,0 L0,100 Z" name="A &amp; B"/><circle cx="25" cy="25" r="1"/></svg>"###);
}

#[test]
fn test_optimizer_rounds_long_coordinates() {
    let options = ConvertOptions::new(Extent::new(0.0, 3.0, 0.0, 3.0)).with_viewport(1.0, 1.0);
    let style = DocumentStyle::new()
        .with_size(1.0, 1.0)
        .with_standalone(false)
        .with_pretty_print(false);
    let document = render_document(
        &json!({"type": "LineString", "coordinates": [[0, 0], [1, 2]]}),
        &options,
        &style,
    )
    .unwrap();
    assert!(document.svg.contains("L0.3333333333333333,0.3333333333333333"));

    let optimized = CompactOptimizer::default().optimize(&document.svg).unwrap();
    assert!(optimized.ends_with(r#"<path d="M0,1 L0.333,0.333"/></svg>"#));
}

#[test]
fn test_settings_file_drives_conversion() {
    let path = std::env::temp_dir().join(format!(
        "geojson-svg-settings-{}.toml",
        std::process::id()
    ));
    fs::write(
        &path,
        r##"
attributes = ["name title"]

[extent]
left = 0.0
right = 10.0
bottom = 0.0
top = 10.0

[output]
point-as-circle = true
radius = 3.0

[style]
width = 100.0
height = 100.0
standalone = false
pretty-print = false
fill = "#123"
"##,
    )
    .unwrap();

    let settings = Settings::from_file(&path).expect("Should load settings");
    fs::remove_file(&path).ok();

    let document = render_document(
        &json!({
            "type": "Feature",
            "properties": {"name": "centre"},
            "geometry": {"type": "Point", "coordinates": [5, 5]}
        }),
        &settings.convert_options(),
        &settings.document_style(),
    )
    .unwrap();

    assert!(document.svg.contains(r##"fill="#123""##));
    assert!(document
        .svg
        .ends_with(r#"<circle cx="50" cy="50" r="3" title="centre"/></svg>"#));
}

#[test]
fn test_diagnostics_survive_assembly() {
    let input = json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {}, "geometry": null},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 1]}}
        ]
    });
    let document = render_document(&input, &options(), &DocumentStyle::new()).unwrap();
    assert_eq!(document.diagnostics.len(), 1);
    assert_eq!(
        document.diagnostics[0].to_string(),
        "feature 0: feature has no geometry"
    );
    assert_eq!(document.svg.matches("<circle").count(), 1);
}
