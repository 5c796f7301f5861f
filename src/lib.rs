//! GeoJSON to SVG conversion
//!
//! This library projects GeoJSON geometries from a geographic extent into a
//! pixel viewport and renders them as SVG paths and circles, with attributes
//! taken from feature properties.
//!
//! # Example
//!
//! ```rust
//! use geojson_svg::{convert, ConvertOptions, Extent};
//! use serde_json::json;
//!
//! let geojson = json!({
//!     "type": "LineString",
//!     "coordinates": [[0, 0], [10, 0], [10, 10]]
//! });
//! let options = ConvertOptions::new(Extent::new(0.0, 10.0, 0.0, 10.0))
//!     .with_viewport(100.0, 100.0);
//!
//! let conversion = convert(&geojson, &options).unwrap();
//! assert_eq!(conversion.markup(), r#"<path d="M0,100 L100,100 L100,0"/>"#);
//! ```

pub mod attributes;
pub mod error;
pub mod geometry;
pub mod optimize;
pub mod projection;
pub mod renderer;
pub mod settings;

pub use attributes::{AttributeSpec, Attributes};
pub use error::{ConfigError, ConvertError, FeatureError, GeometryError};
pub use geometry::{Coordinate, Feature, GeoSource, Geometry};
pub use optimize::{CompactOptimizer, MarkupOptimizer, OptimizeError};
pub use projection::{Extent, ExtentMapper, FitTo, ScreenDims};
pub use renderer::{
    Conversion, ConvertOptions, Document, DocumentStyle, FeatureRenderer, OutputMode,
    RenderedFragment,
};
pub use settings::Settings;

use serde_json::Value;

/// Convert a parsed GeoJSON value
///
/// The value may be a geometry, a feature or a feature collection. Features
/// of a collection that cannot be rendered are reported in
/// [`Conversion::diagnostics`] instead of failing the call.
///
/// # Example
///
/// ```rust
/// use geojson_svg::{convert, AttributeSpec, ConvertOptions, Extent};
/// use serde_json::json;
///
/// let geojson = json!({
///     "type": "FeatureCollection",
///     "features": [
///         {"type": "Feature", "properties": {"name": "a"},
///          "geometry": {"type": "Point", "coordinates": [5, 5]}},
///         {"type": "Feature", "properties": {},
///          "geometry": {"type": "Hexagon", "coordinates": []}}
///     ]
/// });
/// let options = ConvertOptions::new(Extent::new(0.0, 10.0, 0.0, 10.0))
///     .with_viewport(100.0, 100.0)
///     .with_point_as_circle(true)
///     .with_attribute(AttributeSpec::dynamic("name"));
///
/// let conversion = convert(&geojson, &options).unwrap();
/// assert_eq!(conversion.markup(), r#"<circle cx="50" cy="50" r="1" name="a"/>"#);
/// assert_eq!(conversion.diagnostics()[0].index, 1);
/// ```
pub fn convert(value: &Value, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    // Validate options before touching the input
    let renderer = FeatureRenderer::new(options)?;
    let source = geometry::decode_source(value)?;
    renderer.render(&source)
}

/// Convert an already decoded source
pub fn convert_source(
    source: &GeoSource,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    FeatureRenderer::new(options)?.render(source)
}

/// Convert a parsed GeoJSON value into a complete SVG document
///
/// In [`OutputMode::Path`] each path fragment is wrapped in a bare `<path>`
/// element, so the document is valid in either mode.
pub fn render_document(
    value: &Value,
    options: &ConvertOptions,
    style: &DocumentStyle,
) -> Result<Document, ConvertError> {
    style.validate()?;
    let conversion = convert(value, options)?;
    let mode = conversion.output_mode();
    let (mut fragments, diagnostics) = conversion.into_parts();
    if mode == OutputMode::Path {
        for fragment in &mut fragments {
            fragment.markup = format!(r#"<path d="{}"/>"#, fragment.markup);
        }
    }
    let svg = renderer::assemble(&fragments, style);
    Ok(Document { svg, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn options() -> ConvertOptions {
        ConvertOptions::new(Extent::new(0.0, 10.0, 0.0, 10.0)).with_viewport(100.0, 100.0)
    }

    #[test]
    fn test_convert_line_string() {
        let conversion = convert(
            &json!({"type": "LineString", "coordinates": [[0, 0], [10, 0], [10, 10]]}),
            &options().with_output_mode(OutputMode::Path),
        )
        .unwrap();
        assert_eq!(conversion.markup(), "M0,100 L100,100 L100,0");
    }

    #[test]
    fn test_convert_point_as_circle() {
        let conversion = convert(
            &json!({"type": "Point", "coordinates": [5, 5]}),
            &options().with_point_as_circle(true).with_circle_radius(2.0),
        )
        .unwrap();
        assert_eq!(conversion.markup(), r#"<circle cx="50" cy="50" r="2"/>"#);
    }

    #[test]
    fn test_degenerate_extent_fails_every_call() {
        let opts = ConvertOptions::new(Extent::new(3.0, 3.0, 0.0, 10.0));
        for value in [
            json!({"type": "Point", "coordinates": [3, 3]}),
            json!({"type": "FeatureCollection", "features": []}),
        ] {
            assert!(matches!(
                convert(&value, &opts),
                Err(ConvertError::InvalidExtent { .. })
            ));
        }
    }

    #[test]
    fn test_bare_geometry_error_is_fatal() {
        let result = convert(
            &json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 1]]]}),
            &options(),
        );
        assert!(matches!(
            result,
            Err(ConvertError::Geometry(GeometryError::TooFewCoordinates { .. }))
        ));
    }

    #[test]
    fn test_unsupported_source() {
        let result = convert(&json!({"type": "Sphere"}), &options());
        assert!(matches!(result, Err(ConvertError::UnsupportedSource { .. })));
    }

    #[test]
    fn test_render_document() {
        let style = DocumentStyle::new()
            .with_size(100.0, 100.0)
            .with_standalone(false)
            .with_pretty_print(false);
        let document = render_document(
            &json!({"type": "LineString", "coordinates": [[0, 0], [10, 10]]}),
            &options(),
            &style,
        )
        .unwrap();
        assert!(document.svg.starts_with("<svg "));
        assert!(document.svg.ends_with(r#"<path d="M0,100 L100,0"/></svg>"#));
        assert!(document.diagnostics.is_empty());
    }

    #[test]
    fn test_render_document_in_path_mode() {
        let style = DocumentStyle::new()
            .with_size(100.0, 100.0)
            .with_standalone(false)
            .with_pretty_print(false);
        let document = render_document(
            &json!({"type": "MultiLineString", "coordinates": [
                [[0, 0], [10, 10]],
                [[0, 10], [10, 0]]
            ]}),
            &options().with_output_mode(OutputMode::Path).with_explode(true),
            &style,
        )
        .unwrap();
        assert!(document
            .svg
            .ends_with(r#"><path d="M0,100 L100,0"/><path d="M0,0 L100,100"/></svg>"#));
    }

    #[test]
    fn test_render_document_rejects_bad_color() {
        let style = DocumentStyle::new().with_fill("grey");
        let result = render_document(
            &json!({"type": "Point", "coordinates": [0, 0]}),
            &options(),
            &style,
        );
        assert!(matches!(result, Err(ConvertError::Config(_))));
    }
}
