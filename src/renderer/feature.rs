//! Feature rendering: attributes plus projected shapes, per feature
//!
//! A feature collection never aborts on a bad feature. The feature's
//! fragment is left out and the error is collected as a [`FeatureError`].

use crate::attributes::{resolve, AttributeSpec};
use crate::error::{ConvertError, FeatureError, GeometryError};
use crate::geometry::{Feature, GeoSource, Geometry, Properties};
use crate::projection::ExtentMapper;

use super::config::{ConvertOptions, OutputMode};
use super::shapes::{Bounds, GeometryRenderer, Shape};

/// One rendered unit of output
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFragment {
    /// Element markup or bare path data, depending on the output mode
    pub markup: String,
    /// Index of the source feature within its collection, if any
    pub feature: Option<usize>,
    /// Screen-space bounds of the rendered shape
    pub bounds: Option<Bounds>,
}

/// Result of converting one source
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    mode: OutputMode,
    fragments: Vec<RenderedFragment>,
    diagnostics: Vec<FeatureError>,
}

impl Conversion {
    /// Fragments in encounter order
    pub fn fragments(&self) -> &[RenderedFragment] {
        &self.fragments
    }

    /// Features that could not be rendered
    pub fn diagnostics(&self) -> &[FeatureError] {
        &self.diagnostics
    }

    pub fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// True when no feature was skipped
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Union of all fragment bounds
    pub fn bounds(&self) -> Option<Bounds> {
        self.fragments
            .iter()
            .filter_map(|f| f.bounds)
            .reduce(Bounds::union)
    }

    /// All fragments as one string
    ///
    /// SVG fragments are sibling elements and join directly; path data joins
    /// with a space, which loses per-feature boundaries.
    pub fn markup(&self) -> String {
        let separator = match self.mode {
            OutputMode::Svg => "",
            OutputMode::Path => " ",
        };
        self.fragments
            .iter()
            .map(|f| f.markup.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn into_parts(self) -> (Vec<RenderedFragment>, Vec<FeatureError>) {
        (self.fragments, self.diagnostics)
    }
}

/// Renders geometries, features and feature collections
pub struct FeatureRenderer<'a> {
    options: &'a ConvertOptions,
    mapper: ExtentMapper,
}

impl<'a> FeatureRenderer<'a> {
    /// Validate the options and set up the projection
    pub fn new(options: &'a ConvertOptions) -> Result<Self, ConvertError> {
        let mapper = options.mapper()?;
        Ok(Self { options, mapper })
    }

    pub fn mapper(&self) -> &ExtentMapper {
        &self.mapper
    }

    /// Render any source
    ///
    /// Errors in a bare geometry or single feature are fatal; errors inside a
    /// collection are collected per feature.
    pub fn render(&self, source: &GeoSource) -> Result<Conversion, ConvertError> {
        let mut conversion = Conversion {
            mode: self.options.output_mode,
            fragments: vec![],
            diagnostics: vec![],
        };

        match source {
            GeoSource::Geometry(geometry) => {
                conversion.fragments =
                    self.render_geometry(geometry, "", &Properties::new(), None)?;
            }
            GeoSource::Feature(feature) => {
                conversion.fragments = self.render_feature(feature, None)?;
            }
            GeoSource::FeatureCollection(features) => {
                log::debug!("rendering {} features", features.len());
                for (index, feature) in features.iter().enumerate() {
                    match self.render_feature(feature, Some(index)) {
                        Ok(fragments) => conversion.fragments.extend(fragments),
                        Err(error) => {
                            log::warn!("skipping feature {}: {}", index, error);
                            conversion.diagnostics.push(FeatureError { index, error });
                        }
                    }
                }
            }
        }

        log::debug!(
            "rendered {} fragments, {} features skipped",
            conversion.fragments.len(),
            conversion.diagnostics.len()
        );
        Ok(conversion)
    }

    fn render_feature(
        &self,
        feature: &Feature,
        index: Option<usize>,
    ) -> Result<Vec<RenderedFragment>, GeometryError> {
        let geometry = feature.geometry.as_ref().map_err(Clone::clone)?;
        self.render_geometry(geometry, "geometry", &feature.properties, index)
    }

    fn render_geometry(
        &self,
        geometry: &Geometry,
        path: &str,
        properties: &Properties,
        feature: Option<usize>,
    ) -> Result<Vec<RenderedFragment>, GeometryError> {
        log::trace!("rendering {} at '{}'", geometry.kind(), path);
        let renderer = GeometryRenderer::new(&self.mapper, self.options);
        let shapes = renderer.render_at(geometry, path)?;

        // Attributes are per feature: every fragment gets the same set
        let attrs = match self.options.output_mode {
            OutputMode::Svg => attribute_text(&self.options.attributes, properties),
            OutputMode::Path => String::new(),
        };

        Ok(shapes
            .iter()
            .map(|shape| RenderedFragment {
                markup: self.markup(shape, &attrs, &renderer),
                feature,
                bounds: shape.bounds(),
            })
            .collect())
    }

    fn markup(&self, shape: &Shape, attrs: &str, renderer: &GeometryRenderer) -> String {
        match self.options.output_mode {
            OutputMode::Svg => shape.to_svg(attrs, renderer.format()),
            OutputMode::Path => shape.to_path_data(renderer.format()),
        }
    }
}

fn attribute_text(specs: &[AttributeSpec], properties: &Properties) -> String {
    if specs.is_empty() {
        return String::new();
    }
    resolve(specs, properties).to_svg()
}
