//! Configuration for geometry conversion

use serde::Deserialize;

use crate::attributes::{validate_specs, AttributeSpec};
use crate::error::{ConfigError, ConvertError};
use crate::projection::{Extent, ExtentMapper, FitTo, ScreenDims};

/// Radius used for points when none is configured
pub const DEFAULT_POINT_RADIUS: f64 = 1.0;

/// What each fragment contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Complete `<path>`, `<circle>` or `<g>` elements
    #[default]
    Svg,
    /// Bare path `d` values
    Path,
}

/// Configuration options for converting geometries
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Geographic extent covered by the viewport
    pub extent: Extent,

    /// Target pixel dimensions
    pub viewport: ScreenDims,

    /// Viewport axis the extent is fitted to
    pub fit_to: FitTo,

    /// Fractional digits kept in output coordinates (unrounded if `None`)
    pub precision: Option<u32>,

    /// Render each member of a multi-geometry or collection separately
    pub explode: bool,

    /// Render points as `<circle>` elements instead of marker paths
    pub point_as_circle: bool,

    /// Point radius in pixels
    pub circle_radius: Option<f64>,

    /// Element markup or bare path data
    pub output_mode: OutputMode,

    /// Attribute specs, applied in order
    pub attributes: Vec<AttributeSpec>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(Extent::world())
    }
}

impl ConvertOptions {
    /// Create options for an extent, with every other value at its default
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            viewport: ScreenDims::default(),
            fit_to: FitTo::default(),
            precision: None,
            explode: false,
            point_as_circle: false,
            circle_radius: None,
            output_mode: OutputMode::default(),
            attributes: vec![],
        }
    }

    /// Set the geographic extent
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    /// Set the viewport size in pixels
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = ScreenDims::new(width, height);
        self
    }

    /// Set the axis the extent is fitted to
    pub fn with_fit_to(mut self, fit_to: FitTo) -> Self {
        self.fit_to = fit_to;
        self
    }

    /// Set the fractional digits kept in coordinates
    pub fn with_precision(mut self, digits: u32) -> Self {
        self.precision = Some(digits);
        self
    }

    /// Set whether multi-part geometries render one fragment per part
    pub fn with_explode(mut self, explode: bool) -> Self {
        self.explode = explode;
        self
    }

    /// Set whether points render as `<circle>` elements
    pub fn with_point_as_circle(mut self, circles: bool) -> Self {
        self.point_as_circle = circles;
        self
    }

    /// Set the point radius in pixels
    pub fn with_circle_radius(mut self, radius: f64) -> Self {
        self.circle_radius = Some(radius);
        self
    }

    /// Set the output mode
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Append an attribute spec
    pub fn with_attribute(mut self, spec: AttributeSpec) -> Self {
        self.attributes.push(spec);
        self
    }

    /// Set the attribute specs, replacing any already added
    pub fn with_attributes(mut self, specs: Vec<AttributeSpec>) -> Self {
        self.attributes = specs;
        self
    }

    /// Point radius, falling back to [`DEFAULT_POINT_RADIUS`]
    pub fn radius(&self) -> f64 {
        self.circle_radius.unwrap_or(DEFAULT_POINT_RADIUS)
    }

    /// Check everything that can be checked before rendering and build the mapper
    pub fn mapper(&self) -> Result<ExtentMapper, ConvertError> {
        validate_specs(&self.attributes)?;
        let radius = self.radius();
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::InvalidRadius(radius).into());
        }
        ExtentMapper::new(self.extent, self.viewport, self.fit_to)
    }
}
