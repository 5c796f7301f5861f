//! Mapping geographic coordinates into the pixel viewport
//!
//! The mapper applies one uniform scale to both axes, so shapes keep their
//! aspect ratio. [`FitTo`] picks the viewport axis the extent spans exactly;
//! along the other axis output may overflow or underflow the nominal viewport.
//! Nothing is clamped.
//!
//! The vertical axis is inverted: geographic north maps to screen y = 0.

use serde::Deserialize;

use crate::error::{Axis, ConvertError};
use crate::geometry::Coordinate;

/// Geographic bounding rectangle of the input
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Extent {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Extent {
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Whole-world extent in degrees
    pub fn world() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Target pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScreenDims {
    pub width: f64,
    pub height: f64,
}

impl ScreenDims {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for ScreenDims {
    fn default() -> Self {
        Self::new(256.0, 256.0)
    }
}

/// Which viewport axis the extent is fitted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitTo {
    #[default]
    Width,
    Height,
}

/// Linear transform from an [`Extent`] to a viewport
#[derive(Debug, Clone, Copy)]
pub struct ExtentMapper {
    left: f64,
    top: f64,
    /// Extent length along the fitted axis
    span: f64,
    /// Viewport length along the fitted axis
    size: f64,
}

impl ExtentMapper {
    /// Build a mapper, rejecting degenerate extents and viewports
    pub fn new(extent: Extent, viewport: ScreenDims, fit_to: FitTo) -> Result<Self, ConvertError> {
        let geo_width = extent.width();
        let geo_height = extent.height();
        if geo_width == 0.0 || !geo_width.is_finite() {
            return Err(ConvertError::InvalidExtent {
                axis: Axis::Horizontal,
                low: extent.left,
                high: extent.right,
            });
        }
        if geo_height == 0.0 || !geo_height.is_finite() {
            return Err(ConvertError::InvalidExtent {
                axis: Axis::Vertical,
                low: extent.bottom,
                high: extent.top,
            });
        }
        if !viewport.is_valid() {
            return Err(ConvertError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let (span, size) = match fit_to {
            FitTo::Width => (geo_width, viewport.width),
            FitTo::Height => (geo_height, viewport.height),
        };
        let mapper = Self {
            left: extent.left,
            top: extent.top,
            span,
            size,
        };
        log::debug!("extent mapper: fit to {:?}, scale {}", fit_to, mapper.scale());
        Ok(mapper)
    }

    /// Pixels per geographic unit
    pub fn scale(&self) -> f64 {
        self.size / self.span
    }

    /// Project a geographic coordinate into screen space
    ///
    /// Evaluated as `(delta / span) * size` so the fitted extent edge lands
    /// exactly on the viewport edge.
    pub fn project(&self, c: Coordinate) -> Coordinate {
        Coordinate {
            x: (c.x - self.left) / self.span * self.size,
            y: (self.top - c.y) / self.span * self.size,
        }
    }
}

/// Formats screen coordinates at a fixed number of fractional digits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberFormat {
    precision: Option<u32>,
}

impl NumberFormat {
    pub fn new(precision: Option<u32>) -> Self {
        Self { precision }
    }

    /// Round (if a precision is set) and format minimally
    ///
    /// `100.0` prints as `100`, `-0.0` as `0`.
    pub fn format(&self, value: f64) -> String {
        let rounded = match self.precision {
            Some(digits) => {
                let factor = 10f64.powi(digits.min(15) as i32);
                let scaled = (value * factor).round();
                // Huge values overflow when scaled and have no fraction anyway
                if scaled.is_finite() {
                    scaled / factor
                } else {
                    value
                }
            }
            None => value,
        };
        if rounded == 0.0 {
            return "0".to_string();
        }
        format!("{}", rounded)
    }

    /// `x,y`
    pub fn pair(&self, c: Coordinate) -> String {
        format!("{},{}", self.format(c.x), self.format(c.y))
    }
}
