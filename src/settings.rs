//! Conversion settings loaded from TOML
//!
//! Every section is optional; missing values fall back to the library
//! defaults.
//!
//! ```toml
//! attributes = ["name", { type = "static", property = "class", value = "land" }]
//!
//! [extent]
//! left = -180.0
//! right = 180.0
//! bottom = -90.0
//! top = 90.0
//!
//! [output]
//! fit-to = "height"
//! precision = 2
//! optimize-decimals = 2
//!
//! [style]
//! fill = "#7c7c7c"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::attributes::AttributeSpec;
use crate::projection::{Extent, FitTo, ScreenDims};
use crate::renderer::{ConvertOptions, DocumentStyle, OutputMode};

/// Errors that can occur when loading or parsing settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Contents of a settings file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub extent: Option<Extent>,
    /// Defaults to the document size
    pub viewport: Option<ScreenDims>,
    pub output: OutputSettings,
    pub style: Option<DocumentStyle>,
    pub attributes: Vec<AttributeSpec>,
}

/// The `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputSettings {
    pub fit_to: Option<FitTo>,
    pub precision: Option<u32>,
    pub explode: Option<bool>,
    pub point_as_circle: Option<bool>,
    pub radius: Option<f64>,
    pub mode: Option<OutputMode>,
    /// Whether the CLI runs the optimizer
    pub optimize: Option<bool>,
    /// Fractional digits the optimizer keeps; defaults to `precision`, then 3
    pub optimize_decimals: Option<u32>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Document style, or the default style
    pub fn document_style(&self) -> DocumentStyle {
        self.style.clone().unwrap_or_default()
    }

    /// Conversion options with unset values at their defaults
    pub fn convert_options(&self) -> ConvertOptions {
        let style = self.document_style();
        let viewport = self
            .viewport
            .unwrap_or_else(|| ScreenDims::new(style.width, style.height));
        let output = &self.output;

        let mut options = ConvertOptions::new(self.extent.unwrap_or_else(Extent::world))
            .with_viewport(viewport.width, viewport.height)
            .with_fit_to(output.fit_to.unwrap_or_default())
            .with_explode(output.explode.unwrap_or(false))
            .with_point_as_circle(output.point_as_circle.unwrap_or(false))
            .with_output_mode(output.mode.unwrap_or_default())
            .with_attributes(self.attributes.clone());
        options.precision = output.precision;
        options.circle_radius = output.radius;
        options
    }
}
