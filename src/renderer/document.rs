//! SVG document envelope around rendered fragments

use serde::Deserialize;

use crate::attributes::escape_xml;
use crate::error::{ConfigError, FeatureError};

use super::feature::RenderedFragment;

const LINECAPS: [&str; 3] = ["butt", "round", "square"];
const LINEJOINS: [&str; 5] = ["arcs", "bevel", "miter", "miter-clip", "round"];

/// Styling and dimensions of the output document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocumentStyle {
    /// Document width in pixels
    pub width: f64,

    /// Document height in pixels
    pub height: f64,

    /// Default fill color
    pub fill: String,

    /// Default stroke color
    pub stroke: String,

    /// Default stroke width
    pub stroke_width: f64,

    pub stroke_linecap: String,

    pub stroke_linejoin: String,

    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to put each fragment on its own indented line
    pub pretty_print: bool,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 250.0,
            fill: "#7c7c7c".to_string(),
            stroke: "#ffffff".to_string(),
            stroke_width: 0.1,
            stroke_linecap: "round".to_string(),
            stroke_linejoin: "round".to_string(),
            standalone: true,
            pretty_print: true,
        }
    }
}

impl DocumentStyle {
    /// Create a new style with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document size in pixels
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the default fill color
    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = color.into();
        self
    }

    /// Set the default stroke color
    pub fn with_stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = color.into();
        self
    }

    /// Set the default stroke width
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// Set whether to include the XML declaration
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print the output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Check every value written into the `<svg>` root
    ///
    /// Colors must be `#rgb` or `#rrggbb`, sizes positive and finite, the
    /// stroke width non-negative, and line caps and joins SVG keywords.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("fill", &self.fill), ("stroke", &self.stroke)] {
            if !is_hex_color(value) {
                return Err(ConfigError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }

        let numbers = [
            ("width", self.width, self.width > 0.0),
            ("height", self.height, self.height > 0.0),
            ("stroke-width", self.stroke_width, self.stroke_width >= 0.0),
        ];
        for (field, value, in_range) in numbers {
            if !(value.is_finite() && in_range) {
                return Err(ConfigError::InvalidStyleValue {
                    field,
                    value: value.to_string(),
                });
            }
        }

        let keywords = [
            ("stroke-linecap", &self.stroke_linecap, &LINECAPS[..]),
            ("stroke-linejoin", &self.stroke_linejoin, &LINEJOINS[..]),
        ];
        for (field, value, allowed) in keywords {
            if !allowed.contains(&value.as_str()) {
                return Err(ConfigError::InvalidStyleValue {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    fn newline(&self) -> &str {
        if self.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn indent(&self) -> &str {
        if self.pretty_print {
            "  "
        } else {
            ""
        }
    }
}

/// A finished SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub svg: String,
    /// Features left out of the document
    pub diagnostics: Vec<FeatureError>,
}

/// Wrap fragments in an `<svg>` root element
///
/// String style values are escaped; call [`DocumentStyle::validate`] first to
/// reject them instead.
pub fn assemble(fragments: &[RenderedFragment], style: &DocumentStyle) -> String {
    let nl = style.newline();
    let mut svg = String::new();

    if style.standalone {
        svg.push_str(r#"<?xml version="1.0"?>"#);
        svg.push_str(nl);
    }

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" fill="{}" width="{}" height="{}" stroke="{}" stroke-linecap="{}" stroke-linejoin="{}" stroke-width="{}" viewBox="0 0 {} {}">"#,
        escape_xml(&style.fill),
        style.width,
        style.height,
        escape_xml(&style.stroke),
        escape_xml(&style.stroke_linecap),
        escape_xml(&style.stroke_linejoin),
        style.stroke_width,
        style.width,
        style.height
    ));
    svg.push_str(nl);

    for fragment in fragments {
        svg.push_str(style.indent());
        svg.push_str(&fragment.markup);
        svg.push_str(nl);
    }

    svg.push_str("</svg>");
    svg.push_str(nl);
    svg
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
