//! Error types for decoding, projection and rendering

use thiserror::Error;

/// Which extent axis an [`ConvertError::InvalidExtent`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "left/right"),
            Axis::Vertical => write!(f, "bottom/top"),
        }
    }
}

/// Errors that abort a whole conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The extent has a zero or non-finite span, so no projection exists
    #[error("invalid extent: {axis} bounds {low} and {high} do not span a finite, non-zero range")]
    InvalidExtent { axis: Axis, low: f64, high: f64 },

    /// The viewport is not a positive, finite size
    #[error("invalid viewport {width}x{height}: both dimensions must be positive and finite")]
    InvalidViewport { width: f64, height: f64 },

    /// Bad attribute specs or document styling, detected before rendering
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A bare geometry or single feature could not be rendered
    #[error("malformed geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// The top-level JSON value is not a geometry, feature or feature collection
    #[error("unsupported GeoJSON object type '{kind}'")]
    UnsupportedSource { kind: String },
}

/// Problems with the render configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{kind} attribute at position {position} has an empty 'property'")]
    EmptyProperty { kind: &'static str, position: usize },

    #[error("'{name}' is not a valid attribute name")]
    InvalidAttributeName { name: String },

    #[error("invalid {field} color '{value}' (expected #rgb or #rrggbb)")]
    InvalidColor { field: &'static str, value: String },

    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("malformed attribute: {reason}")]
    MalformedAttribute { reason: String },

    #[error("invalid {field} '{value}'")]
    InvalidStyleValue { field: &'static str, value: String },
}

/// A geometry that cannot be decoded or rendered
///
/// `path` locates the offending member inside the source object, e.g.
/// `geometry.coordinates[0][3]`. Errors reported by the GeoJSON parser carry
/// the path of the geometry object only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("unknown geometry type '{kind}'")]
    UnknownKind { kind: String },

    #[error("{path}: missing member '{member}'")]
    MissingMember { path: String, member: String },

    #[error("{path}: expected an array")]
    NotAnArray { path: String },

    #[error("{path}: coordinate is not a number")]
    NonNumericCoordinate { path: String },

    #[error("{path}: {found} coordinates, at least {required} required")]
    TooFewCoordinates {
        path: String,
        found: usize,
        required: usize,
    },

    #[error("{path}: coordinate is not finite")]
    NonFiniteCoordinate { path: String },

    #[error("{path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// A geometry error scoped to one feature of a collection
#[derive(Debug, Clone, PartialEq, Error)]
#[error("feature {index}: {error}")]
pub struct FeatureError {
    pub index: usize,
    pub error: GeometryError,
}
