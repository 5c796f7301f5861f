//! Rendering geometries into SVG markup
//!
//! [`shapes`] projects geometries into paths and circles, [`feature`] attaches
//! attributes and collects per-feature errors, and [`document`] wraps the
//! result in an `<svg>` envelope.

pub mod config;
pub mod document;
pub mod feature;
pub mod shapes;

pub use config::{ConvertOptions, OutputMode, DEFAULT_POINT_RADIUS};
pub use document::{assemble, Document, DocumentStyle};
pub use feature::{Conversion, FeatureRenderer, RenderedFragment};
pub use shapes::{Bounds, GeometryRenderer, Shape};
