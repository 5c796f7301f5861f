//! Geometry model and the GeoJSON decoding boundary

pub mod decode;
pub mod types;

pub use decode::{decode_feature, decode_geometry, decode_source, from_geojson};
pub use types::*;
