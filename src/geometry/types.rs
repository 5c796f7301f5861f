//! Core types for the geometry model

use serde_json::{Map, Value};

use crate::error::GeometryError;

/// Feature properties, in document order
pub type Properties = Map<String, Value>;

/// A 2D coordinate, in either geographic or screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An ordered ring of coordinates, implicitly closed
pub type Ring = Vec<Coordinate>;

/// A GeoJSON geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    MultiPoint(Vec<Coordinate>),
    LineString(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    /// Outer ring first, holes after
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The GeoJSON `type` name of this geometry
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Build a line string from `(x, y)` pairs
    pub fn line_string(points: &[(f64, f64)]) -> Self {
        Geometry::LineString(points.iter().copied().map(Coordinate::from).collect())
    }

    /// Build a single-ring polygon from `(x, y)` pairs
    pub fn polygon(ring: &[(f64, f64)]) -> Self {
        Geometry::Polygon(vec![ring.iter().copied().map(Coordinate::from).collect()])
    }
}

/// A geometry together with its properties
///
/// `geometry` holds the decode error when the source object carried a missing
/// or malformed geometry; rendering such a feature reports that error.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Result<Geometry, GeometryError>,
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Ok(geometry),
            properties: Properties::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Replace all properties
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

/// Anything the feature renderer accepts
#[derive(Debug, Clone, PartialEq)]
pub enum GeoSource {
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
}

impl From<Geometry> for GeoSource {
    fn from(geometry: Geometry) -> Self {
        GeoSource::Geometry(geometry)
    }
}

impl From<Feature> for GeoSource {
    fn from(feature: Feature) -> Self {
        GeoSource::Feature(feature)
    }
}

impl From<Vec<Feature>> for GeoSource {
    fn from(features: Vec<Feature>) -> Self {
        GeoSource::FeatureCollection(features)
    }
}
