//! Decoding GeoJSON values into the typed geometry model
//!
//! Parsing raw text is the caller's job. Geometry objects are parsed with the
//! `geojson` crate and then converted into [`Geometry`]; the feature and
//! collection envelopes are walked here so that one bad feature does not
//! sink the rest of its collection.

use geojson::{Position, Value as GeoValue};
use serde_json::Value;

use super::types::{Coordinate, Feature, GeoSource, Geometry, Properties};
use crate::error::{ConvertError, GeometryError};

/// Classify a top-level GeoJSON object and decode it
///
/// Features inside a collection are decoded leniently: a bad geometry is kept
/// on its feature as an error instead of failing the whole source.
pub fn decode_source(value: &Value) -> Result<GeoSource, ConvertError> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    match kind {
        "FeatureCollection" => {
            let features = value
                .get("features")
                .ok_or_else(|| GeometryError::MissingMember {
                    path: String::new(),
                    member: "features".to_string(),
                })?
                .as_array()
                .ok_or_else(|| GeometryError::NotAnArray {
                    path: "features".to_string(),
                })?;
            Ok(GeoSource::FeatureCollection(
                features.iter().map(decode_feature).collect(),
            ))
        }
        "Feature" => Ok(GeoSource::Feature(decode_feature(value))),
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon"
        | "MultiPolygon" | "GeometryCollection" => Ok(GeoSource::Geometry(decode_geometry(value)?)),
        other => Err(ConvertError::UnsupportedSource {
            kind: other.to_string(),
        }),
    }
}

/// Decode a GeoJSON feature object
///
/// A `null` or absent geometry becomes [`GeometryError::MissingGeometry`]; a
/// non-object `properties` member is treated as empty.
pub fn decode_feature(value: &Value) -> Feature {
    let properties = value
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Properties::new);

    let geometry = match value.get("geometry") {
        None | Some(Value::Null) => Err(GeometryError::MissingGeometry),
        Some(geometry) => decode_at(geometry, "geometry"),
    };

    Feature {
        geometry,
        properties,
    }
}

/// Decode a GeoJSON geometry object
pub fn decode_geometry(value: &Value) -> Result<Geometry, GeometryError> {
    decode_at(value, "")
}

/// Convert a geometry already parsed by the `geojson` crate
pub fn from_geojson(geometry: &geojson::Geometry) -> Result<Geometry, GeometryError> {
    convert(&geometry.value, "")
}

fn decode_at(value: &Value, path: &str) -> Result<Geometry, GeometryError> {
    let parsed = geojson::Geometry::from_json_value(value.clone())
        .map_err(|e| parse_error(e, path))?;
    convert(&parsed.value, path)
}

fn parse_error(error: geojson::Error, path: &str) -> GeometryError {
    let path = if path.is_empty() { "geometry" } else { path };
    match error {
        geojson::Error::GeometryUnknownType(kind) => GeometryError::UnknownKind { kind },
        geojson::Error::ExpectedProperty(member) => GeometryError::MissingMember {
            path: path.to_string(),
            member,
        },
        geojson::Error::ExpectedF64Value => GeometryError::NonNumericCoordinate {
            path: path.to_string(),
        },
        other => GeometryError::Invalid {
            path: path.to_string(),
            reason: other.to_string(),
        },
    }
}

fn convert(value: &GeoValue, path: &str) -> Result<Geometry, GeometryError> {
    let coords = member(path, "coordinates");
    let geometry = match value {
        GeoValue::Point(p) => Geometry::Point(position(p, &coords)?),
        GeoValue::MultiPoint(points) => Geometry::MultiPoint(positions(points, &coords)?),
        GeoValue::LineString(line) => Geometry::LineString(positions(line, &coords)?),
        GeoValue::MultiLineString(lines) => Geometry::MultiLineString(rings(lines, &coords)?),
        GeoValue::Polygon(polygon) => Geometry::Polygon(rings(polygon, &coords)?),
        GeoValue::MultiPolygon(polygons) => Geometry::MultiPolygon(
            polygons
                .iter()
                .enumerate()
                .map(|(i, polygon)| rings(polygon, &index(&coords, i)))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        GeoValue::GeometryCollection(children) => {
            let members = member(path, "geometries");
            Geometry::GeometryCollection(
                children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| convert(&child.value, &index(&members, i)))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        }
    };
    Ok(geometry)
}

fn rings(parts: &[Vec<Position>], path: &str) -> Result<Vec<Vec<Coordinate>>, GeometryError> {
    parts
        .iter()
        .enumerate()
        .map(|(i, ring)| positions(ring, &index(path, i)))
        .collect()
}

fn positions(points: &[Position], path: &str) -> Result<Vec<Coordinate>, GeometryError> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| position(p, &index(path, i)))
        .collect()
}

/// A GeoJSON position; members past the second (altitude) are ignored
fn position(p: &[f64], path: &str) -> Result<Coordinate, GeometryError> {
    match p {
        [x, y, ..] => Ok(Coordinate::new(*x, *y)),
        _ => Err(GeometryError::TooFewCoordinates {
            path: path.to_string(),
            found: p.len(),
            required: 2,
        }),
    }
}

fn member(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}
