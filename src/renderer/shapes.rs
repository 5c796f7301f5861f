//! Geometry rendering: projected path data and circles
//!
//! Degenerate input follows a fixed policy instead of failing the conversion:
//!
//! | input                                   | result                  |
//! |-----------------------------------------|-------------------------|
//! | line string with no coordinates         | nothing                 |
//! | line string with one coordinate         | `Mx,y`                  |
//! | empty multi-geometry or collection      | nothing                 |
//! | polygon without rings                   | nothing                 |
//! | polygon ring with fewer than 3 points   | `TooFewCoordinates`     |
//! | non-finite coordinate                   | `NonFiniteCoordinate`   |
//!
//! Nested geometry collections are walked with an explicit stack, so nesting
//! depth does not grow the call stack.

use crate::error::GeometryError;
use crate::geometry::{Coordinate, Geometry};
use crate::projection::{ExtentMapper, NumberFormat};

use super::config::{ConvertOptions, OutputMode};

/// Minimum coordinates in a polygon ring
const MIN_RING_COORDINATES: usize = 3;

/// Screen-space bounding box of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Bounds {
    pub fn point(c: Coordinate) -> Self {
        Self { min: c, max: c }
    }

    /// Square around a center
    pub fn around(c: Coordinate, r: f64) -> Self {
        Self {
            min: Coordinate::new(c.x - r, c.y - r),
            max: Coordinate::new(c.x + r, c.y + r),
        }
    }

    pub fn include(&mut self, c: Coordinate) {
        self.min.x = self.min.x.min(c.x);
        self.min.y = self.min.y.min(c.y);
        self.max.x = self.max.x.max(c.x);
        self.max.y = self.max.y.max(c.y);
    }

    pub fn union(mut self, other: Bounds) -> Self {
        self.include(other.min);
        self.include(other.max);
        self
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// A rendered primitive in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Path with formatted `d` data
    Path { d: String, bounds: Bounds },
    /// Circle centered on a projected point
    Circle { center: Coordinate, r: f64 },
    /// Shapes sharing one wrapper element
    Group(Vec<Shape>),
}

impl Shape {
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Shape::Path { bounds, .. } => Some(*bounds),
            Shape::Circle { center, r } => Some(Bounds::around(*center, *r)),
            Shape::Group(children) => children
                .iter()
                .filter_map(Shape::bounds)
                .reduce(Bounds::union),
        }
    }

    /// Element markup with `attrs` (already formatted) on the outer element
    pub fn to_svg(&self, attrs: &str, format: &NumberFormat) -> String {
        match self {
            Shape::Path { d, .. } => format!(r#"<path d="{}"{}/>"#, d, attrs),
            Shape::Circle { center, r } => format!(
                r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                format.format(center.x),
                format.format(center.y),
                format.format(*r),
                attrs
            ),
            Shape::Group(children) => {
                let inner: String = children.iter().map(|c| c.to_svg("", format)).collect();
                format!("<g{}>{}</g>", attrs, inner)
            }
        }
    }

    /// Bare path data; circles become marker paths
    pub fn to_path_data(&self, format: &NumberFormat) -> String {
        match self {
            Shape::Path { d, .. } => d.clone(),
            Shape::Circle { center, r } => marker(*center, *r, format),
            Shape::Group(children) => children
                .iter()
                .map(|c| c.to_path_data(format))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Renders geometries into projected shapes
pub struct GeometryRenderer<'a> {
    mapper: &'a ExtentMapper,
    format: NumberFormat,
    explode: bool,
    circles: bool,
    radius: f64,
}

impl<'a> GeometryRenderer<'a> {
    pub fn new(mapper: &'a ExtentMapper, options: &ConvertOptions) -> Self {
        Self {
            mapper,
            format: NumberFormat::new(options.precision),
            explode: options.explode,
            // Circles have no path form, so path output always uses markers
            circles: options.point_as_circle && options.output_mode == OutputMode::Svg,
            radius: options.radius(),
        }
    }

    pub fn format(&self) -> &NumberFormat {
        &self.format
    }

    /// Render a top-level geometry
    pub fn render(&self, geometry: &Geometry) -> Result<Vec<Shape>, GeometryError> {
        self.render_at(geometry, "")
    }

    /// Render a geometry located at `path` inside its source object
    ///
    /// Without `explode` the result holds at most one shape.
    pub fn render_at(&self, geometry: &Geometry, path: &str) -> Result<Vec<Shape>, GeometryError> {
        let mut shapes = vec![];
        let mut stack = vec![(geometry, path.to_string())];

        while let Some((geometry, path)) = stack.pop() {
            match geometry {
                Geometry::GeometryCollection(children) => {
                    // Reversed so children pop in document order
                    for (i, child) in children.iter().enumerate().rev() {
                        stack.push((child, format!("{}[{}]", member(&path, "geometries"), i)));
                    }
                }
                leaf => shapes.extend(self.render_leaf(leaf, &path)?),
            }
        }

        if self.explode {
            Ok(shapes)
        } else {
            Ok(merge(shapes).into_iter().collect())
        }
    }

    fn render_leaf(&self, geometry: &Geometry, path: &str) -> Result<Vec<Shape>, GeometryError> {
        let coords = member(path, "coordinates");
        let shapes = match geometry {
            Geometry::Point(c) => vec![self.point(*c, &coords)?],
            Geometry::MultiPoint(points) => points
                .iter()
                .enumerate()
                .map(|(i, c)| self.point(*c, &index(&coords, i)))
                .collect::<Result<Vec<_>, _>>()?,
            Geometry::LineString(line) => self.line(line, &coords)?.into_iter().collect(),
            Geometry::MultiLineString(lines) => {
                let mut shapes = vec![];
                for (i, line) in lines.iter().enumerate() {
                    shapes.extend(self.line(line, &index(&coords, i))?);
                }
                shapes
            }
            Geometry::Polygon(rings) => self.polygon(rings, &coords)?.into_iter().collect(),
            Geometry::MultiPolygon(polygons) => {
                let mut shapes = vec![];
                for (i, rings) in polygons.iter().enumerate() {
                    shapes.extend(self.polygon(rings, &index(&coords, i))?);
                }
                shapes
            }
            // Expanded by render_at
            Geometry::GeometryCollection(_) => vec![],
        };

        if self.explode {
            Ok(shapes)
        } else {
            Ok(merge(shapes).into_iter().collect())
        }
    }

    fn project(&self, c: Coordinate, path: &str) -> Result<Coordinate, GeometryError> {
        let p = self.mapper.project(c);
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate {
                path: path.to_string(),
            });
        }
        Ok(p)
    }

    fn point(&self, c: Coordinate, path: &str) -> Result<Shape, GeometryError> {
        let center = self.project(c, path)?;
        if self.circles {
            return Ok(Shape::Circle {
                center,
                r: self.radius,
            });
        }
        Ok(Shape::Path {
            d: marker(center, self.radius, &self.format),
            bounds: Bounds::around(center, self.radius),
        })
    }

    fn line(&self, line: &[Coordinate], path: &str) -> Result<Option<Shape>, GeometryError> {
        let mut data = PathData::default();
        self.subpath(&mut data, line, path)?;
        Ok(data.finish())
    }

    fn polygon(&self, rings: &[Vec<Coordinate>], path: &str) -> Result<Option<Shape>, GeometryError> {
        let mut data = PathData::default();
        for (i, ring) in rings.iter().enumerate() {
            let ring_path = index(path, i);
            if ring.len() < MIN_RING_COORDINATES {
                return Err(GeometryError::TooFewCoordinates {
                    path: ring_path,
                    found: ring.len(),
                    required: MIN_RING_COORDINATES,
                });
            }
            self.subpath(&mut data, ring, &ring_path)?;
            data.close();
        }
        Ok(data.finish())
    }

    /// `Mx,y Lx,y ...`, appended as a new subpath
    fn subpath(
        &self,
        data: &mut PathData,
        coords: &[Coordinate],
        path: &str,
    ) -> Result<(), GeometryError> {
        for (i, c) in coords.iter().enumerate() {
            let p = self.project(*c, &index(path, i))?;
            let cmd = if i == 0 { 'M' } else { 'L' };
            data.push(cmd, p, &self.format);
        }
        Ok(())
    }
}

/// Path data under construction
#[derive(Default)]
struct PathData {
    d: String,
    bounds: Option<Bounds>,
}

impl PathData {
    fn push(&mut self, cmd: char, p: Coordinate, format: &NumberFormat) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push(cmd);
        self.d.push_str(&format.pair(p));
        match &mut self.bounds {
            Some(b) => b.include(p),
            None => self.bounds = Some(Bounds::point(p)),
        }
    }

    fn close(&mut self) {
        self.d.push_str(" Z");
    }

    fn finish(self) -> Option<Shape> {
        let bounds = self.bounds?;
        Some(Shape::Path { d: self.d, bounds })
    }
}

/// Circle of radius `r` drawn as two arcs
fn marker(center: Coordinate, r: f64, format: &NumberFormat) -> String {
    let r_str = format.format(r);
    format!(
        "M{} m{},0 a{},{} 0 1,1 {},0 a{},{} 0 1,1 {},0",
        format.pair(center),
        format.format(-r),
        r_str,
        r_str,
        format.format(2.0 * r),
        r_str,
        r_str,
        format.format(-2.0 * r)
    )
}

/// Combine shapes into one: a compound path when every shape is a path,
/// a flat group otherwise
fn merge(shapes: Vec<Shape>) -> Option<Shape> {
    if shapes.len() <= 1 {
        return shapes.into_iter().next();
    }

    if shapes.iter().all(|s| matches!(s, Shape::Path { .. })) {
        let mut ds = Vec::with_capacity(shapes.len());
        let mut bounds: Option<Bounds> = None;
        for shape in shapes {
            if let Shape::Path { d, bounds: b } = shape {
                ds.push(d);
                bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
            }
        }
        return bounds.map(|bounds| Shape::Path {
            d: ds.join(" "),
            bounds,
        });
    }

    let mut flat = vec![];
    for shape in shapes {
        match shape {
            Shape::Group(children) => flat.extend(children),
            other => flat.push(other),
        }
    }
    Some(Shape::Group(flat))
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
