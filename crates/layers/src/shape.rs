use std::fmt;

/// `[lon, lat]` in degrees.
pub type Position = [f64; 2];

/// Renderable geometry on the sphere.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoShape {
    /// The whole sphere; renders as the projection outline.
    Sphere,
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    /// Outer ring followed by holes. Rings are closed (first == last).
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<GeoShape>),
}

impl GeoShape {
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoShape::Sphere => "Sphere",
            GeoShape::Point(_) => "Point",
            GeoShape::MultiPoint(_) => "MultiPoint",
            GeoShape::LineString(_) => "LineString",
            GeoShape::MultiLineString(_) => "MultiLineString",
            GeoShape::Polygon(_) => "Polygon",
            GeoShape::MultiPolygon(_) => "MultiPolygon",
            GeoShape::GeometryCollection(_) => "GeometryCollection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The input does not describe a geometry (wrong JSON kind, bad numbers).
    Invalid(String),
    /// An object carried a `type` this crate does not know.
    UnknownType(String),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Invalid(msg) => write!(f, "invalid shape: {msg}"),
            ShapeError::UnknownType(ty) => write!(f, "unknown shape type: {ty}"),
        }
    }
}

impl std::error::Error for ShapeError {}
