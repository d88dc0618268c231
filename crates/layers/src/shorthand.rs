//! Shorthand → geometry conversion.
//!
//! Accepted inputs:
//! - Bare coordinate arrays, where nesting depth picks the kind:
//!   1 → Point, 2 → LineString, 3 → Polygon, 4 → GeometryCollection of polygons.
//! - A bare type string such as `"Sphere"` or `"Graticule"`.
//! - GeoJSON geometry objects, features and feature collections.
//! - `{"type": "Circle", center, radius, precision}`.
//! - `{"type": "Graticule", extent, extentMajor, extentMinor, step, stepMajor,
//!   stepMinor, precision, lines, outline}`.

use serde_json::{Map, Value};

use crate::generators::{Circle, Graticule};
use crate::shape::{GeoShape, Position, ShapeError};

pub fn to_geo_shape(value: &Value) -> Result<GeoShape, ShapeError> {
    match value {
        Value::Array(items) => from_nested_array(items),
        Value::String(ty) => from_object(ty, &Map::new()),
        Value::Object(obj) => {
            let ty = obj
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| ShapeError::Invalid("object without a string `type`".to_string()))?;
            from_object(ty, obj)
        }
        other => Err(ShapeError::Invalid(format!("unsupported value: {other}"))),
    }
}

/// Nesting depth of the first element chain: `[x, y]` is 1, `[[x, y]]` is 2.
fn depth(items: &[Value]) -> usize {
    match items.first() {
        Some(Value::Array(inner)) => 1 + depth(inner),
        _ => 1,
    }
}

fn from_nested_array(items: &[Value]) -> Result<GeoShape, ShapeError> {
    if items.is_empty() {
        return Err(ShapeError::Invalid("empty coordinate array".to_string()));
    }
    match depth(items) {
        1 => Ok(GeoShape::Point(position(items)?)),
        2 => Ok(GeoShape::LineString(positions(items)?)),
        3 => Ok(GeoShape::Polygon(rings(items)?)),
        _ => items
            .iter()
            .map(to_geo_shape)
            .collect::<Result<Vec<_>, _>>()
            .map(GeoShape::GeometryCollection),
    }
}

fn from_object(ty: &str, obj: &Map<String, Value>) -> Result<GeoShape, ShapeError> {
    match ty {
        "Sphere" => Ok(GeoShape::Sphere),
        "Point" => Ok(GeoShape::Point(position(coordinates(obj)?)?)),
        "MultiPoint" => Ok(GeoShape::MultiPoint(positions(coordinates(obj)?)?)),
        "LineString" => Ok(GeoShape::LineString(positions(coordinates(obj)?)?)),
        "MultiLineString" => Ok(GeoShape::MultiLineString(rings(coordinates(obj)?)?)),
        "Polygon" => Ok(GeoShape::Polygon(rings(coordinates(obj)?)?)),
        "MultiPolygon" => coordinates(obj)?
            .iter()
            .map(|p| rings(as_array(p)?))
            .collect::<Result<Vec<_>, _>>()
            .map(GeoShape::MultiPolygon),
        "GeometryCollection" => {
            // Standard GeoJSON uses `geometries`; the array shorthand nests
            // child shapes under `coordinates`.
            let children = obj
                .get("geometries")
                .or_else(|| obj.get("coordinates"))
                .ok_or_else(|| ShapeError::Invalid("collection without geometries".to_string()))?;
            as_array(children)?
                .iter()
                .map(to_geo_shape)
                .collect::<Result<Vec<_>, _>>()
                .map(GeoShape::GeometryCollection)
        }
        "Feature" => match obj.get("geometry") {
            Some(Value::Null) | None => Ok(GeoShape::GeometryCollection(Vec::new())),
            Some(geometry) => to_geo_shape(geometry),
        },
        "FeatureCollection" => {
            let features = obj
                .get("features")
                .ok_or_else(|| ShapeError::Invalid("feature collection without features".to_string()))?;
            as_array(features)?
                .iter()
                .map(to_geo_shape)
                .collect::<Result<Vec<_>, _>>()
                .map(GeoShape::GeometryCollection)
        }
        "Circle" => Ok(circle_from_options(obj)?.polygon()),
        "Graticule" => {
            let graticule = graticule_from_options(obj)?;
            if truthy(obj.get("lines")) {
                Ok(GeoShape::MultiLineString(graticule.lines()))
            } else if truthy(obj.get("outline")) {
                Ok(graticule.outline_polygon())
            } else {
                Ok(graticule.multi_line_string())
            }
        }
        other => Err(ShapeError::UnknownType(other.to_string())),
    }
}

fn circle_from_options(obj: &Map<String, Value>) -> Result<Circle, ShapeError> {
    let mut circle = Circle::default();
    if let Some(v) = option(obj, "center") {
        circle.center = position(as_array(v)?)?;
    }
    if let Some(v) = option(obj, "radius") {
        circle.radius = number(v)?;
    }
    if let Some(v) = option(obj, "precision") {
        circle.precision = number(v)?;
    }
    Ok(circle)
}

fn graticule_from_options(obj: &Map<String, Value>) -> Result<Graticule, ShapeError> {
    let mut graticule = Graticule::default();
    if let Some(v) = option(obj, "extent") {
        graticule = graticule.with_extent(extent(v)?);
    }
    if let Some(v) = option(obj, "extentMajor") {
        graticule.extent_major = extent(v)?;
    }
    if let Some(v) = option(obj, "extentMinor") {
        graticule.extent_minor = extent(v)?;
    }
    if let Some(v) = option(obj, "step") {
        graticule.step_minor = position(as_array(v)?)?;
    }
    if let Some(v) = option(obj, "stepMajor") {
        graticule.step_major = position(as_array(v)?)?;
    }
    if let Some(v) = option(obj, "stepMinor") {
        graticule.step_minor = position(as_array(v)?)?;
    }
    if let Some(v) = option(obj, "precision") {
        graticule.precision = number(v)?;
    }
    Ok(graticule)
}

/// Options only apply when present and truthy, so `0`, `false` and `null`
/// keep the generator default.
fn option<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| truthy(Some(v)))
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn coordinates(obj: &Map<String, Value>) -> Result<&[Value], ShapeError> {
    let coords = obj
        .get("coordinates")
        .ok_or_else(|| ShapeError::Invalid("missing `coordinates`".to_string()))?;
    as_array(coords)
}

fn as_array(value: &Value) -> Result<&[Value], ShapeError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ShapeError::Invalid(format!("expected an array, got {value}")))
}

fn number(value: &Value) -> Result<f64, ShapeError> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ShapeError::Invalid(format!("expected a number, got {value}")))
}

/// `[lon, lat, ...]`; extra members (altitude) are ignored.
fn position(items: &[Value]) -> Result<Position, ShapeError> {
    match items {
        [lon, lat, ..] => Ok([number(lon)?, number(lat)?]),
        _ => Err(ShapeError::Invalid(format!(
            "position needs two numbers, got {} values",
            items.len()
        ))),
    }
}

fn positions(items: &[Value]) -> Result<Vec<Position>, ShapeError> {
    items.iter().map(|p| position(as_array(p)?)).collect()
}

fn rings(items: &[Value]) -> Result<Vec<Vec<Position>>, ShapeError> {
    items.iter().map(|r| positions(as_array(r)?)).collect()
}

fn extent(value: &Value) -> Result<[Position; 2], ShapeError> {
    match as_array(value)? {
        [min, max] => Ok([position(as_array(min)?)?, position(as_array(max)?)?]),
        other => Err(ShapeError::Invalid(format!(
            "extent needs two corners, got {}",
            other.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::to_geo_shape;
    use crate::generators::{Circle, Graticule};
    use crate::shape::{GeoShape, ShapeError};

    #[test]
    fn nesting_depth_selects_kind() {
        assert_eq!(
            to_geo_shape(&json!([10, 20])).unwrap(),
            GeoShape::Point([10.0, 20.0])
        );
        assert_eq!(
            to_geo_shape(&json!([[0, 0], [10, 10]])).unwrap(),
            GeoShape::LineString(vec![[0.0, 0.0], [10.0, 10.0]])
        );
        let square = json!([[[0, 0], [10, 0], [10, 10], [0, 0]]]);
        assert_eq!(
            to_geo_shape(&square).unwrap(),
            GeoShape::Polygon(vec![vec![
                [0.0, 0.0],
                [10.0, 0.0],
                [10.0, 10.0],
                [0.0, 0.0]
            ]])
        );
    }

    #[test]
    fn four_levels_become_collection_of_polygons() {
        let value = json!([
            [[[0, 0], [1, 0], [1, 1], [0, 0]]],
            [[[5, 5], [6, 5], [6, 6], [5, 5]]]
        ]);
        let GeoShape::GeometryCollection(children) = to_geo_shape(&value).unwrap() else {
            panic!("expected a collection");
        };
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| matches!(c, GeoShape::Polygon(_))));
    }

    #[test]
    fn bare_type_string_is_expanded() {
        assert_eq!(to_geo_shape(&json!("Sphere")).unwrap(), GeoShape::Sphere);
        assert_eq!(
            to_geo_shape(&json!("Graticule")).unwrap(),
            Graticule::default().multi_line_string()
        );
    }

    #[test]
    fn circle_options_are_applied() {
        let shape = to_geo_shape(&json!({
            "type": "Circle",
            "center": [20, 10],
            "radius": 5,
            "precision": 0
        }))
        .unwrap();
        let expected = Circle {
            center: [20.0, 10.0],
            radius: 5.0,
            ..Circle::default()
        }
        .polygon();
        assert_eq!(shape, expected);
    }

    #[test]
    fn graticule_outline_and_lines_flags() {
        let outline = to_geo_shape(&json!({"type": "Graticule", "outline": true})).unwrap();
        assert_eq!(outline, Graticule::default().outline_polygon());

        let lines = to_geo_shape(&json!({"type": "Graticule", "lines": true, "step": [30, 30]}))
            .unwrap();
        let GeoShape::MultiLineString(lines) = lines else {
            panic!("expected lines");
        };
        let graticule = Graticule {
            step_minor: [30.0, 30.0],
            ..Graticule::default()
        };
        assert_eq!(lines, graticule.lines());
    }

    #[test]
    fn geojson_objects_pass_through() {
        let feature = json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "MultiPoint", "coordinates": [[1, 2], [3, 4, 100]]}
        });
        assert_eq!(
            to_geo_shape(&feature).unwrap(),
            GeoShape::MultiPoint(vec![[1.0, 2.0], [3.0, 4.0]])
        );

        let collection = json!({
            "type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [0, 0]}, "Sphere"]
        });
        assert_eq!(
            to_geo_shape(&collection).unwrap(),
            GeoShape::GeometryCollection(vec![GeoShape::Point([0.0, 0.0]), GeoShape::Sphere])
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            to_geo_shape(&json!([])),
            Err(ShapeError::Invalid(_))
        ));
        assert!(matches!(
            to_geo_shape(&json!(["a", 1])),
            Err(ShapeError::Invalid(_))
        ));
        assert_eq!(
            to_geo_shape(&json!({"type": "Hexagon"})),
            Err(ShapeError::UnknownType("Hexagon".to_string()))
        );
        assert!(matches!(to_geo_shape(&json!(42)), Err(ShapeError::Invalid(_))));
    }
}
