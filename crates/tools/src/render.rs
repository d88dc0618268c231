use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use layers::vector::ShapeLayer;
use layers::Layer;
use scene::ProjectionViewState;
use serde_json::Value;

use crate::error::ScriptError;

/// Build a layer from a JSON document holding one shape or an array of them.
///
/// A top-level array whose first element is itself a shape (object or type
/// name) is treated as a list; any other array is a single coordinate shape.
pub fn shape_layer_from_json(payload: &str) -> Result<ShapeLayer, ScriptError> {
    let value: Value = serde_json::from_str(payload)?;
    let mut layer = ShapeLayer::new(0);
    match &value {
        Value::Array(items) if items.first().is_some_and(|v| v.is_object() || v.is_string()) => {
            for item in items {
                layer.push_value(item)?;
            }
        }
        _ => layer.push_value(&value)?,
    }
    Ok(layer)
}

pub fn load_shape_layer(path: impl AsRef<Path>) -> Result<ShapeLayer, ScriptError> {
    shape_layer_from_json(&fs::read_to_string(path.as_ref())?)
}

/// Standalone SVG document with one `<path>` per visible shape.
pub fn render_svg(layer: &ShapeLayer, view: &ProjectionViewState) -> String {
    let snapshot = layer.extract(view);
    let [w, h] = view.extent;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for (shape, d) in layer.shapes().iter().zip(&snapshot.paths) {
        if d.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            r#"  <path class="{}" d="{d}"/>"#,
            shape.type_name().to_ascii_lowercase()
        );
    }
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use scene::ProjectionViewState;

    use super::{render_svg, shape_layer_from_json};
    use crate::error::ScriptError;

    fn view() -> ProjectionViewState {
        ProjectionViewState {
            extent: [500.0, 500.0],
            ..ProjectionViewState::default()
        }
    }

    #[test]
    fn list_of_shapes_becomes_one_path_each() {
        let layer = shape_layer_from_json(
            r#"["Sphere", {"type": "Graticule"}, {"type": "Point", "coordinates": [0, 0]}]"#,
        )
        .unwrap();
        assert_eq!(layer.shapes().len(), 3);

        let svg = render_svg(&layer, &view());
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="500""#));
        assert_eq!(svg.matches("<path ").count(), 3);
        assert!(svg.contains(r#"class="sphere" d="M250,10A240,240"#));
        assert!(svg.contains(r#"class="multilinestring""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn coordinate_array_is_a_single_shape() {
        let layer = shape_layer_from_json("[[0, 0], [10, 10]]").unwrap();
        assert_eq!(layer.shapes().len(), 1);
        assert_eq!(layer.shapes()[0].type_name(), "LineString");
    }

    #[test]
    fn hidden_shapes_are_left_out() {
        let layer = shape_layer_from_json("[180, 0]").unwrap();
        let svg = render_svg(&layer, &view());
        assert_eq!(svg.matches("<path ").count(), 0);
    }

    #[test]
    fn bad_shape_surfaces_as_shape_error() {
        let err = shape_layer_from_json(r#"[{"type": "Torus"}]"#).unwrap_err();
        assert!(matches!(err, ScriptError::Shape(_)));
    }
}
