use scene::ProjectionViewState;
use serde_json::Value;

use crate::layer::{Layer, LayerId};
use crate::path::GeoPath;
use crate::shape::{GeoShape, ShapeError};
use crate::shorthand::to_geo_shape;

/// An ordered list of shapes rendered as SVG paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeLayer {
    id: LayerId,
    shapes: Vec<GeoShape>,
    point_radius: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShapeLayerSnapshot {
    /// One entry per shape, in insertion order; empty when nothing is visible.
    pub paths: Vec<String>,
}

impl ShapeLayerSnapshot {
    pub fn visible_count(&self) -> usize {
        self.paths.iter().filter(|d| !d.is_empty()).count()
    }
}

impl ShapeLayer {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            shapes: Vec::new(),
            point_radius: 4.5,
        }
    }

    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn push(&mut self, shape: GeoShape) {
        self.shapes.push(shape);
    }

    /// Accepts the same shorthand forms as [`to_geo_shape`].
    pub fn push_value(&mut self, value: &Value) -> Result<(), ShapeError> {
        self.shapes.push(to_geo_shape(value)?);
        Ok(())
    }

    pub fn shapes(&self) -> &[GeoShape] {
        &self.shapes
    }
}

impl Layer for ShapeLayer {
    type Snapshot = ShapeLayerSnapshot;

    fn id(&self) -> LayerId {
        self.id
    }

    fn extract(&self, view: &ProjectionViewState) -> ShapeLayerSnapshot {
        let path = GeoPath::new(view.projection()).with_point_radius(self.point_radius);
        ShapeLayerSnapshot {
            paths: self.shapes.iter().map(|s| path.render(s)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scene::ProjectionViewState;
    use serde_json::json;

    use super::ShapeLayer;
    use crate::layer::{Layer, LayerId};
    use crate::shape::{GeoShape, ShapeError};

    fn view() -> ProjectionViewState {
        ProjectionViewState {
            extent: [500.0, 500.0],
            scale: 0.8,
            ..ProjectionViewState::default()
        }
    }

    #[test]
    fn extract_renders_shapes_in_order() {
        let mut layer = ShapeLayer::new(7);
        layer.push(GeoShape::Sphere);
        layer.push_value(&json!([0, 0])).unwrap();
        layer.push_value(&json!([180, 0])).unwrap();

        let snapshot = layer.extract(&view());
        assert_eq!(layer.id(), LayerId(7));
        assert_eq!(snapshot.paths.len(), 3);
        assert_eq!(
            snapshot.paths[0],
            "M250,50A200,200 0 1,1 250,450A200,200 0 1,1 250,50Z"
        );
        assert!(snapshot.paths[1].starts_with("M250,250m0,4.5"));
        assert_eq!(snapshot.paths[2], "");
        assert_eq!(snapshot.visible_count(), 2);
    }

    #[test]
    fn extract_follows_view_rotation() {
        let mut layer = ShapeLayer::new(1).with_point_radius(2.0);
        layer.push_value(&json!([180, 0])).unwrap();

        let mut rotated = view();
        rotated.rotation = [180.0, 0.0, 0.0];
        let snapshot = layer.extract(&rotated);
        assert!(snapshot.paths[0].starts_with("M250,250m0,2"));
    }

    #[test]
    fn rejected_shorthand_is_not_added() {
        let mut layer = ShapeLayer::new(1);
        let err = layer.push_value(&json!({"type": "Torus"})).unwrap_err();
        assert_eq!(err, ShapeError::UnknownType("Torus".to_string()));
        assert!(layer.shapes().is_empty());
    }
}
