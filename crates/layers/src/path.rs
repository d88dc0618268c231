//! SVG path data for shapes under an orthographic projection.
//!
//! Arcs between vertices follow great circles: each segment is densified and
//! split where it crosses the horizon, with the crossing located by bisection.
//! Rings that cross the horizon are closed along it: each hidden stretch is
//! replaced by the horizon arc it sweeps when pushed radially onto the limb.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use foundation::math::{LonLat, Orthographic, Vec3};
use serde_json::Value;

use crate::shape::{GeoShape, Position, ShapeError};
use crate::shorthand::to_geo_shape;

const BISECT_ITERATIONS: usize = 48;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPath {
    projection: Orthographic,
    point_radius: f64,
    /// Maximum angular distance between emitted samples, in degrees.
    sample_step: f64,
}

/// A maximal visible stretch of a line or ring, in pixels.
#[derive(Debug, Clone, PartialEq)]
struct Run {
    points: Vec<[f64; 2]>,
    closed: bool,
}

impl GeoPath {
    pub fn new(projection: Orthographic) -> Self {
        Self {
            projection,
            point_radius: 4.5,
            sample_step: 2.0,
        }
    }

    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    /// Path data for `shape`; empty when nothing is visible.
    pub fn render(&self, shape: &GeoShape) -> String {
        let mut out = String::new();
        self.write_shape(&mut out, shape);
        out
    }

    /// Convert shorthand and render it in one step.
    pub fn render_value(&self, value: &Value) -> Result<String, ShapeError> {
        Ok(self.render(&to_geo_shape(value)?))
    }

    fn write_shape(&self, out: &mut String, shape: &GeoShape) {
        match shape {
            GeoShape::Sphere => self.write_sphere(out),
            GeoShape::Point(p) => self.write_point(out, *p),
            GeoShape::MultiPoint(points) => {
                for p in points {
                    self.write_point(out, *p);
                }
            }
            GeoShape::LineString(line) => self.write_line(out, line, false),
            GeoShape::MultiLineString(lines) => {
                for line in lines {
                    self.write_line(out, line, false);
                }
            }
            GeoShape::Polygon(rings) => {
                for ring in rings {
                    self.write_line(out, ring, true);
                }
            }
            GeoShape::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.write_line(out, ring, true);
                }
            }
            GeoShape::GeometryCollection(children) => {
                for child in children {
                    self.write_shape(out, child);
                }
            }
        }
    }

    fn write_sphere(&self, out: &mut String) {
        let [cx, cy] = self.projection.center();
        let r = self.projection.scale();
        let _ = write!(
            out,
            "M{},{}A{},{} 0 1,1 {},{}A{},{} 0 1,1 {},{}Z",
            num(cx),
            num(cy - r),
            num(r),
            num(r),
            num(cx),
            num(cy + r),
            num(r),
            num(r),
            num(cx),
            num(cy - r),
        );
    }

    fn write_point(&self, out: &mut String, p: Position) {
        let Some([x, y]) = self.projection.project(LonLat::from(p)) else {
            return;
        };
        if !self.projection.in_clip_extent([x, y]) {
            return;
        }
        let r = self.point_radius;
        let _ = write!(
            out,
            "M{},{}m0,{}a{},{} 0 1,1 0,{}a{},{} 0 1,1 0,{}z",
            num(x),
            num(y),
            num(r),
            num(r),
            num(r),
            num(-2.0 * r),
            num(r),
            num(r),
            num(2.0 * r),
        );
    }

    fn write_line(&self, out: &mut String, coords: &[Position], closed: bool) {
        for run in self.visible_runs(coords, closed) {
            for (i, [x, y]) in run.points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(out, "{cmd}{},{}", num(*x), num(*y));
            }
            if run.closed {
                out.push('Z');
            }
        }
    }

    fn visible_runs(&self, coords: &[Position], closed: bool) -> Vec<Run> {
        let mut vertices: Vec<Vec3> = coords
            .iter()
            .map(|p| LonLat::from(*p).to_cartesian())
            .collect();
        if closed && vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.is_empty() {
            return Vec::new();
        }

        let samples = self.densify(&vertices, closed);
        let visible: Vec<bool> = samples.iter().map(|v| self.is_visible(*v)).collect();

        if visible.iter().all(|v| *v) {
            return vec![Run {
                points: samples.iter().map(|v| self.project(*v)).collect(),
                closed: closed && samples.len() > 2,
            }];
        }
        if !visible.iter().any(|v| *v) {
            return Vec::new();
        }

        if closed {
            return self.stitched_ring(&samples, &visible).into_iter().collect();
        }

        let mut runs = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        if visible[0] {
            current.push(self.project(samples[0]));
        }
        for idx in 1..samples.len() {
            let prev = idx - 1;
            match (visible[prev], visible[idx]) {
                (true, true) => current.push(self.project(samples[idx])),
                (false, true) => {
                    let edge = self.horizon(samples[idx], samples[prev]);
                    current.push(self.project(edge));
                    current.push(self.project(samples[idx]));
                }
                (true, false) => {
                    let edge = self.horizon(samples[prev], samples[idx]);
                    current.push(self.project(edge));
                    runs.push(Run {
                        points: std::mem::take(&mut current),
                        closed: false,
                    });
                }
                (false, false) => {}
            }
        }
        if current.len() > 1 {
            runs.push(Run {
                points: current,
                closed: false,
            });
        }
        runs
    }

    /// One closed run for a ring that is partly visible.
    ///
    /// The walk starts where the ring leaves the visible hemisphere, so every
    /// hidden stretch lies between an exit and the following entry.
    fn stitched_ring(&self, samples: &[Vec3], visible: &[bool]) -> Option<Run> {
        let n = samples.len();
        let first = (0..n).find(|&i| visible[(i + n - 1) % n] && !visible[i])?;

        let exit = self.horizon(samples[(first + n - 1) % n], samples[first]);
        let mut points = vec![self.project(exit)];
        let mut arc = LimbArc::new(self.bearing(exit));
        arc.follow(self.bearing(samples[first]));

        for step in 1..n {
            let (prev, idx) = ((first + step - 1) % n, (first + step) % n);
            match (visible[prev], visible[idx]) {
                (false, false) => arc.follow(self.bearing(samples[idx])),
                (false, true) => {
                    let entry = self.horizon(samples[idx], samples[prev]);
                    arc.follow(self.bearing(entry));
                    self.push_arc(&mut points, &arc);
                    points.push(self.project(entry));
                    points.push(self.project(samples[idx]));
                }
                (true, true) => points.push(self.project(samples[idx])),
                (true, false) => {
                    let exit = self.horizon(samples[prev], samples[idx]);
                    points.push(self.project(exit));
                    arc = LimbArc::new(self.bearing(exit));
                    arc.follow(self.bearing(samples[idx]));
                }
            }
        }

        Some(Run {
            points,
            closed: true,
        })
    }

    /// Interior points of `arc` on the horizon circle; endpoints excluded.
    fn push_arc(&self, points: &mut Vec<[f64; 2]>, arc: &LimbArc) {
        let [cx, cy] = self.projection.center();
        let r = self.projection.scale();
        let parts = (arc.sweep.abs() / self.sample_step.to_radians())
            .ceil()
            .max(1.0) as usize;
        for k in 1..parts {
            let theta = arc.start + arc.sweep * k as f64 / parts as f64;
            points.push([cx + r * theta.cos(), cy + r * theta.sin()]);
        }
    }

    /// Pixel bearing of `v` around the projection center, in radians.
    fn bearing(&self, v: Vec3) -> f64 {
        let [x, y] = self.project(v);
        let [cx, cy] = self.projection.center();
        (y - cy).atan2(x - cx)
    }

    /// Vertices plus interior great-circle samples; closed rings also get the
    /// closing segment's interior samples (but no duplicate end vertex).
    fn densify(&self, vertices: &[Vec3], closed: bool) -> Vec<Vec3> {
        let mut samples = Vec::with_capacity(vertices.len());
        let segment_count = if closed {
            vertices.len()
        } else {
            vertices.len() - 1
        };
        for i in 0..segment_count {
            let (a, b) = (vertices[i], vertices[(i + 1) % vertices.len()]);
            let angle = a.dot(b).clamp(-1.0, 1.0).acos().to_degrees();
            let parts = (angle / self.sample_step).ceil().max(1.0) as usize;
            samples.push(a);
            for k in 1..parts {
                samples.push(lerp(a, b, k as f64 / parts as f64));
            }
        }
        if !closed {
            samples.extend(vertices.last().copied());
        }
        samples
    }

    /// Point on the great circle between `visible` and `hidden` that lies on
    /// the horizon (from the visible side).
    fn horizon(&self, visible: Vec3, hidden: Vec3) -> Vec3 {
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..BISECT_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.is_visible(lerp(visible, hidden, mid)) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lerp(visible, hidden, lo)
    }

    fn is_visible(&self, v: Vec3) -> bool {
        self.projection.depth(LonLat::from_cartesian(v)) >= 0.0
    }

    fn project(&self, v: Vec3) -> [f64; 2] {
        self.projection.project_unclipped(LonLat::from_cartesian(v))
    }
}

/// Signed angle swept around the projection center by a hidden stretch.
#[derive(Debug, Copy, Clone)]
struct LimbArc {
    start: f64,
    last: f64,
    sweep: f64,
}

impl LimbArc {
    fn new(start: f64) -> Self {
        Self {
            start,
            last: start,
            sweep: 0.0,
        }
    }

    fn follow(&mut self, bearing: f64) {
        self.sweep += (bearing - self.last + PI).rem_euclid(TAU) - PI;
        self.last = bearing;
    }
}

/// Normalized chord interpolation; stays on the great circle through `a`, `b`.
fn lerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    (a.scale(1.0 - t) + b.scale(t)).normalize()
}

/// Round to 1/1000 px and fold negative zero.
fn num(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use foundation::math::Orthographic;
    use serde_json::json;

    use super::GeoPath;
    use crate::shape::GeoShape;

    fn path() -> GeoPath {
        GeoPath::new(Orthographic::new([0.0, 0.0, 0.0], 100.0, [250.0, 250.0]))
    }

    fn last_point(d: &str) -> (f64, f64) {
        let tail = d.rsplit(['M', 'L']).next().unwrap().trim_end_matches('Z');
        let (x, y) = tail.split_once(',').unwrap();
        (x.parse().unwrap(), y.parse().unwrap())
    }

    fn points(d: &str) -> Vec<(f64, f64)> {
        d.split(['M', 'L', 'Z'])
            .filter(|s| !s.is_empty())
            .map(|s| {
                let (x, y) = s.split_once(',').unwrap();
                (x.parse().unwrap(), y.parse().unwrap())
            })
            .collect()
    }

    #[test]
    fn sphere_renders_outline_circle() {
        assert_eq!(
            path().render(&GeoShape::Sphere),
            "M250,150A100,100 0 1,1 250,350A100,100 0 1,1 250,150Z"
        );
    }

    #[test]
    fn visible_point_renders_marker_and_hidden_point_does_not() {
        assert_eq!(
            path().render(&GeoShape::Point([0.0, 0.0])),
            "M250,250m0,4.5a4.5,4.5 0 1,1 0,-9a4.5,4.5 0 1,1 0,9z"
        );
        assert_eq!(path().render(&GeoShape::Point([180.0, 0.0])), "");
    }

    #[test]
    fn points_outside_clip_extent_are_skipped() {
        let projection = Orthographic::new([0.0, 0.0, 0.0], 100.0, [250.0, 250.0])
            .with_clip_extent([[0.0, 0.0], [300.0, 300.0]]);
        let p = GeoPath::new(projection);
        assert_eq!(p.render(&GeoShape::Point([80.0, 0.0])), "");
        assert!(!p.render(&GeoShape::Point([0.0, 0.0])).is_empty());
    }

    #[test]
    fn visible_line_is_densified_along_great_circle() {
        let d = path().render(&GeoShape::LineString(vec![[-80.0, 0.0], [80.0, 0.0]]));
        assert!(d.starts_with('M'));
        assert_eq!(d.matches('M').count(), 1);
        assert!(d.matches('L').count() > 10);
        let (x, y) = last_point(&d);
        assert!((x - 348.481).abs() < 1e-3, "x = {x}");
        assert_eq!(y, 250.0);
    }

    #[test]
    fn line_is_cut_at_the_horizon() {
        let d = path().render(&GeoShape::LineString(vec![[60.0, 0.0], [120.0, 0.0]]));
        assert_eq!(d.matches('M').count(), 1);
        let (x, y) = last_point(&d);
        assert!((x - 350.0).abs() < 1e-3, "x = {x}");
        assert_eq!(y, 250.0);
    }

    #[test]
    fn hidden_line_renders_nothing() {
        let d = path().render(&GeoShape::LineString(vec![[120.0, 0.0], [150.0, 10.0]]));
        assert!(d.is_empty());
    }

    #[test]
    fn visible_ring_closes_as_drawn() {
        let d = path()
            .render_value(&json!([[[0, 0], [10, 0], [10, 10], [0, 0]]]))
            .unwrap();
        assert_eq!(d.matches('M').count(), 1);
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn straddling_ring_is_closed_along_the_horizon() {
        let d = path()
            .render_value(&json!([[[60, -10], [120, -10], [120, 10], [60, 10], [60, -10]]]))
            .unwrap();
        assert_eq!(d.matches('M').count(), 1);
        assert!(d.ends_with('Z'));

        let pts = points(&d);
        let on_limb: Vec<_> = pts
            .iter()
            .filter(|(x, y)| ((x - 250.0).hypot(y - 250.0) - 100.0).abs() < 2e-3)
            .collect();
        assert!(on_limb.len() >= 4, "{} limb points", on_limb.len());
        for (x, y) in &pts {
            assert!((x - 250.0).hypot(y - 250.0) <= 100.0 + 2e-3);
            assert!(*x > 250.0, "({x}, {y}) left of center");
        }
    }

    #[test]
    fn circle_past_the_horizon_takes_the_short_way_round() {
        let p = GeoPath::new(Orthographic::new([-100.0, 0.0, 0.0], 100.0, [250.0, 250.0]));
        let d = p
            .render_value(&json!({"type": "Circle", "radius": 30}))
            .unwrap();
        assert_eq!(d.matches('M').count(), 1);
        assert!(d.ends_with('Z'));

        let pts = points(&d);
        assert!(pts.iter().any(|(x, y)| ((x - 250.0).hypot(y - 250.0) - 100.0).abs() < 2e-3));
        for (x, y) in &pts {
            assert!((x - 250.0).hypot(y - 250.0) <= 100.0 + 2e-3);
            assert!(*x < 210.0, "({x}, {y}) strays from the left limb");
        }
    }

    #[test]
    fn collection_renders_every_child() {
        let d = path().render(&GeoShape::GeometryCollection(vec![
            GeoShape::Point([0.0, 0.0]),
            GeoShape::Sphere,
        ]));
        assert_eq!(d.matches('M').count(), 2);
    }
}
