//! Circle and graticule generators.

use std::f64::consts::TAU;

use foundation::math::{LonLat, Rotation, Vec3};

use crate::shape::{GeoShape, Position};

const EPS: f64 = 1e-6;

/// Smallest accepted sampling step in degrees.
const MIN_PRECISION: f64 = 0.01;

/// Small circle of angular `radius` around `center`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub center: Position,
    /// Angular radius in degrees.
    pub radius: f64,
    /// Angular step between ring vertices in degrees.
    pub precision: f64,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            radius: 90.0,
            precision: 6.0,
        }
    }
}

impl Circle {
    /// Closed ring, counter-clockwise as seen from outside the sphere.
    pub fn ring(&self) -> Vec<Position> {
        let rotation = Rotation::new([-self.center[0], -self.center[1], 0.0]);
        let r = self.radius.to_radians();
        let step = self.precision.max(MIN_PRECISION).to_radians();
        let (cos_r, sin_r) = (r.cos(), r.sin());

        let mut ring = Vec::new();
        let end = r - step / 2.0;
        let mut t = r + TAU;
        while t > end {
            let p = LonLat::from_cartesian(Vec3::new(cos_r, -sin_r * t.cos(), -sin_r * t.sin()));
            ring.push(rotation.invert(p).to_array());
            t -= step;
        }
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last_mut()) {
            *last = first;
        }
        ring
    }

    pub fn polygon(&self) -> GeoShape {
        GeoShape::Polygon(vec![self.ring()])
    }
}

/// Meridian and parallel grid.
///
/// Minor lines are drawn every `step_minor` within `extent_minor`; major
/// meridians every `step_major[0]` span `extent_major`, which by default
/// reaches (almost) to the poles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Graticule {
    pub extent_major: [Position; 2],
    pub extent_minor: [Position; 2],
    pub step_major: [f64; 2],
    pub step_minor: [f64; 2],
    /// Sampling step along parallels in degrees.
    pub precision: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            extent_major: [[-180.0, -90.0 + EPS], [180.0, 90.0 - EPS]],
            extent_minor: [[-180.0, -80.0 - EPS], [180.0, 80.0 + EPS]],
            step_major: [90.0, 360.0],
            step_minor: [10.0, 10.0],
            precision: 2.5,
        }
    }
}

impl Graticule {
    /// Set both extents.
    pub fn with_extent(mut self, extent: [Position; 2]) -> Self {
        self.extent_major = extent;
        self.extent_minor = extent;
        self
    }

    pub fn lines(&self) -> Vec<Vec<Position>> {
        let [[x0_major, y0_major], [x1_major, y1_major]] = self.extent_major;
        let [[x0, y0], [x1, y1]] = self.extent_minor;
        let [dx_major, dy_major] = self.step_major.map(clamp_step);
        let [dx, dy] = self.step_minor.map(clamp_step);
        let precision = self.precision.max(MIN_PRECISION);

        let mut lines = Vec::new();
        for x in range(first_multiple(x0_major, dx_major), x1_major, dx_major) {
            lines.push(meridian(x, y0_major, y1_major));
        }
        for y in range(first_multiple(y0_major, dy_major), y1_major, dy_major) {
            lines.push(parallel(y, x0_major, x1_major, precision));
        }
        for x in range(first_multiple(x0, dx), x1, dx) {
            if (x % dx_major).abs() > EPS {
                lines.push(meridian(x, y0, y1));
            }
        }
        for y in range(first_multiple(y0, dy), y1, dy) {
            if (y % dy_major).abs() > EPS {
                lines.push(parallel(y, x0, x1, precision));
            }
        }
        lines
    }

    /// Boundary of the major extent as a single closed ring.
    pub fn outline(&self) -> Vec<Position> {
        let [[x0, y0], [x1, y1]] = self.extent_major;
        let precision = self.precision.max(MIN_PRECISION);

        let mut ring = meridian(x0, y0, y1);
        ring.extend(parallel(y1, x0, x1, precision).into_iter().skip(1));
        ring.extend(meridian(x1, y0, y1).into_iter().rev().skip(1));
        ring.extend(parallel(y0, x0, x1, precision).into_iter().rev().skip(1));
        ring
    }

    pub fn multi_line_string(&self) -> GeoShape {
        GeoShape::MultiLineString(self.lines())
    }

    pub fn outline_polygon(&self) -> GeoShape {
        GeoShape::Polygon(vec![self.outline()])
    }
}

/// Positive steps are held at `MIN_PRECISION`; others still yield no lines.
fn clamp_step(step: f64) -> f64 {
    if step > 0.0 { step.max(MIN_PRECISION) } else { step }
}

fn first_multiple(start: f64, step: f64) -> f64 {
    (start / step).ceil() * step
}

/// `start, start + step, ...` strictly below `stop`.
fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Meridians are great circles, so coarse latitude samples suffice.
fn meridian(x: f64, y0: f64, y1: f64) -> Vec<Position> {
    let mut ys = range(y0, y1 - EPS, 90.0);
    ys.push(y1);
    ys.into_iter().map(|y| [x, y]).collect()
}

fn parallel(y: f64, x0: f64, x1: f64, precision: f64) -> Vec<Position> {
    let mut xs = range(x0, x1 - EPS, precision);
    xs.push(x1);
    xs.into_iter().map(|x| [x, y]).collect()
}

#[cfg(test)]
mod tests {
    use super::{Circle, Graticule};
    use foundation::math::{LonLat, angle_diff};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn angular_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
        let (va, vb) = (
            LonLat::from(a).to_cartesian(),
            LonLat::from(b).to_cartesian(),
        );
        va.dot(vb).clamp(-1.0, 1.0).acos().to_degrees()
    }

    #[test]
    fn circle_ring_is_closed_and_equidistant() {
        let circle = Circle {
            center: [30.0, 45.0],
            radius: 10.0,
            precision: 5.0,
        };
        let ring = circle.ring();
        assert_eq!(ring.len(), 73);
        assert_eq!(ring.first(), ring.last());
        for p in &ring {
            assert_close(angular_distance(*p, circle.center), 10.0, 1e-9);
        }
    }

    #[test]
    fn default_circle_is_great_circle_around_origin() {
        let ring = Circle::default().ring();
        assert_eq!(ring.len(), 61);
        for p in &ring {
            assert_close(angular_distance(*p, [0.0, 0.0]), 90.0, 1e-9);
        }
    }

    #[test]
    fn graticule_default_line_counts() {
        let lines = Graticule::default().lines();
        // 4 major meridians, the equator, 32 minor meridians, 16 minor parallels.
        assert_eq!(lines.len(), 4 + 1 + 32 + 16);
        let equator = &lines[4];
        assert!(equator.iter().all(|p| p[1] == 0.0));
        assert_eq!(equator.first().unwrap()[0], -180.0);
        assert_eq!(equator.last().unwrap()[0], 180.0);
    }

    #[test]
    fn tiny_graticule_steps_are_clamped() {
        let g = Graticule {
            step_major: [1e-9, 1e-9],
            step_minor: [1e-9, 1e-9],
            ..Graticule::default()
        }
        .with_extent([[-1.0, -1.0], [1.0, 1.0]]);
        let lines = g.lines();
        assert!(!lines.is_empty());
        assert!(lines.len() <= 4 * 201, "{} lines", lines.len());
    }

    #[test]
    fn graticule_outline_is_closed() {
        let g = Graticule::default().with_extent([[-10.0, -10.0], [10.0, 10.0]]);
        let ring = g.outline();
        let (first, last) = (ring[0], *ring.last().unwrap());
        assert_close(angle_diff(first[0], last[0]), 0.0, 1e-12);
        assert_close(first[1], last[1], 1e-12);
    }
}
