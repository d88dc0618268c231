//! Orthographic projection with a three-axis rotation.
//!
//! Conventions:
//! - Angles are degrees; longitude grows east, latitude grows north.
//! - A rotation `[λ, φ, γ]` first spins the sphere by λ about the polar axis,
//!   then tilts it by φ, then rolls it by γ about the viewing axis.
//! - Screen y grows downward, so `py = cy - r * y`.

use std::f64::consts::{PI, TAU};

use super::{Vec2, Vec3};

/// Tolerance used for the horizon and disc boundary tests.
const BOUNDARY_EPS: f64 = 1e-9;

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Unit vector with x toward (0, 0), y toward (90, 0) and z toward the
    /// north pole.
    pub fn to_cartesian(self) -> Vec3 {
        let (lon, lat) = (self.lon.to_radians(), self.lat.to_radians());
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    pub fn from_cartesian(v: Vec3) -> Self {
        let v = v.normalize();
        Self::new(
            v.y.atan2(v.x).to_degrees(),
            v.z.clamp(-1.0, 1.0).asin().to_degrees(),
        )
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// Precomputed three-axis sphere rotation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    angles: [f64; 3],
    delta_lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
}

impl Rotation {
    pub fn new(angles: [f64; 3]) -> Self {
        let [_, phi, gamma] = angles.map(f64::to_radians);
        Self {
            angles,
            delta_lambda: angles[0].to_radians(),
            cos_phi: phi.cos(),
            sin_phi: phi.sin(),
            cos_gamma: gamma.cos(),
            sin_gamma: gamma.sin(),
        }
    }

    pub fn angles(&self) -> [f64; 3] {
        self.angles
    }

    /// Geographic position → position in the rotated frame.
    pub fn rotate(&self, p: LonLat) -> LonLat {
        let lambda = wrap_rad(p.lon.to_radians() + self.delta_lambda);
        let phi = p.lat.to_radians();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;

        LonLat::new(
            (y * self.cos_gamma - k * self.sin_gamma)
                .atan2(x * self.cos_phi - z * self.sin_phi)
                .to_degrees(),
            (k * self.cos_gamma + y * self.sin_gamma)
                .clamp(-1.0, 1.0)
                .asin()
                .to_degrees(),
        )
    }

    /// Position in the rotated frame → geographic position.
    pub fn invert(&self, p: LonLat) -> LonLat {
        let lambda = p.lon.to_radians();
        let phi = p.lat.to_radians();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_gamma - y * self.sin_gamma;

        let lon = (y * self.cos_gamma + z * self.sin_gamma)
            .atan2(x * self.cos_phi + k * self.sin_phi);
        let lat = (k * self.cos_phi - x * self.sin_phi).clamp(-1.0, 1.0).asin();

        LonLat::new(
            wrap_rad(lon - self.delta_lambda).to_degrees(),
            lat.to_degrees(),
        )
    }
}

fn wrap_rad(a: f64) -> f64 {
    if a.abs() > PI {
        a - (a / TAU).round() * TAU
    } else {
        a
    }
}

/// Orthographic projection of the unit sphere onto the screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orthographic {
    rotation: Rotation,
    /// Sphere radius in pixels.
    scale: f64,
    /// Pixel position of the projection center.
    center: [f64; 2],
    clip_extent: Option<[[f64; 2]; 2]>,
}

impl Orthographic {
    pub fn new(rotation: [f64; 3], scale: f64, center: [f64; 2]) -> Self {
        Self {
            rotation: Rotation::new(rotation),
            scale,
            center,
            clip_extent: None,
        }
    }

    pub fn with_clip_extent(mut self, extent: [[f64; 2]; 2]) -> Self {
        self.clip_extent = Some(extent);
        self
    }

    pub fn rotation(&self) -> [f64; 3] {
        self.rotation.angles()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    pub fn clip_extent(&self) -> Option<[[f64; 2]; 2]> {
        self.clip_extent
    }

    /// Whether the point lies on the hemisphere facing the viewer.
    pub fn is_visible(&self, p: LonLat) -> bool {
        self.depth(p) >= -BOUNDARY_EPS
    }

    /// Signed distance toward the viewer in unit-sphere coordinates; negative
    /// on the far hemisphere.
    pub fn depth(&self, p: LonLat) -> f64 {
        let r = self.rotation.rotate(p);
        r.lat.to_radians().cos() * r.lon.to_radians().cos()
    }

    /// Forward projection ignoring visibility.
    pub fn project_unclipped(&self, p: LonLat) -> [f64; 2] {
        let r = self.rotation.rotate(p);
        let (lon, lat) = (r.lon.to_radians(), r.lat.to_radians());
        let x = lat.cos() * lon.sin();
        let y = lat.sin();
        [self.center[0] + self.scale * x, self.center[1] - self.scale * y]
    }

    /// Forward projection; `None` on the far hemisphere.
    pub fn project(&self, p: LonLat) -> Option<[f64; 2]> {
        self.is_visible(p).then(|| self.project_unclipped(p))
    }

    /// Inverse projection; `None` outside the sphere's disc.
    pub fn invert(&self, px: [f64; 2]) -> Option<LonLat> {
        if self.scale <= 0.0 {
            return None;
        }
        let x = (px[0] - self.center[0]) / self.scale;
        let y = (self.center[1] - px[1]) / self.scale;
        let z = Vec2::new(x, y).norm();
        if !z.is_finite() || z > 1.0 + BOUNDARY_EPS {
            return None;
        }

        let c = z.min(1.0).asin();
        let (sc, cc) = (c.sin(), c.cos());
        let lon = (x * sc).atan2(z * cc);
        let lat = if z == 0.0 {
            0.0
        } else {
            (y * sc / z).clamp(-1.0, 1.0).asin()
        };

        Some(
            self.rotation
                .invert(LonLat::new(lon.to_degrees(), lat.to_degrees())),
        )
    }

    /// Whether the pixel lies inside the clip extent (always true without one).
    pub fn in_clip_extent(&self, px: [f64; 2]) -> bool {
        match self.clip_extent {
            Some([min, max]) => {
                px[0] >= min[0] && px[0] <= max[0] && px[1] >= min[1] && px[1] <= max[1]
            }
            None => true,
        }
    }
}
