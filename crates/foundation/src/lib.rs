pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use math::{LonLat, Orthographic, Rotation, Vec2, Vec3};
