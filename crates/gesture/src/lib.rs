//! Rotate-and-scale gestures for an orthographic globe.
//!
//! A gesture grabs a point on the sphere at start; every following move
//! re-solves the rotation so that the grabbed point stays under the pointer
//! while the view scales, falling back to panning when the grab sits on a pole.

pub mod controller;
pub mod fallback;
pub mod session;
pub mod solver;

pub use controller::*;
pub use fallback::*;
pub use session::*;
pub use solver::*;
