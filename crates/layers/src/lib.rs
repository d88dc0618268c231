pub mod generators;
pub mod layer;
pub mod path;
pub mod shape;
pub mod shorthand;
pub mod vector;

pub use layer::*;
pub use shape::*;
