pub mod angle;
pub mod projection;
pub mod vec;

pub use angle::*;
pub use projection::*;
pub use vec::*;
