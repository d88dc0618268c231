pub mod debounce;
pub mod diagnostics;
pub mod frame;

pub use debounce::*;
pub use diagnostics::*;
pub use frame::*;
