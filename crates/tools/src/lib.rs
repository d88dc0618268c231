pub mod error;
pub mod render;
pub mod replay;

pub use error::ScriptError;
