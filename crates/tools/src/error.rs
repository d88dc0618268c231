use std::fmt;

use layers::ShapeError;
use scene::ConfigError;

#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Config(ConfigError),
    Shape(ShapeError),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(err) => write!(f, "I/O error: {err}"),
            ScriptError::Parse(err) => write!(f, "script parse error: {err}"),
            ScriptError::Config(err) => write!(f, "{err}"),
            ScriptError::Shape(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl From<std::io::Error> for ScriptError {
    fn from(err: std::io::Error) -> Self {
        ScriptError::Io(err)
    }
}

impl From<serde_json::Error> for ScriptError {
    fn from(err: serde_json::Error) -> Self {
        ScriptError::Parse(err)
    }
}

impl From<ConfigError> for ScriptError {
    fn from(err: ConfigError) -> Self {
        ScriptError::Config(err)
    }
}

impl From<ShapeError> for ScriptError {
    fn from(err: ShapeError) -> Self {
        ScriptError::Shape(err)
    }
}
