use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid key path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to serialize {path}: {reason}")]
    SerializeError { path: PathBuf, reason: String },

    #[error("Expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Cannot write '{0}': the volume is not loaded or the path crosses a non-container value")]
    Unwritable(String),

    #[error("Unknown volume '{0}'")]
    UnknownVolume(String),

    #[error("One or more volumes could not be saved")]
    SaveFailed,

    #[error("App name is required; call .app_name() or .default_file() on the builder")]
    AppNameRequired,

    #[error("No platform config directory is available for '{0}'")]
    NoPlatformDir(String),
}
