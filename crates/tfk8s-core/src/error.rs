//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Value at {path} is not known yet and cannot be rendered")]
    UnknownValue { path: String },

    #[error("Value at {path} does not match the schema: {message}")]
    SchemaMismatch { path: String, message: String },

    #[error("Configuration must be an object, got {found}")]
    InvalidConfig { found: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
