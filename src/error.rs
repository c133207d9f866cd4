//! Error types for qail-geo.

use thiserror::Error;

/// The main error type for spatial element operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Invalid constructor argument (e.g. a malformed `SRID=` marker).
    #[error("Argument error: {0}")]
    Argument(String),

    /// Lookup of a name that is not a spatial function.
    #[error("no attribute '{name}'")]
    UnknownAttribute { name: String },

    /// A serialized element could not be restored.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeoError {
    /// Create an argument error.
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Create an unknown attribute error for `name`.
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for GeoError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for qail-geo operations.
pub type GeoResult<T> = Result<T, GeoError>;
