//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Declaration parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] kissbuf_schema::ParseError),

    /// Dependency or layout resolution error.
    #[error("schema error: {0}")]
    Schema(#[from] kissbuf_schema::SchemaError),

    /// Invalid primitive registry.
    #[error("registry error: {0}")]
    Registry(#[from] kissbuf_core::RegistryError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid generator configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a configuration error with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
