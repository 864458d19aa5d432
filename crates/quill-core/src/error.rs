//! Error types for the Quill core

use thiserror::Error;

/// Result type alias for Quill core operations
pub type QuillResult<T> = Result<T, QuillError>;

/// Main error type for the Quill core
#[derive(Error, Debug, Clone)]
pub enum QuillError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registry construction errors (boot-time fatal)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Gateway / delivery errors
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl QuillError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new registry error
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry(message.into())
    }

    /// Create a new gateway error
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<anyhow::Error> for QuillError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<std::io::Error> for QuillError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<toml::de::Error> for QuillError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config(error.to_string())
    }
}
