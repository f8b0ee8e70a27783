//! Centralized error types for the intake core.

use thiserror::Error;

/// Main error type for intake operations.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Portal access not found: {0}")]
    PortalNotFound(String),

    #[error("Question '{question}' is not part of section '{section}'")]
    UnknownQuestion { section: String, question: String },

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(#[from] intake_redis::RedisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for intake operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

impl IntakeError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a persistence error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
