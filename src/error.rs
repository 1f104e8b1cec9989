//! Custom error types for Poolkeeper
//!
//! Expected validation failures are reported through
//! [`ValidationResult`](crate::validation::ValidationResult) values. This module
//! covers everything else: I/O, malformed documents, bad settings, and
//! operations that cannot produce a meaningful answer.

use thiserror::Error;

/// The main error type for Poolkeeper operations
#[derive(Error, Debug)]
pub enum PoolkeeperError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// CSV reading errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Input that is well-formed but unusable for the requested operation
    #[error("Validation error: {0}")]
    Validation(String),

    /// An allocation could not be rescaled or distributed
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Unsupported document format
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

impl PoolkeeperError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an allocation arithmetic error
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Allocation(_))
    }
}

impl From<std::io::Error> for PoolkeeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PoolkeeperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for PoolkeeperError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for PoolkeeperError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Poolkeeper operations
pub type PoolkeeperResult<T> = Result<T, PoolkeeperError>;
