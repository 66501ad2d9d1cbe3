//! Error types for the data quality engine.
//!
//! This module defines the errors shared by every crate of the engine: malformed
//! expectation documents, unusable configuration, and layer lookups that cannot
//! produce a result.

use thiserror::Error;

/// Result type for data quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Main error type for data quality operations.
#[derive(Error, Debug)]
pub enum QualityError {
    /// Expectation document could not be found in any configured location
    #[error("Expectation document not found: {0}")]
    DocumentNotFound(String),

    /// Expectation document exists but is not well-formed
    #[error("Invalid expectation document: {0}")]
    InvalidDocument(String),

    /// A recognized expectation carries missing or ill-typed kwargs
    #[error("Invalid kwargs for '{expectation_type}': {message}")]
    InvalidKwargs {
        /// Expectation type as written in the document
        expectation_type: String,
        /// What was wrong with the kwargs
        message: String,
    },

    /// Pipeline configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Layer is not declared in the pipeline configuration
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    /// Layer is declared but lists no datasets
    #[error("Layer '{0}' has no datasets configured")]
    EmptyLayer(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl QualityError {
    /// Creates a new invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }

    /// Creates a new invalid kwargs error.
    pub fn invalid_kwargs(expectation_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKwargs {
            expectation_type: expectation_type.into(),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
