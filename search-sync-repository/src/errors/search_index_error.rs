//! Search index error types.
//!
//! This module defines the error types that can occur while talking to the
//! remote search index.

use thiserror::Error;

/// Errors that can occur during remote search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search index.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to create or delete the index.
    #[error("Index management error: {0}")]
    IndexManagementError(String),

    /// Failed to register a collection mapping.
    #[error("Mapping registration error: {0}")]
    MappingError(String),

    /// Bulk submission failed as a whole (per-item failures are reported in
    /// the result stream instead).
    #[error("Bulk submission error: {0}")]
    BulkError(String),

    /// Failed to parse a response from the search index.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Validation error (e.g., malformed endpoint URL).
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index management error.
    pub fn index_management(msg: impl Into<String>) -> Self {
        Self::IndexManagementError(msg.into())
    }

    /// Create a mapping registration error.
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::MappingError(msg.into())
    }

    /// Create a bulk submission error.
    pub fn bulk(msg: impl Into<String>) -> Self {
        Self::BulkError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
