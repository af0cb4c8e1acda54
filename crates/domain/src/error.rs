//! Unified error types for the domain layer
//!
//! Interaction operations never fail: they report outcomes (including sentinel
//! failures) as result records. Errors are reserved for building and parsing
//! records, where malformed authoring data must be rejected up front.

use thiserror::Error;

/// Unified error type for domain construction and parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for authoring data that breaks an invariant.
    ///
    /// # Example
    /// ```ignore
    /// if states.is_empty() {
    ///     return Err(DomainError::validation("Mechanism needs at least one state"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}
