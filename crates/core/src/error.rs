//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Two kinds dominate: `Validation` for bad arguments (an invalid field on a
/// new entity) and `InvariantViolation` for operations the current state
/// forbids. Both are raised before any state changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (invalid argument).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation is not allowed in the aggregate's current state.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The aggregate has not been created yet.
    #[error("not found")]
    NotFound,

    /// The aggregate already exists.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// True for invalid-argument failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True for invalid-state failures.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = DomainError::validation("quantity must be greater than zero");
        assert_eq!(
            err.to_string(),
            "validation failed: quantity must be greater than zero"
        );

        let err = DomainError::invariant("order is locked");
        assert_eq!(err.to_string(), "invariant violated: order is locked");
        assert_eq!(DomainError::not_found().to_string(), "not found");
    }

    #[test]
    fn kind_predicates() {
        assert!(DomainError::validation("x").is_validation());
        assert!(!DomainError::validation("x").is_invariant_violation());
        assert!(DomainError::invariant("x").is_invariant_violation());
        assert!(!DomainError::conflict("x").is_validation());
    }
}
