//! Core error types

use thiserror::Error;

/// Errors raised by the domain services and storage backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The referenced entity does not exist at all
    #[error("{0}")]
    NotFound(String),

    /// The relation (or unique value) already exists
    #[error("{0}")]
    Conflict(String),

    /// Removing a relation that was never created
    #[error("{0}")]
    NotPresent(String),

    /// Input rejected by a domain rule
    #[error("{0}")]
    Validation(String),

    /// The acting user may not touch this entity
    #[error("{0}")]
    Forbidden(String),

    /// Two cart recipes disagree on the unit of one ingredient
    #[error("ingredient `{name}` is measured in `{expected}` and `{found}`")]
    UnitMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Backend failure
    #[error("store error: {0}")]
    Store(String),
}

impl CoreError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        CoreError::Store(err.to_string())
    }
}

/// Core result type
pub type Result<T> = std::result::Result<T, CoreError>;
