use thiserror::Error;

/// Errors produced when constructing or validating Libris values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{field} must be provided")]
    MissingField { field: &'static str },

    #[error("unknown book category: {0}")]
    UnknownCategory(String),
}

/// Result alias for type-level validation.
pub type TypeResult<T> = Result<T, TypeError>;
