//! Error types for inventory operations.

use thiserror::Error;

/// Errors from inventory operations.
///
/// A missing ISBN, author, or title is not an error: lookups return
/// `Ok(None)` and borrows return `Ok(false)`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// A required argument was blank, zero, or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The ISBN is already registered with different book metadata.
    #[error("ISBN exists with different metadata: {isbn}")]
    Conflict { isbn: String },

    /// A thread panicked while holding one of the inventory locks.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;
