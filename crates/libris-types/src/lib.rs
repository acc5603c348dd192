//! Foundation types for the Libris catalog.
//!
//! This crate provides the value types shared by every other Libris crate.
//! It has no knowledge of stock levels or concurrency; those live in
//! `libris-inventory`.
//!
//! # Key Types
//!
//! - [`Book`] — Immutable book metadata keyed by ISBN
//! - [`BookCategory`] — Normal (lendable) or Reference (in-library only)
//! - [`TypeError`] — Validation failures when constructing values
//!
//! The [`text`] module holds the normalization used by the exact-match
//! author and title indexes.

pub mod book;
pub mod error;
pub mod text;

pub use book::{Book, BookCategory};
pub use error::{TypeError, TypeResult};
pub use text::{is_blank, normalize, require_non_blank};
