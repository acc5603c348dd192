//! Library service layer for Libris.
//!
//! Wraps an [`InventoryStore`](libris_inventory::InventoryStore) and shapes
//! its results for callers: blank queries short-circuit to empty results,
//! reference books are refused before the store is asked, and live records
//! are turned into owned [`BookAvailability`] snapshots.

pub mod availability;
pub mod config;
pub mod error;
pub mod library;

pub use availability::BookAvailability;
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use library::Library;

// Re-export key types
pub use libris_inventory::{InMemoryInventory, InventoryStore};
pub use libris_types::{Book, BookCategory};
