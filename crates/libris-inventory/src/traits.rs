//! The [`InventoryStore`] trait defining the inventory interface.

use std::sync::Arc;

use libris_types::Book;

use crate::error::InventoryResult;
use crate::record::InventoryRecord;

/// Concurrent store of inventory records keyed by ISBN.
///
/// All implementations must satisfy these invariants:
/// - `0 <= borrowed <= total` for every record, under any interleaving.
/// - Calls touching the same ISBN are linearizable.
/// - The author and title indexes only ever name ISBNs that have a record,
///   and every record is reachable through both.
/// - Invalid arguments are rejected before anything is mutated.
///
/// Absence is never an error: lookups return `Ok(None)` and `borrow`
/// returns `Ok(false)`.
pub trait InventoryStore: Send + Sync {
    /// Register `copies` copies of `book`.
    ///
    /// A new ISBN creates a record and indexes it. A known ISBN adds to its
    /// total, but only if `book` matches the stored metadata exactly;
    /// otherwise this fails with [`Conflict`](crate::InventoryError::Conflict)
    /// and the record is untouched.
    fn add_book(&self, book: &Book, copies: u32) -> InventoryResult<()>;

    /// Look up a record by exact ISBN. A blank ISBN finds nothing.
    fn find_by_isbn(&self, isbn: &str) -> InventoryResult<Option<Arc<InventoryRecord>>>;

    /// Records whose normalized author equals the normalized query.
    ///
    /// Results are distinct and ordered by ISBN. `Ok(None)` when nothing
    /// matches.
    fn find_by_author(&self, author: &str) -> InventoryResult<Option<Vec<Arc<InventoryRecord>>>>;

    /// Records whose normalized title equals the normalized query.
    fn find_by_title(&self, title: &str) -> InventoryResult<Option<Vec<Arc<InventoryRecord>>>>;

    /// Borrow one copy.
    ///
    /// Returns `Ok(false)` for a blank or unknown ISBN, a reference book, or
    /// when no copy is available.
    fn borrow(&self, isbn: &str) -> InventoryResult<bool>;

    /// Every record, ordered by ISBN.
    fn find_all(&self) -> InventoryResult<Vec<Arc<InventoryRecord>>>;

    /// Sum of borrowed copies across all records.
    ///
    /// Each record contributes a consistent value, but the total is not an
    /// atomic snapshot of the whole store. Backends may override the default
    /// to avoid materializing every record.
    fn total_borrowed_count(&self) -> InventoryResult<u64> {
        Ok(self
            .find_all()?
            .iter()
            .map(|record| u64::from(record.borrowed_copies()))
            .sum())
    }
}
