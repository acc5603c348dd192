//! Per-ISBN stock state.
//!
//! Both counters live in a single `AtomicU64` (total in the high half,
//! borrowed in the low half). Every read sees a matching pair and every
//! mutation is one compare-and-swap, so a borrow can never observe a total
//! that a concurrent restock has not finished writing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use libris_types::Book;
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};

fn pack(total: u32, borrowed: u32) -> u64 {
    (u64::from(total) << 32) | u64::from(borrowed)
}

fn unpack(bits: u64) -> RecordSnapshot {
    RecordSnapshot {
        total_copies: (bits >> 32) as u32,
        borrowed_copies: bits as u32,
    }
}

/// A consistent read of one record's counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub total_copies: u32,
    pub borrowed_copies: u32,
}

impl RecordSnapshot {
    /// Copies currently on the shelf.
    pub fn available_copies(&self) -> u32 {
        self.total_copies - self.borrowed_copies
    }
}

/// Stock state for a single ISBN.
///
/// The book metadata is fixed at creation. The counts only move in two
/// directions: `add_copies` raises the total and `borrow_one` raises the
/// borrowed count, never past the total.
pub struct InventoryRecord {
    book: Book,
    counts: AtomicU64,
}

impl InventoryRecord {
    /// Create a record with `total_copies` on the shelf and none borrowed.
    pub fn new(book: Book, total_copies: u32) -> Self {
        Self {
            book,
            counts: AtomicU64::new(pack(total_copies, 0)),
        }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn isbn(&self) -> &str {
        self.book.isbn()
    }

    /// Read both counts in one atomic load.
    pub fn snapshot(&self) -> RecordSnapshot {
        unpack(self.counts.load(Ordering::Acquire))
    }

    pub fn total_copies(&self) -> u32 {
        self.snapshot().total_copies
    }

    pub fn borrowed_copies(&self) -> u32 {
        self.snapshot().borrowed_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.snapshot().available_copies()
    }

    /// Add `copies` to the total, keeping the borrowed count.
    ///
    /// Returns the counts as they were immediately after this addition.
    /// Fails without changing anything if `copies` is zero or the total would
    /// overflow.
    pub fn add_copies(&self, copies: u32) -> InventoryResult<RecordSnapshot> {
        if copies == 0 {
            return Err(InventoryError::InvalidArgument(
                "copies must be positive".into(),
            ));
        }
        let previous = self
            .counts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let current = unpack(bits);
                let total = current.total_copies.checked_add(copies)?;
                Some(pack(total, current.borrowed_copies))
            })
            .map_err(|bits| {
                InventoryError::InvalidArgument(format!(
                    "adding {copies} copies to {} would overflow the copy count ({})",
                    self.book.isbn(),
                    unpack(bits).total_copies,
                ))
            })?;
        let previous = unpack(previous);
        Ok(RecordSnapshot {
            total_copies: previous.total_copies + copies,
            borrowed_copies: previous.borrowed_copies,
        })
    }

    /// Take one copy if one is available.
    ///
    /// Returns `false` and leaves the record untouched when every copy is
    /// already out. Concurrent callers racing for the last copy see exactly
    /// one `true`.
    pub fn borrow_one(&self) -> bool {
        self.counts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let current = unpack(bits);
                (current.borrowed_copies < current.total_copies)
                    .then(|| pack(current.total_copies, current.borrowed_copies + 1))
            })
            .is_ok()
    }
}

impl fmt::Debug for InventoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self.snapshot();
        f.debug_struct("InventoryRecord")
            .field("book", &self.book)
            .field("total_copies", &counts.total_copies)
            .field("borrowed_copies", &counts.borrowed_copies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use libris_types::BookCategory;

    fn odyssey() -> Book {
        Book::new("9780140449136", "The Odyssey", "Homer", BookCategory::Normal).unwrap()
    }

    #[test]
    fn new_record_has_nothing_borrowed() {
        let record = InventoryRecord::new(odyssey(), 3);
        assert_eq!(record.total_copies(), 3);
        assert_eq!(record.borrowed_copies(), 0);
        assert_eq!(record.available_copies(), 3);
        assert_eq!(record.isbn(), "9780140449136");
    }

    #[test]
    fn add_copies_preserves_borrowed() {
        let record = InventoryRecord::new(odyssey(), 1);
        assert!(record.borrow_one());

        let after = record.add_copies(2).unwrap();
        assert_eq!(after, RecordSnapshot { total_copies: 3, borrowed_copies: 1 });
        assert_eq!(record.available_copies(), 2);
    }

    #[test]
    fn add_zero_copies_is_rejected() {
        let record = InventoryRecord::new(odyssey(), 1);
        let err = record.add_copies(0).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidArgument(_)));
        assert_eq!(record.total_copies(), 1);
    }

    #[test]
    fn add_copies_overflow_is_rejected() {
        let record = InventoryRecord::new(odyssey(), u32::MAX - 1);
        assert!(record.add_copies(1).is_ok());
        let err = record.add_copies(1).unwrap_err();
        assert!(err.to_string().contains("overflow"));
        assert_eq!(record.total_copies(), u32::MAX);
    }

    #[test]
    fn borrow_stops_at_total() {
        let record = InventoryRecord::new(odyssey(), 2);
        assert!(record.borrow_one());
        assert!(record.borrow_one());
        assert!(!record.borrow_one());
        assert_eq!(record.borrowed_copies(), 2);
        assert_eq!(record.available_copies(), 0);
    }

    #[test]
    fn zero_copy_record_is_never_borrowable() {
        let record = InventoryRecord::new(odyssey(), 0);
        assert!(!record.borrow_one());
        assert_eq!(record.snapshot(), RecordSnapshot { total_copies: 0, borrowed_copies: 0 });
    }

    #[test]
    fn debug_shows_counts() {
        let record = InventoryRecord::new(odyssey(), 4);
        record.borrow_one();
        let debug = format!("{record:?}");
        assert!(debug.contains("total_copies: 4"));
        assert!(debug.contains("borrowed_copies: 1"));
    }

    #[test]
    fn snapshot_serializes_both_counts() {
        let record = InventoryRecord::new(odyssey(), 3);
        record.borrow_one();

        let json = serde_json::to_value(record.snapshot()).unwrap();
        assert_eq!(json, serde_json::json!({ "total_copies": 3, "borrowed_copies": 1 }));

        let back: RecordSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, record.snapshot());
        assert_eq!(back.available_copies(), 2);
    }

    #[test]
    fn concurrent_borrow_and_restock_never_overdraw() {
        let record = Arc::new(InventoryRecord::new(odyssey(), 10));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let record = Arc::clone(&record);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let mut won = 0u32;
                    for _ in 0..200 {
                        if i % 4 == 0 {
                            record.add_copies(1).unwrap();
                        } else if record.borrow_one() {
                            won += 1;
                        }
                        let seen = record.snapshot();
                        assert!(seen.borrowed_copies <= seen.total_copies);
                    }
                    won
                })
            })
            .collect();

        let borrowed: u32 = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .sum();

        let end = record.snapshot();
        assert_eq!(end.total_copies, 10 + 4 * 200);
        assert_eq!(end.borrowed_copies, borrowed);
    }
}
