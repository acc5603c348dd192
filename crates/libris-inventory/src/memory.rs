//! In-memory inventory store.
//!
//! [`InMemoryInventory`] keeps records in a `HashMap` behind a `RwLock` and
//! each index in its own `RwLock`. Records carry their own atomic counters,
//! so the map lock only guards membership: borrowing or restocking a known
//! ISBN takes the read lock, and only inserting a new ISBN takes the write
//! lock.
//!
//! Lock order is always records, then author index, then title index.
//! Lookups release an index lock before touching the records map.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use libris_types::{is_blank, Book};
use tracing::{debug, info, warn};

use crate::error::{InventoryError, InventoryResult};
use crate::index::ExactMatchIndex;
use crate::record::InventoryRecord;
use crate::traits::InventoryStore;

type RecordMap = HashMap<String, Arc<InventoryRecord>>;

fn poisoned<T>(what: &str) -> impl FnOnce(PoisonError<T>) -> InventoryError + '_ {
    move |e| InventoryError::LockPoisoned(format!("{what}: {e}"))
}

/// An in-memory implementation of [`InventoryStore`].
///
/// Data is lost when the store is dropped. Share it across threads with
/// `Arc<InMemoryInventory>`.
pub struct InMemoryInventory {
    records: RwLock<RecordMap>,
    by_author: RwLock<ExactMatchIndex>,
    by_title: RwLock<ExactMatchIndex>,
}

impl InMemoryInventory {
    /// Create a new empty inventory.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            by_author: RwLock::new(ExactMatchIndex::new()),
            by_title: RwLock::new(ExactMatchIndex::new()),
        }
    }

    /// Number of distinct ISBNs.
    ///
    /// # Panics
    ///
    /// Panics if a writer panicked while holding the records lock. The
    /// [`InventoryStore`] methods report the same state as
    /// [`InventoryError::LockPoisoned`].
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no ISBN has been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_records(&self) -> InventoryResult<RwLockReadGuard<'_, RecordMap>> {
        self.records.read().map_err(poisoned("records"))
    }

    fn write_records(&self) -> InventoryResult<RwLockWriteGuard<'_, RecordMap>> {
        self.records.write().map_err(poisoned("records"))
    }

    /// Add copies to an existing record after checking its metadata.
    fn restock(record: &InventoryRecord, book: &Book, copies: u32) -> InventoryResult<()> {
        if record.book() != book {
            warn!(isbn = %book.isbn(), "rejected add: ISBN exists with different metadata");
            return Err(InventoryError::Conflict {
                isbn: book.isbn().to_string(),
            });
        }
        let counts = record.add_copies(copies)?;
        debug!(
            isbn = %book.isbn(),
            added = copies,
            total = counts.total_copies,
            borrowed = counts.borrowed_copies,
            "restocked"
        );
        Ok(())
    }

    /// Resolve indexed ISBNs against the records map.
    fn resolve(
        &self,
        isbns: BTreeSet<String>,
        index: &'static str,
    ) -> InventoryResult<Option<Vec<Arc<InventoryRecord>>>> {
        let records = self.read_records()?;
        let found: Vec<Arc<InventoryRecord>> = isbns
            .iter()
            .filter_map(|isbn| {
                let record = records.get(isbn).cloned();
                if record.is_none() {
                    warn!(%isbn, index, "index entry without a record; skipping");
                }
                record
            })
            .collect();
        Ok((!found.is_empty()).then_some(found))
    }

    fn lookup(
        &self,
        index: &RwLock<ExactMatchIndex>,
        name: &'static str,
        query: &str,
    ) -> InventoryResult<Option<Vec<Arc<InventoryRecord>>>> {
        // Copy the keys out so the index lock is released before the records
        // lock is taken.
        let isbns = {
            let index = index.read().map_err(poisoned(name))?;
            match index.lookup(query) {
                Some(isbns) => isbns.clone(),
                None => return Ok(None),
            }
        };
        self.resolve(isbns, name)
    }
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore for InMemoryInventory {
    fn add_book(&self, book: &Book, copies: u32) -> InventoryResult<()> {
        if copies == 0 {
            return Err(InventoryError::InvalidArgument(
                "copies must be positive".into(),
            ));
        }

        {
            let records = self.read_records()?;
            if let Some(existing) = records.get(book.isbn()) {
                return Self::restock(existing, book, copies);
            }
        }

        let mut records = self.write_records()?;
        match records.entry(book.isbn().to_string()) {
            // Another thread inserted between the two lock acquisitions.
            Entry::Occupied(slot) => Self::restock(slot.get(), book, copies),
            Entry::Vacant(slot) => {
                // Take both index locks before inserting so a failure here
                // cannot leave an unindexed record behind.
                let mut by_author = self.by_author.write().map_err(poisoned("author index"))?;
                let mut by_title = self.by_title.write().map_err(poisoned("title index"))?;

                slot.insert(Arc::new(InventoryRecord::new(book.clone(), copies)));
                by_author.insert(book.author(), book.isbn());
                by_title.insert(book.title(), book.isbn());

                info!(
                    isbn = %book.isbn(),
                    title = %book.title(),
                    author = %book.author(),
                    category = %book.category(),
                    copies,
                    "added new book"
                );
                Ok(())
            }
        }
    }

    fn find_by_isbn(&self, isbn: &str) -> InventoryResult<Option<Arc<InventoryRecord>>> {
        if is_blank(isbn) {
            return Ok(None);
        }
        Ok(self.read_records()?.get(isbn).cloned())
    }

    fn find_by_author(&self, author: &str) -> InventoryResult<Option<Vec<Arc<InventoryRecord>>>> {
        self.lookup(&self.by_author, "author index", author)
    }

    fn find_by_title(&self, title: &str) -> InventoryResult<Option<Vec<Arc<InventoryRecord>>>> {
        self.lookup(&self.by_title, "title index", title)
    }

    fn borrow(&self, isbn: &str) -> InventoryResult<bool> {
        let Some(record) = self.find_by_isbn(isbn)? else {
            debug!(%isbn, "borrow refused: unknown isbn");
            return Ok(false);
        };
        if !record.book().is_borrowable() {
            debug!(%isbn, "borrow refused: reference book");
            return Ok(false);
        }
        let borrowed = record.borrow_one();
        if borrowed {
            debug!(%isbn, available = record.available_copies(), "borrowed one copy");
        } else {
            debug!(%isbn, "borrow refused: no copy available");
        }
        Ok(borrowed)
    }

    fn find_all(&self) -> InventoryResult<Vec<Arc<InventoryRecord>>> {
        let records = self.read_records()?;
        let mut all: Vec<Arc<InventoryRecord>> = records.values().cloned().collect();
        all.sort_by(|a, b| a.isbn().cmp(b.isbn()));
        Ok(all)
    }

    fn total_borrowed_count(&self) -> InventoryResult<u64> {
        let records = self.read_records()?;
        Ok(records
            .values()
            .map(|record| u64::from(record.borrowed_copies()))
            .sum())
    }
}

impl std::fmt::Debug for InMemoryInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("InMemoryInventory");
        match self.records.read() {
            Ok(records) => out.field("record_count", &records.len()),
            Err(_) => out.field("record_count", &"<poisoned>"),
        };
        out.finish()
    }
}
