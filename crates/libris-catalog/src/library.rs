use std::collections::BTreeSet;
use std::sync::Arc;

use libris_inventory::{InMemoryInventory, InventoryRecord, InventoryStore};
use libris_types::{is_blank, Book};
use tracing::debug;

use crate::availability::BookAvailability;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};

/// High-level library API over an inventory store.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct Library {
    store: Arc<dyn InventoryStore>,
    config: CatalogConfig,
}

impl Library {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self::with_config(store, CatalogConfig::default())
    }

    pub fn with_config(store: Arc<dyn InventoryStore>, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    /// A library backed by a fresh [`InMemoryInventory`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryInventory::new()))
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The underlying store, for callers that need live records.
    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        &self.store
    }

    // ---- Stock ----

    pub fn add_book(&self, book: &Book, copies: u32) -> CatalogResult<()> {
        if copies == 0 {
            return Err(CatalogError::InvalidArgument(
                "copies must be positive".into(),
            ));
        }
        if copies > self.config.max_copies_per_add {
            return Err(CatalogError::InvalidArgument(format!(
                "copies must not exceed {} per add (got {copies})",
                self.config.max_copies_per_add
            )));
        }
        self.store.add_book(book, copies)?;
        Ok(())
    }

    // ---- Lookups ----

    /// Books by an author, matched exactly after lowercasing.
    ///
    /// A blank query or no match yields an empty set.
    pub fn find_by_author(&self, author: &str) -> CatalogResult<BTreeSet<BookAvailability>> {
        if is_blank(author) {
            return Ok(BTreeSet::new());
        }
        Ok(to_availability(self.store.find_by_author(author)?))
    }

    /// Books with a title, matched exactly after lowercasing.
    pub fn find_by_title(&self, title: &str) -> CatalogResult<BTreeSet<BookAvailability>> {
        if is_blank(title) {
            return Ok(BTreeSet::new());
        }
        Ok(to_availability(self.store.find_by_title(title)?))
    }

    /// A single book by ISBN. Unlike the multi-result lookups, absence is an
    /// error here.
    pub fn find_by_isbn(&self, isbn: &str) -> CatalogResult<BookAvailability> {
        if is_blank(isbn) {
            return Err(CatalogError::InvalidArgument("isbn must be provided".into()));
        }
        self.store
            .find_by_isbn(isbn)?
            .map(|record| BookAvailability::from(&*record))
            .ok_or_else(|| CatalogError::NotFound {
                isbn: isbn.to_string(),
            })
    }

    // ---- Borrowing ----

    /// Whether a borrow would currently succeed.
    ///
    /// Advisory only: another caller may take the last copy before a
    /// following [`borrow`](Self::borrow).
    pub fn can_borrow(&self, isbn: &str) -> CatalogResult<bool> {
        Ok(self.borrowable_record(isbn)?.is_some())
    }

    /// Borrow one copy, returning `false` if the book cannot be lent.
    pub fn borrow(&self, isbn: &str) -> CatalogResult<bool> {
        if self.borrowable_record(isbn)?.is_none() {
            return Ok(false);
        }
        Ok(self.store.borrow(isbn)?)
    }

    fn borrowable_record(&self, isbn: &str) -> CatalogResult<Option<Arc<InventoryRecord>>> {
        if is_blank(isbn) {
            return Ok(None);
        }
        let Some(record) = self.store.find_by_isbn(isbn)? else {
            debug!(%isbn, "not borrowable: unknown isbn");
            return Ok(None);
        };
        if !record.book().is_borrowable() {
            debug!(%isbn, "not borrowable: reference book");
            return Ok(None);
        }
        if record.available_copies() == 0 {
            debug!(%isbn, "not borrowable: no copy available");
            return Ok(None);
        }
        Ok(Some(record))
    }

    // ---- Aggregates ----

    pub fn total_borrowed_count(&self) -> CatalogResult<u64> {
        Ok(self.store.total_borrowed_count()?)
    }

    /// Copies on the shelf for one ISBN; `0` if blank or unknown.
    pub fn remaining_by_isbn(&self, isbn: &str) -> CatalogResult<u64> {
        if is_blank(isbn) {
            return Ok(0);
        }
        Ok(self
            .store
            .find_by_isbn(isbn)?
            .map_or(0, |record| u64::from(record.available_copies())))
    }

    /// Copies on the shelf across every exact title match.
    pub fn remaining_by_title(&self, title: &str) -> CatalogResult<u64> {
        Ok(sum_available(&self.find_by_title(title)?))
    }

    /// Copies on the shelf across every exact author match.
    pub fn remaining_by_author(&self, author: &str) -> CatalogResult<u64> {
        Ok(sum_available(&self.find_by_author(author)?))
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn to_availability(records: Option<Vec<Arc<InventoryRecord>>>) -> BTreeSet<BookAvailability> {
    records
        .unwrap_or_default()
        .iter()
        .map(|record| BookAvailability::from(&**record))
        .collect()
}

fn sum_available(views: &BTreeSet<BookAvailability>) -> u64 {
    views.iter().map(|v| u64::from(v.available_copies)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_types::BookCategory;

    const ODYSSEY: &str = "9780140449136";
    const ILIAD: &str = "9780140449181";
    const OED: &str = "9780199535569";

    fn odyssey() -> Book {
        Book::new(ODYSSEY, "The Odyssey", "Homer", BookCategory::Normal).unwrap()
    }

    fn iliad() -> Book {
        Book::new(ILIAD, "The Iliad", "Homer", BookCategory::Normal).unwrap()
    }

    fn dictionary() -> Book {
        Book::new(OED, "Oxford English Dictionary", "Oxford", BookCategory::Reference).unwrap()
    }

    fn stocked() -> Library {
        let library = Library::in_memory();
        library.add_book(&odyssey(), 2).unwrap();
        library.add_book(&iliad(), 1).unwrap();
        library.add_book(&dictionary(), 1).unwrap();
        library
    }

    #[test]
    fn finds_by_author_title_and_isbn() {
        let library = stocked();

        let homer = library.find_by_author("homer").unwrap();
        let titles: Vec<&str> = homer.iter().map(|a| a.book.title()).collect();
        assert_eq!(titles, vec!["The Odyssey", "The Iliad"]);

        let odyssey = library.find_by_title("THE ODYSSEY").unwrap();
        assert_eq!(odyssey.len(), 1);
        assert_eq!(odyssey.iter().next().unwrap().book.isbn(), ODYSSEY);

        let iliad = library.find_by_isbn(ILIAD).unwrap();
        assert_eq!(iliad.book.author(), "Homer");
        assert_eq!(iliad.available_copies, 1);
    }

    #[test]
    fn partial_titles_do_not_match() {
        let library = stocked();
        assert!(library.find_by_title("Odyssey").unwrap().is_empty());
        assert!(library.find_by_author("Hom").unwrap().is_empty());
    }

    #[test]
    fn blank_queries_return_empty_sets() {
        let library = stocked();
        assert!(library.find_by_author(" ").unwrap().is_empty());
        assert!(library.find_by_title("").unwrap().is_empty());
    }

    #[test]
    fn find_by_isbn_signals_absence() {
        let library = stocked();
        let err = library.find_by_isbn("0000000000").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { ref isbn } if isbn == "0000000000"));
        assert_eq!(err.to_string(), "no book with isbn: 0000000000");

        let err = library.find_by_isbn("  ").unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: isbn must be provided");
    }

    #[test]
    fn borrows_books_and_tracks_outstanding() {
        let library = Library::in_memory();
        library.add_book(&odyssey(), 2).unwrap();

        assert!(library.can_borrow(ODYSSEY).unwrap());
        assert!(library.borrow(ODYSSEY).unwrap());
        assert!(library.borrow(ODYSSEY).unwrap());
        assert!(!library.can_borrow(ODYSSEY).unwrap());
        assert!(!library.borrow(ODYSSEY).unwrap());
        assert_eq!(library.total_borrowed_count().unwrap(), 2);
    }

    #[test]
    fn prevents_borrowing_reference_books() {
        let library = stocked();
        assert!(!library.can_borrow(OED).unwrap());
        assert!(!library.borrow(OED).unwrap());
        assert_eq!(library.total_borrowed_count().unwrap(), 0);
    }

    #[test]
    fn blank_or_unknown_isbn_cannot_be_borrowed() {
        let library = stocked();
        assert!(!library.can_borrow("").unwrap());
        assert!(!library.borrow("   ").unwrap());
        assert!(!library.borrow("0000000000").unwrap());
    }

    #[test]
    fn add_book_validates_copies() {
        let config = CatalogConfig { max_copies_per_add: 5 };
        let library = Library::with_config(Arc::new(InMemoryInventory::new()), config);

        assert!(matches!(
            library.add_book(&odyssey(), 0).unwrap_err(),
            CatalogError::InvalidArgument(_)
        ));
        let err = library.add_book(&odyssey(), 6).unwrap_err();
        assert!(err.to_string().contains("must not exceed 5"));
        assert_eq!(library.remaining_by_isbn(ODYSSEY).unwrap(), 0);

        library.add_book(&odyssey(), 5).unwrap();
        assert_eq!(library.remaining_by_isbn(ODYSSEY).unwrap(), 5);
    }

    #[test]
    fn conflicting_metadata_surfaces_as_conflict() {
        let library = stocked();
        let bootleg = Book::new(ODYSSEY, "Odyssey", "Homer", BookCategory::Normal).unwrap();
        let err = library.add_book(&bootleg, 1).unwrap_err();
        assert!(matches!(err, CatalogError::Conflict { ref isbn } if isbn == ODYSSEY));
        assert_eq!(library.remaining_by_isbn(ODYSSEY).unwrap(), 2);
    }

    #[test]
    fn remaining_counts() {
        let library = stocked();
        library.borrow(ODYSSEY).unwrap();

        assert_eq!(library.remaining_by_isbn(ODYSSEY).unwrap(), 1);
        assert_eq!(library.remaining_by_isbn("").unwrap(), 0);
        assert_eq!(library.remaining_by_isbn("0000000000").unwrap(), 0);
        assert_eq!(library.remaining_by_title("the iliad").unwrap(), 1);
        assert_eq!(library.remaining_by_author("HOMER").unwrap(), 2);
        assert_eq!(library.remaining_by_author("Hom").unwrap(), 0);
        assert_eq!(library.remaining_by_author(" ").unwrap(), 0);
    }

    #[test]
    fn availability_views_are_snapshots() {
        let library = stocked();
        let before = library.find_by_isbn(ODYSSEY).unwrap();
        library.borrow(ODYSSEY).unwrap();
        let after = library.find_by_isbn(ODYSSEY).unwrap();

        assert_eq!(before.available_copies, 2);
        assert_eq!(after.available_copies, 1);
    }

    #[test]
    fn clones_share_the_store() {
        let library = stocked();
        let other = library.clone();
        assert!(other.borrow(ILIAD).unwrap());
        assert!(!library.can_borrow(ILIAD).unwrap());
    }

    #[test]
    fn concurrent_borrows_through_the_library() {
        use std::thread;

        let library = Library::in_memory();
        library.add_book(&odyssey(), 10).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let library = library.clone();
                thread::spawn(move || {
                    (0..5).filter(|_| library.borrow(ODYSSEY).unwrap()).count()
                })
            })
            .collect();

        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .sum();
        assert_eq!(wins, 10);
        assert_eq!(library.total_borrowed_count().unwrap(), 10);
        assert_eq!(library.remaining_by_isbn(ODYSSEY).unwrap(), 0);
    }
}
