use libris_inventory::InventoryRecord;
use libris_types::Book;
use serde::{Deserialize, Serialize};

/// Read-only view of one book and how many copies are on the shelf.
///
/// Unlike an [`InventoryRecord`], this is an owned snapshot: it does not
/// change when copies are later borrowed or restocked.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookAvailability {
    pub book: Book,
    pub available_copies: u32,
}

impl BookAvailability {
    pub fn is_available(&self) -> bool {
        self.book.is_borrowable() && self.available_copies > 0
    }
}

impl From<&InventoryRecord> for BookAvailability {
    fn from(record: &InventoryRecord) -> Self {
        Self {
            book: record.book().clone(),
            available_copies: record.available_copies(),
        }
    }
}
