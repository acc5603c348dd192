//! Concurrent in-memory inventory for the Libris catalog.
//!
//! The inventory owns the authoritative copy counts for every ISBN and keeps
//! two derived exact-match indexes (normalized author, normalized title) in
//! step with them.
//!
//! # Key Types
//!
//! - [`InventoryRecord`] -- One ISBN's metadata plus atomically updated counts
//! - [`RecordSnapshot`] -- A consistent read of a record's counts
//! - [`InventoryStore`] -- The storage interface
//! - [`InMemoryInventory`] -- `HashMap`-based implementation
//!
//! # Design Rules
//!
//! 1. `0 <= borrowed <= total` holds for every record at every observable point.
//! 2. Operations on the same ISBN are linearizable: their net effect equals
//!    some serial ordering of the calls.
//! 3. Borrows and restocks of existing ISBNs never take an exclusive lock;
//!    unrelated ISBNs do not contend.
//! 4. A record is indexed in the same critical section that inserts it, and
//!    never otherwise. Metadata is immutable once stored.
//! 5. Arguments are validated before anything is mutated.

pub mod error;
pub mod index;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::{InventoryError, InventoryResult};
pub use index::ExactMatchIndex;
pub use memory::InMemoryInventory;
pub use record::{InventoryRecord, RecordSnapshot};
pub use traits::InventoryStore;
