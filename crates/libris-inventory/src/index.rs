//! Exact-match secondary index from a normalized string to ISBNs.

use std::collections::{BTreeSet, HashMap};

use libris_types::{is_blank, normalize};

/// Maps a normalized author or title to the ISBNs that carry it.
///
/// The index holds keys only, never records: the primary map stays the single
/// source of truth for stock, and an index hit is resolved against it on
/// every lookup. Not synchronized on its own; the owning store wraps it in a
/// lock.
#[derive(Debug, Default)]
pub struct ExactMatchIndex {
    entries: HashMap<String, BTreeSet<String>>,
}

impl ExactMatchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `isbn` under the normalized form of `value`.
    ///
    /// Returns `false` if the normalized value is blank and nothing was
    /// indexed.
    pub fn insert(&mut self, value: &str, isbn: &str) -> bool {
        let key = normalize(value);
        if is_blank(&key) {
            return false;
        }
        self.entries.entry(key).or_default().insert(isbn.to_string());
        true
    }

    /// ISBNs whose indexed value equals `query` after normalization.
    pub fn lookup(&self, query: &str) -> Option<&BTreeSet<String>> {
        self.entries
            .get(&normalize(query))
            .filter(|isbns| !isbns.is_empty())
    }

    /// Number of distinct normalized keys.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
