use serde::{Deserialize, Serialize};

/// Configuration for the library service layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Largest number of copies a single `add_book` call may register.
    pub max_copies_per_add: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_copies_per_add: 10_000,
        }
    }
}
