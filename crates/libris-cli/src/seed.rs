//! Seed data for a fresh catalog.
//!
//! A seed file is TOML with an optional `[catalog]` table (see
//! [`CatalogConfig`]) and any number of `[[books]]` entries:
//!
//! ```toml
//! [catalog]
//! max_copies_per_add = 100
//!
//! [[books]]
//! isbn = "9780140449136"
//! title = "The Odyssey"
//! author = "Homer"
//! category = "normal"
//! copies = 3
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use libris_catalog::{CatalogConfig, InMemoryInventory, Library};
use libris_types::{Book, BookCategory};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub books: Vec<SeedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedEntry {
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default = "default_category")]
    pub category: BookCategory,
    pub copies: u32,
}

fn default_category() -> BookCategory {
    BookCategory::Normal
}

impl SeedEntry {
    fn new(isbn: &str, title: &str, author: &str, category: BookCategory, copies: u32) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            category,
            copies,
        }
    }

    pub fn to_book(&self) -> anyhow::Result<Book> {
        Book::new(&*self.isbn, &*self.title, &*self.author, self.category)
            .with_context(|| format!("invalid seed entry for isbn {:?}", self.isbn))
    }
}

impl SeedFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing seed file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The sample shelf: two lendable Homer titles and one reference work.
    pub fn builtin() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            books: vec![
                SeedEntry::new("9780140449136", "The Odyssey", "Homer", BookCategory::Normal, 3),
                SeedEntry::new("9780140449181", "The Iliad", "Homer", BookCategory::Normal, 2),
                SeedEntry::new(
                    "9780199535569",
                    "Oxford English Dictionary",
                    "Oxford",
                    BookCategory::Reference,
                    1,
                ),
            ],
        }
    }

    /// Build an in-memory library holding every entry.
    ///
    /// Entries for the same ISBN accumulate, exactly as repeated
    /// `add_book` calls would.
    pub fn into_library(self) -> anyhow::Result<Library> {
        let library = Library::with_config(Arc::new(InMemoryInventory::new()), self.catalog);
        for entry in &self.books {
            let book = entry.to_book()?;
            library
                .add_book(&book, entry.copies)
                .with_context(|| format!("seeding isbn {}", entry.isbn))?;
        }
        tracing::info!(entries = self.books.len(), "catalog seeded");
        Ok(library)
    }
}
