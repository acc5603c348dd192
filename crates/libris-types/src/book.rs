//! Book metadata and lending categories.
//!
//! A [`Book`] always holds a non-blank ISBN, title and author. The check runs
//! in [`Book::new`] and again when a book is deserialized.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::text::require_non_blank;

/// Lending category of a book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookCategory {
    /// Ordinary stock that may be lent out.
    Normal,
    /// In-library material; never borrowable regardless of stock.
    Reference,
}

impl BookCategory {
    /// Whether copies of this category may ever be borrowed.
    pub fn is_borrowable(self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

impl FromStr for BookCategory {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "reference" => Ok(Self::Reference),
            other => Err(TypeError::UnknownCategory(other.to_string())),
        }
    }
}

/// Immutable book metadata.
///
/// A `Book` is a plain value: two books are equal only if every field is
/// equal. The ISBN is the identity used by the inventory, but the inventory
/// also compares the remaining fields to reject conflicting re-registrations.
///
/// All string fields are validated to be non-blank on construction, including
/// when deserializing. Ordering is by ISBN first.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawBook")]
pub struct Book {
    isbn: String,
    title: String,
    author: String,
    category: BookCategory,
}

impl Book {
    /// Create a validated book.
    ///
    /// # Examples
    ///
    /// ```
    /// use libris_types::{Book, BookCategory};
    ///
    /// let book = Book::new("9780140449136", "The Odyssey", "Homer", BookCategory::Normal).unwrap();
    /// assert_eq!(book.author(), "Homer");
    /// assert!(Book::new(" ", "The Odyssey", "Homer", BookCategory::Normal).is_err());
    /// ```
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        category: BookCategory,
    ) -> TypeResult<Self> {
        let isbn = isbn.into();
        let title = title.into();
        let author = author.into();
        require_non_blank(&isbn, "isbn")?;
        require_non_blank(&title, "title")?;
        require_non_blank(&author, "author")?;
        Ok(Self {
            isbn,
            title,
            author,
            category,
        })
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> BookCategory {
        self.category
    }

    /// Shorthand for `self.category().is_borrowable()`.
    pub fn is_borrowable(&self) -> bool {
        self.category.is_borrowable()
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} [{}]", self.title, self.author, self.isbn)
    }
}

#[derive(Deserialize)]
struct RawBook {
    isbn: String,
    title: String,
    author: String,
    category: BookCategory,
}

impl TryFrom<RawBook> for Book {
    type Error = TypeError;

    fn try_from(raw: RawBook) -> Result<Self, Self::Error> {
        Book::new(raw.isbn, raw.title, raw.author, raw.category)
    }
}
