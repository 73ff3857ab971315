use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::BookError;

/// Source of fresh book identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random (v4) UUIDs in canonical hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Ids;

impl IdGenerator for UuidV4Ids {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// A catalog book. Fields are public so an update can overwrite them in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier assigned at construction
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Publication year as supplied by the caller
    pub year: i32,
}

impl Book {
    /// Build a new book, drawing its identifier from `ids`.
    ///
    /// Title and author must be non-empty; the year is not checked here.
    pub fn new(
        ids: &dyn IdGenerator,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Result<Self, BookError> {
        let title = title.into();
        let author = author.into();

        if title.is_empty() {
            return Err(BookError::InvalidArgument("title cannot be empty"));
        }
        if author.is_empty() {
            return Err(BookError::InvalidArgument("author cannot be empty"));
        }

        Ok(Self {
            id: ids.generate(),
            title,
            author,
            year,
        })
    }
}
