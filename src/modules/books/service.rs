use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::entity::{Book, IdGenerator, UuidV4Ids};
use super::error::BookError;
use super::repository::BookRepository;

/// Fields for a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBookInput {
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// Replacement fields for an existing book; every field is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBookInput {
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// Check the caller-facing preconditions shared by both inputs, in order:
/// title, author, year.
pub fn validate_fields(title: &str, author: &str, year: i32) -> Result<(), BookError> {
    if title.is_empty() {
        return Err(BookError::InvalidArgument("title cannot be empty"));
    }
    if author.is_empty() {
        return Err(BookError::InvalidArgument("author cannot be empty"));
    }
    if year == 0 {
        return Err(BookError::InvalidArgument("year cannot be empty"));
    }
    Ok(())
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), BookError> {
    if cancel.is_cancelled() {
        Err(BookError::Cancelled)
    } else {
        Ok(())
    }
}

/// Book lifecycle: validates input, builds or merges the entity and hands it
/// to the repository. Holds no per-call state, so one instance is shared by
/// all requests.
#[derive(Clone)]
pub struct BookService {
    repo: Arc<dyn BookRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl BookService {
    pub fn new(repo: Arc<dyn BookRepository>) -> Self {
        Self::with_id_generator(repo, Arc::new(UuidV4Ids))
    }

    pub fn with_id_generator(repo: Arc<dyn BookRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repo, ids }
    }

    /// Validate and store a new book, returning it with its assigned id.
    pub async fn add_book(
        &self,
        cancel: &CancellationToken,
        input: AddBookInput,
    ) -> Result<Book, BookError> {
        validate_fields(&input.title, &input.author, input.year)?;

        let book = Book::new(
            self.ids.as_ref(),
            input.title,
            input.author,
            input.year,
        )?;

        ensure_live(cancel)?;
        self.repo.add_book(cancel, &book).await?;

        Ok(book)
    }

    /// `Ok(None)` when no book has this id.
    pub async fn get_book(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<Option<Book>, BookError> {
        ensure_live(cancel)?;
        Ok(self.repo.get_by_id(cancel, id).await?)
    }

    pub async fn get_all_books(&self, cancel: &CancellationToken) -> Result<Vec<Book>, BookError> {
        ensure_live(cancel)?;
        Ok(self.repo.get_all_books(cancel).await?)
    }

    /// Replace title, author and year of an existing book.
    ///
    /// Fails with [`BookError::NotFound`] without writing anything when the
    /// book does not exist. The merged entity is not re-validated.
    pub async fn update_book(
        &self,
        cancel: &CancellationToken,
        id: &str,
        input: UpdateBookInput,
    ) -> Result<(), BookError> {
        let mut book = self
            .get_book(cancel, id)
            .await?
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        book.title = input.title;
        book.author = input.author;
        book.year = input.year;

        ensure_live(cancel)?;
        self.repo.update_book(cancel, &book).await?;

        Ok(())
    }

    /// Remove a book. Deleting an unknown id succeeds.
    pub async fn delete_book(&self, cancel: &CancellationToken, id: &str) -> Result<(), BookError> {
        ensure_live(cancel)?;
        Ok(self.repo.delete_book(cancel, id).await?)
    }
}
