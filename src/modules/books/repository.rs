use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::entity::Book;
use super::error::RepositoryError;

/// Storage capability for books. Every call takes the caller's cancellation
/// token; adapters abandon the operation and return
/// [`RepositoryError::Cancelled`] once it fires.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn add_book(&self, cancel: &CancellationToken, book: &Book)
        -> Result<(), RepositoryError>;

    /// All books, in whatever order the backend yields them.
    async fn get_all_books(&self, cancel: &CancellationToken)
        -> Result<Vec<Book>, RepositoryError>;

    /// `Ok(None)` when no book has this id; absence is not an error.
    async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<Option<Book>, RepositoryError>;

    /// Overwrite the stored row matching `book.id`.
    async fn update_book(
        &self,
        cancel: &CancellationToken,
        book: &Book,
    ) -> Result<(), RepositoryError>;

    /// Remove the book; a missing id is not an error.
    async fn delete_book(&self, cancel: &CancellationToken, id: &str)
        -> Result<(), RepositoryError>;
}
