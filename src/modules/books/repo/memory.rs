use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::modules::books::entity::Book;
use crate::modules::books::error::RepositoryError;
use crate::modules::books::repository::BookRepository;

/// Process-local book store, ordered by id. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<BTreeMap<String, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), RepositoryError> {
    if cancel.is_cancelled() {
        Err(RepositoryError::Cancelled)
    } else {
        Ok(())
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add_book(
        &self,
        cancel: &CancellationToken,
        book: &Book,
    ) -> Result<(), RepositoryError> {
        ensure_live(cancel)?;
        let mut books = self.books.write().await;
        if books.contains_key(&book.id) {
            return Err(RepositoryError::Backend(format!(
                "duplicate book id {}",
                book.id
            )));
        }
        books.insert(book.id.clone(), book.clone());
        Ok(())
    }

    async fn get_all_books(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Book>, RepositoryError> {
        ensure_live(cancel)?;
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<Option<Book>, RepositoryError> {
        ensure_live(cancel)?;
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn update_book(
        &self,
        cancel: &CancellationToken,
        book: &Book,
    ) -> Result<(), RepositoryError> {
        ensure_live(cancel)?;
        // Zero rows matched is success, as with an SQL UPDATE.
        if let Some(stored) = self.books.write().await.get_mut(&book.id) {
            *stored = book.clone();
        }
        Ok(())
    }

    async fn delete_book(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<(), RepositoryError> {
        ensure_live(cancel)?;
        self.books.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str) -> Book {
        Book {
            id: id.to_string(),
            title: "Test Book".to_string(),
            author: "Test Author".to_string(),
            year: 2023,
        }
    }

    #[tokio::test]
    async fn books_are_listed_in_id_order() {
        let repo = InMemoryBookRepository::new();
        let cancel = CancellationToken::new();
        repo.add_book(&cancel, &book("b")).await.unwrap();
        repo.add_book(&cancel, &book("a")).await.unwrap();

        let ids: Vec<String> = repo
            .get_all_books(&cancel)
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn duplicate_add_is_a_backend_error() {
        let repo = InMemoryBookRepository::new();
        let cancel = CancellationToken::new();
        repo.add_book(&cancel, &book("a")).await.unwrap();

        let err = repo.add_book(&cancel, &book("a")).await.unwrap_err();
        assert_eq!(err, RepositoryError::Backend("duplicate book id a".to_string()));
    }

    #[tokio::test]
    async fn update_of_missing_book_is_a_no_op() {
        let repo = InMemoryBookRepository::new();
        let cancel = CancellationToken::new();

        repo.update_book(&cancel, &book("ghost")).await.unwrap();
        assert_eq!(repo.get_by_id(&cancel, "ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_missing_book_succeeds() {
        let repo = InMemoryBookRepository::new();
        repo.delete_book(&CancellationToken::new(), "ghost")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_calls_touch_nothing() {
        let repo = InMemoryBookRepository::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            repo.add_book(&cancel, &book("a")).await,
            Err(RepositoryError::Cancelled)
        );
        assert!(repo
            .get_all_books(&CancellationToken::new())
            .await
            .unwrap()
            .is_empty());
    }
}
