use std::future::Future;

use async_trait::async_trait;
use sqlx::FromRow;
use tokio_util::sync::CancellationToken;

use booklib_db::DbPool;

use crate::modules::books::entity::Book;
use crate::modules::books::error::RepositoryError;
use crate::modules::books::repository::BookRepository;

/// Books stored in the `books` table created by the module's migrations.
pub struct SqliteBookRepository {
    pool: DbPool,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Row shape of `books`; the audit timestamps stay in storage.
#[derive(FromRow)]
struct BookRow {
    id: String,
    title: String,
    author: String,
    year: i32,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            year: row.year,
        }
    }
}

/// Run `query` unless `cancel` fires first; a cancelled query is dropped,
/// which releases its connection back to the pool.
async fn cancellable<T, F>(cancel: &CancellationToken, query: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RepositoryError::Cancelled),
        result = query => result.map_err(RepositoryError::from),
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn add_book(
        &self,
        cancel: &CancellationToken,
        book: &Book,
    ) -> Result<(), RepositoryError> {
        let insert = sqlx::query("INSERT INTO books (id, title, author, year) VALUES (?, ?, ?, ?)")
            .bind(&book.id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.year)
            .execute(&self.pool);

        cancellable(cancel, insert).await?;
        Ok(())
    }

    async fn get_all_books(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Book>, RepositoryError> {
        let select = sqlx::query_as::<_, BookRow>("SELECT id, title, author, year FROM books")
            .fetch_all(&self.pool);

        let rows = cancellable(cancel, select).await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<Option<Book>, RepositoryError> {
        let select =
            sqlx::query_as::<_, BookRow>("SELECT id, title, author, year FROM books WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool);

        let row = cancellable(cancel, select).await?;
        Ok(row.map(Book::from))
    }

    async fn update_book(
        &self,
        cancel: &CancellationToken,
        book: &Book,
    ) -> Result<(), RepositoryError> {
        let update = sqlx::query(
            r#"
            UPDATE books
            SET title = ?, author = ?, year = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(&book.id)
        .execute(&self.pool);

        cancellable(cancel, update).await?;
        Ok(())
    }

    async fn delete_book(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let delete = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool);

        cancellable(cancel, delete).await?;
        Ok(())
    }
}
