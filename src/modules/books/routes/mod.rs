//! HTTP handlers for the books module.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use booklib_http::error::AppError;

use super::entity::Book;
use super::error::BookError;
use super::models::{BookRequest, CreatedBook, DataResponse, StatusResponse};
use super::service::{validate_fields, BookService};
use crate::utils::RequestScope;

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::InvalidArgument(reason) => AppError::bad_request(reason),
            BookError::NotFound(_) => AppError::not_found(err.to_string()),
            BookError::Cancelled => AppError::timeout(err.to_string()),
            BookError::Persistence(source) => AppError::Internal(source.into()),
        }
    }
}

/// Routes mounted under `/api/books`.
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

fn parse_body(payload: Result<Json<BookRequest>, JsonRejection>) -> Result<BookRequest, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable book payload");
        AppError::bad_request("cannot parse JSON")
    })?;
    validate_fields(&req.title, &req.author, req.year)?;
    Ok(req)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(service): State<Arc<BookService>>,
) -> Result<Json<DataResponse<Vec<Book>>>, AppError> {
    let scope = RequestScope::new();
    let books = service.get_all_books(scope.token()).await?;
    Ok(Json(DataResponse::success(books)))
}

async fn add_book(
    State(service): State<Arc<BookService>>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<CreatedBook>>), AppError> {
    let req = parse_body(payload)?;

    let scope = RequestScope::new();
    let book = service.add_book(scope.token(), req.into()).await?;

    tracing::info!(book_id = %book.id, "book created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::success(CreatedBook { id: book.id })),
    ))
}

/// Absence is reported as `data: null` with 200, not as an error.
async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Option<Book>>>, AppError> {
    let scope = RequestScope::new();
    let book = service.get_book(scope.token(), &id).await?;
    Ok(Json(DataResponse::success(book)))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let req = parse_body(payload)?;

    let scope = RequestScope::new();
    service.update_book(scope.token(), &id, req.into()).await?;

    tracing::info!(book_id = %id, "book updated");
    Ok(Json(StatusResponse::success()))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let scope = RequestScope::new();
    service.delete_book(scope.token(), &id).await?;

    tracing::info!(book_id = %id, "book deleted");
    Ok(Json(StatusResponse::success()))
}
