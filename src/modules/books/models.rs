use serde::{Deserialize, Serialize};

use super::service::{AddBookInput, UpdateBookInput};

/// Request body for creating or replacing a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: i32,
}

impl From<BookRequest> for AddBookInput {
    fn from(req: BookRequest) -> Self {
        AddBookInput {
            title: req.title,
            author: req.author,
            year: req.year,
        }
    }
}

impl From<BookRequest> for UpdateBookInput {
    fn from(req: BookRequest) -> Self {
        UpdateBookInput {
            title: req.title,
            author: req.author,
            year: req.year,
        }
    }
}

/// `{"status": "success"}`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const fn success() -> Self {
        Self { status: "success" }
    }
}

/// `{"status": "success", "data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Identifier of a freshly created book.
#[derive(Debug, Serialize)]
pub struct CreatedBook {
    pub id: String,
}
