//! Book catalog: entity, persistence contract, adapters, lifecycle service
//! and HTTP surface.

pub mod entity;
pub mod error;
pub mod models;
pub mod repo;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use booklib_kernel::{InitCtx, Migration, Module};
use serde_json::json;

pub use entity::{Book, IdGenerator, UuidV4Ids};
pub use error::{BookError, RepositoryError};
pub use repository::BookRepository;
pub use service::{AddBookInput, BookService, UpdateBookInput};

/// Books module: mounts the catalog routes and owns the `books` schema.
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }

    /// Schema for [`repo::SqliteBookRepository`].
    pub fn schema_migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    author TEXT NOT NULL,
                    year INTEGER NOT NULL,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                );
                "#,
        }]
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.service))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let with_description = |description: &str| {
            let mut response = error.clone();
            response["description"] = json!(description);
            response
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);
        let book_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookRequest" }
                }
            }
        });
        let status_ok = json!({
            "description": "OK",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/StatusResponse" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string" },
                                                "data": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/Book" }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                            "500": with_description("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": book_body,
                        "responses": {
                            "201": { "description": "Book created" },
                            "400": with_description("Invalid input"),
                            "500": with_description("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id; data is null when absent",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Book or null",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string" },
                                                "data": { "$ref": "#/components/schemas/Book" }
                                            }
                                        }
                                    }
                                }
                            },
                            "500": with_description("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "requestBody": book_body,
                        "responses": {
                            "200": status_ok,
                            "400": with_description("Invalid input"),
                            "404": with_description("Book not found"),
                            "500": with_description("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book (idempotent)",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": status_ok,
                            "500": with_description("Internal server error")
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Unique identifier for the book" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "year": { "type": "integer", "format": "int32" }
                        },
                        "required": ["id", "title", "author", "year"]
                    },
                    "BookRequest": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "year": { "type": "integer", "format": "int32", "description": "Must be non-zero" }
                        },
                        "required": ["title", "author", "year"]
                    },
                    "StatusResponse": {
                        "type": "object",
                        "properties": { "status": { "type": "string" } }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        Self::schema_migrations()
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(service: Arc<BookService>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repo::InMemoryBookRepository;

    #[test]
    fn module_contributes_books_schema() {
        let service = Arc::new(BookService::new(Arc::new(InMemoryBookRepository::new())));
        let module = create_module(service);

        assert_eq!(module.name(), "books");
        let migrations = module.migrations();
        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].id, "001_create_books");
        assert!(migrations[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
    }

    #[test]
    fn openapi_fragment_documents_every_route() {
        let service = Arc::new(BookService::new(Arc::new(InMemoryBookRepository::new())));
        let spec = BooksModule::new(service).openapi().unwrap();

        for path in ["/", "/{id}", "/health"] {
            assert!(spec["paths"][path].is_object(), "missing {path}");
        }
        assert!(spec["paths"]["/{id}"]["put"].is_object());
        assert!(spec["components"]["schemas"]["Book"].is_object());
    }
}
