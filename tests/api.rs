//! End-to-end requests through the fully mounted router.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use booklib_app::bootstrap::{build_registry, migrate, Resources};
use booklib_kernel::settings::{DatabaseSettings, Settings};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let settings = Settings {
        database: DatabaseSettings::in_memory(),
        ..Settings::default()
    };
    let resources = Resources::build(&settings).await.unwrap();
    let registry = build_registry(&settings, &resources);
    migrate(&registry, &resources).await.unwrap();
    booklib_http::build_router(&registry, &settings)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn book_lifecycle_against_sqlite() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"title": "Dune", "author": "Frank Herbert", "year": 1965})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["title"], "Dune");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/books/{id}"),
        Some(json!({"title": "Dune Messiah", "author": "Frank Herbert", "year": 1969})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(
        listed["data"],
        json!([{"id": id, "title": "Dune Messiah", "author": "Frank Herbert", "year": 1969}])
    );

    let (status, _) = send(&app, "DELETE", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = send(&app, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], Value::Null);
}

#[tokio::test]
async fn update_of_unknown_book_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "PUT",
        "/api/books/ghost",
        Some(json!({"title": "T", "author": "A", "year": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn process_url_is_mounted() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/process-url",
        Some(json!({
            "url": "https://BYFOOD.com/food-EXPeriences?query=abc/",
            "operation": "redirection"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["processed_url"],
        "https://www.byfood.com/food-experiences?query=abc/"
    );
}

#[tokio::test]
async fn openapi_document_lists_module_paths() {
    let app = app().await;
    let (status, spec) = send(&app, "GET", "/docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/api/books"].is_object());
    assert!(spec["paths"]["/api/books/{id}"].is_object());
    assert!(spec["paths"]["/api/process-url"].is_object());
}
