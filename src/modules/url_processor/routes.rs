use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use booklib_http::error::AppError;

use super::engine::{UrlError, UrlProcessor};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessUrlRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub operation: String,
}

impl ProcessUrlRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.url.is_empty() {
            return Err(AppError::bad_request("url cannot be empty"));
        }
        if self.operation.is_empty() {
            return Err(AppError::bad_request("operation cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessUrlResponse {
    pub processed_url: String,
}

impl From<UrlError> for AppError {
    fn from(err: UrlError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

/// Routes mounted under `/api/process-url`.
pub fn router(processor: Arc<UrlProcessor>) -> Router {
    Router::new()
        .route("/", post(process_url))
        .route("/health", get(health_check))
        .with_state(processor)
}

async fn health_check() -> &'static str {
    "process-url module is healthy"
}

async fn process_url(
    State(processor): State<Arc<UrlProcessor>>,
    payload: Result<Json<ProcessUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProcessUrlResponse>), AppError> {
    let Json(req) = payload.map_err(|_| AppError::bad_request("cannot parse JSON"))?;
    req.validate()?;

    let processed_url = processor.clean_url(&req.operation, &req.url)?;

    tracing::debug!(operation = %req.operation, %processed_url, "url processed");
    Ok((StatusCode::CREATED, Json(ProcessUrlResponse { processed_url })))
}
