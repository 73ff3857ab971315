//! URL normalization: canonical, redirection and combined rewrites.

pub mod engine;
pub mod parse;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use booklib_kernel::{InitCtx, Module};

pub use engine::{Operation, UrlError, UrlProcessor};

pub struct UrlProcessorModule {
    processor: Arc<UrlProcessor>,
}

impl UrlProcessorModule {
    pub fn new(processor: Arc<UrlProcessor>) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl Module for UrlProcessorModule {
    fn name(&self) -> &'static str {
        "process-url"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            redirect_host = %ctx.settings.url_processor.redirect_host,
            "url processor module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.processor))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Clean and process a URL",
                        "description": "Operation is one of canonical, redirection or all (case-insensitive).",
                        "tags": ["URLProcessor"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ProcessUrlRequest" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Processed URL",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ProcessUrlResponse" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Invalid URL, operation or payload",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "ProcessUrlRequest": {
                        "type": "object",
                        "properties": {
                            "url": { "type": "string" },
                            "operation": { "type": "string", "enum": ["canonical", "redirection", "all"] }
                        },
                        "required": ["url", "operation"]
                    },
                    "ProcessUrlResponse": {
                        "type": "object",
                        "properties": { "processed_url": { "type": "string" } },
                        "required": ["processed_url"]
                    }
                }
            }
        }))
    }
}

pub fn create_module(processor: Arc<UrlProcessor>) -> Arc<dyn Module> {
    Arc::new(UrlProcessorModule::new(processor))
}
