use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Borrowed view of process state handed to `Module::init`
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One SQL script owned by a module, recorded by `id` once applied
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A unit of the booklib service: storage plumbing or a feature mounted
/// under `/api/{name}`.
///
/// Lifecycle: migrations are applied first, then `init` runs for every
/// module, then the HTTP server serves `routes`, and `stop` runs on
/// shutdown.
#[async_trait]
pub trait Module: Sync + Send {
    /// Mount segment and registry key; must be unique
    fn name(&self) -> &'static str;

    /// Verify dependencies before serving; an error aborts startup
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` relative to the mount point and
    /// optional `components.schemas`
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Release resources; called in reverse registration order
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
