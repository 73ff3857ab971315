//! Process wiring: storage resources, module registry, migrations and the
//! HTTP server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use booklib_db::{DatabaseModule, DbPool};
use booklib_kernel::settings::{Settings, StorageBackend};
use booklib_kernel::{InitCtx, ModuleRegistry};

use crate::modules::books::repo::{InMemoryBookRepository, SqliteBookRepository};
use crate::modules::books::BookRepository;

/// External resources the modules are built on.
pub struct Resources {
    pub books: Arc<dyn BookRepository>,
    /// Present for the SQLite backend only.
    pub pool: Option<DbPool>,
}

impl Resources {
    pub async fn build(settings: &Settings) -> anyhow::Result<Self> {
        match settings.database.backend {
            StorageBackend::Sqlite => {
                let pool = booklib_db::connect(&settings.database).await?;
                Ok(Self {
                    books: Arc::new(SqliteBookRepository::new(pool.clone())),
                    pool: Some(pool),
                })
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory book storage; data is lost on exit");
                Ok(Self {
                    books: Arc::new(InMemoryBookRepository::new()),
                    pool: None,
                })
            }
        }
    }
}

/// Registry holding the database core module (when there is a pool) and
/// every project module.
pub fn build_registry(settings: &Settings, resources: &Resources) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();

    if let Some(pool) = &resources.pool {
        registry.register_core(Arc::new(DatabaseModule::new(pool.clone())));
    }

    crate::modules::register_all(&mut registry, settings, Arc::clone(&resources.books));
    registry
}

/// Apply pending migrations from every registered module.
pub async fn migrate(registry: &ModuleRegistry, resources: &Resources) -> anyhow::Result<usize> {
    let Some(pool) = &resources.pool else {
        tracing::info!("no database pool; skipping migrations");
        return Ok(0);
    };

    let migrations = registry.collect_migrations();
    let applied = booklib_db::run_migrations(pool, &migrations)
        .await
        .with_context(|| "failed to run migrations")?;

    tracing::info!(applied, total = migrations.len(), "migrations complete");
    Ok(applied)
}

/// Connect to storage and apply migrations without serving.
pub async fn migrate_only(settings: &Settings) -> anyhow::Result<usize> {
    let resources = Resources::build(settings).await?;
    let registry = build_registry(settings, &resources);
    let applied = migrate(&registry, &resources).await?;

    if let Some(pool) = &resources.pool {
        pool.close().await;
    }
    Ok(applied)
}

/// Run the service until Ctrl-C, then stop every module.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let resources = Resources::build(settings).await?;
    let registry = build_registry(settings, &resources);

    migrate(&registry, &resources).await?;

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;

    tracing::info!("booklib bootstrap complete");

    let served = booklib_http::start_server(&registry, settings, shutdown_signal()).await;

    let stopped = registry.stop_all().await;
    served?;
    stopped
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
