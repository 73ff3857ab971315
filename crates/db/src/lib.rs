//! SQLite connection pooling and migration tooling.
//!
//! Modules contribute [`Migration`]s through the kernel registry; this crate
//! applies them once each and records them in the `_migrations` ledger.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use booklib_kernel::settings::DatabaseSettings;
use booklib_kernel::{InitCtx, Migration, Module};

/// Shared connection pool handed to persistence adapters.
pub type DbPool = Pool<Sqlite>;

/// Open a pool according to `settings`.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DbPool> {
    let in_memory = settings.is_in_memory_sqlite();

    let mut options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_millis(settings.busy_timeout_ms));

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(settings.max_connections);

    // An in-memory database lives and dies with its connection.
    if in_memory {
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| "failed to open SQLite pool")?;

    tracing::info!(
        target: "booklib-db",
        max_connections = settings.max_connections,
        busy_timeout_ms = settings.busy_timeout_ms,
        in_memory,
        "SQLite pool created"
    );

    Ok(pool)
}

/// Apply every migration not yet recorded in the ledger, in the order given.
///
/// Returns the number of migrations applied by this call.
pub async fn run_migrations(
    pool: &DbPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            module TEXT NOT NULL,
            id TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .execute(pool)
    .await
    .with_context(|| "failed to create migration ledger")?;

    let mut applied = 0;

    for (module, migration) in migrations {
        let already_applied: Option<(String,)> =
            sqlx::query_as("SELECT id FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .with_context(|| "failed to read migration ledger")?;

        if already_applied.is_some() {
            tracing::debug!(target: "booklib-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;

        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(target: "booklib-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

/// Core module owning the pool's lifetime: it checks connectivity on init
/// and closes the pool on shutdown.
pub struct DatabaseModule {
    pool: DbPool,
}

impl DatabaseModule {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .with_context(|| "database ping failed")?;
        tracing::info!(module = self.name(), "database reachable");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.pool.close().await;
        tracing::info!(module = self.name(), "database pool closed");
        Ok(())
    }
}
