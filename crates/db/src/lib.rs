//! Postgres connection pool factory, schema bootstrap, and database lifecycle module.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::{InitCtx, Module, SchemaStep};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open a connection pool against the configured Postgres database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    tracing::info!(
        target: "bookshelf-db",
        max_connections = settings.max_connections,
        "connecting to postgres"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .connect(&settings.url)
        .await
        .context("failed to connect to postgres")
}

/// Execute schema steps in order.
///
/// Every step is expected to be idempotent; nothing is recorded about which steps ran.
pub async fn apply_schema(pool: &PgPool, steps: &[(String, SchemaStep)]) -> anyhow::Result<()> {
    for (module, step) in steps {
        tracing::debug!(target: "bookshelf-db", %module, step = step.id, "applying schema step");

        sqlx::query(step.sql)
            .execute(pool)
            .await
            .with_context(|| format!("schema step '{}/{}' failed", module, step.id))?;
    }

    tracing::info!(target: "bookshelf-db", steps = steps.len(), "schema applied");
    Ok(())
}

/// Core module owning the shared connection pool.
pub struct DbModule {
    pool: PgPool,
}

impl DbModule {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Module for DbModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("database ping failed")?;
        tracing::info!(module = self.name(), "database reachable");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.pool.close().await;
        tracing::info!(module = self.name(), "connection pool closed");
        Ok(())
    }
}
