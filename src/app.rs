//! Process bootstrap shared by the server binary and the CLI.

use std::sync::Arc;

use anyhow::Context;
use bookshelf_db::DbModule;
use bookshelf_kernel::settings::{Settings, StoreKind};
use bookshelf_kernel::{InitCtx, ModuleRegistry};

use crate::modules;
use crate::modules::books::repository::{BookRepositoryArc, MemoryBookRepository, PgBookRepository};

/// Registry with every module wired to the configured store.
pub struct Application {
    pub registry: ModuleRegistry,
    pool: Option<sqlx::PgPool>,
}

impl Application {
    /// Connect to the configured store and register all modules.
    pub async fn build(settings: &Settings) -> anyhow::Result<Self> {
        let mut registry = ModuleRegistry::new();

        let (repository, pool) = match settings.database.store {
            StoreKind::Postgres => {
                let pool = bookshelf_db::connect(&settings.database).await?;
                registry.register_core(Arc::new(DbModule::new(pool.clone())));
                (Arc::new(PgBookRepository::new(pool.clone())) as BookRepositoryArc, Some(pool))
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory book store; data is lost on shutdown");
                (Arc::new(MemoryBookRepository::new()) as BookRepositoryArc, None)
            }
        };

        modules::register_all(&mut registry, repository);

        Ok(Self { registry, pool })
    }

    /// Apply every module's schema steps. No-op for the in-memory store.
    pub async fn apply_schema(&self) -> anyhow::Result<()> {
        match &self.pool {
            Some(pool) => bookshelf_db::apply_schema(pool, &self.registry.collect_schema()).await,
            None => Ok(()),
        }
    }
}

/// Boot every module, serve HTTP until a shutdown signal, then stop every module.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let app = Application::build(settings).await?;
    app.apply_schema()
        .await
        .context("failed to apply database schema")?;

    let ctx = InitCtx { settings };
    app.registry.init_all(&ctx).await?;
    app.registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&app.registry, settings, shutdown_signal()).await;

    app.registry.stop_all().await?;
    served
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
