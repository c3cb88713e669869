pub mod models;
pub mod repository;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module, SchemaStep};

use repository::BookRepositoryArc;

/// Book catalog module, served under `/api/books`
pub struct BooksModule {
    repository: BookRepositoryArc,
}

impl BooksModule {
    pub fn new(repository: BookRepositoryArc) -> Self {
        Self { repository }
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
            store = ?ctx.settings.database.store,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn schema(&self) -> Vec<SchemaStep> {
        vec![
            SchemaStep {
                id: "001_book_seq",
                sql: "CREATE SEQUENCE IF NOT EXISTS book_seq START WITH 1 INCREMENT BY 1",
            },
            SchemaStep {
                id: "002_books",
                sql: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id             BIGINT PRIMARY KEY DEFAULT nextval('book_seq'),
                    title          TEXT,
                    author         TEXT,
                    isbn           TEXT,
                    published_date DATE,
                    pages          INTEGER,
                    category       TEXT,
                    available      BOOLEAN,
                    price          DOUBLE PRECISION
                )
                "#,
            },
            SchemaStep {
                id: "003_book_seq_owner",
                sql: "ALTER SEQUENCE book_seq OWNED BY books.id",
            },
        ]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(repository: BookRepositoryArc) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(repository))
}
