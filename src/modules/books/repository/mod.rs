use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use super::models::Book;

/// In-memory repository implementation.
pub mod memory;
/// Postgres repository implementation.
pub mod postgres;

pub use memory::MemoryBookRepository;
pub use postgres::PgBookRepository;

/// Failure reported by a book store. Absence of a record is never an error.
#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence operations for books.
///
/// Each call is atomic on its own; callers combining several calls get no isolation
/// between them.
#[async_trait]
pub trait BookRepository: Debug {
    /// Returns every stored book, ordered by id.
    async fn find_all(&self) -> RepositoryResult<Vec<Book>>;

    /// Returns the book with exactly this id, if any.
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>>;

    /// Stores a book and returns it as stored.
    ///
    /// A book without an id is inserted under the next sequence value. A book with an id
    /// replaces the stored row with that id, or is inserted under it if none exists.
    async fn save(&self, book: Book) -> RepositoryResult<Book>;

    /// Removes the book with this id. Removing a missing id is a no-op.
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool>;

    /// Returns books whose author contains `author`, ignoring case, ordered by id.
    ///
    /// The term is matched literally; books without an author never match.
    async fn find_by_author_containing_ignore_case(
        &self,
        author: &str,
    ) -> RepositoryResult<Vec<Book>>;
}

/// Thread-safe shared reference to a book repository.
pub type BookRepositoryArc = Arc<dyn BookRepository + Send + Sync>;
