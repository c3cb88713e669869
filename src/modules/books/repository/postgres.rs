use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use super::{BookRepository, RepositoryResult};
use crate::modules::books::models::Book;

const SELECT_ALL: &str = "SELECT id, title, author, isbn, published_date, pages, category, \
     available, price FROM books ORDER BY id";

const SELECT_BY_ID: &str = "SELECT id, title, author, isbn, published_date, pages, category, \
     available, price FROM books WHERE id = $1";

const INSERT: &str = "INSERT INTO books (title, author, isbn, published_date, pages, category, \
     available, price) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
     RETURNING id, title, author, isbn, published_date, pages, category, available, price";

const UPSERT: &str = "INSERT INTO books (id, title, author, isbn, published_date, pages, \
     category, available, price) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
     ON CONFLICT (id) DO UPDATE SET title = EXCLUDED.title, author = EXCLUDED.author, \
     isbn = EXCLUDED.isbn, published_date = EXCLUDED.published_date, pages = EXCLUDED.pages, \
     category = EXCLUDED.category, available = EXCLUDED.available, price = EXCLUDED.price \
     RETURNING id, title, author, isbn, published_date, pages, category, available, price";

const DELETE_BY_ID: &str = "DELETE FROM books WHERE id = $1";

const EXISTS_BY_ID: &str = "SELECT EXISTS (SELECT 1 FROM books WHERE id = $1)";

const SEARCH_BY_AUTHOR: &str = r"SELECT id, title, author, isbn, published_date, pages, category,
     available, price FROM books WHERE author ILIKE '%' || $1 || '%' ESCAPE '\' ORDER BY id";

/// Book store backed by the `books` table.
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Book>> {
        Ok(sqlx::query_as::<_, Book>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>> {
        Ok(sqlx::query_as::<_, Book>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save(&self, book: Book) -> RepositoryResult<Book> {
        // An explicit id does not advance `book_seq`.
        let query = match book.id {
            None => sqlx::query_as::<Postgres, Book>(INSERT),
            Some(id) => sqlx::query_as::<Postgres, Book>(UPSERT).bind(id),
        };

        Ok(query
            .bind(book.title)
            .bind(book.author)
            .bind(book.isbn)
            .bind(book.published_date)
            .bind(book.pages)
            .bind(book.category)
            .bind(book.available)
            .bind(book.price)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        sqlx::query(DELETE_BY_ID)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(sqlx::query_scalar::<_, bool>(EXISTS_BY_ID)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_by_author_containing_ignore_case(
        &self,
        author: &str,
    ) -> RepositoryResult<Vec<Book>> {
        Ok(sqlx::query_as::<_, Book>(SEARCH_BY_AUTHOR)
            .bind(escape_like(author))
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Escape `LIKE` metacharacters so the term matches literally under `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
