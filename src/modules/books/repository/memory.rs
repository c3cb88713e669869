use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookRepository, RepositoryResult};
use crate::modules::books::models::Book;

/// In-memory implementation of the book repository.
///
/// Ids come from a sequence that only moves forward, so deleted ids are never handed out
/// again.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

impl MemoryBookRepository {
    /// Creates a new empty memory book repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Book>> {
        Ok(self.state.read().await.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>> {
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn save(&self, mut book: Book) -> RepositoryResult<Book> {
        let mut state = self.state.write().await;
        let id = match book.id {
            Some(id) => {
                state.last_id = state.last_id.max(id);
                id
            }
            None => {
                state.last_id += 1;
                state.last_id
            }
        };
        book.id = Some(id);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        self.state.write().await.books.remove(&id);
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.state.read().await.books.contains_key(&id))
    }

    async fn find_by_author_containing_ignore_case(
        &self,
        author: &str,
    ) -> RepositoryResult<Vec<Book>> {
        let needle = author.to_lowercase();
        Ok(self
            .state
            .read()
            .await
            .books
            .values()
            .filter(|book| {
                book.author
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}
