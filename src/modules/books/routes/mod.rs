//! HTTP handlers for `/api/books`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::AppError;
use serde::Deserialize;

use super::models::Book;
use super::repository::{BookRepositoryArc, RepositoryError};
use crate::utils;

impl From<RepositoryError> for AppError {
    fn from(error: RepositoryError) -> Self {
        AppError::Internal(error.into())
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author: String,
}

/// Build the books router on top of a repository.
pub fn router(repository: BookRepositoryArc) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::debug!(target: "bookshelf.routes", %prefix, "registering book routes");

    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/search", get(search_by_author))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

async fn list_books(State(repo): State<BookRepositoryArc>) -> Result<Json<Vec<Book>>, AppError> {
    let books = repo.find_all().await?;
    tracing::debug!(count = books.len(), "listed books");
    Ok(Json(books))
}

async fn get_book(
    State(repo): State<BookRepositoryArc>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    match repo.find_by_id(id).await? {
        Some(book) => Ok(Json(book)),
        None => {
            tracing::debug!(book_id = id, "book not found");
            Err(AppError::not_found())
        }
    }
}

async fn create_book(
    State(repo): State<BookRepositoryArc>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(mut book) = payload?;
    // Ids are assigned by the store only.
    book.id = None;

    let saved = repo.save(book).await?;
    tracing::info!(book_id = ?saved.id, "book created");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Fetch, overwrite the updatable fields, write back. Concurrent updates to the same id
/// race and the last write wins.
async fn update_book(
    State(repo): State<BookRepositoryArc>,
    Path(id): Path<i64>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(details) = payload?;

    let Some(mut book) = repo.find_by_id(id).await? else {
        tracing::debug!(book_id = id, "book not found for update");
        return Err(AppError::not_found());
    };

    book.apply_update(details);
    let updated = repo.save(book).await?;
    tracing::info!(book_id = id, "book updated");
    Ok(Json(updated))
}

async fn delete_book(
    State(repo): State<BookRepositoryArc>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !repo.exists_by_id(id).await? {
        tracing::debug!(book_id = id, "book not found for delete");
        return Err(AppError::not_found());
    }

    repo.delete_by_id(id).await?;
    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn search_by_author(
    State(repo): State<BookRepositoryArc>,
    Query(query): Query<AuthorQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = repo
        .find_by_author_containing_ignore_case(&query.author)
        .await?;
    tracing::debug!(author = %query.author, count = books.len(), "searched books by author");
    Ok(Json(books))
}
