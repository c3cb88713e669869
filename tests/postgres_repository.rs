//! Postgres-backed repository checks.
//!
//! These run only when `BOOKSHELF_TEST_DATABASE_URL` points at a disposable database;
//! otherwise each test returns early.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bookshelf::modules::books::models::Book;
use bookshelf::modules::books::repository::{BookRepository, PgBookRepository};
use bookshelf::modules::books::BooksModule;
use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::ModuleRegistry;
use chrono::NaiveDate;
use tokio::sync::OnceCell;

static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn repository() -> Option<PgBookRepository> {
    let url = std::env::var("BOOKSHELF_TEST_DATABASE_URL").ok()?;
    let settings = DatabaseSettings {
        url,
        ..DatabaseSettings::default()
    };
    let pool = bookshelf_db::connect(&settings).await.unwrap();

    let repo = PgBookRepository::new(pool.clone());
    let mut registry = ModuleRegistry::new();
    registry.register_custom(Arc::new(BooksModule::new(Arc::new(repo.clone()))));
    let steps = registry.collect_schema();

    // Concurrent `CREATE ... IF NOT EXISTS` can still collide, so tests share one run.
    SCHEMA
        .get_or_init(|| async {
            bookshelf_db::apply_schema(&pool, &steps).await.unwrap();
            // Applying twice must be harmless.
            bookshelf_db::apply_schema(&pool, &steps).await.unwrap();
        })
        .await;

    Some(repo)
}

fn unique_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("tok{nanos}")
}

#[tokio::test]
async fn crud_round_trip() {
    let Some(repo) = repository().await else {
        return;
    };

    let book = Book {
        published_date: NaiveDate::from_ymd_opt(1943, 4, 6),
        pages: Some(96),
        category: Some("Conte".to_string()),
        available: Some(true),
        ..Book::new("Le Petit Prince", "Antoine de Saint-Exupéry", "978-2070612758", 12.99)
    };

    let first = repo.save(book.clone()).await.unwrap();
    let second = repo.save(book.clone()).await.unwrap();
    let first_id = first.id.unwrap();
    assert!(second.id.unwrap() > first_id);
    assert_eq!(Book { id: None, ..first.clone() }, book);

    assert_eq!(repo.find_by_id(first_id).await.unwrap(), Some(first.clone()));
    assert!(repo.find_all().await.unwrap().contains(&first));

    let mut changed = first.clone();
    changed.apply_update(Book::new("T2", "A2", "I2", 9.99));
    let saved = repo.save(changed.clone()).await.unwrap();
    assert_eq!(saved, changed);
    assert_eq!(saved.category.as_deref(), Some("Conte"));

    assert!(repo.exists_by_id(first_id).await.unwrap());
    repo.delete_by_id(first_id).await.unwrap();
    assert!(!repo.exists_by_id(first_id).await.unwrap());
    assert_eq!(repo.find_by_id(first_id).await.unwrap(), None);
    repo.delete_by_id(first_id).await.unwrap();

    let next = repo.save(Book::default()).await.unwrap();
    assert!(next.id.unwrap() > second.id.unwrap());
}

#[tokio::test]
async fn author_search_is_case_insensitive_and_literal() {
    let Some(repo) = repository().await else {
        return;
    };

    let token = unique_token();
    for author in [
        format!("{token} Victor Hugo"),
        format!("{token} victor hugo bis"),
        format!("{token} Jules Verne"),
        format!("{token} 100%_Hugo"),
        format!("{token} 100ab hugo"),
    ] {
        repo.save(Book {
            author: Some(author),
            ..Book::default()
        })
        .await
        .unwrap();
    }

    // Earlier runs leave rows behind, so only look at this run's books.
    let found: Vec<String> = repo
        .find_by_author_containing_ignore_case("VICTOR HUGO")
        .await
        .unwrap()
        .into_iter()
        .filter_map(|book| book.author)
        .filter(|author| author.starts_with(&token))
        .collect();
    assert_eq!(
        found,
        vec![format!("{token} Victor Hugo"), format!("{token} victor hugo bis")]
    );

    let literal: Vec<String> = repo
        .find_by_author_containing_ignore_case(&format!("{token} 100%_hugo"))
        .await
        .unwrap()
        .into_iter()
        .filter_map(|book| book.author)
        .collect();
    assert_eq!(literal, vec![format!("{token} 100%_Hugo")]);
}
