use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A book in the catalog.
///
/// Every attribute except `id` is optional and may be stored as null. `id` stays `None`
/// until the store assigns one from its sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Free-form ISBN, neither unique nor format-checked
    #[serde(default)]
    pub isbn: Option<String>,
    /// Serialized as `YYYY-MM-DD`
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the book can currently be borrowed
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Book {
    /// Build an unsaved book from the fields most callers care about.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            isbn: Some(isbn.into()),
            price: Some(price),
            ..Self::default()
        }
    }

    /// Overwrite the fields an update is allowed to touch.
    ///
    /// Exactly `title`, `author`, `isbn` and `price` are copied, absent values included;
    /// every other field of `self` is left as stored.
    pub fn apply_update(&mut self, details: Book) {
        self.title = details.title;
        self.author = details.author;
        self.isbn = details.isbn;
        self.price = details.price;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_fields_serialize_as_null() {
        let value = serde_json::to_value(Book::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": null,
                "title": null,
                "author": null,
                "isbn": null,
                "publishedDate": null,
                "pages": null,
                "category": null,
                "available": null,
                "price": null
            })
        );
    }

    #[test]
    fn deserializes_camel_case_with_iso_date() {
        let book: Book = serde_json::from_value(json!({
            "title": "Le Petit Prince",
            "author": "Antoine de Saint-Exupéry",
            "publishedDate": "1943-04-06",
            "pages": 96,
            "available": true,
            "price": 12.99
        }))
        .unwrap();

        assert_eq!(book.id, None);
        assert_eq!(book.published_date, NaiveDate::from_ymd_opt(1943, 4, 6));
        assert_eq!(book.pages, Some(96));
        assert_eq!(book.available, Some(true));
        assert_eq!(book.price, Some(12.99));
        assert_eq!(book.isbn, None);
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        assert!(serde_json::from_value::<Book>(json!({"pages": "many"})).is_err());
        assert!(serde_json::from_value::<Book>(json!({"publishedDate": "06/04/1943"})).is_err());
    }

    #[test]
    fn apply_update_touches_only_whitelisted_fields() {
        let mut stored = Book {
            id: Some(7),
            category: Some("Fiction".to_string()),
            pages: Some(300),
            available: Some(true),
            published_date: NaiveDate::from_ymd_opt(1862, 1, 1),
            ..Book::new("Les Misérables", "Victor Hugo", "978-0", 20.0)
        };

        stored.apply_update(Book {
            id: Some(99),
            category: Some("Nonfiction".to_string()),
            pages: Some(1),
            ..Book::new("T2", "A2", "I2", 9.99)
        });

        assert_eq!(stored.id, Some(7));
        assert_eq!(stored.title.as_deref(), Some("T2"));
        assert_eq!(stored.author.as_deref(), Some("A2"));
        assert_eq!(stored.isbn.as_deref(), Some("I2"));
        assert_eq!(stored.price, Some(9.99));
        assert_eq!(stored.category.as_deref(), Some("Fiction"));
        assert_eq!(stored.pages, Some(300));
        assert_eq!(stored.available, Some(true));
    }

    #[test]
    fn apply_update_clears_fields_missing_from_the_body() {
        let mut stored = Book::new("Title", "Author", "ISBN", 1.0);
        stored.apply_update(Book {
            title: Some("Only title".to_string()),
            ..Book::default()
        });

        assert_eq!(stored.title.as_deref(), Some("Only title"));
        assert_eq!(stored.author, None);
        assert_eq!(stored.isbn, None);
        assert_eq!(stored.price, None);
    }
}
