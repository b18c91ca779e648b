use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::modules::reviews::models::BookReview;
use libris_http::AppError;

pub const UNKNOWN_BOOK: &str = "Unknown Book";

/// Public representation of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
}

/// A book with its reviews, each carrying the reviewing user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub reviews: Vec<BookReview>,
}

/// Body of `POST /books`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
}

impl CreateBook {
    pub fn validate(self) -> Result<NewBook, AppError> {
        match (self.title, self.author, self.genre) {
            (Some(title), Some(author), Some(genre)) => Ok(NewBook {
                title,
                author,
                genre,
            }),
            (title, author, genre) => Err(crate::modules::missing(&[
                ("title", title.is_none()),
                ("author", author.is_none()),
                ("genre", genre.is_none()),
            ])),
        }
    }
}

/// Body of `PUT /books/{id}`. Absent and `null` fields both keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

/// `{id, title}` form of a book embedded in review listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: Option<i64>,
    pub title: String,
}

impl BookSummary {
    pub fn unknown() -> Self {
        Self {
            id: None,
            title: UNKNOWN_BOOK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_flattens_book_fields() {
        let detail = BookDetail {
            book: Book {
                id: 1,
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                genre: "SciFi".to_string(),
            },
            reviews: vec![],
        };
        assert_eq!(
            serde_json::to_value(detail).unwrap(),
            json!({
                "id": 1,
                "title": "Dune",
                "author": "Herbert",
                "genre": "SciFi",
                "reviews": []
            })
        );
    }

    #[test]
    fn null_change_is_treated_as_absent() {
        let changes: BookChanges =
            serde_json::from_value(json!({"title": null, "genre": "Epic"})).unwrap();
        assert!(changes.title.is_none());
        assert_eq!(changes.genre.as_deref(), Some("Epic"));
    }

    #[test]
    fn create_lists_missing_fields_in_order() {
        let payload: CreateBook = serde_json::from_value(json!({"author": "Le Guin"})).unwrap();
        match payload.validate().unwrap_err() {
            AppError::Validation { details, .. } => assert_eq!(
                details,
                vec![
                    json!({"field": "title", "error": "required"}),
                    json!({"field": "genre", "error": "required"}),
                ]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
