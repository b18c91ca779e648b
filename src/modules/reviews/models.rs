use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::modules::books::models::BookSummary;
use crate::modules::users::models::UserSummary;
use libris_http::AppError;

/// Public representation of a review as created or updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub content: String,
    pub rating: i64,
    pub user_id: i64,
    pub book_id: i64,
}

/// Body of `POST /reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub content: Option<String>,
    pub rating: Option<i64>,
    pub user_id: Option<i64>,
    pub book_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub content: String,
    pub rating: i64,
    pub user_id: i64,
    pub book_id: i64,
}

impl CreateReview {
    pub fn validate(self) -> Result<NewReview, AppError> {
        match (self.content, self.rating, self.user_id, self.book_id) {
            (Some(content), Some(rating), Some(user_id), Some(book_id)) => Ok(NewReview {
                content,
                rating,
                user_id,
                book_id,
            }),
            (content, rating, user_id, book_id) => Err(crate::modules::missing(&[
                ("content", content.is_none()),
                ("rating", rating.is_none()),
                ("user_id", user_id.is_none()),
                ("book_id", book_id.is_none()),
            ])),
        }
    }
}

/// Body of `PUT /reviews/{id}`. The owning user and book cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewChanges {
    pub content: Option<String>,
    pub rating: Option<i64>,
}

/// Review joined with its author, as stored.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithUserRow {
    pub id: i64,
    pub content: String,
    pub rating: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub found_user_id: Option<i64>,
    pub user_name: Option<String>,
}

/// Review nested inside a book: `{id, content, rating, user: {id, name}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookReview {
    pub id: i64,
    pub content: String,
    pub rating: i64,
    pub user: UserSummary,
}

impl TryFrom<ReviewWithUserRow> for BookReview {
    type Error = AppError;

    fn try_from(row: ReviewWithUserRow) -> Result<Self, Self::Error> {
        match (row.found_user_id, row.user_name) {
            (Some(id), Some(name)) => Ok(Self {
                id: row.id,
                content: row.content,
                rating: row.rating,
                user: UserSummary { id: Some(id), name },
            }),
            _ => Err(AppError::Internal(anyhow::anyhow!(
                "review {} references missing user {}",
                row.id,
                row.user_id
            ))),
        }
    }
}

/// Review joined with both owners; either side may be dangling.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewListingRow {
    pub id: i64,
    pub content: String,
    pub rating: i64,
    pub found_book_id: Option<i64>,
    pub book_title: Option<String>,
    pub found_user_id: Option<i64>,
    pub user_name: Option<String>,
}

/// Entry of `GET /reviews`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewListing {
    pub id: i64,
    pub content: String,
    pub rating: i64,
    pub book: BookSummary,
    pub user: UserSummary,
}

impl From<ReviewListingRow> for ReviewListing {
    fn from(row: ReviewListingRow) -> Self {
        let book = match (row.found_book_id, row.book_title) {
            (Some(id), Some(title)) => BookSummary {
                id: Some(id),
                title,
            },
            _ => BookSummary::unknown(),
        };
        let user = match (row.found_user_id, row.user_name) {
            (Some(id), Some(name)) => UserSummary { id: Some(id), name },
            _ => UserSummary::unknown(),
        };

        Self {
            id: row.id,
            content: row.content,
            rating: row.rating,
            book,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing_row() -> ReviewListingRow {
        ReviewListingRow {
            id: 7,
            content: "Spice must flow".to_string(),
            rating: 5,
            found_book_id: Some(1),
            book_title: Some("Dune".to_string()),
            found_user_id: Some(2),
            user_name: Some("Ann".to_string()),
        }
    }

    #[test]
    fn listing_embeds_resolved_owners() {
        let value = serde_json::to_value(ReviewListing::from(listing_row())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "content": "Spice must flow",
                "rating": 5,
                "book": {"id": 1, "title": "Dune"},
                "user": {"id": 2, "name": "Ann"}
            })
        );
    }

    #[test]
    fn listing_substitutes_sentinels_for_dangling_owners() {
        let row = ReviewListingRow {
            found_book_id: None,
            book_title: None,
            found_user_id: None,
            user_name: None,
            ..listing_row()
        };
        let listing = ReviewListing::from(row);
        assert_eq!(listing.book, BookSummary::unknown());
        assert_eq!(listing.user, UserSummary::unknown());
        assert_eq!(
            serde_json::to_value(&listing.book).unwrap(),
            json!({"id": null, "title": "Unknown Book"})
        );
    }

    #[test]
    fn nested_review_requires_resolved_user() {
        let row = ReviewWithUserRow {
            id: 3,
            content: "Dry".to_string(),
            rating: 2,
            book_id: 1,
            user_id: 9,
            found_user_id: None,
            user_name: None,
        };
        assert!(matches!(BookReview::try_from(row), Err(AppError::Internal(_))));
    }

    #[test]
    fn any_integer_rating_is_accepted() {
        let payload: CreateReview = serde_json::from_value(json!({
            "content": "Off the scale",
            "rating": -40,
            "user_id": 1,
            "book_id": 1
        }))
        .unwrap();
        assert_eq!(payload.validate().unwrap().rating, -40);
    }

    #[test]
    fn create_reports_every_missing_key() {
        let payload: CreateReview = serde_json::from_value(json!({"content": "x"})).unwrap();
        match payload.validate().unwrap_err() {
            AppError::Validation { details, .. } => assert_eq!(details.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
