use axum::{extract::State, http::StatusCode, Json};
use libris_db::DbError;
use libris_http::{AppError, JsonBody, Message, PathParam};
use libris_kernel::AppState;

use super::models::{BookReview, CreateReview, Review, ReviewChanges, ReviewListing};
use super::store;
use crate::modules::books;

fn review_not_found() -> AppError {
    AppError::not_found("Review not found")
}

/// `GET /reviews`. Dangling owners render as "Unknown ..." placeholders.
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewListing>>, AppError> {
    let reviews = store::list_with_owners(state.db.pool())
        .await?
        .into_iter()
        .map(ReviewListing::from)
        .collect();
    Ok(Json(reviews))
}

/// `GET /books/{id}/reviews`
pub async fn list_book_reviews(
    State(state): State<AppState>,
    PathParam(book_id): PathParam<i64>,
) -> Result<Json<Vec<BookReview>>, AppError> {
    let pool = state.db.pool();
    if books::store::find(pool, book_id).await?.is_none() {
        return Err(AppError::not_found("Book not found"));
    }

    let reviews = store::list_for_book(pool, book_id)
        .await?
        .into_iter()
        .map(BookReview::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(reviews))
}

/// `POST /reviews`. Unknown `user_id`/`book_id` are rejected by the store's foreign keys.
pub async fn create_review(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateReview>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let new_review = payload.validate()?;

    let review = store::insert(state.db.pool(), &new_review)
        .await
        .map_err(|e| match e {
            DbError::ForeignKeyViolation(_) => {
                AppError::bad_request("Referenced user or book does not exist")
            }
            other => other.into(),
        })?;

    tracing::info!(
        review_id = review.id,
        book_id = review.book_id,
        user_id = review.user_id,
        "review created"
    );
    Ok((StatusCode::CREATED, Json(review)))
}

/// `PUT /reviews/{id}`
pub async fn update_review(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(changes): JsonBody<ReviewChanges>,
) -> Result<Json<Review>, AppError> {
    let review = store::update(state.db.pool(), id, &changes)
        .await?
        .ok_or_else(review_not_found)?;

    tracing::info!(review_id = id, "review updated");
    Ok(Json(review))
}

/// `DELETE /reviews/{id}`
pub async fn delete_review(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Message>, AppError> {
    if !store::delete(state.db.pool(), id).await? {
        return Err(review_not_found());
    }

    tracing::info!(review_id = id, "review deleted");
    Ok(Message::new("Review deleted"))
}
