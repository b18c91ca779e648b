use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use libris_http::{AppError, JsonBody, Message, PathParam};
use libris_kernel::AppState;

use super::models::{Book, BookChanges, BookDetail, CreateBook};
use super::store;
use crate::modules::reviews::{self, models::BookReview};

fn book_not_found() -> AppError {
    AppError::not_found("Book not found")
}

/// `GET /books`
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<BookDetail>>, AppError> {
    let pool = state.db.pool();
    let books = store::list(pool).await?;

    let mut reviews_by_book: HashMap<i64, Vec<BookReview>> = HashMap::new();
    for row in reviews::store::list_with_users(pool).await? {
        let book_id = row.book_id;
        reviews_by_book
            .entry(book_id)
            .or_default()
            .push(BookReview::try_from(row)?);
    }

    let details = books
        .into_iter()
        .map(|book| BookDetail {
            reviews: reviews_by_book.remove(&book.id).unwrap_or_default(),
            book,
        })
        .collect();

    Ok(Json(details))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<BookDetail>, AppError> {
    let pool = state.db.pool();
    let book = store::find(pool, id).await?.ok_or_else(book_not_found)?;

    let reviews = reviews::store::list_for_book(pool, id)
        .await?
        .into_iter()
        .map(BookReview::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(BookDetail { book, reviews }))
}

/// `POST /books`
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let new_book = payload.validate()?;
    let book = store::insert(state.db.pool(), &new_book).await?;

    tracing::info!(book_id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// `PUT /books/{id}`
pub async fn update_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(changes): JsonBody<BookChanges>,
) -> Result<Json<Book>, AppError> {
    let book = store::update(state.db.pool(), id, &changes)
        .await?
        .ok_or_else(book_not_found)?;

    tracing::info!(book_id = id, "book updated");
    Ok(Json(book))
}

/// `DELETE /books/{id}`
pub async fn delete_book(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Message>, AppError> {
    let removed_reviews = store::delete_with_reviews(&state.db, id)
        .await?
        .ok_or_else(book_not_found)?;

    tracing::info!(book_id = id, removed_reviews, "book deleted");
    Ok(Message::new("Book and associated reviews deleted"))
}
