use libris_db::DbError;
use sqlx::{sqlite::SqliteExecutor, SqlitePool};

use super::models::{NewReview, Review, ReviewChanges, ReviewListingRow, ReviewWithUserRow};

const WITH_USER: &str = r#"
    SELECT r.id, r.content, r.rating, r.book_id, r.user_id,
           u.id AS found_user_id, u.name AS user_name
    FROM reviews r
    LEFT JOIN users u ON u.id = r.user_id
"#;

pub async fn list_with_owners(pool: &SqlitePool) -> Result<Vec<ReviewListingRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewListingRow>(
        r#"
        SELECT r.id, r.content, r.rating,
               b.id AS found_book_id, b.title AS book_title,
               u.id AS found_user_id, u.name AS user_name
        FROM reviews r
        LEFT JOIN books b ON b.id = r.book_id
        LEFT JOIN users u ON u.id = r.user_id
        ORDER BY r.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every review with its author, ordered by id, for grouping under books.
pub async fn list_with_users(pool: &SqlitePool) -> Result<Vec<ReviewWithUserRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewWithUserRow>(&format!("{WITH_USER} ORDER BY r.id"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_for_book(
    pool: &SqlitePool,
    book_id: i64,
) -> Result<Vec<ReviewWithUserRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewWithUserRow>(&format!(
        "{WITH_USER} WHERE r.book_id = ? ORDER BY r.id"
    ))
    .bind(book_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(pool: &SqlitePool, review: &NewReview) -> Result<Review, DbError> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (content, rating, user_id, book_id)
        VALUES (?, ?, ?, ?)
        RETURNING id, content, rating, user_id, book_id
        "#,
    )
    .bind(&review.content)
    .bind(review.rating)
    .bind(review.user_id)
    .bind(review.book_id)
    .fetch_one(pool)
    .await?;
    Ok(review)
}

/// Apply the supplied fields; `None` keeps the stored value.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: &ReviewChanges,
) -> Result<Option<Review>, DbError> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        UPDATE reviews
        SET content = COALESCE(?, content),
            rating  = COALESCE(?, rating)
        WHERE id = ?
        RETURNING id, content, rating, user_id, book_id
        "#,
    )
    .bind(changes.content.as_deref())
    .bind(changes.rating)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(review)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove every review of a book. Runs on the caller's transaction.
pub async fn delete_for_book<'e, E>(executor: E, book_id: i64) -> Result<u64, DbError>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM reviews WHERE book_id = ?")
        .bind(book_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
