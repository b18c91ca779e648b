use libris_db::{Database, DbError};
use sqlx::{sqlite::SqliteExecutor, SqlitePool};

use super::models::{Book, BookChanges, NewBook};
use crate::modules::reviews;

pub async fn list(pool: &SqlitePool) -> Result<Vec<Book>, DbError> {
    let books =
        sqlx::query_as::<_, Book>("SELECT id, title, author, genre FROM books ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(books)
}

pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<Book>, DbError>
where
    E: SqliteExecutor<'e>,
{
    let book =
        sqlx::query_as::<_, Book>("SELECT id, title, author, genre FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
    Ok(book)
}

pub async fn insert(pool: &SqlitePool, book: &NewBook) -> Result<Book, DbError> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (title, author, genre)
        VALUES (?, ?, ?)
        RETURNING id, title, author, genre
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.genre)
    .fetch_one(pool)
    .await?;
    Ok(book)
}

/// Apply the supplied fields; `None` keeps the stored value.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: &BookChanges,
) -> Result<Option<Book>, DbError> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        UPDATE books
        SET title  = COALESCE(?, title),
            author = COALESCE(?, author),
            genre  = COALESCE(?, genre)
        WHERE id = ?
        RETURNING id, title, author, genre
        "#,
    )
    .bind(changes.title.as_deref())
    .bind(changes.author.as_deref())
    .bind(changes.genre.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(book)
}

/// Delete a book and all of its reviews in one transaction.
///
/// Returns the number of reviews removed, or `None` when the book does not
/// exist (nothing is written in that case).
pub async fn delete_with_reviews(db: &Database, id: i64) -> Result<Option<u64>, DbError> {
    let mut tx = db.begin().await?;

    if find(&mut *tx, id).await?.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    let removed_reviews = reviews::store::delete_for_book(&mut *tx, id).await?;
    sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(removed_reviews))
}
