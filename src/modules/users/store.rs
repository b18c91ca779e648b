use libris_db::DbError;
use sqlx::SqlitePool;

use super::models::{NewUser, User};

pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, DbError> {
    let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, DbError> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn insert(pool: &SqlitePool, user: &NewUser) -> Result<User, DbError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email) VALUES (?, ?) RETURNING id, name, email",
    )
    .bind(&user.name)
    .bind(&user.email)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Remove a user; their reviews go with them through `ON DELETE CASCADE`.
/// Returns `false` when no such user exists.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
