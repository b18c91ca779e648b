use axum::{extract::State, http::StatusCode, Json};
use libris_db::DbError;
use libris_http::{AppError, JsonBody, Message, PathParam};
use libris_kernel::AppState;
use serde_json::json;

use super::models::{CreateUser, User};
use super::store;

fn email_taken() -> AppError {
    AppError::conflict(
        vec![json!({"field": "email", "error": "taken"})],
        "Email already exists",
    )
}

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = store::list(state.db.pool()).await?;
    Ok(Json(users))
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let new_user = payload.validate()?;
    let pool = state.db.pool();

    if store::find_by_email(pool, &new_user.email).await?.is_some() {
        return Err(email_taken());
    }

    // The UNIQUE constraint still catches a concurrent insert of the same email.
    let user = store::insert(pool, &new_user).await.map_err(|e| match e {
        DbError::UniqueViolation(_) => email_taken(),
        other => other.into(),
    })?;

    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Message>, AppError> {
    if !store::delete(state.db.pool(), id).await? {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(Message::new("User deleted"))
}
