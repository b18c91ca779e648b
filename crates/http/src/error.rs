//! Error handling for the Libris HTTP layer

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use libris_db::DbError;
use serde_json::json;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("conflict: {message}")]
    Conflict {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    /// Create a validation error for absent required keys
    pub fn missing_fields(fields: &[&str]) -> Self {
        let details = fields
            .iter()
            .map(|field| json!({"field": field, "error": "required"}))
            .collect();
        Self::validation(details, "Missing required fields")
    }

    /// Create a conflict error
    pub fn conflict(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Conflict {
            details,
            code: "conflict".to_string(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(reason) => {
                Self::conflict(vec![json!({ "reason": reason })], "Resource already exists")
            }
            DbError::ForeignKeyViolation(_) => {
                Self::bad_request("Referenced resource does not exist")
            }
            DbError::CheckViolation(reason) => Self::validation(
                vec![json!({ "reason": reason })],
                "Required fields must not be empty",
            ),
            DbError::Sqlx(e) => {
                Self::Internal(anyhow::Error::new(e).context("store operation failed"))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Self::missing_fields(&[]),
            other => Self::validation(
                vec![json!({ "reason": other.body_text() })],
                "Invalid request body",
            ),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected path parameter");
        Self::bad_request("Invalid identifier")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let timestamp = now.format(&Rfc3339).unwrap_or_else(|_| now.to_string());

        let (status, error_code, message, details) = match self {
            AppError::Validation {
                details,
                code,
                message,
            } => (StatusCode::BAD_REQUEST, code, message, details),
            AppError::Conflict {
                details,
                code,
                message,
            } => (StatusCode::BAD_REQUEST, code, message, details),
            AppError::NotFound { message, code } => (StatusCode::NOT_FOUND, code, message, vec![]),
            AppError::BadRequest { message, code } => {
                (StatusCode::BAD_REQUEST, code, message, vec![])
            }
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error".to_string(),
                format!("{:#}", e),
                vec![],
            ),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                message = %message,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                message = %message,
                "Request rejected"
            );
        }

        // Internal details stay out of release-build responses.
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = json!({
            "error": message,
            "code": error_code,
            "details": details,
            "trace_id": error_id.to_string(),
            "timestamp": timestamp
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let details = vec![serde_json::json!({"field": "email", "error": "required"})];
        let error = AppError::validation(details.clone(), "Validation failed");

        match error {
            AppError::Validation {
                details: d,
                code,
                message,
            } => {
                assert_eq!(d, details);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "Validation failed");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_missing_fields_maps_to_bad_request() {
        let response = AppError::missing_fields(&["title", "genre"]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body["error"], "Missing required fields");
        assert_eq!(body["code"], "validation_error");
        assert_eq!(body["details"][1]["field"], "genre");
    }

    #[tokio::test]
    async fn test_conflict_maps_to_bad_request() {
        let response = AppError::conflict(vec![], "Email already exists").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await["code"], "conflict");
    }

    #[test]
    fn test_error_response_mapping() {
        let error = AppError::not_found("Resource not found");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("Database connection failed");
        let error = AppError::Internal(internal_error);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_errors_are_translated() {
        let fk = AppError::from(DbError::ForeignKeyViolation(
            "FOREIGN KEY constraint failed".into(),
        ));
        assert!(matches!(fk, AppError::BadRequest { .. }));

        let unique =
            AppError::from(DbError::UniqueViolation("UNIQUE constraint failed".into()));
        assert!(matches!(unique, AppError::Conflict { .. }));

        let check = AppError::from(DbError::CheckViolation("CHECK constraint failed".into()));
        assert!(matches!(check, AppError::Validation { .. }));

        let opaque = AppError::from(DbError::Sqlx(libris_db::SqlxError::RowNotFound));
        assert!(matches!(opaque, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let response = AppError::not_found("Book not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body["error"], "Book not found");
        assert_eq!(body["code"], "not_found");
        assert!(Uuid::parse_str(body["trace_id"].as_str().unwrap()).is_ok());
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }
}
