//! Classification of store errors into the constraint families the API cares about.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Errors surfaced by the store layer.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// CHECK and NOT NULL rejections.
    #[error("constraint violated: {0}")]
    CheckViolation(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let message = db_err.message().to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return Self::UniqueViolation(message),
                ErrorKind::ForeignKeyViolation => return Self::ForeignKeyViolation(message),
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    return Self::CheckViolation(message)
                }
                _ => {}
            }
        }
        Self::Sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_opaque() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }
}
