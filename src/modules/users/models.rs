use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use libris_http::AppError;

pub const UNKNOWN_USER: &str = "Unknown User";

/// Public representation of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Body of `POST /users`. Absent keys are reported, not defaulted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A user that passed presence validation and is ready to insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl CreateUser {
    pub fn validate(self) -> Result<NewUser, AppError> {
        match (self.name, self.email) {
            (Some(name), Some(email)) => Ok(NewUser { name, email }),
            (name, email) => Err(crate::modules::missing(&[
                ("name", name.is_none()),
                ("email", email.is_none()),
            ])),
        }
    }
}

/// `{id, name}` form of a user embedded in review responses.
///
/// `id` is `None` only for the "Unknown User" placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: Option<i64>,
    pub name: String,
}

impl UserSummary {
    pub fn unknown() -> Self {
        Self {
            id: None,
            name: UNKNOWN_USER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_requires_both_keys() {
        let payload: CreateUser = serde_json::from_value(json!({"name": "Ann"})).unwrap();
        let err = payload.validate().unwrap_err();
        match err {
            AppError::Validation { details, .. } => {
                assert_eq!(details, vec![json!({"field": "email", "error": "required"})]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_accepts_present_keys_without_format_checks() {
        let payload: CreateUser =
            serde_json::from_value(json!({"name": "Ann", "email": "not-an-address"})).unwrap();
        let user = payload.validate().unwrap();
        assert_eq!(user.email, "not-an-address");
    }

    #[test]
    fn unknown_summary_serializes_null_id() {
        let value = serde_json::to_value(UserSummary::unknown()).unwrap();
        assert_eq!(value, json!({"id": null, "name": "Unknown User"}));
    }
}
