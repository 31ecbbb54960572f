//! User domain models and DTOs.
//!
//! Users are the accounts that sign in to the API. They are not related to
//! any other record, so deleting one never touches students, groups or
//! subjects.

use crate::ids::UserId;
use registrar_core::Privilege;
use registrar_core::password::MAX_PASSWORD_BYTES;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// A user account as returned by the API.
///
/// The password hash and salt never leave the database layer; see
/// [`UserCredentials`].
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    #[schema(value_type = i16)]
    pub privilege: Privilege,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Row read when checking a login attempt.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub login: String,
    pub password: String,
    pub salt: String,
    pub privilege: Privilege,
}

/// DTO for registering a new account.
///
/// New accounts always start as [`Privilege::Guest`].
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 4, max = 20, message = "login must be 4 to 20 characters"))]
    pub login: String,
    #[validate(
        length(min = 8, max = 20, message = "password must be 8 to 20 characters"),
        custom(function = "password_fits_hash")
    )]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub surname: String,
    #[validate(length(max = 100))]
    pub lastname: Option<String>,
}

/// Multi-byte passwords can hit the bcrypt input limit before 20 characters.
fn password_fits_hash(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_bytes");
        err.message = Some(format!("password must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(err);
    }
    Ok(())
}

/// One item of a bulk user update. Absent fields are left unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    pub id: UserId,
    #[validate(length(min = 4, max = 20, message = "login must be 4 to 20 characters"))]
    pub login: Option<String>,
    #[serde(skip_serializing)]
    #[validate(
        length(min = 8, max = 20, message = "password must be 8 to 20 characters"),
        custom(function = "password_fits_hash")
    )]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub surname: Option<String>,
    #[validate(length(max = 100))]
    pub lastname: Option<String>,
    #[schema(value_type = Option<i16>)]
    pub privilege: Option<Privilege>,
}

impl UpdateUserDto {
    /// True when the item sets a privilege level.
    pub fn changes_privilege(&self) -> bool {
        self.privilege.is_some()
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct BulkUpdateUsersDto {
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<UpdateUserDto>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Return a single user instead of the full list.
    #[param(value_type = Option<i64>)]
    pub user_id: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_bounds() {
        let dto = CreateUserDto {
            login: "abc".into(),
            password: "password1".into(),
            name: "Ivan".into(),
            surname: "Petrov".into(),
            lastname: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateUserDto {
            login: "abcd".into(),
            ..dto
        };
        assert!(dto.validate().is_ok());

        let dto = CreateUserDto {
            password: "short".into(),
            ..dto
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_rejects_invalid_privilege() {
        let result = serde_json::from_str::<UpdateUserDto>(r#"{"id": 1, "privilege": 5}"#);
        assert!(result.is_err());

        let dto: UpdateUserDto = serde_json::from_str(r#"{"id": 1, "privilege": 2}"#).unwrap();
        assert_eq!(dto.privilege, Some(Privilege::Admin));
        assert!(dto.changes_privilege());
    }

    #[test]
    fn test_bulk_update_requires_items() {
        let empty: BulkUpdateUsersDto = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(empty.validate().is_err());

        let nested: BulkUpdateUsersDto =
            serde_json::from_str(r#"{"items": [{"id": 1, "login": "ab"}]}"#).unwrap();
        assert!(nested.validate().is_err());

        let ok: BulkUpdateUsersDto =
            serde_json::from_str(r#"{"items": [{"id": 1, "name": "Anna"}]}"#).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_password_byte_limit() {
        let dto = CreateUserDto {
            login: "abcd".into(),
            password: "\u{1D11E}".repeat(20),
            name: "Ivan".into(),
            surname: "Petrov".into(),
            lastname: None,
        };
        let err = dto.validate().unwrap_err();
        assert!(err.field_errors().contains_key("password"));

        let update: UpdateUserDto =
            serde_json::from_str(r#"{"id": 1, "password": "\u00e9\u00e9\u00e9\u00e9\u00e9\u00e9\u00e9\u00e9"}"#)
                .unwrap();
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_item_never_serializes_password() {
        let update: UpdateUserDto =
            serde_json::from_str(r#"{"id": 1, "password": "password123"}"#).unwrap();
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_user_serializes_privilege_as_integer() {
        let user = User {
            id: UserId::new(1),
            login: "admin".into(),
            name: "A".into(),
            surname: "B".into(),
            lastname: None,
            privilege: Privilege::Teacher,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["privilege"], 1);
        assert!(json.get("password").is_none());
    }
}
