//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Short user reference embedded in booking views
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i64,
    pub name: String,
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Partial user update. Omitted fields are left untouched; presence is
/// carried by `Option`, not by blank strings.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

impl UpdateUser {
    /// Apply the patch to an existing user
    pub fn apply(&self, user: &mut User) {
        if let Some(ref name) = self.name {
            user.name = name.clone();
        }
        if let Some(ref email) = self.email {
            user.email = email.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_present_fields() {
        let mut user = User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };

        let patch = UpdateUser {
            name: Some("Ada Lovelace".to_string()),
            email: None,
        };
        patch.apply(&mut user);

        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut user = User {
            id: 7,
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
        };

        UpdateUser::default().apply(&mut user);

        assert_eq!(user.name, "Grace");
        assert_eq!(user.email, "grace@example.com");
    }

    #[test]
    fn blank_name_fails_validation() {
        let patch = UpdateUser {
            name: Some(String::new()),
            email: None,
        };
        assert!(patch.validate().is_err());
    }
}
