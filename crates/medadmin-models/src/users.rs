//! User account models and DTOs.

use chrono::{DateTime, Utc};
use medadmin_core::Filters;
use medadmin_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ids::UserId;
use crate::roles::Role;

/// An account registered with the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Push notification token registered by the mobile app
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub fcm_token: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// DTO for creating a new account.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

/// DTO for updating an account. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateUserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UpdateUserDto {
    /// Sets the password unless the input is blank, which keeps the current one.
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string()).filter(|p| !p.trim().is_empty());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none() && self.role.is_none()
    }
}

/// Filters accepted by the users collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub search: Option<String>,
    pub role: Option<Role>,
}

impl UserFilters {
    pub fn into_filters(self) -> Filters {
        let mut filters = Filters::new();
        if let Some(search) = self.search {
            filters.set("search", search);
        }
        if let Some(role) = self.role {
            filters.set("role", role.as_wire());
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialize() {
        let json = r#"{
            "id": "u-1",
            "name": "Ada Obi",
            "email": "ada@example.com",
            "role": "USER",
            "fcmToken": "",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.fcm_token.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_create_user_validation() {
        let dto = CreateUserDto {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            role: Role::User,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_create_user_valid() {
        let dto = CreateUserDto {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
            role: Role::Administrator,
        };
        assert!(dto.validate().is_ok());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_update_blank_password_omitted() {
        let dto = UpdateUserDto {
            name: Some("Ada".to_string()),
            ..Default::default()
        }
        .with_password("   ");
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["name"], "Ada");
    }

    #[test]
    fn test_update_password_validated() {
        let dto = UpdateUserDto::default().with_password("abc");
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateUserDto::default().is_empty());
        assert!(!UpdateUserDto::default().with_password("password123").is_empty());
    }

    #[test]
    fn test_filters() {
        let filters = UserFilters {
            search: Some(" ".to_string()),
            role: Some(Role::Doctor),
        }
        .into_filters();
        assert_eq!(filters.get("search"), None);
        assert_eq!(filters.get("role"), Some("doctor"));
    }
}
