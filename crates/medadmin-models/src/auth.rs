//! Authentication models.
//!
//! This module contains the login request/response payloads and the
//! [`Identity`] returned by the `whoami` endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::UserId;
use crate::roles::Role;

/// Login request with email and password.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The authenticated account, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identity {
    pub fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }
}

/// Successful login response.
///
/// Both `snake_case` and `camelCase` token field names are accepted.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
    pub user: Identity,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_trims_email() {
        let request = LoginRequest::new("  admin@example.com ", "secret");
        assert_eq!(request.email, "admin@example.com");
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let request = LoginRequest::new("admin@example.com", "hunter22");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_login_response_snake_case() {
        let json = r#"{
            "access_token": "a",
            "refresh_token": "r",
            "user": {"id": "u1", "email": "a@b.com", "role": "ADMIN"}
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "a");
        assert_eq!(response.refresh_token.as_deref(), Some("r"));
        assert!(response.user.is_administrator());
    }

    #[test]
    fn test_login_response_camel_case() {
        let json = r#"{
            "accessToken": "a",
            "refreshToken": "r",
            "user": {"id": 7, "email": "d@b.com", "role": "doctor"}
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user.id.as_str(), "7");
        assert_eq!(response.user.role, Role::Doctor);
    }

    #[test]
    fn test_login_response_without_refresh_token() {
        let json = r#"{"access_token":"a","user":{"id":"u","email":"e@x.io","role":"user"}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(response.refresh_token.is_none());
    }

    #[test]
    fn test_login_response_debug_redacts_tokens() {
        let json = r#"{"access_token":"secret-a","refresh_token":"secret-r","user":{"id":"u","email":"e@x.io","role":"user"}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        let debug = format!("{:?}", response);
        assert!(!debug.contains("secret-a"));
        assert!(!debug.contains("secret-r"));
    }

    #[test]
    fn test_identity_unknown_role_fails() {
        let json = r#"{"id":"u","email":"e@x.io","role":"owner"}"#;
        assert!(serde_json::from_str::<Identity>(json).is_err());
    }
}
