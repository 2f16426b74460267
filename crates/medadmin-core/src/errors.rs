//! API error taxonomy.
//!
//! Every call against the backend resolves to either a decoded payload or one
//! [`ApiError`] variant. The variant is chosen from the HTTP status code:
//!
//! | Status        | Variant                  |
//! |---------------|--------------------------|
//! | no response   | [`ApiError::Network`]    |
//! | 401, 403      | [`ApiError::Auth`]       |
//! | 404           | [`ApiError::NotFound`]   |
//! | other 4xx     | [`ApiError::Validation`] |
//! | 5xx           | [`ApiError::Server`]     |
//!
//! A 2xx response whose body does not match the expected shape becomes
//! [`ApiError::Decode`].

use serde::Deserialize;
use tracing::debug;

/// Error returned by every backend operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Transport failure; no response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the bearer token (401) or the caller's role (403).
    #[error("Not authorized ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Request rejected with field-level detail, surfaced verbatim.
    #[error("{}", .messages.join(", "))]
    Validation { messages: Vec<String> },

    /// The addressed resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend failed to process the request.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Error body shapes produced by the backend.
///
/// `message` is either a single string or a list of field messages.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ApiError {
    /// Builds a validation error from a list of messages.
    pub fn validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Classifies a non-success response by status code and error body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut messages = extract_messages(body);
        if messages.is_empty() {
            messages.push(default_message(status).to_string());
        }

        match status {
            401 | 403 => Self::Auth {
                status,
                message: messages.join(", "),
            },
            404 => Self::NotFound(messages.join(", ")),
            400..=499 => Self::Validation { messages },
            500..=599 => Self::Server {
                status,
                message: messages.join(", "),
            },
            _ => Self::Decode(format!("unexpected status {}", status)),
        }
    }

    /// Returns `true` for 401/403 responses.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` for 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` when the request never reached the backend.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// The HTTP status behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_response(status.as_u16(), "")
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

fn extract_messages(body: &str) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(ErrorMessage::Many(messages)),
            ..
        }) => messages,
        Ok(ErrorBody {
            message: Some(ErrorMessage::One(message)),
            ..
        }) => vec![message],
        Ok(ErrorBody {
            error: Some(error), ..
        }) => vec![error],
        Ok(_) => Vec::new(),
        Err(e) => {
            debug!(error = %e, "Error body is not JSON, using raw text");
            vec![body.to_string()]
        }
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Resource not found",
        409 => "Conflict",
        422 => "Unprocessable entity",
        500..=599 => "Internal server error",
        _ => "Request failed",
    }
}
