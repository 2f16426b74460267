//! Backend API configuration.

use std::time::Duration;

use crate::lookup_env;

/// Connection settings for the directory backend.
///
/// # Environment Variables
///
/// - `MEDADMIN_API_URL`: Base URL of the REST API (default: `http://localhost:3000/api`)
/// - `MEDADMIN_HTTP_TIMEOUT_SECS`: Per-request timeout; unset leaves the transport default
/// - `MEDADMIN_PAGE_SIZE`: Default list page size (default: `10`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,

    /// Optional request timeout.
    pub timeout: Option<Duration>,

    /// Page size list views start with.
    pub default_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout: None,
            default_page_size: 10,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(lookup_env)
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            base_url: lookup("MEDADMIN_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout: lookup("MEDADMIN_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            default_page_size: lookup("MEDADMIN_PAGE_SIZE")
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.default_page_size),
        }
    }

    /// Replaces the base URL, normalizing away a trailing slash.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
