//! # medadmin Config
//!
//! Configuration types for the medadmin client.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`api`]: Backend base URL, request timeout and default page size
//! - [`session`]: Location of the persisted token pair
//! - [`logging`]: Log level and log directory
//!
//! # Example
//!
//! ```ignore
//! use medadmin_config::{ApiConfig, LogConfig, SessionConfig};
//!
//! medadmin_config::load_dotenv();
//!
//! let api_config = ApiConfig::from_env();
//! let session_config = SessionConfig::from_env();
//! let log_config = LogConfig::from_env();
//! ```

pub mod api;
pub mod logging;
pub mod session;

// Re-export commonly used types at crate root
pub use api::ApiConfig;
pub use logging::LogConfig;
pub use session::SessionConfig;

/// Loads variables from a `.env` file if one exists.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Reads a variable, treating blank values as unset.
pub(crate) fn lookup_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
