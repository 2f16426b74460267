use std::path::PathBuf;

use crate::lookup_env;

/// Logging configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `LOG_LEVEL`: Default filter directive when `RUST_LOG` is unset (default: `info`)
/// - `MEDADMIN_LOG_DIR`: Directory for rolling log files (default: `storage/logs`)
/// - `MEDADMIN_LOG_FILES`: Set to `false` to disable file output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub log_dir: PathBuf,
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("storage/logs"),
            file_output: true,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            level: lookup("LOG_LEVEL").unwrap_or(defaults.level),
            log_dir: lookup("MEDADMIN_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_output: lookup("MEDADMIN_LOG_FILES")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "off"))
                .unwrap_or(defaults.file_output),
        }
    }
}
