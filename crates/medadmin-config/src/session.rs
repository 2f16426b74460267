use std::path::PathBuf;

use crate::lookup_env;

/// Where the token pair is persisted between runs.
///
/// `MEDADMIN_SESSION_FILE` overrides the default `storage/session.json`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub token_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("storage/session.json"),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("MEDADMIN_SESSION_FILE")
            .map(|path| Self {
                token_file: PathBuf::from(path),
            })
            .unwrap_or_default()
    }
}
