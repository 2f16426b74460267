//! User roles.
//!
//! The backend has used several spellings for the same role over time
//! (`ADMIN`, `admin`, `administrator`). Every spelling is normalized into the
//! closed [`Role`] enumeration when a payload is decoded; anything else is a
//! decode error. Outgoing values always use the lowercase form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Staff allowed to use the admin client.
    Administrator,
    /// Account linked to a doctor profile.
    Doctor,
    /// Regular patient account.
    User,
}

/// Error returned for a role spelling outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Doctor, Role::User];

    /// Wire value sent to the backend.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Administrator => "admin",
            Role::Doctor => "doctor",
            Role::User => "user",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Doctor => "Doctor",
            Role::User => "User",
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Ok(Role::Administrator),
            "doctor" => Ok(Role::Doctor),
            "user" | "standard-user" | "standard_user" => Ok(Role::User),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
