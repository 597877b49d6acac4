//! Users and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role of an account. Serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Role {
    /// Regular user.
    User,
    /// Moderator.
    Moderator,
    /// Administrator.
    Administrator,
    /// A code this client does not know.
    Unknown(u8),
}

impl Role {
    /// Integer code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            Role::User => 0,
            Role::Moderator => 1,
            Role::Administrator => 2,
            Role::Unknown(code) => code,
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Moderator => "Moderator",
            Role::Administrator => "Administrator",
            Role::Unknown(_) => "Unknown",
        }
    }

    /// Whether this role may edit reference data.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl From<u8> for Role {
    fn from(code: u8) -> Self {
        match code {
            0 => Role::User,
            1 => Role::Moderator,
            2 => Role::Administrator,
            other => Role::Unknown(other),
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An account as returned by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    pub oid: Uuid,
    /// Login email.
    pub email: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the email has been verified.
    #[serde(rename = "is_verificate")]
    pub is_verified: bool,
    /// Account role.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    #[serde(rename = "update_at", default)]
    pub updated_at: Option<DateTime<Utc>>,
}
