use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Account roles understood by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Nurse,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "nurse" => Ok(Role::Nurse),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// An account as the rest of the system sees it.
///
/// The credential hash and the reset-token fields live behind the store
/// boundary and are deliberately absent here: no handler or service can leak
/// what it never holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    /// Administrative approval gate; meaningful for professional roles.
    pub is_verified: bool,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    /// Fee in the smallest currency unit.
    pub consultation_fee: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration input. The password is plaintext here and nowhere past the
/// store boundary: implementations hash before writing.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub consultation_fee: Option<i64>,
}

/// A signed bearer token plus its expiry, as returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
