use auth_identity::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Narrowing filters for the doctor listing. Empty or whitespace-only
/// strings are treated as absent, matching how the query string arrives.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DoctorFilter {
    /// Case-insensitive partial match on specialty.
    pub specialty: Option<String>,
    /// Case-insensitive partial match on city.
    pub city: Option<String>,
}

impl DoctorFilter {
    pub(crate) fn specialty(&self) -> Option<&str> {
        Self::present(&self.specialty)
    }

    pub(crate) fn city(&self) -> Option<&str> {
        Self::present(&self.city)
    }

    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Public projection of a professional account. Credential material never
/// crosses this boundary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    /// Fee in the smallest currency unit.
    pub consultation_fee: Option<i64>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for DoctorProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            specialty: user.specialty,
            city: user.city,
            bio: user.bio,
            consultation_fee: user.consultation_fee,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}
