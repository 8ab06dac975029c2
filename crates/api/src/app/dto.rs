use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loadstar_auth::{Permission, Role};

use crate::app::services::StoredIdentity;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateShipmentRequest {
    pub origin: String,
    pub destination: String,
    pub weight_lbs: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRateRequest {
    pub lane: String,
    pub rate_per_mile: f64,
}

// -------------------------
// Response DTOs
// -------------------------

/// Identity as it appears in HTTP responses. No credential material.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&StoredIdentity> for UserSummary {
    fn from(record: &StoredIdentity) -> Self {
        Self {
            id: record.identity.id.to_string(),
            username: record.username.clone(),
            email: record.email.clone(),
            roles: record.identity.roles.clone(),
            permissions: record.identity.permissions.clone(),
            active: record.identity.active,
            last_login: record.last_login,
        }
    }
}
