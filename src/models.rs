use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Session Schemas ---

/// Role
///
/// The closed RBAC classification carried inside the session token.
/// Any other value in the `role` claim fails deserialization, which the verifier
/// treats exactly like a missing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// --- Response Payloads (Output Schemas) ---

/// SessionProfile
///
/// Output schema for GET /api/auth/session. Built purely from the verified token,
/// so the frontend never needs to read the legacy `tulip_role` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionProfile {
    // The `sub` claim issued by the login service.
    pub id: String,
    pub email: String,
    pub role: Role,
    #[ts(type = "string")]
    pub expires_at: DateTime<Utc>,
}

/// LogoutResponse
///
/// Acknowledgment returned by POST /api/auth/logout, whether or not a session existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// ErrorResponse
///
/// Generic failure body. Never carries internal detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
