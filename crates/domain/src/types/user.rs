//! User and session types

use serde::{Deserialize, Serialize};

/// Role attached to a user record.
///
/// `DoctorPending` marks a doctor-candidate awaiting admin review; the
/// admission decision rewrites it to `Doctor` or `Rejected`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Patient,
    Doctor,
    DoctorPending,
    Rejected,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::DoctorPending => "doctor_pending",
            Self::Rejected => "rejected",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "patient" => Some(Self::Patient),
            "doctor" => Some(Self::Doctor),
            "doctor_pending" => Some(Self::DoctorPending),
            "rejected" => Some(Self::Rejected),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// User record stored in the `users` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub photo_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Opaque bearer-token session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl SessionRecord {
    /// Whether the session is still valid at `now` (unix seconds).
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at > now
    }
}
