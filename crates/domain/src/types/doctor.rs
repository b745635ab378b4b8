//! Doctor admission types

use serde::{Deserialize, Serialize};

use super::user::{UserRecord, UserRole};

/// Admission status of a doctor record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    Pending,
    Approved,
    Rejected,
}

impl DoctorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Admin decision on a pending doctor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl ApprovalDecision {
    /// Doctor status resulting from the decision.
    pub fn status(&self) -> DoctorStatus {
        match self {
            Self::Approved => DoctorStatus::Approved,
            Self::Rejected => DoctorStatus::Rejected,
        }
    }

    /// User role resulting from the decision.
    pub fn role(&self) -> UserRole {
        match self {
            Self::Approved => UserRole::Doctor,
            Self::Rejected => UserRole::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.status().as_str()
    }
}

/// Doctor record stored in the `doctors` table, keyed by the candidate uid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub user_id: String,
    pub name: Option<String>,
    pub email: String,
    pub specialty: Option<String>,
    pub license: Option<String>,
    pub status: DoctorStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Immutable admission audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalEntry {
    pub id: String,
    pub doctor_id: String,
    pub admin_id: Option<String>,
    pub admin_name: Option<String>,
    pub decision: ApprovalDecision,
    pub note: Option<String>,
    pub created_at: i64,
}

/// Admin detail view: doctor record, linked user, recent decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDetails {
    pub doctor: DoctorRecord,
    pub user: Option<UserRecord>,
    pub approvals: Vec<ApprovalEntry>,
}
