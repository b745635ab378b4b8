//! Appointment types

use serde::{Deserialize, Serialize};

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Appointment record stored in the `appointments` table.
///
/// `scheduled_at` is nullable in storage: records imported from the legacy
/// store may carry no parseable instant. Approval treats a missing instant
/// as NotFound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub scheduled_at: Option<i64>,
    pub status: AppointmentStatus,
    pub cancel_reason: Option<String>,
    pub reminder_sent: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Booking request as submitted by a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
}

/// Patient-facing listing entry with the doctor display name resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: String,
    pub doctor_id: String,
    pub doctor_name: Option<String>,
    pub date: String,
    pub time: String,
    pub scheduled_at: Option<i64>,
    pub status: AppointmentStatus,
}
