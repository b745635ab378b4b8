//! Port interfaces for appointment persistence

use async_trait::async_trait;
use medibook_domain::{Appointment, Result};

/// Trait for appointment persistence and retrieval
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Create an appointment record
    async fn create(&self, appointment: Appointment) -> Result<()>;

    /// Get an appointment by id
    async fn get(&self, id: &str) -> Result<Option<Appointment>>;

    /// A patient's appointments, newest first
    async fn list_for_patient_ordered(&self, patient_id: &str) -> Result<Vec<Appointment>>;

    /// Unordered variant used when the ordered query fails
    async fn list_for_patient_unordered(&self, patient_id: &str) -> Result<Vec<Appointment>>;

    /// A doctor's pending appointments, ordered by scheduled instant
    async fn pending_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>>;

    /// Approve an appointment as one atomic check-then-write.
    ///
    /// Fails with NotFound when the record is absent or carries no
    /// scheduled instant, and with Conflict when another appointment for
    /// the same (doctor, instant) slot is already approved.
    async fn approve(&self, id: &str) -> Result<Appointment>;

    /// Cancel an appointment, storing the rejection reason
    async fn cancel(&self, id: &str, reason: Option<String>) -> Result<()>;

    /// Approved appointments scheduled in `[from, until]` whose reminder
    /// flag is unset
    async fn due_for_reminder(&self, from: i64, until: i64) -> Result<Vec<Appointment>>;

    /// Set the reminder flag for one appointment
    async fn mark_reminder_sent(&self, id: &str) -> Result<()>;
}
