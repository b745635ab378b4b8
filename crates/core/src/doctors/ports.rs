//! Port interfaces for doctor admission
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for doctor records and their
//! admission audit log.

use async_trait::async_trait;
use medibook_domain::{ApprovalEntry, DoctorRecord, DoctorStatus, Result, UserRole};

/// Trait for doctor record persistence and retrieval
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Create a doctor record (at doctor registration)
    async fn create(&self, doctor: DoctorRecord) -> Result<()>;

    /// Get a doctor by candidate uid
    async fn get(&self, user_id: &str) -> Result<Option<DoctorRecord>>;

    /// Approved doctors, ordered by name (the bookable directory)
    async fn list_approved(&self) -> Result<Vec<DoctorRecord>>;

    /// Doctors awaiting an admin decision
    async fn list_pending(&self) -> Result<Vec<DoctorRecord>>;

    /// Write the decided status and the linked user's role as one
    /// transaction. Returns the status the record held before the write.
    async fn apply_decision(
        &self,
        user_id: &str,
        status: DoctorStatus,
        role: UserRole,
    ) -> Result<DoctorStatus>;
}

/// Trait for the append-only admission audit log
#[async_trait]
pub trait ApprovalLogRepository: Send + Sync {
    /// Append an audit entry
    async fn append(&self, entry: ApprovalEntry) -> Result<()>;

    /// Most recent entries for a doctor, newest first
    async fn recent(&self, doctor_id: &str, limit: usize) -> Result<Vec<ApprovalEntry>>;
}
