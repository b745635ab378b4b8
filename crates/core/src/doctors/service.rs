//! Doctor admission service - approval state machine and directory

use std::sync::Arc;

use chrono::Utc;
use medibook_domain::constants::APPROVAL_HISTORY_LIMIT;
use medibook_domain::{
    ApprovalDecision, ApprovalEntry, DoctorDetails, DoctorRecord, MedibookError, Result,
    UserRecord,
};
use tracing::warn;
use uuid::Uuid;

use super::ports::{ApprovalLogRepository, DoctorRepository};
use crate::accounts::ports::UserRepository;
use crate::notifications::NotificationService;

/// Doctor admission service
pub struct DoctorService {
    doctors: Arc<dyn DoctorRepository>,
    approvals: Arc<dyn ApprovalLogRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<NotificationService>,
}

impl DoctorService {
    /// Create a new doctor service
    pub fn new(
        doctors: Arc<dyn DoctorRepository>,
        approvals: Arc<dyn ApprovalLogRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self { doctors, approvals, users, notifier }
    }

    /// Approved doctors, ordered by name. Only these are bookable.
    pub async fn directory(&self) -> Result<Vec<DoctorRecord>> {
        self.doctors.list_approved().await
    }

    /// Admin review queue.
    pub async fn pending(&self) -> Result<Vec<DoctorRecord>> {
        self.doctors.list_pending().await
    }

    /// Admin detail view: record, linked user, recent decisions.
    ///
    /// A failing history query degrades to an empty list rather than
    /// blocking the view.
    pub async fn details(&self, user_id: &str) -> Result<DoctorDetails> {
        let doctor = self
            .doctors
            .get(user_id)
            .await?
            .ok_or_else(|| MedibookError::NotFound(format!("doctor {user_id}")))?;

        let user = self.users.get(user_id).await?;

        let approvals = match self.approvals.recent(user_id, APPROVAL_HISTORY_LIMIT).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(doctor_id = user_id, error = %err, "failed to load approval history");
                Vec::new()
            }
        };

        Ok(DoctorDetails { doctor, user, approvals })
    }

    /// Decide a pending admission.
    ///
    /// Status and the linked user role commit as one transaction; the audit
    /// entry is appended best-effort afterwards and its failure never rolls
    /// the decision back. The notification fires only when the stored
    /// status actually changed, so re-deciding the same way is idempotent.
    pub async fn decide(
        &self,
        admin: &UserRecord,
        user_id: &str,
        decision: ApprovalDecision,
        note: Option<String>,
    ) -> Result<DoctorRecord> {
        let previous = self
            .doctors
            .apply_decision(user_id, decision.status(), decision.role())
            .await?;

        let entry = ApprovalEntry {
            id: Uuid::new_v4().to_string(),
            doctor_id: user_id.to_string(),
            admin_id: Some(admin.id.clone()),
            admin_name: admin.name.clone(),
            decision,
            note,
            created_at: Utc::now().timestamp(),
        };
        if let Err(err) = self.approvals.append(entry).await {
            warn!(doctor_id = user_id, error = %err, "failed to append approval log entry");
        }

        let doctor = self
            .doctors
            .get(user_id)
            .await?
            .ok_or_else(|| MedibookError::NotFound(format!("doctor {user_id}")))?;

        if previous != decision.status() {
            self.notifier.doctor_status_changed(&doctor).await;
        }

        Ok(doctor)
    }
}
