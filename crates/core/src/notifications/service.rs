//! Notification service and the periodic reminder pass
//!
//! Business outcomes never depend on a notification: every send failure is
//! logged and swallowed here.

use std::sync::Arc;

use medibook_domain::{Appointment, DoctorRecord, Result, UserRecord};
use tracing::{debug, info, warn};

use super::ports::{DecisionHook, EmailMessage, Mailer};
use super::templates;
use crate::accounts::ports::UserRepository;
use crate::appointments::ports::AppointmentRepository;
use crate::doctors::ports::DoctorRepository;

/// Sends transactional emails for status transitions
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    from: String,
    hook: Option<Arc<dyn DecisionHook>>,
}

impl NotificationService {
    /// Create a new notification service
    pub fn new(mailer: Arc<dyn Mailer>, from: String, hook: Option<Arc<dyn DecisionHook>>) -> Self {
        Self { mailer, from, hook }
    }

    /// One email to the doctor describing the newly stored status.
    ///
    /// The caller only invokes this when the stored status actually
    /// changed, so one write produces at most one email.
    pub async fn doctor_status_changed(&self, doctor: &DoctorRecord) {
        let (subject, body) = templates::doctor_status(doctor);
        self.deliver(&doctor.email, subject, body).await;

        if let Some(hook) = &self.hook {
            if let Err(err) = hook.notify(&doctor.user_id, doctor.status).await {
                debug!(doctor_id = %doctor.user_id, error = %err, "decision webhook failed");
            }
        }
    }

    /// Confirmation emails to patient and doctor after an approval.
    pub async fn appointment_approved(
        &self,
        appointment: &Appointment,
        patient: Option<&UserRecord>,
        doctor: Option<&DoctorRecord>,
    ) {
        let when = templates::format_when(appointment);

        if let Some(patient) = patient {
            let (subject, body) = templates::approval_patient(&when);
            self.deliver(&patient.email, subject, body).await;
        }
        if let Some(doctor) = doctor {
            let (subject, body) = templates::approval_doctor(&when);
            self.deliver(&doctor.email, subject, body).await;
        }
    }

    /// Reminder emails to patient and doctor shortly before the slot.
    pub async fn appointment_reminder(
        &self,
        appointment: &Appointment,
        patient: Option<&UserRecord>,
        doctor: Option<&DoctorRecord>,
    ) {
        let when = templates::format_when(appointment);

        if let Some(patient) = patient {
            let (subject, body) = templates::reminder_patient(&when);
            self.deliver(&patient.email, subject, body).await;
        }
        if let Some(doctor) = doctor {
            let (subject, body) = templates::reminder_doctor(&when);
            self.deliver(&doctor.email, subject, body).await;
        }
    }

    async fn deliver(&self, to: &str, subject: String, body: String) {
        let message =
            EmailMessage { from: self.from.clone(), to: to.to_string(), subject, body };
        if let Err(err) = self.mailer.send(&message).await {
            warn!(to = %message.to, subject = %message.subject, error = %err, "email send failed");
        }
    }
}

/// Scans approved appointments inside the look-ahead window and sends
/// at most one reminder per record.
pub struct ReminderService {
    appointments: Arc<dyn AppointmentRepository>,
    users: Arc<dyn UserRepository>,
    doctors: Arc<dyn DoctorRepository>,
    notifier: Arc<NotificationService>,
    window_minutes: i64,
}

impl ReminderService {
    /// Create a new reminder service
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        users: Arc<dyn UserRepository>,
        doctors: Arc<dyn DoctorRepository>,
        notifier: Arc<NotificationService>,
        window_minutes: i64,
    ) -> Self {
        Self { appointments, users, doctors, notifier, window_minutes }
    }

    /// Run one reminder pass at `now` (unix seconds). Returns the number of
    /// appointments processed.
    ///
    /// Each record is handled independently: a failing lookup or flag write
    /// is logged and the pass moves on, so partial progress survives
    /// retries.
    pub async fn run_once(&self, now: i64) -> Result<usize> {
        let until = now + self.window_minutes * 60;
        let due = self.appointments.due_for_reminder(now, until).await?;

        if due.is_empty() {
            debug!("no appointments due for reminder");
            return Ok(0);
        }

        info!(count = due.len(), "sending appointment reminders");

        let mut processed = 0;
        for appointment in due {
            let patient = self.users.get(&appointment.patient_id).await.ok().flatten();
            let doctor = self.doctors.get(&appointment.doctor_id).await.ok().flatten();

            self.notifier
                .appointment_reminder(&appointment, patient.as_ref(), doctor.as_ref())
                .await;

            // The flag is set per processed record regardless of mail
            // outcome: at most one reminder per appointment.
            if let Err(err) = self.appointments.mark_reminder_sent(&appointment.id).await {
                warn!(appointment_id = %appointment.id, error = %err, "failed to mark reminder as sent");
                continue;
            }
            processed += 1;
        }

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use medibook_domain::{
        AppointmentStatus, DoctorStatus, MedibookError, UserRole,
    };

    use super::*;

    #[derive(Default)]
    struct MemoryAppointments {
        rows: Mutex<HashMap<String, Appointment>>,
        fail_mark: Mutex<Vec<String>>,
    }

    impl MemoryAppointments {
        fn insert(&self, id: &str, scheduled_at: i64) {
            self.rows.lock().unwrap().insert(
                id.to_string(),
                Appointment {
                    id: id.to_string(),
                    patient_id: "p-1".into(),
                    doctor_id: "d-1".into(),
                    date: "2024-01-01".into(),
                    time: "10:00".into(),
                    scheduled_at: Some(scheduled_at),
                    status: AppointmentStatus::Approved,
                    cancel_reason: None,
                    reminder_sent: false,
                    created_at: 0,
                    updated_at: 0,
                },
            );
        }
    }

    #[async_trait]
    impl AppointmentRepository for MemoryAppointments {
        async fn create(&self, appointment: Appointment) -> Result<()> {
            self.rows.lock().unwrap().insert(appointment.id.clone(), appointment);
            Ok(())
        }

        async fn get(&self, id: &str) -> Result<Option<Appointment>> {
            Ok(self.rows.lock().unwrap().get(id).cloned())
        }

        async fn list_for_patient_ordered(&self, _patient_id: &str) -> Result<Vec<Appointment>> {
            Ok(Vec::new())
        }

        async fn list_for_patient_unordered(&self, _patient_id: &str) -> Result<Vec<Appointment>> {
            Ok(Vec::new())
        }

        async fn pending_for_doctor(&self, _doctor_id: &str) -> Result<Vec<Appointment>> {
            Ok(Vec::new())
        }

        async fn approve(&self, id: &str) -> Result<Appointment> {
            Err(MedibookError::NotFound(format!("appointment {id}")))
        }

        async fn cancel(&self, _id: &str, _reason: Option<String>) -> Result<()> {
            Ok(())
        }

        async fn due_for_reminder(&self, from: i64, until: i64) -> Result<Vec<Appointment>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|a| {
                    a.status == AppointmentStatus::Approved
                        && !a.reminder_sent
                        && a.scheduled_at.map(|t| t >= from && t <= until).unwrap_or(false)
                })
                .cloned()
                .collect())
        }

        async fn mark_reminder_sent(&self, id: &str) -> Result<()> {
            if self.fail_mark.lock().unwrap().iter().any(|f| f == id) {
                return Err(MedibookError::Database("write failed".into()));
            }
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .get_mut(id)
                .ok_or_else(|| MedibookError::NotFound(format!("appointment {id}")))?;
            row.reminder_sent = true;
            Ok(())
        }
    }

    struct StubUsers;

    #[async_trait]
    impl UserRepository for StubUsers {
        async fn create(&self, _user: UserRecord) -> Result<()> {
            Ok(())
        }

        async fn get(&self, id: &str) -> Result<Option<UserRecord>> {
            Ok(Some(UserRecord {
                id: id.to_string(),
                name: Some("Alice".into()),
                email: "alice@example.com".into(),
                phone: None,
                role: UserRole::Patient,
                photo_url: None,
                created_at: 0,
                updated_at: 0,
            }))
        }

        async fn get_by_email(&self, _email: &str) -> Result<Option<UserRecord>> {
            Ok(None)
        }

        async fn update_profile(
            &self,
            _id: &str,
            _name: Option<String>,
            _phone: Option<String>,
        ) -> Result<()> {
            Ok(())
        }

        async fn set_photo_url(&self, _id: &str, _url: &str) -> Result<()> {
            Ok(())
        }
    }

    struct StubDoctors;

    #[async_trait]
    impl DoctorRepository for StubDoctors {
        async fn create(&self, _doctor: DoctorRecord) -> Result<()> {
            Ok(())
        }

        async fn get(&self, user_id: &str) -> Result<Option<DoctorRecord>> {
            Ok(Some(DoctorRecord {
                user_id: user_id.to_string(),
                name: Some("Dr Dupont".into()),
                email: "dupont@example.com".into(),
                specialty: None,
                license: None,
                status: DoctorStatus::Approved,
                created_at: 0,
                updated_at: 0,
            }))
        }

        async fn list_approved(&self) -> Result<Vec<DoctorRecord>> {
            Ok(Vec::new())
        }

        async fn list_pending(&self) -> Result<Vec<DoctorRecord>> {
            Ok(Vec::new())
        }

        async fn apply_decision(
            &self,
            user_id: &str,
            _status: DoctorStatus,
            _role: UserRole,
        ) -> Result<DoctorStatus> {
            Err(MedibookError::NotFound(format!("doctor {user_id}")))
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<()> {
            if self.fail {
                return Err(MedibookError::Network("smtp unavailable".into()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn build(
        repo: Arc<MemoryAppointments>,
        mailer: Arc<RecordingMailer>,
    ) -> ReminderService {
        let notifier = Arc::new(NotificationService::new(
            mailer,
            "no-reply@hospital.example".into(),
            None,
        ));
        ReminderService::new(repo, Arc::new(StubUsers), Arc::new(StubDoctors), notifier, 15)
    }

    #[tokio::test]
    async fn reminder_pass_is_idempotent() {
        let repo = Arc::new(MemoryAppointments::default());
        repo.insert("a-1", 1_000_000 + 600);
        let mailer = Arc::new(RecordingMailer::default());
        let service = build(repo.clone(), mailer.clone());

        let first = service.run_once(1_000_000).await.unwrap();
        let second = service.run_once(1_000_000).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        // one reminder to the patient, one to the doctor, never more
        assert_eq!(mailer.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn appointments_outside_window_are_skipped() {
        let repo = Arc::new(MemoryAppointments::default());
        repo.insert("soon", 1_000_000 + 600);
        repo.insert("later", 1_000_000 + 3600);
        let mailer = Arc::new(RecordingMailer::default());
        let service = build(repo.clone(), mailer);

        let processed = service.run_once(1_000_000).await.unwrap();

        assert_eq!(processed, 1);
        let rows = repo.rows.lock().unwrap();
        assert!(rows.get("soon").unwrap().reminder_sent);
        assert!(!rows.get("later").unwrap().reminder_sent);
    }

    #[tokio::test]
    async fn one_failing_record_does_not_block_the_batch() {
        let repo = Arc::new(MemoryAppointments::default());
        repo.insert("a-1", 1_000_000 + 60);
        repo.insert("a-2", 1_000_000 + 120);
        repo.fail_mark.lock().unwrap().push("a-1".into());
        let mailer = Arc::new(RecordingMailer::default());
        let service = build(repo.clone(), mailer);

        let processed = service.run_once(1_000_000).await.unwrap();

        assert_eq!(processed, 1);
        assert!(repo.rows.lock().unwrap().get("a-2").unwrap().reminder_sent);
    }

    #[tokio::test]
    async fn mail_failure_still_marks_the_record() {
        let repo = Arc::new(MemoryAppointments::default());
        repo.insert("a-1", 1_000_000 + 60);
        let mailer = Arc::new(RecordingMailer { fail: true, ..Default::default() });
        let service = build(repo.clone(), mailer);

        let processed = service.run_once(1_000_000).await.unwrap();

        assert_eq!(processed, 1);
        assert!(repo.rows.lock().unwrap().get("a-1").unwrap().reminder_sent);
    }
}
