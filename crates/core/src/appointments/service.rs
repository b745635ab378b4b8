//! Booking service - appointment creation, listings and doctor decisions

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use medibook_domain::{
    Appointment, AppointmentStatus, AppointmentView, BookingRequest, MedibookError, Result,
};
use tracing::warn;
use uuid::Uuid;

use super::ports::AppointmentRepository;
use crate::accounts::ports::UserRepository;
use crate::doctors::ports::DoctorRepository;
use crate::notifications::NotificationService;

/// Booking service
pub struct BookingService {
    appointments: Arc<dyn AppointmentRepository>,
    doctors: Arc<dyn DoctorRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<NotificationService>,
}

impl BookingService {
    /// Create a new booking service
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        doctors: Arc<dyn DoctorRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self { appointments, doctors, users, notifier }
    }

    /// Book an appointment for a patient.
    ///
    /// All fields are required and the date/time must parse to an instant.
    /// No slot check happens here: several patients may book the same slot,
    /// and only one of them can later be approved.
    pub async fn book(&self, patient_id: &str, request: BookingRequest) -> Result<Appointment> {
        if request.doctor_id.is_empty() || request.date.is_empty() || request.time.is_empty() {
            return Err(MedibookError::InvalidInput(
                "doctor, date and time are required".into(),
            ));
        }

        let scheduled_at = parse_schedule(&request.date, &request.time).ok_or_else(|| {
            MedibookError::InvalidInput(format!(
                "unparsable schedule: {} {}",
                request.date, request.time
            ))
        })?;

        let now = Utc::now().timestamp();
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            doctor_id: request.doctor_id,
            date: request.date,
            time: request.time,
            scheduled_at: Some(scheduled_at),
            status: AppointmentStatus::Pending,
            cancel_reason: None,
            reminder_sent: false,
            created_at: now,
            updated_at: now,
        };

        self.appointments.create(appointment.clone()).await?;
        Ok(appointment)
    }

    /// A patient's appointments, newest first, with doctor names resolved.
    ///
    /// When the ordered query fails the listing retries unordered instead
    /// of surfacing the error.
    pub async fn appointments_for_patient(
        &self,
        patient_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AppointmentView>> {
        let mut rows = match self.appointments.list_for_patient_ordered(patient_id).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(patient_id, error = %err, "ordered appointment query failed; retrying unordered");
                self.appointments.list_for_patient_unordered(patient_id).await?
            }
        };

        if let Some(limit) = limit {
            rows.truncate(limit);
        }

        let mut views = Vec::with_capacity(rows.len());
        for appointment in rows {
            // A failed name lookup degrades to showing no name.
            let doctor_name = self
                .doctors
                .get(&appointment.doctor_id)
                .await
                .ok()
                .flatten()
                .and_then(|d| d.name);
            views.push(AppointmentView {
                id: appointment.id,
                doctor_id: appointment.doctor_id,
                doctor_name,
                date: appointment.date,
                time: appointment.time,
                scheduled_at: appointment.scheduled_at,
                status: appointment.status,
            });
        }

        Ok(views)
    }

    /// A doctor's review queue, ordered by scheduled instant.
    pub async fn pending_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>> {
        self.appointments.pending_for_doctor(doctor_id).await
    }

    /// Approve an appointment.
    ///
    /// The conflict check and the status write run as one transaction in
    /// the repository. Confirmation emails go out afterwards and never roll
    /// the approval back.
    pub async fn approve(&self, id: &str) -> Result<Appointment> {
        let appointment = self.appointments.approve(id).await?;

        let patient = self.users.get(&appointment.patient_id).await.ok().flatten();
        let doctor = self.doctors.get(&appointment.doctor_id).await.ok().flatten();
        self.notifier
            .appointment_approved(&appointment, patient.as_ref(), doctor.as_ref())
            .await;

        Ok(appointment)
    }

    /// Reject an appointment with an optional reason.
    pub async fn reject(&self, id: &str, reason: Option<String>) -> Result<()> {
        self.appointments.cancel(id, reason).await
    }
}

/// Parse `YYYY-MM-DD` + `HH:MM[:SS]` into a UTC unix timestamp.
fn parse_schedule(date: &str, time: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    Some(date.and_time(time).and_utc().timestamp())
}
