//! French email templates

use chrono::DateTime;
use medibook_domain::{Appointment, DoctorRecord};

/// Human-readable schedule, falling back to the raw date/time fields when
/// no instant is stored.
pub fn format_when(appointment: &Appointment) -> String {
    match appointment.scheduled_at.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
        Some(when) => when.format("%d/%m/%Y %H:%M").to_string(),
        None => format!("{} {}", appointment.date, appointment.time),
    }
}

/// Email to a doctor whose admission status changed.
pub fn doctor_status(doctor: &DoctorRecord) -> (String, String) {
    let subject = format!("Votre inscription médecin: {}", doctor.status.as_str());
    let body = format!(
        "Bonjour {},\n\nVotre inscription a été mise à jour: {}.\n\nCordialement,\nL'équipe",
        doctor.name.as_deref().unwrap_or(""),
        doctor.status.as_str()
    );
    (subject, body)
}

/// Confirmation to the patient after an approval.
pub fn approval_patient(when: &str) -> (String, String) {
    (
        "Confirmation de rendez-vous".into(),
        format!("Votre rendez-vous du {when} a été confirmé."),
    )
}

/// Confirmation to the doctor after an approval.
pub fn approval_doctor(when: &str) -> (String, String) {
    (
        "Nouveau rendez-vous confirmé — Confirmation de rendez-vous".into(),
        format!("Un rendez-vous a été confirmé pour {when}"),
    )
}

/// Reminder to the patient shortly before the appointment.
pub fn reminder_patient(when: &str) -> (String, String) {
    (
        "Rappel: rendez-vous imminent".into(),
        format!("Rappel: votre rendez-vous prévu le {when}.\n\nCordialement,\nL'équipe"),
    )
}

/// Reminder to the doctor shortly before the appointment.
pub fn reminder_doctor(when: &str) -> (String, String) {
    (
        format!("Rappel pour rendez-vous — {when}"),
        format!("Rappel: votre rendez-vous prévu le {when}.\n\nCordialement,\nL'équipe"),
    )
}

#[cfg(test)]
mod tests {
    use medibook_domain::{AppointmentStatus, DoctorStatus};

    use super::*;

    fn appointment(scheduled_at: Option<i64>) -> Appointment {
        Appointment {
            id: "a-1".into(),
            patient_id: "p-1".into(),
            doctor_id: "d-1".into(),
            date: "2024-01-01".into(),
            time: "10:00".into(),
            scheduled_at,
            status: AppointmentStatus::Approved,
            cancel_reason: None,
            reminder_sent: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn format_when_uses_instant_when_present() {
        assert_eq!(format_when(&appointment(Some(1_704_103_200))), "01/01/2024 10:00");
    }

    #[test]
    fn format_when_falls_back_to_raw_fields() {
        assert_eq!(format_when(&appointment(None)), "2024-01-01 10:00");
    }

    #[test]
    fn doctor_status_subject_carries_status() {
        let doctor = DoctorRecord {
            user_id: "d-1".into(),
            name: Some("Dr Dupont".into()),
            email: "dupont@example.com".into(),
            specialty: None,
            license: None,
            status: DoctorStatus::Approved,
            created_at: 0,
            updated_at: 0,
        };
        let (subject, body) = doctor_status(&doctor);
        assert_eq!(subject, "Votre inscription médecin: approved");
        assert!(body.contains("Dr Dupont"));
        assert!(body.contains("approved"));
    }
}
