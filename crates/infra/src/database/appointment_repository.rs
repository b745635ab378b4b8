//! Appointment repository implementation
//!
//! Approval runs as a single SQLite transaction: read the record, check the
//! (doctor, instant) slot for an already-approved appointment, then write
//! the new status. Everything else is unconditional reads and writes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use medibook_core::appointments::ports::AppointmentRepository as AppointmentRepositoryPort;
use medibook_domain::{Appointment, AppointmentStatus, MedibookError, Result};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbManager};

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, date, time, scheduled_at, status, \
                                   cancel_reason, reminder_sent, created_at, updated_at";

/// SQLite-backed implementation of `AppointmentRepository`
pub struct SqliteAppointmentRepository {
    db: Arc<DbManager>,
}

impl SqliteAppointmentRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn list_for_patient(
        &self,
        patient_id: &str,
        order_clause: &'static str,
    ) -> Result<Vec<Appointment>> {
        let db = Arc::clone(&self.db);
        let patient_id = patient_id.to_string();

        task::spawn_blocking(move || -> Result<Vec<Appointment>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE patient_id = ?1 {order_clause}"
                ))
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![&patient_id], map_appointment_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl AppointmentRepositoryPort for SqliteAppointmentRepository {
    async fn create(&self, appointment: Appointment) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO appointments (id, patient_id, doctor_id, date, time, scheduled_at,
                                           status, cancel_reason, reminder_sent, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    appointment.id,
                    appointment.patient_id,
                    appointment.doctor_id,
                    appointment.date,
                    appointment.time,
                    appointment.scheduled_at,
                    appointment.status.as_str(),
                    appointment.cancel_reason,
                    i64::from(appointment.reminder_sent),
                    appointment.created_at,
                    appointment.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> Result<Option<Appointment>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<Option<Appointment>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
                params![&id],
                map_appointment_row,
            );
            match result {
                Ok(appointment) => Ok(Some(appointment)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_patient_ordered(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        // Failures here are recoverable: the caller retries unordered.
        self.list_for_patient(patient_id, "ORDER BY created_at DESC")
            .await
            .map_err(|err| MedibookError::TransientQuery(err.to_string()))
    }

    async fn list_for_patient_unordered(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        self.list_for_patient(patient_id, "").await
    }

    async fn pending_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>> {
        let db = Arc::clone(&self.db);
        let doctor_id = doctor_id.to_string();

        task::spawn_blocking(move || -> Result<Vec<Appointment>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                     WHERE doctor_id = ?1 AND status = 'pending'
                     ORDER BY scheduled_at"
                ))
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![&doctor_id], map_appointment_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn approve(&self, id: &str) -> Result<Appointment> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let now = Utc::now().timestamp();

        task::spawn_blocking(move || -> Result<Appointment> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;

            let mut appointment = tx
                .query_row(
                    &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
                    params![&id],
                    map_appointment_row,
                )
                .map_err(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => {
                        MedibookError::NotFound(format!("appointment {id}"))
                    }
                    other => map_sql_error(other),
                })?;

            let scheduled_at = appointment.scheduled_at.ok_or_else(|| {
                MedibookError::NotFound(format!("appointment {id} has no scheduled time"))
            })?;

            let conflicting: i64 = tx
                .query_row(
                    "SELECT COUNT(*) FROM appointments
                     WHERE doctor_id = ?1 AND status = 'approved' AND scheduled_at = ?2 AND id <> ?3",
                    params![&appointment.doctor_id, scheduled_at, &id],
                    |row| row.get(0),
                )
                .map_err(map_sql_error)?;
            if conflicting > 0 {
                return Err(MedibookError::Conflict(format!(
                    "slot {} {} already has an approved appointment",
                    appointment.doctor_id, scheduled_at
                )));
            }

            tx.execute(
                "UPDATE appointments SET status = 'approved', updated_at = ?1 WHERE id = ?2",
                params![now, &id],
            )
            .map_err(map_sql_error)?;

            tx.commit().map_err(map_sql_error)?;

            appointment.status = AppointmentStatus::Approved;
            appointment.updated_at = now;
            Ok(appointment)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn cancel(&self, id: &str, reason: Option<String>) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let now = Utc::now().timestamp();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE appointments SET status = 'cancelled', cancel_reason = ?1, updated_at = ?2
                     WHERE id = ?3",
                    params![reason, now, &id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(MedibookError::NotFound(format!("appointment {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn due_for_reminder(&self, from: i64, until: i64) -> Result<Vec<Appointment>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<Appointment>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                     WHERE status = 'approved'
                       AND reminder_sent = 0
                       AND scheduled_at IS NOT NULL
                       AND scheduled_at >= ?1
                       AND scheduled_at <= ?2"
                ))
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![from, until], map_appointment_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_reminder_sent(&self, id: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let now = Utc::now().timestamp();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE appointments SET reminder_sent = 1, updated_at = ?1 WHERE id = ?2",
                    params![now, &id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(MedibookError::NotFound(format!("appointment {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to an Appointment
fn map_appointment_row(row: &Row) -> rusqlite::Result<Appointment> {
    let status: String = row.get(6)?;
    let status = AppointmentStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown appointment status: {status}").into(),
        )
    })?;
    let reminder_sent: i64 = row.get(8)?;

    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        scheduled_at: row.get(5)?,
        status,
        cancel_reason: row.get(7)?,
        reminder_sent: reminder_sent != 0,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

// =============================================================================
// Tests
// =============================================================================
