//! Doctor and approval-log repository implementations

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use medibook_core::doctors::ports::{
    ApprovalLogRepository as ApprovalLogRepositoryPort, DoctorRepository as DoctorRepositoryPort,
};
use medibook_domain::{
    ApprovalDecision, ApprovalEntry, DoctorRecord, DoctorStatus, MedibookError, Result, UserRole,
};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbManager};

const DOCTOR_COLUMNS: &str = "user_id, name, email, specialty, license, status, created_at, updated_at";

/// SQLite-backed implementation of `DoctorRepository`
pub struct SqliteDoctorRepository {
    db: Arc<DbManager>,
}

impl SqliteDoctorRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DoctorRepositoryPort for SqliteDoctorRepository {
    async fn create(&self, doctor: DoctorRecord) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO doctors (user_id, name, email, specialty, license, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    doctor.user_id,
                    doctor.name,
                    doctor.email,
                    doctor.specialty,
                    doctor.license,
                    doctor.status.as_str(),
                    doctor.created_at,
                    doctor.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, user_id: &str) -> Result<Option<DoctorRecord>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<Option<DoctorRecord>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE user_id = ?1"),
                params![&user_id],
                map_doctor_row,
            );
            match result {
                Ok(doctor) => Ok(Some(doctor)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_approved(&self) -> Result<Vec<DoctorRecord>> {
        self.list_by_status(DoctorStatus::Approved, "ORDER BY name").await
    }

    async fn list_pending(&self) -> Result<Vec<DoctorRecord>> {
        self.list_by_status(DoctorStatus::Pending, "ORDER BY created_at").await
    }

    async fn apply_decision(
        &self,
        user_id: &str,
        status: DoctorStatus,
        role: UserRole,
    ) -> Result<DoctorStatus> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let now = Utc::now().timestamp();

        task::spawn_blocking(move || -> Result<DoctorStatus> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;

            let previous: String = tx
                .query_row(
                    "SELECT status FROM doctors WHERE user_id = ?1",
                    params![&user_id],
                    |row| row.get(0),
                )
                .map_err(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => {
                        MedibookError::NotFound(format!("doctor {user_id}"))
                    }
                    other => map_sql_error(other),
                })?;
            let previous = DoctorStatus::parse(&previous).ok_or_else(|| {
                MedibookError::Database(format!("unknown doctor status: {previous}"))
            })?;

            tx.execute(
                "UPDATE doctors SET status = ?1, updated_at = ?2 WHERE user_id = ?3",
                params![status.as_str(), now, &user_id],
            )
            .map_err(map_sql_error)?;

            tx.execute(
                "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
                params![role.as_str(), now, &user_id],
            )
            .map_err(map_sql_error)?;

            tx.commit().map_err(map_sql_error)?;
            Ok(previous)
        })
        .await
        .map_err(map_join_error)?
    }
}

impl SqliteDoctorRepository {
    async fn list_by_status(
        &self,
        status: DoctorStatus,
        order_clause: &'static str,
    ) -> Result<Vec<DoctorRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<DoctorRecord>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE status = ?1 {order_clause}"
                ))
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![status.as_str()], map_doctor_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to a DoctorRecord
fn map_doctor_row(row: &Row) -> rusqlite::Result<DoctorRecord> {
    let status: String = row.get(5)?;
    let status = DoctorStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown doctor status: {status}").into(),
        )
    })?;

    Ok(DoctorRecord {
        user_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        specialty: row.get(3)?,
        license: row.get(4)?,
        status,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// SQLite-backed implementation of `ApprovalLogRepository`
pub struct SqliteApprovalLogRepository {
    db: Arc<DbManager>,
}

impl SqliteApprovalLogRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApprovalLogRepositoryPort for SqliteApprovalLogRepository {
    async fn append(&self, entry: ApprovalEntry) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO doctor_approvals (id, doctor_id, admin_id, admin_name, decision, note, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.id,
                    entry.doctor_id,
                    entry.admin_id,
                    entry.admin_name,
                    entry.decision.as_str(),
                    entry.note,
                    entry.created_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn recent(&self, doctor_id: &str, limit: usize) -> Result<Vec<ApprovalEntry>> {
        let db = Arc::clone(&self.db);
        let doctor_id = doctor_id.to_string();

        task::spawn_blocking(move || -> Result<Vec<ApprovalEntry>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, doctor_id, admin_id, admin_name, decision, note, created_at
                     FROM doctor_approvals
                     WHERE doctor_id = ?1
                     ORDER BY created_at DESC
                     LIMIT ?2",
                )
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![&doctor_id, limit as i64], map_approval_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_approval_row(row: &Row) -> rusqlite::Result<ApprovalEntry> {
    let decision: String = row.get(4)?;
    let decision = match decision.as_str() {
        "approved" => ApprovalDecision::Approved,
        "rejected" => ApprovalDecision::Rejected,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unknown approval decision: {other}").into(),
            ))
        }
    };

    Ok(ApprovalEntry {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        admin_id: row.get(2)?,
        admin_name: row.get(3)?,
        decision,
        note: row.get(5)?,
        created_at: row.get(6)?,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use medibook_core::accounts::ports::UserRepository;
    use medibook_domain::UserRecord;
    use tempfile::TempDir;

    use super::*;
    use crate::database::SqliteUserRepository;

    async fn setup() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(&db_path, 4).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    async fn seed_candidate(db: &Arc<DbManager>, id: &str, name: &str) {
        let now = Utc::now().timestamp();
        SqliteUserRepository::new(Arc::clone(db))
            .create(UserRecord {
                id: id.into(),
                name: Some(name.into()),
                email: format!("{id}@example.com"),
                phone: None,
                role: UserRole::DoctorPending,
                photo_url: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("seed user");

        SqliteDoctorRepository::new(Arc::clone(db))
            .create(DoctorRecord {
                user_id: id.into(),
                name: Some(name.into()),
                email: format!("{id}@example.com"),
                specialty: Some("Cardiologie".into()),
                license: Some("FR-123".into()),
                status: DoctorStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("seed doctor");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn approval_updates_status_and_user_role() {
        let (db, _temp_dir) = setup().await;
        seed_candidate(&db, "doc-1", "Dr Dupont").await;
        let repo = SqliteDoctorRepository::new(Arc::clone(&db));

        let previous = repo
            .apply_decision("doc-1", DoctorStatus::Approved, UserRole::Doctor)
            .await
            .expect("apply decision");
        assert_eq!(previous, DoctorStatus::Pending);

        let doctor = repo.get("doc-1").await.expect("get").expect("exists");
        assert_eq!(doctor.status, DoctorStatus::Approved);

        let user = SqliteUserRepository::new(db)
            .get("doc-1")
            .await
            .expect("get user")
            .expect("exists");
        assert_eq!(user.role, UserRole::Doctor);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejection_sets_rejected_role() {
        let (db, _temp_dir) = setup().await;
        seed_candidate(&db, "doc-1", "Dr Dupont").await;
        let repo = SqliteDoctorRepository::new(Arc::clone(&db));

        repo.apply_decision("doc-1", DoctorStatus::Rejected, UserRole::Rejected)
            .await
            .expect("apply decision");

        let user = SqliteUserRepository::new(db)
            .get("doc-1")
            .await
            .expect("get user")
            .expect("exists");
        assert_eq!(user.role, UserRole::Rejected);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn decision_on_missing_doctor_is_not_found() {
        let (db, _temp_dir) = setup().await;
        let repo = SqliteDoctorRepository::new(db);

        let err = repo
            .apply_decision("ghost", DoctorStatus::Approved, UserRole::Doctor)
            .await
            .unwrap_err();
        assert!(matches!(err, MedibookError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn directory_lists_only_approved_ordered_by_name() {
        let (db, _temp_dir) = setup().await;
        seed_candidate(&db, "doc-b", "Dr Bernard").await;
        seed_candidate(&db, "doc-a", "Dr Armand").await;
        seed_candidate(&db, "doc-c", "Dr Claude").await;
        let repo = SqliteDoctorRepository::new(Arc::clone(&db));

        repo.apply_decision("doc-b", DoctorStatus::Approved, UserRole::Doctor)
            .await
            .expect("approve b");
        repo.apply_decision("doc-a", DoctorStatus::Approved, UserRole::Doctor)
            .await
            .expect("approve a");
        repo.apply_decision("doc-c", DoctorStatus::Rejected, UserRole::Rejected)
            .await
            .expect("reject c");

        let directory = repo.list_approved().await.expect("list approved");
        let names: Vec<_> = directory.iter().filter_map(|d| d.name.as_deref()).collect();
        assert_eq!(names, vec!["Dr Armand", "Dr Bernard"]);

        let pending = repo.list_pending().await.expect("list pending");
        assert!(pending.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn approval_log_returns_newest_first() {
        let (db, _temp_dir) = setup().await;
        seed_candidate(&db, "doc-1", "Dr Dupont").await;
        let log = SqliteApprovalLogRepository::new(Arc::clone(&db));

        for (i, decision) in
            [ApprovalDecision::Rejected, ApprovalDecision::Approved].into_iter().enumerate()
        {
            log.append(ApprovalEntry {
                id: format!("entry-{i}"),
                doctor_id: "doc-1".into(),
                admin_id: Some("admin-1".into()),
                admin_name: Some("Admin".into()),
                decision,
                note: Some(format!("note {i}")),
                created_at: 1000 + i as i64,
            })
            .await
            .expect("append");
        }

        let recent = log.recent("doc-1", 10).await.expect("recent");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].decision, ApprovalDecision::Approved);
        assert_eq!(recent[1].decision, ApprovalDecision::Rejected);

        let limited = log.recent("doc-1", 1).await.expect("recent limited");
        assert_eq!(limited.len(), 1);
    }
}
