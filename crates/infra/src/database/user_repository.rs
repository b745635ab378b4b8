//! User repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use medibook_core::accounts::ports::UserRepository as UserRepositoryPort;
use medibook_domain::{MedibookError, Result, UserRecord, UserRole};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbManager};

const USER_COLUMNS: &str = "id, name, email, phone, role, photo_url, created_at, updated_at";

/// SQLite-backed implementation of `UserRepository`
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn create(&self, user: UserRecord) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO users (id, name, email, phone, role, photo_url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.phone,
                    user.role.as_str(),
                    user.photo_url,
                    user.created_at,
                    user.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> Result<Option<UserRecord>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<Option<UserRecord>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![&id],
                map_user_row,
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let db = Arc::clone(&self.db);
        let email = email.to_string();

        task::spawn_blocking(move || -> Result<Option<UserRecord>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![&email],
                map_user_row,
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_profile(
        &self,
        id: &str,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let now = chrono::Utc::now().timestamp();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE users SET
                        name = COALESCE(?1, name),
                        phone = COALESCE(?2, phone),
                        updated_at = ?3
                     WHERE id = ?4",
                    params![name, phone, now, &id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(MedibookError::NotFound(format!("user {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_photo_url(&self, id: &str, url: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let url = url.to_string();
        let now = chrono::Utc::now().timestamp();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE users SET photo_url = ?1, updated_at = ?2 WHERE id = ?3",
                    params![url, now, &id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(MedibookError::NotFound(format!("user {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to a UserRecord
pub(crate) fn map_user_row(row: &Row) -> rusqlite::Result<UserRecord> {
    let role: String = row.get(4)?;
    let role = UserRole::parse(&role).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown user role: {role}").into(),
        )
    })?;

    Ok(UserRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        role,
        photo_url: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    fn setup_test_db() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(&db_path, 4).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    fn test_user(id: &str, email: &str) -> UserRecord {
        let now = Utc::now().timestamp();
        UserRecord {
            id: id.into(),
            name: Some("Alice Martin".into()),
            email: email.into(),
            phone: None,
            role: UserRole::Patient,
            photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_and_get_round_trip() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserRepository::new(db);
        let user = test_user("u-1", "alice@example.com");

        repo.create(user.clone()).await.expect("create user");

        let retrieved = repo.get("u-1").await.expect("get user").expect("user exists");
        assert_eq!(retrieved.email, user.email);
        assert_eq!(retrieved.role, UserRole::Patient);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn get_by_email_finds_user() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserRepository::new(db);

        repo.create(test_user("u-1", "alice@example.com")).await.expect("create user");

        let retrieved = repo.get_by_email("alice@example.com").await.expect("query");
        assert!(retrieved.is_some());
        assert!(repo.get_by_email("nobody@example.com").await.expect("query").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_email_is_rejected() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserRepository::new(db);

        repo.create(test_user("u-1", "alice@example.com")).await.expect("create user");
        let err = repo.create(test_user("u-2", "alice@example.com")).await.unwrap_err();

        assert!(matches!(err, MedibookError::Database(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_profile_merges_fields() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserRepository::new(db);

        repo.create(test_user("u-1", "alice@example.com")).await.expect("create user");
        repo.update_profile("u-1", None, Some("+33 6 00 00 00 00".into()))
            .await
            .expect("update profile");

        let user = repo.get("u-1").await.expect("get").expect("exists");
        // untouched field keeps its value
        assert_eq!(user.name.as_deref(), Some("Alice Martin"));
        assert_eq!(user.phone.as_deref(), Some("+33 6 00 00 00 00"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_missing_user_is_not_found() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserRepository::new(db);

        let err = repo.update_profile("ghost", Some("X".into()), None).await.unwrap_err();
        assert!(matches!(err, MedibookError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_photo_url_updates_record() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserRepository::new(db);

        repo.create(test_user("u-1", "alice@example.com")).await.expect("create user");
        repo.set_photo_url("u-1", "profiles/u-1.jpg").await.expect("set photo");

        let user = repo.get("u-1").await.expect("get").expect("exists");
        assert_eq!(user.photo_url.as_deref(), Some("profiles/u-1.jpg"));
    }
}
