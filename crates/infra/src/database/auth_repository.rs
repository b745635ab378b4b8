//! Credential and session stores
//!
//! Passwords are stored as salted SHA-256 digests; session tokens are
//! opaque random values. The `is_admin` column carries the admin claim.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use medibook_core::accounts::ports::{CredentialStore, SessionStore};
use medibook_domain::{MedibookError, Result, SessionRecord};
use rand::RngCore;
use rusqlite::params;
use sha2::{Digest, Sha256};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbManager};

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SQLite-backed implementation of `CredentialStore`
pub struct SqliteCredentialStore {
    db: Arc<DbManager>,
}

impl SqliteCredentialStore {
    /// Create a new store instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn store(&self, user_id: &str, password: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let salt = random_hex(16);
        let hash = hash_password(&salt, password);
        let now = Utc::now().timestamp();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO credentials (user_id, password_hash, salt, is_admin, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![user_id, hash, salt, now],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn verify(&self, user_id: &str, password: &str) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let password = password.to_string();

        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                "SELECT password_hash, salt FROM credentials WHERE user_id = ?1",
                params![&user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            );
            match result {
                Ok((stored, salt)) => Ok(stored == hash_password(&salt, &password)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn is_admin(&self, user_id: &str) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                "SELECT is_admin FROM credentials WHERE user_id = ?1",
                params![&user_id],
                |row| row.get::<_, i64>(0),
            );
            match result {
                Ok(flag) => Ok(flag != 0),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_admin(&self, user_id: &str, grant: bool) -> Result<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE credentials SET is_admin = ?1 WHERE user_id = ?2",
                    params![i64::from(grant), &user_id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(MedibookError::NotFound(format!("credential {user_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

/// SQLite-backed implementation of `SessionStore`
pub struct SqliteSessionStore {
    db: Arc<DbManager>,
}

impl SqliteSessionStore {
    /// Create a new store instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn create(&self, user_id: &str, ttl_seconds: i64) -> Result<SessionRecord> {
        let db = Arc::clone(&self.db);
        let now = Utc::now().timestamp();
        let session = SessionRecord {
            token: random_hex(32),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + ttl_seconds,
        };
        let row = session.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![row.token, row.user_id, row.created_at, row.expires_at],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)??;

        Ok(session)
    }

    async fn find(&self, token: &str) -> Result<Option<SessionRecord>> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();

        task::spawn_blocking(move || -> Result<Option<SessionRecord>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
                params![&token],
                |row| {
                    Ok(SessionRecord {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            );
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM sessions WHERE token = ?1", params![&token])
                .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Tests
// =============================================================================
