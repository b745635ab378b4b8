//! Account service - registration, sign-in, profile management

use std::sync::Arc;

use chrono::Utc;
use medibook_domain::constants::DEFAULT_SESSION_TTL_SECS;
use medibook_domain::{
    DoctorRecord, DoctorStatus, MedibookError, Result, SessionRecord, UserRecord, UserRole,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ports::{CredentialStore, PhotoStore, SessionStore, UserRepository};
use crate::doctors::ports::DoctorRepository;

/// Role selectable at registration. Admin accounts are never
/// self-registered; the admin claim is granted from the CLI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegisterRole {
    Patient,
    Doctor,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub role: RegisterRole,
    pub specialty: Option<String>,
    pub license: Option<String>,
}

/// Account service
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    photos: Arc<dyn PhotoStore>,
    doctors: Arc<dyn DoctorRepository>,
    session_ttl: i64,
}

impl AccountService {
    /// Create a new account service
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        photos: Arc<dyn PhotoStore>,
        doctors: Arc<dyn DoctorRepository>,
    ) -> Self {
        Self { users, credentials, sessions, photos, doctors, session_ttl: DEFAULT_SESSION_TTL_SECS }
    }

    /// Override the session lifetime.
    pub fn with_session_ttl(mut self, ttl_seconds: i64) -> Self {
        self.session_ttl = ttl_seconds;
        self
    }

    /// Register a new account.
    ///
    /// A doctor registration creates the user with role `doctor_pending`
    /// plus a pending doctor record for admin review; patients are active
    /// immediately.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserRecord> {
        let email = request.email.trim().to_string();
        if email.is_empty() || request.password.is_empty() {
            return Err(MedibookError::InvalidInput(
                "email and password are required".into(),
            ));
        }

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(MedibookError::Conflict(format!(
                "an account already exists for {email}"
            )));
        }

        let now = Utc::now().timestamp();
        let role = match request.role {
            RegisterRole::Patient => UserRole::Patient,
            RegisterRole::Doctor => UserRole::DoctorPending,
        };

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            email: email.clone(),
            phone: None,
            role,
            photo_url: None,
            created_at: now,
            updated_at: now,
        };

        self.users.create(user.clone()).await?;
        self.credentials.store(&user.id, &request.password).await?;

        if request.role == RegisterRole::Doctor {
            self.doctors
                .create(DoctorRecord {
                    user_id: user.id.clone(),
                    name: request.name,
                    email,
                    specialty: request.specialty,
                    license: request.license,
                    status: DoctorStatus::Pending,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }

        Ok(user)
    }

    /// Sign in with email/password; returns the session and the user so the
    /// client can route by role.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(SessionRecord, UserRecord)> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| MedibookError::Auth("invalid credentials".into()))?;

        if !self.credentials.verify(&user.id, password).await? {
            return Err(MedibookError::Auth("invalid credentials".into()));
        }

        let session = self.sessions.create(&user.id, self.session_ttl).await?;
        Ok((session, user))
    }

    /// Revoke a session token.
    pub async fn sign_out(&self, token: &str) -> Result<()> {
        self.sessions.revoke(token).await
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<UserRecord> {
        let session = self
            .sessions
            .find(token)
            .await?
            .ok_or_else(|| MedibookError::Auth("invalid session token".into()))?;

        if !session.is_valid_at(Utc::now().timestamp()) {
            return Err(MedibookError::Auth("session expired".into()));
        }

        self.users
            .get(&session.user_id)
            .await?
            .ok_or_else(|| MedibookError::Auth("no user for session".into()))
    }

    /// Check the admin claim on the caller's credential.
    pub async fn require_admin(&self, user: &UserRecord) -> Result<()> {
        if self.credentials.is_admin(&user.id).await? {
            Ok(())
        } else {
            Err(MedibookError::Auth("administrator privileges required".into()))
        }
    }

    /// Merge name/phone into the caller's profile.
    pub async fn update_profile(
        &self,
        user: &UserRecord,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<UserRecord> {
        self.users.update_profile(&user.id, name, phone).await?;
        self.users
            .get(&user.id)
            .await?
            .ok_or_else(|| MedibookError::NotFound(format!("user {}", user.id)))
    }

    /// Store a profile photo and record its URL on the user.
    pub async fn store_photo(
        &self,
        user: &UserRecord,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String> {
        if bytes.is_empty() {
            return Err(MedibookError::InvalidInput("empty photo upload".into()));
        }
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(MedibookError::InvalidInput(format!(
                "unsupported photo extension: {extension}"
            )));
        }

        let url = self.photos.store(&user.id, extension, bytes).await?;
        self.users.set_photo_url(&user.id, &url).await?;
        Ok(url)
    }
}
