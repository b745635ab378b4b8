//! Port interfaces for account management
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for users, credentials, sessions
//! and profile photo storage.

use async_trait::async_trait;
use medibook_domain::{Result, SessionRecord, UserRecord};

/// Trait for user record persistence and retrieval
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user record
    async fn create(&self, user: UserRecord) -> Result<()>;

    /// Get a user by uid
    async fn get(&self, id: &str) -> Result<Option<UserRecord>>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Merge name/phone into an existing record; `None` leaves a field
    /// unchanged
    async fn update_profile(
        &self,
        id: &str,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<()>;

    /// Record the stored photo URL on the user
    async fn set_photo_url(&self, id: &str, url: &str) -> Result<()>;
}

/// Trait for password credentials and the admin claim
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store a credential for a newly registered user
    async fn store(&self, user_id: &str, password: &str) -> Result<()>;

    /// Check a password against the stored credential
    async fn verify(&self, user_id: &str, password: &str) -> Result<bool>;

    /// Whether the credential carries the admin claim
    async fn is_admin(&self, user_id: &str) -> Result<bool>;

    /// Grant or revoke the admin claim
    async fn set_admin(&self, user_id: &str, grant: bool) -> Result<()>;
}

/// Trait for opaque bearer-token sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issue a new session for the user
    async fn create(&self, user_id: &str, ttl_seconds: i64) -> Result<SessionRecord>;

    /// Look up a session by token
    async fn find(&self, token: &str) -> Result<Option<SessionRecord>>;

    /// Revoke a session
    async fn revoke(&self, token: &str) -> Result<()>;
}

/// Trait for profile photo blobs
///
/// One blob per user at a deterministic path keyed by uid.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store the photo and return its URL
    async fn store(&self, user_id: &str, extension: &str, bytes: &[u8]) -> Result<String>;
}
