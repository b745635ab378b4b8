//! Shared helpers for API integration tests

use std::sync::Arc;

use medibook_api::AppContext;
use medibook_core::{CredentialStore, RegisterRequest, RegisterRole};
use medibook_domain::{Config, UserRecord};
use tempfile::TempDir;

/// Build a context backed by a throwaway database.
pub fn test_context() -> (Arc<AppContext>, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let mut config = Config::default();
    config.database.path = temp_dir.path().join("test.db").display().to_string();
    config.storage.photo_dir = temp_dir.path().join("photos").display().to_string();
    config.reminders.enabled = false;

    let ctx = AppContext::new(config).expect("app context");
    (Arc::new(ctx), temp_dir)
}

/// Register a patient account.
pub async fn register_patient(ctx: &AppContext, email: &str, name: &str) -> UserRecord {
    ctx.accounts
        .register(RegisterRequest {
            name: Some(name.into()),
            email: email.into(),
            password: "s3cret".into(),
            role: RegisterRole::Patient,
            specialty: None,
            license: None,
        })
        .await
        .expect("register patient")
}

/// Register a doctor candidate (pending admission).
pub async fn register_doctor(ctx: &AppContext, email: &str, name: &str) -> UserRecord {
    ctx.accounts
        .register(RegisterRequest {
            name: Some(name.into()),
            email: email.into(),
            password: "s3cret".into(),
            role: RegisterRole::Doctor,
            specialty: Some("Cardiologie".into()),
            license: Some("FR-123".into()),
        })
        .await
        .expect("register doctor")
}

/// Register an account and grant it the admin claim.
pub async fn register_admin(ctx: &AppContext, email: &str) -> UserRecord {
    let user = register_patient(ctx, email, "Admin").await;
    ctx.credentials.set_admin(&user.id, true).await.expect("grant admin");
    user
}
