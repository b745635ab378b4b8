//! Port interfaces for outbound notifications

use async_trait::async_trait;
use medibook_domain::{DoctorStatus, Result};
use serde::{Deserialize, Serialize};

/// Outbound email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for the email transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Trait for the optional admission-decision webhook
#[async_trait]
pub trait DecisionHook: Send + Sync {
    /// Notify an external listener of a decided admission
    async fn notify(&self, user_id: &str, status: DoctorStatus) -> Result<()>;
}
