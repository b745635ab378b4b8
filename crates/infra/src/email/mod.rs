//! Outbound email transport

pub mod client;

pub use client::HttpMailer;

use async_trait::async_trait;
use medibook_core::notifications::ports::{EmailMessage, Mailer};
use medibook_domain::Result;
use tracing::info;

/// Mailer used when no mail endpoint is configured: messages are logged
/// instead of sent.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "email transport not configured; message logged only"
        );
        Ok(())
    }
}
