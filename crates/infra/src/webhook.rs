//! Admission decision webhook
//!
//! Optional fire-and-forget POST after each doctor decision. The caller
//! treats failures as non-critical.

use std::time::Duration;

use async_trait::async_trait;
use medibook_core::notifications::ports::DecisionHook;
use medibook_domain::{DoctorStatus, MedibookError, Result};
use serde_json::json;

use crate::errors::InfraError;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP webhook notified of admission decisions
pub struct DecisionWebhook {
    client: reqwest::Client,
    url: String,
}

impl DecisionWebhook {
    /// Create a new webhook client
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .map_err(|err| MedibookError::from(InfraError::from(err)))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl DecisionHook for DecisionWebhook {
    async fn notify(&self, user_id: &str, status: DoctorStatus) -> Result<()> {
        let payload = json!({ "userId": user_id, "status": status.as_str() });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| MedibookError::from(InfraError::from(err)))?;

        if !response.status().is_success() {
            return Err(MedibookError::Network(format!(
                "decision webhook returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
