//! Transactional mail HTTP client
//!
//! Posts one JSON document per message to the configured endpoint.

use std::time::Duration;

use async_trait::async_trait;
use medibook_core::notifications::ports::{EmailMessage, Mailer};
use medibook_domain::{MedibookError, Result};
use serde_json::json;
use tracing::debug;

use crate::errors::InfraError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a transactional mail endpoint
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpMailer {
    /// Create a new mailer
    ///
    /// # Arguments
    /// * `api_url` - full endpoint URL messages are posted to
    /// * `api_key` - optional bearer token
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|err| MedibookError::from(InfraError::from(err)))?;

        Ok(Self { client, api_url, api_key })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let payload = json!({
            "from": message.from,
            "to": message.to,
            "subject": message.subject,
            "text": message.body,
        });

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| MedibookError::from(InfraError::from(err)))?;

        let status = response.status();
        debug!(status = status.as_u16(), to = %message.to, "mail endpoint responded");

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(MedibookError::Auth(format!(
                "mail endpoint rejected credentials ({status})"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(MedibookError::Network(format!(
                "mail endpoint returned {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            from: "no-reply@hospital.example".into(),
            to: "alice@example.com".into(),
            subject: "Confirmation de rendez-vous".into(),
            body: "Votre rendez-vous du 01/01/2024 10:00 a été confirmé.".into(),
        }
    }

    #[tokio::test]
    async fn sends_message_with_bearer_auth() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "to": "alice@example.com",
                "subject": "Confirmation de rendez-vous",
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mailer = HttpMailer::new(
            format!("{}/messages", mock_server.uri()),
            Some("test-api-key".into()),
        )
        .expect("mailer");

        mailer.send(&message()).await.expect("send");
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_auth_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&mock_server)
            .await;

        let mailer = HttpMailer::new(format!("{}/messages", mock_server.uri()), None)
            .expect("mailer");

        let err = mailer.send(&message()).await.unwrap_err();
        assert!(matches!(err, MedibookError::Auth(_)));
    }

    #[tokio::test]
    async fn server_error_maps_to_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let mailer = HttpMailer::new(format!("{}/messages", mock_server.uri()), None)
            .expect("mailer");

        let err = mailer.send(&message()).await.unwrap_err();
        assert!(matches!(err, MedibookError::Network(_)));
    }
}
