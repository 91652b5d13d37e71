//! Webhook delivery over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::errors::WebhookError;
use crate::domain::ports::{WebhookPayload, WebhookPort};

/// Posts webhook payloads as JSON.
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    /// Creates a webhook client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| WebhookError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookPort for WebhookClient {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }

        debug!(title = %payload.title, "Webhook delivered");
        Ok(())
    }
}
