//! Webhook port definition.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::WebhookError;

/// Body posted to a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    /// Message title.
    pub title: String,
    /// Markdown message text.
    pub text: String,
}

/// Port for pushing notifications to a webhook endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookPort: Send + Sync {
    /// Posts the payload to `url`.
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError>;
}
