//! Webhook delivery error types.

use thiserror::Error;

/// Errors raised while pushing to a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Network(String),

    #[error("webhook responded with status {status}")]
    Status { status: u16 },
}
