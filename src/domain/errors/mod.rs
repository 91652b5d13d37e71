//! Domain error types.

mod fetch_error;
mod store_error;
mod webhook_error;

pub use fetch_error::FetchError;
pub use store_error::StoreError;
pub use webhook_error::WebhookError;
