mod clock_port;
mod content_fetcher_port;
mod local_store_port;
mod notification_port;
mod webhook_port;

pub use clock_port::ClockPort;
pub use content_fetcher_port::{ContentFetcherPort, ReplyPage};
pub use local_store_port::LocalStorePort;
pub use notification_port::NotificationPort;
pub use webhook_port::{WebhookPayload, WebhookPort};

#[cfg(test)]
pub mod mocks {
    pub use super::clock_port::mock::FixedClock;
    pub use super::content_fetcher_port::mock::MockContentFetcher;
    pub use super::notification_port::mock::MockNotificationPort;
    pub use super::webhook_port::MockWebhookPort;
}
