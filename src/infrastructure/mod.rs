//! Infrastructure layer with external service adapters.

/// System clock.
pub mod clock;
/// Application configuration.
pub mod config;
/// Upstream content API client.
pub mod fetcher;
/// Desktop notifications.
pub mod notifications;
/// Local store adapters.
pub mod store;
/// Webhook delivery.
pub mod webhook;

pub use clock::SystemClock;
pub use config::{AppConfig, CliArgs, Command, ConfigManager, LogLevel};
pub use fetcher::HttpContentFetcher;
pub use notifications::DesktopNotificationService;
pub use store::{FileStore, InMemoryStore};
pub use webhook::WebhookClient;
