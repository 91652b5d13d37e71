mod entity_registry;
mod notification_dispatcher;
mod read_tracker;
mod subscriber_registry;

pub use entity_registry::EntityRegistry;
pub use notification_dispatcher::{NotificationDispatcher, truncate, webhook_payload};
pub use read_tracker::ReadTracker;
pub use subscriber_registry::{StoreUpdated, SubscriberRegistry, Subscription};
