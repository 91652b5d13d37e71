//! Application layer with sync cycles and supporting services.

/// Supporting services.
pub mod services;
/// Sync engine and scheduler.
pub mod sync;

pub use services::{
    EntityRegistry, NotificationDispatcher, ReadTracker, StoreUpdated, SubscriberRegistry,
    Subscription,
};
pub use sync::{CycleOutcome, CycleReport, SkipReason, SyncEngine, SyncScheduler};
