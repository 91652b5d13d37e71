//! Domain layer with core entities and port definitions.

/// Newly detected content.
pub mod delta;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use delta::{Delta, DeltaKind};
pub use entities::{Comment, Credential, Post, PostMap, Settings, TrackedEntity};
pub use errors::{FetchError, StoreError, WebhookError};
pub use ports::{ClockPort, ContentFetcherPort, LocalStorePort, NotificationPort, WebhookPort};
