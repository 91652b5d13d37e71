//! Domain entity definitions.

mod comment;
mod credential;
mod post;
mod read_markers;
mod settings;
mod tracked_entity;

pub use comment::{Comment, CommentDepth, CommentId, index_thread, walk_thread, walk_thread_mut};
pub use credential::Credential;
pub use post::{DEFAULT_THREAD_KIND, Post, PostId, PostMap, ThreadLocator, apply_read_marker};
pub use read_markers::ReadMarkers;
pub use settings::{CycleKind, NotificationSettings, Settings, WebhookSettings};
pub use tracked_entity::{EntityId, TrackedEntity};
