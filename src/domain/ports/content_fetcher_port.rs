//! Content fetcher port definition.

use async_trait::async_trait;

use crate::domain::entities::{Comment, Credential, Post, ThreadLocator, TrackedEntity};
use crate::domain::errors::FetchError;

/// Page of replies to request under a root comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyPage {
    /// Replies per page.
    pub size: u32,
    /// One-based page number.
    pub number: u32,
}

impl ReplyPage {
    const DEFAULT_SIZE: u32 = 10;

    /// First page with the default size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            number: 1,
        }
    }
}

impl Default for ReplyPage {
    fn default() -> Self {
        Self::first()
    }
}

/// Port for reading posts and comment threads from upstream.
#[async_trait]
pub trait ContentFetcherPort: Send + Sync {
    /// Fetches an entity's recent posts, newest first.
    async fn fetch_posts(
        &self,
        entity_id: &str,
        credential: &Credential,
    ) -> Result<Vec<Post>, FetchError>;

    /// Fetches top-level comments of a thread, optionally with some replies.
    async fn fetch_comments(
        &self,
        thread: &ThreadLocator,
        credential: &Credential,
    ) -> Result<Vec<Comment>, FetchError>;

    /// Fetches one page of replies under `root_id`.
    async fn fetch_replies(
        &self,
        thread: &ThreadLocator,
        root_id: &str,
        credential: &Credential,
        page: ReplyPage,
    ) -> Result<Vec<Comment>, FetchError>;

    /// Looks up an entity's profile.
    async fn fetch_entity(
        &self,
        entity_id: &str,
        credential: &Credential,
    ) -> Result<Option<TrackedEntity>, FetchError>;

    /// Searches entities by keyword.
    async fn search_entities(
        &self,
        keyword: &str,
        credential: &Credential,
    ) -> Result<Vec<TrackedEntity>, FetchError>;
}
