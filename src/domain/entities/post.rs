//! Post entity and the cached post map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::comment::{Comment, walk_thread_mut};
use super::tracked_entity::EntityId;

/// Post identifier, unique within one entity's post list.
pub type PostId = String;

/// Cached posts keyed by entity, each list newest-first as upstream returned it.
pub type PostMap = BTreeMap<EntityId, Vec<Post>>;

/// Thread type upstream assigns to plain posts.
pub const DEFAULT_THREAD_KIND: u32 = 17;

/// Identifies the comment thread of a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadLocator {
    /// Thread object ID.
    pub oid: String,
    /// Thread type.
    #[serde(rename = "type")]
    pub kind: u32,
}

impl ThreadLocator {
    /// Creates a thread locator.
    #[must_use]
    pub fn new(oid: impl Into<String>, kind: u32) -> Self {
        Self {
            oid: oid.into(),
            kind,
        }
    }
}

/// One unit of published content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post ID.
    pub id: PostId,
    /// Owning entity ID.
    pub entity_id: EntityId,
    /// Publish time (unix seconds).
    pub timestamp: i64,
    /// Title, empty for untitled posts.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub description: String,
    /// Cover image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Attached media references.
    #[serde(default)]
    pub media_refs: Vec<String>,
    /// Link to the post upstream.
    pub jump_url: String,
    /// Comment thread of the post.
    pub thread: ThreadLocator,
    /// Comment tree, absent until comments were synced once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    /// Whether the user has seen this post.
    #[serde(default)]
    pub is_read: bool,
}

impl Post {
    /// Creates a post whose thread is keyed by the post ID.
    #[must_use]
    pub fn new(
        id: impl Into<PostId>,
        entity_id: impl Into<EntityId>,
        timestamp: i64,
        title: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            jump_url: String::new(),
            thread: ThreadLocator::new(id.clone(), DEFAULT_THREAD_KIND),
            id,
            entity_id: entity_id.into(),
            timestamp,
            title: title.into(),
            description: String::new(),
            cover: None,
            media_refs: Vec::new(),
            comments: None,
            is_read: false,
        }
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the upstream link.
    #[must_use]
    pub fn with_jump_url(mut self, jump_url: impl Into<String>) -> Self {
        self.jump_url = jump_url.into();
        self
    }

    /// Sets the comment tree.
    #[must_use]
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments);
        self
    }

    /// Marks the post read.
    #[must_use]
    pub const fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    /// Title if present, otherwise the description.
    #[must_use]
    pub fn headline(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.description
        } else {
            &self.title
        }
    }
}

/// Marks the post or comment with `id` read across a cached map.
///
/// Returns whether anything changed.
pub fn apply_read_marker(posts: &mut PostMap, id: &str) -> bool {
    let mut changed = false;

    for post in posts.values_mut().flatten() {
        if post.id == id && !post.is_read {
            post.is_read = true;
            changed = true;
        }
        if let Some(comments) = post.comments.as_mut() {
            walk_thread_mut(comments, |comment| {
                if comment.id == id && !comment.is_read {
                    comment.is_read = true;
                    changed = true;
                }
            });
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_prefers_title() {
        let post = Post::new("1", "e", 0, "Title").with_description("Body");
        assert_eq!(post.headline(), "Title");

        let untitled = Post::new("2", "e", 0, "  ").with_description("Body");
        assert_eq!(untitled.headline(), "Body");
    }

    #[test]
    fn test_thread_locator_serializes_type_key() {
        let json = serde_json::to_string(&ThreadLocator::new("99", 11)).unwrap();
        assert_eq!(json, r#"{"oid":"99","type":11}"#);
    }

    #[test]
    fn test_comments_absent_until_synced() {
        let json = serde_json::to_string(&Post::new("1", "e", 0, "t")).unwrap();
        assert!(!json.contains("comments"));

        let back: Post = serde_json::from_str(&json).unwrap();
        assert!(back.comments.is_none());
    }

    #[test]
    fn test_apply_read_marker_reaches_posts_and_replies() {
        let mut posts = PostMap::new();
        posts.insert(
            "e".to_string(),
            vec![Post::new("p1", "e", 0, "t").with_comments(vec![
                Comment::new("c1", "a", "b", 0).with_replies(vec![Comment::new("r1", "a", "b", 0)]),
            ])],
        );

        assert!(apply_read_marker(&mut posts, "p1"));
        assert!(apply_read_marker(&mut posts, "r1"));
        assert!(!apply_read_marker(&mut posts, "r1"));
        assert!(!apply_read_marker(&mut posts, "missing"));

        let post = &posts["e"][0];
        assert!(post.is_read);
        let reply = &post.comments.as_ref().unwrap()[0].replies.as_ref().unwrap()[0];
        assert!(reply.is_read);
    }
}
