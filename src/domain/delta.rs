//! Newly detected content.

use super::entities::{Comment, CommentDepth, Post, TrackedEntity};

/// Kind of new content a sync cycle detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    /// The newest post of an entity was not cached before.
    NewPost,
    /// The entity authored a new top-level comment.
    NewComment,
    /// The entity authored a new reply.
    NewReply,
}

impl DeltaKind {
    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewPost => "New post",
            Self::NewComment => "New comment",
            Self::NewReply => "New reply",
        }
    }

    /// Maps a comment's thread position to its delta kind.
    #[must_use]
    pub const fn for_comment(depth: CommentDepth) -> Self {
        match depth {
            CommentDepth::TopLevel => Self::NewComment,
            CommentDepth::Reply => Self::NewReply,
        }
    }
}

impl std::fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected new post or self-authored comment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Delta {
    pub kind: DeltaKind,
    /// ID of the new post or comment.
    pub item_id: String,
    pub entity_name: String,
    pub content: String,
    pub jump_url: String,
    /// Unix seconds.
    pub timestamp: i64,
}

impl Delta {
    /// Delta for a newly arrived post.
    #[must_use]
    pub fn new_post(entity: &TrackedEntity, post: &Post) -> Self {
        Self {
            kind: DeltaKind::NewPost,
            item_id: post.id.clone(),
            entity_name: entity.display_name.clone(),
            content: post.headline().to_string(),
            jump_url: post.jump_url.clone(),
            timestamp: post.timestamp,
        }
    }

    /// Delta for a new comment or reply by the entity under `post`.
    #[must_use]
    pub fn new_comment(
        entity: &TrackedEntity,
        post: &Post,
        comment: &Comment,
        depth: CommentDepth,
    ) -> Self {
        Self {
            kind: DeltaKind::for_comment(depth),
            item_id: comment.id.clone(),
            entity_name: entity.display_name.clone(),
            content: comment.content.clone(),
            jump_url: post.jump_url.clone(),
            timestamp: comment.timestamp,
        }
    }
}
