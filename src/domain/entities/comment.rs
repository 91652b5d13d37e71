//! Comment thread entities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Comment identifier, unique within one post's thread.
pub type CommentId = String;

/// A comment or reply in a post's thread.
///
/// Threads are two levels deep in practice: top-level comments carrying a flat
/// list of replies. Walkers below use an explicit stack so deeper nesting from
/// upstream is still handled without recursion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID.
    pub id: CommentId,
    /// Text content.
    pub content: String,
    /// Creation time (unix seconds).
    pub timestamp: i64,
    /// Author display name.
    pub author_name: String,
    /// Author avatar reference.
    #[serde(default)]
    pub author_avatar_ref: String,
    /// Whether the comment is pinned by the post owner.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pinned: bool,
    /// Total number of replies upstream reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u32>,
    /// Top-level ancestor used for reply-page fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<CommentId>,
    /// Replies, when upstream or backfill provided them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<Comment>>,
    /// Whether the user has seen this comment.
    #[serde(default)]
    pub is_read: bool,
}

impl Comment {
    /// Creates a comment without replies.
    #[must_use]
    pub fn new(
        id: impl Into<CommentId>,
        author_name: impl Into<String>,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            timestamp,
            author_name: author_name.into(),
            author_avatar_ref: String::new(),
            is_pinned: false,
            reply_count: None,
            root_id: None,
            replies: None,
            is_read: false,
        }
    }

    /// Sets the replies and their count.
    #[must_use]
    pub fn with_replies(mut self, replies: Vec<Comment>) -> Self {
        self.reply_count = Some(u32::try_from(replies.len()).unwrap_or(u32::MAX));
        self.replies = Some(replies);
        self
    }

    /// Sets the upstream reply count.
    #[must_use]
    pub const fn with_reply_count(mut self, count: u32) -> Self {
        self.reply_count = Some(count);
        self
    }

    /// Sets the root comment ID.
    #[must_use]
    pub fn with_root(mut self, root_id: impl Into<CommentId>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    /// Number of replies currently loaded.
    #[must_use]
    pub fn loaded_replies(&self) -> usize {
        self.replies.as_ref().map_or(0, Vec::len)
    }

    /// Whether upstream reports more replies than are loaded.
    #[must_use]
    pub fn needs_backfill(&self) -> bool {
        self.reply_count
            .is_some_and(|count| count as usize > self.loaded_replies())
    }

    /// ID to request reply pages with.
    #[must_use]
    pub fn reply_root(&self) -> &str {
        self.root_id.as_deref().unwrap_or(&self.id)
    }
}

/// Position of a comment within its thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentDepth {
    /// Directly under the post.
    TopLevel,
    /// Under another comment.
    Reply,
}

/// Visits every comment and nested reply, depth-first, in thread order.
pub fn walk_thread<'a>(comments: &'a [Comment], mut visit: impl FnMut(&'a Comment, CommentDepth)) {
    let mut stack: Vec<(&Comment, CommentDepth)> = comments
        .iter()
        .rev()
        .map(|c| (c, CommentDepth::TopLevel))
        .collect();

    while let Some((comment, depth)) = stack.pop() {
        visit(comment, depth);
        if let Some(replies) = &comment.replies {
            stack.extend(replies.iter().rev().map(|r| (r, CommentDepth::Reply)));
        }
    }
}

/// Mutable counterpart of [`walk_thread`].
pub fn walk_thread_mut(comments: &mut [Comment], mut visit: impl FnMut(&mut Comment)) {
    let mut stack: Vec<&mut Comment> = comments.iter_mut().rev().collect();

    while let Some(comment) = stack.pop() {
        visit(&mut *comment);
        if let Some(replies) = comment.replies.as_mut() {
            stack.extend(replies.iter_mut().rev());
        }
    }
}

/// Flattens a thread into an id-keyed lookup.
#[must_use]
pub fn index_thread(comments: &[Comment]) -> HashMap<&str, &Comment> {
    let mut index = HashMap::new();
    walk_thread(comments, |comment, _| {
        index.entry(comment.id.as_str()).or_insert(comment);
    });
    index
}
