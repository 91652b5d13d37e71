//! Upstream response structures.

use serde::Deserialize;

use crate::domain::entities::{Comment, DEFAULT_THREAD_KIND, Post, ThreadLocator, TrackedEntity};

/// Response envelope wrapping every upstream payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Zero on success.
    pub code: i64,
    /// Upstream status message.
    #[serde(default)]
    pub message: String,
    /// Payload, absent on most errors.
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct EntityDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub face: String,
}

impl From<EntityDto> for TrackedEntity {
    fn from(dto: EntityDto) -> Self {
        TrackedEntity::new(dto.id, dto.name, dto.face)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EntityListDto {
    #[serde(default)]
    pub items: Vec<EntityDto>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadDto {
    pub oid: String,
    #[serde(rename = "type", default = "default_thread_kind")]
    pub kind: u32,
}

fn default_thread_kind() -> u32 {
    DEFAULT_THREAD_KIND
}

#[derive(Debug, Deserialize)]
pub struct PostDto {
    pub id: String,
    pub timestamp: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub jump_url: String,
    #[serde(default)]
    pub thread: Option<ThreadDto>,
}

impl PostDto {
    /// Maps into a post owned by `entity_id`; the thread defaults to the post ID.
    pub fn into_post(self, entity_id: &str) -> Post {
        let mut post = Post::new(self.id, entity_id, self.timestamp, self.title)
            .with_description(self.description)
            .with_jump_url(self.jump_url);
        if let Some(thread) = self.thread {
            post.thread = ThreadLocator::new(thread.oid, thread.kind);
        }
        post.cover = self.cover.filter(|cover| !cover.is_empty());
        post.media_refs = self.media;
        post
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostListDto {
    #[serde(default)]
    pub items: Vec<PostDto>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorDto {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentDto {
    pub id: String,
    pub content: String,
    pub ctime: i64,
    pub author: AuthorDto,
    #[serde(default)]
    pub reply_count: Option<u32>,
    /// Top-level ancestor; "0" or empty on top-level comments.
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub replies: Option<Vec<CommentDto>>,
}

impl From<CommentDto> for Comment {
    fn from(dto: CommentDto) -> Self {
        let mut comment = Comment::new(dto.id, dto.author.name, dto.content, dto.ctime);
        comment.author_avatar_ref = dto.author.avatar;
        comment.root_id = dto.root.filter(|root| !root.is_empty() && root != "0");
        comment.replies = dto
            .replies
            .map(|replies| replies.into_iter().map(Comment::from).collect());
        comment.reply_count = dto.reply_count;
        comment
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentListDto {
    /// Comments pinned by the post owner.
    #[serde(default)]
    pub top: Vec<CommentDto>,
    #[serde(default)]
    pub replies: Option<Vec<CommentDto>>,
}

impl CommentListDto {
    /// Flattens into top-level comments, pinned ones first.
    pub fn into_comments(self) -> Vec<Comment> {
        let pinned = self.top.into_iter().map(|dto| {
            let mut comment = Comment::from(dto);
            comment.is_pinned = true;
            comment
        });
        let regular = self.replies.unwrap_or_default().into_iter().map(Comment::from);

        let mut comments: Vec<Comment> = Vec::new();
        for comment in pinned.chain(regular) {
            if !comments.iter().any(|c| c.id == comment.id) {
                comments.push(comment);
            }
        }
        comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_maps_thread_and_defaults() {
        let json = r#"{
            "id": "p1",
            "timestamp": 1700000000,
            "title": "",
            "description": "body",
            "cover": "",
            "jump_url": "https://example.test/p1",
            "thread": {"oid": "99"}
        }"#;
        let dto: PostDto = serde_json::from_str(json).unwrap();
        let post = dto.into_post("e1");

        assert_eq!(post.entity_id, "e1");
        assert_eq!(post.thread, ThreadLocator::new("99", DEFAULT_THREAD_KIND));
        assert_eq!(post.cover, None);
        assert_eq!(post.headline(), "body");
        assert!(!post.is_read);
        assert!(post.comments.is_none());
    }

    #[test]
    fn test_post_without_thread_uses_post_id() {
        let dto: PostDto = serde_json::from_str(r#"{"id": "p2", "timestamp": 1}"#).unwrap();
        let post = dto.into_post("e1");

        assert_eq!(post.thread.oid, "p2");
    }

    #[test]
    fn test_comment_root_zero_is_top_level() {
        let json = r#"{
            "id": "c1",
            "content": "hello",
            "ctime": 5,
            "author": {"name": "Viewer"},
            "reply_count": 3,
            "root": "0",
            "replies": [
                {"id": "r1", "content": "hi", "ctime": 6, "author": {"name": "Creator"}, "root": "c1"}
            ]
        }"#;
        let comment = Comment::from(serde_json::from_str::<CommentDto>(json).unwrap());

        assert_eq!(comment.root_id, None);
        assert_eq!(comment.reply_count, Some(3));
        assert!(comment.needs_backfill());
        let replies = comment.replies.unwrap();
        assert_eq!(replies[0].root_id.as_deref(), Some("c1"));
        assert_eq!(replies[0].author_name, "Creator");
    }

    #[test]
    fn test_pinned_comments_come_first_without_duplicates() {
        let json = r#"{
            "top": [{"id": "c2", "content": "pinned", "ctime": 2, "author": {"name": "Creator"}}],
            "replies": [
                {"id": "c1", "content": "a", "ctime": 1, "author": {"name": "Viewer"}},
                {"id": "c2", "content": "pinned", "ctime": 2, "author": {"name": "Creator"}}
            ]
        }"#;
        let list: CommentListDto = serde_json::from_str(json).unwrap();
        let comments = list.into_comments();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "c2");
        assert!(comments[0].is_pinned);
        assert!(!comments[1].is_pinned);
    }

    #[test]
    fn test_null_replies_is_empty() {
        let list: CommentListDto = serde_json::from_str(r#"{"replies": null}"#).unwrap();
        assert!(list.into_comments().is_empty());
    }
}
