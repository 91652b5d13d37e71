//! Pure merge and delta-detection rules applied by the sync cycles.

use std::collections::HashSet;

use crate::domain::entities::{
    Comment, CommentDepth, Post, ReadMarkers, TrackedEntity, index_thread, walk_thread,
    walk_thread_mut,
};

/// Returns the fetched head when it was not cached before.
///
/// Only the single newest post is inspected; several posts arriving between
/// two cycles yield one result.
#[must_use]
pub fn new_head<'a>(cached: &[Post], fetched: &'a [Post]) -> Option<&'a Post> {
    let head = fetched.first()?;
    if cached.is_empty() || !cached.iter().any(|p| p.id == head.id) {
        Some(head)
    } else {
        None
    }
}

/// Merges a fresh fetch over the cached list of the same entity.
///
/// The result keeps the fetched order and membership. Matching cached posts
/// hand over their comment tree and read flag.
#[must_use]
pub fn merge_posts(cached: &[Post], fetched: Vec<Post>, markers: &ReadMarkers) -> Vec<Post> {
    fetched
        .into_iter()
        .map(|mut post| {
            post.is_read |= markers.contains(&post.id);
            if let Some(previous) = cached.iter().find(|p| p.id == post.id) {
                if post.comments.is_none() {
                    post.comments.clone_from(&previous.comments);
                }
                post.is_read |= previous.is_read;
            }
            post
        })
        .collect()
}

/// ORs read markers and previously cached read flags into a fetched thread.
pub fn propagate_read_state(fetched: &mut [Comment], previous: &[Comment], markers: &ReadMarkers) {
    let previous = index_thread(previous);
    walk_thread_mut(fetched, |comment| {
        let was_read = previous
            .get(comment.id.as_str())
            .is_some_and(|c| c.is_read);
        comment.is_read |= was_read || markers.contains(&comment.id);
    });
}

/// Comments in `fetched` authored by `entity` that `previous` did not contain.
#[must_use]
pub fn new_self_comments<'a>(
    entity: &TrackedEntity,
    previous: &[Comment],
    fetched: &'a [Comment],
) -> Vec<(&'a Comment, CommentDepth)> {
    let known: HashSet<&str> = index_thread(previous).into_keys().collect();

    let mut found = Vec::new();
    walk_thread(fetched, |comment, depth| {
        if !known.contains(comment.id.as_str()) && entity.is_author(&comment.author_name) {
            found.push((comment, depth));
        }
    });
    found
}

/// Drops repeated IDs, keeping the first occurrence.
#[must_use]
pub fn dedup_by_id(comments: Vec<Comment>) -> Vec<Comment> {
    let mut seen = HashSet::new();
    comments
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}
