//! Tracked entity.

use serde::{Deserialize, Serialize};

/// Upstream account identifier.
pub type EntityId = String;

/// A remote publishing account whose posts and comments are polled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    /// Account ID.
    pub id: EntityId,
    /// Name shown on posts and used to recognise the account's own comments.
    pub display_name: String,
    /// Avatar image reference.
    #[serde(default)]
    pub avatar_ref: String,
}

impl TrackedEntity {
    /// Creates a tracked entity.
    #[must_use]
    pub fn new(
        id: impl Into<EntityId>,
        display_name: impl Into<String>,
        avatar_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_ref: avatar_ref.into(),
        }
    }

    /// Returns whether a comment author name belongs to this entity.
    #[must_use]
    pub fn is_author(&self, author_name: &str) -> bool {
        !self.display_name.is_empty() && self.display_name == author_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_author_matches_display_name() {
        let entity = TrackedEntity::new("42", "Creator", "");
        assert!(entity.is_author("Creator"));
        assert!(!entity.is_author("creator"));
        assert!(!entity.is_author("Viewer"));
    }

    #[test]
    fn test_empty_display_name_matches_nobody() {
        let entity = TrackedEntity::new("42", "", "");
        assert!(!entity.is_author(""));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let entity = TrackedEntity::new("42", "Creator", "https://img/a.png");
        let json = serde_json::to_string(&entity).unwrap();
        assert!(json.contains("\"displayName\":\"Creator\""));
        assert!(json.contains("\"avatarRef\""));
    }
}
