//! Read marker set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// IDs of posts and comments the user explicitly marked read.
///
/// Only ever grows; nothing removes a marker once inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadMarkers {
    ids: BTreeSet<String>,
}

impl ReadMarkers {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an ID, returning whether it was new.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no marker is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReadMarkers {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut markers = ReadMarkers::new();
        assert!(markers.insert("p1"));
        assert!(!markers.insert("p1"));
        assert_eq!(markers.len(), 1);
        assert!(markers.contains("p1"));
    }

    #[test]
    fn test_serializes_as_sorted_array() {
        let markers: ReadMarkers = ["b", "a"].into_iter().collect();
        assert_eq!(serde_json::to_string(&markers).unwrap(), r#"["a","b"]"#);
    }
}
