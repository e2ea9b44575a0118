//! Tag value type.

use serde::{Deserialize, Serialize};

/// One tag after sanitization.
///
/// Two tags with equal `slug` are considered the same tag regardless of
/// `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Canonical lookup key used for deduplication.
    pub slug: String,
    /// Human-presentable display name.
    pub name: String,
}

impl Tag {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// Projects tag display names, preserving order.
pub fn tag_names(tags: &[Tag]) -> Vec<String> {
    tags.iter().map(|tag| tag.name.clone()).collect()
}
