//! Metadata header assembled from a site's metadata API.
//!
//! # Invariants
//! - Timestamps are unix-epoch nanoseconds.
//! - `book_update_time == 0` means no linked book has reported a time.

use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier of one registered source.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Per-character descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub normalized_url: String,
    pub direct_url: String,
    /// Site-internal id, which may differ from the URL character id.
    pub platform_id: String,
    pub character_id: String,
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub create_time: i64,
    pub update_time: i64,
    pub tags: Vec<Tag>,
    pub is_forked: bool,
}

/// Creator identity as reported by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorInfo {
    pub nickname: String,
    pub username: String,
    pub platform_id: String,
}

/// Placeholder used when a site reports neither nickname nor username.
pub const ANONYMOUS_CREATOR: &str = "Anonymous";

impl CreatorInfo {
    /// Fills a blank nickname or username from the other one.
    ///
    /// When both are blank, both become [`ANONYMOUS_CREATOR`] and the creator
    /// platform id is cleared.
    pub fn sync_identity(&mut self) {
        let nickname_blank = self.nickname.trim().is_empty();
        let username_blank = self.username.trim().is_empty();
        match (nickname_blank, username_blank) {
            (true, true) => {
                self.nickname = ANONYMOUS_CREATOR.to_string();
                self.username = ANONYMOUS_CREATOR.to_string();
                self.platform_id.clear();
            }
            (true, false) => self.nickname = self.username.clone(),
            (false, true) => self.username = self.nickname.clone(),
            (false, false) => {}
        }
    }
}

/// Combined metadata record for one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub source: SourceId,
    pub card: CardInfo,
    pub creator: CreatorInfo,
    /// Latest modification time contributed by any linked lore book.
    pub book_update_time: i64,
}

impl Metadata {
    pub fn new(source: SourceId, card: CardInfo, creator: CreatorInfo, book_update_time: i64) -> Self {
        Self {
            source,
            card,
            creator,
            book_update_time,
        }
    }

    /// Returns the newest of the card and book update times.
    pub fn latest_update_time(&self) -> i64 {
        self.card.update_time.max(self.book_update_time)
    }
}
