//! Metadata/sheet agreement predicate.

use crate::model::metadata::Metadata;
use crate::model::sheet::Sheet;
use crate::model::unix_seconds;

/// Returns whether an optional metadata record agrees with an optional sheet.
///
/// A missing metadata record is consistent only with a missing sheet.
pub fn is_consistent(metadata: Option<&Metadata>, sheet: Option<&Sheet>) -> bool {
    match (metadata, sheet) {
        (None, None) => true,
        (Some(metadata), Some(sheet)) => metadata.is_consistent_with(sheet),
        _ => false,
    }
}

impl Metadata {
    /// Checks every field the patch engine is responsible for aligning.
    pub fn is_consistent_with(&self, sheet: &Sheet) -> bool {
        let card = &self.card;
        let tag_names_match = card.tags.len() == sheet.tags.len()
            && card
                .tags
                .iter()
                .zip(&sheet.tags)
                .all(|(tag, name)| tag.name == *name);

        self.source == sheet.source
            && card.character_id == sheet.character_id
            && card.platform_id == sheet.platform_id
            && card.direct_url == sheet.direct_link
            && card.title == sheet.title
            && card.name == sheet.name
            && sheet.creator_notes.starts_with(card.tagline.as_str())
            && sheet.creation_date == unix_seconds(card.create_time)
            && sheet.modification_date == unix_seconds(self.latest_update_time())
            && tag_names_match
    }
}
