//! Sheet patch engine.
//!
//! # Responsibility
//! - Resolve the character name through its fallback chain.
//! - Compose creator notes, tags, timestamps and book naming.
//! - Copy identity fields from metadata onto the sheet.
//!
//! # Invariants
//! - Metadata is authoritative for title and identity fields.
//! - The resolved name is written to both metadata and sheet.
//! - An existing non-blank sheet nickname is never overwritten.

use crate::model::metadata::Metadata;
use crate::model::sheet::Sheet;
use crate::model::unix_seconds;
use crate::normalize::tags::merge_tags;
use log::debug;

/// Separator between the tagline and pre-existing creator notes.
pub const CREATOR_NOTES_SEPARATOR: &str = "\n\n";
/// Placeholder token sites use for the character name inside book names.
pub const BOOK_NAME_PLACEHOLDER: &str = "{{char}}";
const BOOK_NAME_SUFFIX: &str = "Lore Book";

/// Mutates `sheet` (and parts of `metadata`) until both agree.
pub fn patch_sheet(metadata: &mut Metadata, sheet: &mut Sheet) {
    let name = resolve_name(metadata, sheet);
    metadata.card.name = name.clone();
    sheet.name = name.clone();
    sheet.title = metadata.card.title.clone();
    if sheet.nickname.trim().is_empty() {
        sheet.nickname = name.clone();
    }

    if metadata.card.tagline.trim().is_empty() {
        metadata.card.tagline.clear();
    }
    sheet.creator_notes = join_non_blank(
        &[metadata.card.tagline.as_str(), sheet.creator_notes.as_str()],
        CREATOR_NOTES_SEPARATOR,
    );

    let merged = merge_tags(&metadata.card.tags, &sheet.tags);
    metadata.card.tags = merged.tags;
    sheet.tags = merged.names;

    if metadata.book_update_time == 0 && sheet.character_book.is_some() {
        metadata.book_update_time = metadata.card.update_time;
    }
    sheet.creation_date = unix_seconds(metadata.card.create_time);
    sheet.modification_date = unix_seconds(metadata.latest_update_time());

    if let Some(book) = sheet.character_book.as_mut() {
        book.name = book_name(&book.name, &name);
    }

    sheet.source = metadata.source.clone();
    sheet.character_id = metadata.card.character_id.clone();
    sheet.platform_id = metadata.card.platform_id.clone();
    sheet.direct_link = metadata.card.direct_url.clone();

    if sheet.creator.trim().is_empty() {
        sheet.creator = metadata.creator.nickname.clone();
    }

    debug!(
        "event=sheet_patch module=normalize status=ok source={} character_id={} tags={}",
        sheet.source,
        sheet.character_id,
        sheet.tags.len()
    );
}

fn resolve_name(metadata: &Metadata, sheet: &Sheet) -> String {
    let candidates = [
        metadata.card.name.as_str(),
        sheet.name.as_str(),
        metadata.card.title.as_str(),
    ];
    candidates
        .iter()
        .find(|candidate| !candidate.trim().is_empty())
        .unwrap_or(&candidates[2])
        .to_string()
}

fn book_name(current: &str, character_name: &str) -> String {
    let named = if current.trim().is_empty() {
        format!("{character_name} {BOOK_NAME_SUFFIX}")
    } else {
        current.replacen(BOOK_NAME_PLACEHOLDER, character_name, 1)
    };
    named.replace('/', "-")
}

fn join_non_blank(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(separator)
}
