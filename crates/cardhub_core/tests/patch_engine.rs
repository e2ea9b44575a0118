mod common;

use cardhub_core::{
    is_consistent, patch_sheet, CardInfo, CharacterBook, CreatorInfo, Metadata, Sheet, SourceId,
    Tag,
};
use common::{sample_card, sample_sheet, SECOND};

fn metadata_with(card: CardInfo) -> Metadata {
    Metadata::new(
        SourceId::new("demo"),
        card,
        CreatorInfo {
            nickname: "Maker".to_string(),
            username: "maker".to_string(),
            platform_id: "u-1".to_string(),
        },
        0,
    )
}

fn sample_metadata() -> Metadata {
    let mut card = sample_card();
    card.character_id = "abc".to_string();
    card.direct_url = "https://api.demo.example/v1/characters/abc".to_string();
    metadata_with(card)
}

#[test]
fn patched_pair_is_consistent() {
    let mut metadata = sample_metadata();
    let mut sheet = sample_sheet();
    patch_sheet(&mut metadata, &mut sheet);
    assert!(is_consistent(Some(&metadata), Some(&sheet)));
}

#[test]
fn metadata_name_wins_when_present() {
    let mut metadata = sample_metadata();
    let mut sheet = Sheet {
        name: "Sheet Name".to_string(),
        ..Sheet::default()
    };
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.name, "Hero");
    assert_eq!(metadata.card.name, "Hero");
}

#[test]
fn sheet_name_fills_blank_metadata_name() {
    let mut metadata = sample_metadata();
    metadata.card.name = "  ".to_string();
    metadata.card.title = "T".to_string();
    let mut sheet = Sheet {
        name: "X".to_string(),
        ..Sheet::default()
    };
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.name, "X");
    assert_eq!(metadata.card.name, "X");
    assert_eq!(sheet.title, "T");
}

#[test]
fn title_fills_name_when_both_blank() {
    let mut metadata = sample_metadata();
    metadata.card.name = String::new();
    metadata.card.title = "T".to_string();
    let mut sheet = Sheet::default();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.name, "T");
    assert_eq!(metadata.card.name, "T");
    assert_eq!(sheet.nickname, "T");
}

#[test]
fn existing_nickname_is_preserved() {
    let mut metadata = sample_metadata();
    let mut sheet = Sheet {
        nickname: "Hiro".to_string(),
        ..Sheet::default()
    };
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.nickname, "Hiro");
}

#[test]
fn creator_notes_are_prefixed_with_tagline() {
    let mut metadata = sample_metadata();
    let mut sheet = sample_sheet();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.creator_notes, "A hero of the realm.\n\nBe nice.");

    let mut metadata = sample_metadata();
    let mut sheet = Sheet::default();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.creator_notes, "A hero of the realm.");

    let mut metadata = sample_metadata();
    metadata.card.tagline = "   ".to_string();
    let mut sheet = sample_sheet();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.creator_notes, "Be nice.");
    assert!(is_consistent(Some(&metadata), Some(&sheet)));
}

#[test]
fn tags_are_merged_into_both_sides() {
    let mut metadata = sample_metadata();
    let mut sheet = sample_sheet();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(
        metadata.card.tags,
        vec![
            Tag::new("adventure", "Adventure"),
            Tag::new("fantasy", "Fantasy"),
        ]
    );
    assert_eq!(sheet.tags, vec!["Adventure".to_string(), "Fantasy".to_string()]);
}

#[test]
fn timestamps_are_truncated_to_seconds() {
    let mut metadata = sample_metadata();
    metadata.book_update_time = 1_700_000_900 * SECOND + 1;
    let mut sheet = Sheet::default();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.creation_date, 1_700_000_000);
    assert_eq!(sheet.modification_date, 1_700_000_900);
}

#[test]
fn book_update_time_is_backfilled_only_when_book_exists() {
    let mut metadata = sample_metadata();
    let mut sheet = Sheet::default();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(metadata.book_update_time, 0);

    let mut metadata = sample_metadata();
    let mut sheet = Sheet {
        character_book: Some(CharacterBook::new("World")),
        ..Sheet::default()
    };
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(metadata.book_update_time, metadata.card.update_time);
    assert_eq!(sheet.modification_date, 1_700_000_500);
}

#[test]
fn book_name_uses_placeholder_then_replaces_slashes() {
    let mut metadata = sample_metadata();
    metadata.card.name = "Hero/Villain".to_string();
    let mut sheet = Sheet {
        character_book: Some(CharacterBook::new("{{char}}'s World")),
        ..Sheet::default()
    };
    patch_sheet(&mut metadata, &mut sheet);
    let book = sheet.character_book.expect("book kept");
    assert_eq!(book.name, "Hero-Villain's World");
}

#[test]
fn blank_book_name_is_synthesized_from_resolved_name() {
    let mut metadata = sample_metadata();
    let mut sheet = Sheet {
        character_book: Some(CharacterBook::new("")),
        ..Sheet::default()
    };
    patch_sheet(&mut metadata, &mut sheet);
    let book = sheet.character_book.expect("book kept");
    assert_eq!(book.name, "Hero Lore Book");
}

#[test]
fn identity_fields_are_copied_from_metadata() {
    let mut metadata = sample_metadata();
    let mut sheet = Sheet {
        source: SourceId::new("stale"),
        character_id: "old".to_string(),
        platform_id: "old".to_string(),
        direct_link: "https://old.example".to_string(),
        creator: "Original Author".to_string(),
        ..Sheet::default()
    };
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.source, SourceId::new("demo"));
    assert_eq!(sheet.character_id, "abc");
    assert_eq!(sheet.platform_id, "p-77");
    assert_eq!(sheet.direct_link, "https://api.demo.example/v1/characters/abc");
    assert_eq!(sheet.creator, "Original Author");
}

#[test]
fn blank_sheet_creator_takes_metadata_nickname() {
    let mut metadata = sample_metadata();
    let mut sheet = Sheet::default();
    patch_sheet(&mut metadata, &mut sheet);
    assert_eq!(sheet.creator, "Maker");
}
