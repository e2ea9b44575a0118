//! Character sheet embedded in a downloaded card image.
//!
//! The sheet is produced by an adapter's card step and then reconciled
//! against [`crate::model::metadata::Metadata`] exactly once.

use crate::model::metadata::SourceId;
use serde::{Deserialize, Serialize};

/// Decoded character-card payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub source: SourceId,
    pub character_id: String,
    pub platform_id: String,
    pub direct_link: String,
    pub name: String,
    pub title: String,
    pub nickname: String,
    pub description: String,
    pub personality: String,
    pub scenario: String,
    pub first_message: String,
    pub creator_notes: String,
    /// Tag display names.
    pub tags: Vec<String>,
    pub creator: String,
    /// Unix-epoch seconds.
    pub creation_date: i64,
    /// Unix-epoch seconds.
    pub modification_date: i64,
    pub character_book: Option<CharacterBook>,
}

/// Lore book attached to a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBook {
    pub name: String,
    pub entries: Vec<BookEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub keys: Vec<String>,
    pub content: String,
    pub enabled: bool,
}

impl CharacterBook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Appends entries from `other`, skipping ones already present by
    /// `(keys, content)`.
    pub fn absorb(&mut self, other: CharacterBook) {
        for entry in other.entries {
            let duplicate = self
                .entries
                .iter()
                .any(|existing| existing.keys == entry.keys && existing.content == entry.content);
            if !duplicate {
                self.entries.push(entry);
            }
        }
    }
}

impl Sheet {
    /// Folds linked books into this sheet's book.
    ///
    /// The first book becomes the sheet book when it has none.
    pub fn merge_books(&mut self, books: Vec<CharacterBook>) {
        for book in books {
            match self.character_book.as_mut() {
                Some(existing) => existing.absorb(book),
                None => self.character_book = Some(book),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BookEntry, CharacterBook, Sheet};

    fn entry(key: &str, content: &str) -> BookEntry {
        BookEntry {
            keys: vec![key.to_string()],
            content: content.to_string(),
            enabled: true,
        }
    }

    #[test]
    fn merge_books_adopts_first_book_when_sheet_has_none() {
        let mut sheet = Sheet::default();
        let mut first = CharacterBook::new("World");
        first.entries.push(entry("castle", "A castle."));
        let mut second = CharacterBook::new("Other");
        second.entries.push(entry("river", "A river."));

        sheet.merge_books(vec![first, second]);

        let book = sheet.character_book.expect("book should be created");
        assert_eq!(book.name, "World");
        assert_eq!(book.entries.len(), 2);
    }

    #[test]
    fn merge_books_skips_duplicate_entries() {
        let mut sheet = Sheet::default();
        let mut own = CharacterBook::new("Own");
        own.entries.push(entry("castle", "A castle."));
        sheet.character_book = Some(own);

        let mut linked = CharacterBook::new("Linked");
        linked.entries.push(entry("castle", "A castle."));
        linked.entries.push(entry("castle", "A ruined castle."));
        sheet.merge_books(vec![linked]);

        let book = sheet.character_book.expect("book should remain");
        assert_eq!(book.name, "Own");
        assert_eq!(book.entries.len(), 2);
        assert_eq!(book.entries[1].content, "A ruined castle.");
    }

    #[test]
    fn merge_books_without_books_keeps_sheet_unchanged() {
        let mut sheet = Sheet::default();
        sheet.merge_books(Vec::new());
        assert!(sheet.character_book.is_none());
    }
}
