#![allow(dead_code)]

use cardhub_core::{
    AdapterResult, BaseFetcher, Binder, BookBinder, CardInfo, CharacterBook, CreatorInfo,
    ErrorKind, FetchError, Fetcher, MetadataBinder, RawResponse, Sheet, Tag,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

pub const SECOND: i64 = 1_000_000_000;

#[derive(Debug, Default)]
pub struct Calls {
    pub metadata_response: AtomicUsize,
    pub card_info: AtomicUsize,
    pub creator_info: AtomicUsize,
    pub book_responses: AtomicUsize,
    pub character_card: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Call-counting adapter serving canned data.
pub struct StubFetcher {
    base: BaseFetcher,
    pub card: CardInfo,
    pub creator: CreatorInfo,
    pub sheet: Sheet,
    pub book_update_time: i64,
    pub extra_books: Vec<CharacterBook>,
    pub up: bool,
    pub fail_metadata_response: bool,
    pub credentials_expired: bool,
    pub fail_character_card: bool,
    pub fail_extract_books: bool,
    /// Keeps the original query string in normalized URLs.
    pub keep_query: bool,
    pub delay: Duration,
    pub calls: Calls,
}

impl StubFetcher {
    pub fn new(source_id: &str, base_urls: &[&str]) -> Self {
        Self {
            base: BaseFetcher::new(
                source_id,
                base_urls,
                format!("https://{source_id}.example/characters/"),
                format!("https://api.{source_id}.example/v1/characters/"),
            ),
            card: sample_card(),
            creator: CreatorInfo {
                nickname: "Maker".to_string(),
                username: "maker".to_string(),
                platform_id: "u-1".to_string(),
            },
            sheet: sample_sheet(),
            book_update_time: 0,
            extra_books: Vec::new(),
            up: true,
            fail_metadata_response: false,
            credentials_expired: false,
            fail_character_card: false,
            fail_extract_books: false,
            keep_query: false,
            delay: Duration::ZERO,
            calls: Calls::default(),
        }
    }

    pub fn demo() -> Self {
        Self::new("demo", &["demo.example/characters/"])
    }
}

pub fn sample_card() -> CardInfo {
    CardInfo {
        normalized_url: String::new(),
        direct_url: String::new(),
        platform_id: "p-77".to_string(),
        character_id: String::new(),
        name: "Hero".to_string(),
        title: "The Brave Hero".to_string(),
        tagline: "A hero of the realm.".to_string(),
        create_time: 1_700_000_000 * SECOND + 123,
        update_time: 1_700_000_500 * SECOND + 456,
        tags: vec![Tag::new("fantasy", "Fantasy")],
        is_forked: false,
    }
}

pub fn sample_sheet() -> Sheet {
    Sheet {
        name: "Hero".to_string(),
        description: "A brave hero.".to_string(),
        creator_notes: "Be nice.".to_string(),
        tags: vec!["Adventure".to_string(), "fantasy".to_string()],
        ..Sheet::default()
    }
}

impl Fetcher for StubFetcher {
    fn base(&self) -> &BaseFetcher {
        &self.base
    }

    fn is_source_up(&self) -> bool {
        self.up
    }

    fn normalize_url(&self, url: &str, matched_base_url: &str) -> String {
        let normalized = self
            .base
            .normalized_url_for(&self.character_id(url, matched_base_url));
        match url.split_once('?') {
            Some((_, query)) if self.keep_query => format!("{normalized}?{query}"),
            _ => normalized,
        }
    }

    fn fetch_metadata_response(&self, character_id: &str) -> AdapterResult<RawResponse> {
        self.calls.metadata_response.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.credentials_expired {
            return Err(Box::new(FetchError::new(
                ErrorKind::InvalidCredentials,
                "session token expired",
            )));
        }
        if self.fail_metadata_response {
            return Err(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(RawResponse::new(
            200,
            format!(r#"{{"id":"{character_id}"}}"#).into_bytes(),
        ))
    }

    fn fetch_card_info(&self, _binder: &MetadataBinder) -> AdapterResult<CardInfo> {
        self.calls.card_info.fetch_add(1, Ordering::SeqCst);
        Ok(self.card.clone())
    }

    fn fetch_creator_info(&self, _binder: &MetadataBinder) -> AdapterResult<CreatorInfo> {
        self.calls.creator_info.fetch_add(1, Ordering::SeqCst);
        Ok(self.creator.clone())
    }

    fn fetch_book_responses(&self, _binder: &MetadataBinder) -> AdapterResult<BookBinder> {
        self.calls.book_responses.fetch_add(1, Ordering::SeqCst);
        Ok(BookBinder {
            documents: Vec::new(),
            update_time: self.book_update_time,
        })
    }

    fn fetch_character_card(&self, _binder: &Binder) -> AdapterResult<Sheet> {
        self.calls.character_card.fetch_add(1, Ordering::SeqCst);
        if self.fail_character_card {
            return Err("image decode failed".into());
        }
        Ok(self.sheet.clone())
    }

    fn extract_books(&self, _binder: &Binder) -> AdapterResult<Vec<CharacterBook>> {
        if self.fail_extract_books {
            return Err("book entries are not an array".into());
        }
        Ok(self.extra_books.clone())
    }
}
