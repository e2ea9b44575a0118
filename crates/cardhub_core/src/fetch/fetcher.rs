//! Adapter capability contract.
//!
//! # Responsibility
//! - Define the calls the task pipeline makes into a site adapter.
//! - Provide `BaseFetcher`, the shared URL/identity defaults adapters compose.
//!
//! # Invariants
//! - Adapters are `Send + Sync`; one instance serves many concurrent tasks.
//! - URL and identity calls are pure and cheap.

use crate::fetch::error::{AdapterResult, ErrorKind, FetchError};
use crate::model::binder::{Binder, BookBinder, MetadataBinder, RawResponse};
use crate::model::metadata::{CardInfo, CreatorInfo, SourceId};
use crate::model::sheet::{CharacterBook, Sheet};

/// Shared defaults for URL handling and binder creation.
///
/// Adapters hold one of these and return it from [`Fetcher::base`]; every
/// trait method with a default body delegates here unless overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseFetcher {
    source_id: SourceId,
    base_urls: Vec<String>,
    main_url: String,
    direct_url: String,
}

impl BaseFetcher {
    /// `main_url` and `direct_url` are prefixes the character id is appended to.
    pub fn new(
        source_id: impl Into<SourceId>,
        base_urls: &[&str],
        main_url: impl Into<String>,
        direct_url: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            base_urls: base_urls.iter().map(|value| value.to_string()).collect(),
            main_url: main_url.into(),
            direct_url: direct_url.into(),
        }
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    pub fn main_url(&self) -> &str {
        &self.main_url
    }

    /// API URL for an already extracted character id.
    pub fn direct_url_for(&self, character_id: &str) -> String {
        format!("{}{character_id}", self.direct_url)
    }

    /// Canonical page URL for an already extracted character id.
    pub fn normalized_url_for(&self, character_id: &str) -> String {
        format!("{}{character_id}", self.main_url)
    }

    /// Takes the first path segment after `matched_base_url`.
    ///
    /// Query strings and fragments are ignored. Returns an empty string when
    /// `url` does not contain `matched_base_url`.
    pub fn character_id(&self, url: &str, matched_base_url: &str) -> String {
        let Some(start) = url.find(matched_base_url) else {
            return String::new();
        };
        let rest = &url[start + matched_base_url.len()..];
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        rest.trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Parses a successful raw response into a metadata binder.
    pub fn create_binder(
        &self,
        character_id: &str,
        normalized_url: String,
        direct_url: String,
        response: &RawResponse,
    ) -> AdapterResult<MetadataBinder> {
        if !response.is_success() {
            return Err(Box::new(FetchError::new(
                ErrorKind::FetchMetadataFailed,
                format!(
                    "metadata request for `{character_id}` returned status {}",
                    response.status
                ),
            )));
        }
        let document = response.json().map_err(|err| {
            FetchError::new(
                ErrorKind::MalformedMetadata,
                format!("metadata body for `{character_id}` is not json: {err}"),
            )
        })?;
        Ok(MetadataBinder {
            character_id: character_id.to_string(),
            normalized_url,
            direct_url,
            document,
        })
    }
}

/// Capability set one site adapter supplies to the task pipeline.
pub trait Fetcher: Send + Sync {
    fn base(&self) -> &BaseFetcher;

    fn source_id(&self) -> SourceId {
        self.base().source_id().clone()
    }

    fn base_urls(&self) -> Vec<String> {
        self.base().base_urls().to_vec()
    }

    fn main_url(&self) -> String {
        self.base().main_url().to_string()
    }

    /// Adapters whose URLs carry more than the id override this and
    /// [`Fetcher::normalize_url`].
    fn direct_url(&self, url: &str, matched_base_url: &str) -> String {
        self.base()
            .direct_url_for(&self.character_id(url, matched_base_url))
    }

    fn normalize_url(&self, url: &str, matched_base_url: &str) -> String {
        self.base()
            .normalized_url_for(&self.character_id(url, matched_base_url))
    }

    fn character_id(&self, url: &str, matched_base_url: &str) -> String {
        self.base().character_id(url, matched_base_url)
    }

    fn is_source_up(&self) -> bool {
        true
    }

    fn fetch_metadata_response(&self, character_id: &str) -> AdapterResult<RawResponse>;

    fn create_binder(
        &self,
        character_id: &str,
        response: RawResponse,
    ) -> AdapterResult<MetadataBinder> {
        self.base().create_binder(
            character_id,
            self.base().normalized_url_for(character_id),
            self.base().direct_url_for(character_id),
            &response,
        )
    }

    fn fetch_card_info(&self, binder: &MetadataBinder) -> AdapterResult<CardInfo>;

    fn fetch_creator_info(&self, binder: &MetadataBinder) -> AdapterResult<CreatorInfo>;

    /// Sources without linked books keep the empty default.
    fn fetch_book_responses(&self, _binder: &MetadataBinder) -> AdapterResult<BookBinder> {
        Ok(BookBinder::default())
    }

    fn fetch_character_card(&self, binder: &Binder) -> AdapterResult<Sheet>;

    /// Linked books to fold into the sheet's own book.
    fn extract_books(&self, _binder: &Binder) -> AdapterResult<Vec<CharacterBook>> {
        Ok(Vec::new())
    }
}
