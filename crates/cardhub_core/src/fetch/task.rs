//! Per-character fetch task.
//!
//! # Responsibility
//! - Derive the character id and normalized URL at construction.
//! - Run the binder, metadata and card stages lazily, each at most once.
//!
//! # Invariants
//! - Stage order is binder -> metadata -> card; a failed stage fails every
//!   stage that depends on it.
//! - Stage results, including failures, are cached for the task lifetime.
//! - Published values are never mutated. The card stage reconciles a copy of
//!   the metadata, and once it succeeds every accessor returns that copy.

use crate::fetch::error::{ErrorKind, FetchError, FetchResult};
use crate::fetch::fetcher::Fetcher;
use crate::fetch::stage::StageCell;
use crate::model::binder::Binder;
use crate::model::metadata::{Metadata, SourceId};
use crate::model::sheet::Sheet;
use crate::normalize::patch::patch_sheet;
use crate::normalize::tags::merge_tags;
use log::{error, info};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Card stage output: reconciled metadata and the patched sheet.
#[derive(Debug, Clone)]
pub struct FetchedCard {
    pub metadata: Arc<Metadata>,
    pub sheet: Arc<Sheet>,
}

/// Memoized fetch pipeline for one URL.
///
/// Share a task between threads behind an `Arc`; all stage calls take `&self`.
pub struct Task {
    fetcher: Arc<dyn Fetcher>,
    source_id: SourceId,
    original_url: String,
    matched_base_url: String,
    character_id: String,
    normalized_url: String,
    direct_url: String,
    binder: StageCell<FetchResult<Arc<Binder>>>,
    metadata: StageCell<FetchResult<Arc<Metadata>>>,
    card: StageCell<FetchResult<FetchedCard>>,
}

impl Task {
    pub fn new(fetcher: Arc<dyn Fetcher>, url: &str, matched_base_url: &str) -> Self {
        let character_id = fetcher.character_id(url, matched_base_url);
        let normalized_url = fetcher.normalize_url(url, matched_base_url);
        let direct_url = fetcher.direct_url(url, matched_base_url);
        Self {
            source_id: fetcher.source_id(),
            fetcher,
            original_url: url.to_string(),
            matched_base_url: matched_base_url.to_string(),
            character_id,
            normalized_url,
            direct_url,
            binder: StageCell::new(),
            metadata: StageCell::new(),
            card: StageCell::new(),
        }
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn matched_base_url(&self) -> &str {
        &self.matched_base_url
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    pub fn normalized_url(&self) -> &str {
        &self.normalized_url
    }

    pub fn direct_url(&self) -> &str {
        &self.direct_url
    }

    /// Metadata for this character.
    ///
    /// Before the card stage has succeeded this is the record assembled from
    /// the metadata API. Afterwards it is the reconciled record returned by
    /// [`Task::fetch_all`], so it always agrees with the fetched sheet.
    pub fn fetch_metadata(&self) -> FetchResult<Arc<Metadata>> {
        if let Some(Ok(card)) = self.card.peek() {
            return Ok(card.metadata);
        }
        self.fetch_staged_metadata()
    }

    fn fetch_staged_metadata(&self) -> FetchResult<Arc<Metadata>> {
        self.metadata.get_or_run(|| {
            self.run_stage("metadata", || {
                let binder = self.fetch_binder()?;
                self.build_metadata(&binder).map(Arc::new)
            })
        })
    }

    /// Sheet reconciled against the task's metadata.
    pub fn fetch_character_card(&self) -> FetchResult<Arc<Sheet>> {
        self.fetch_card().map(|card| card.sheet)
    }

    /// Reconciled metadata and sheet; the pair satisfies `is_consistent`.
    pub fn fetch_all(&self) -> FetchResult<(Arc<Metadata>, Arc<Sheet>)> {
        let card = self.fetch_card()?;
        Ok((card.metadata, card.sheet))
    }

    fn fetch_card(&self) -> FetchResult<FetchedCard> {
        self.card.get_or_run(|| {
            self.run_stage("card", || {
                let binder = self.fetch_binder()?;
                let metadata = self.fetch_staged_metadata()?;
                self.build_card(&binder, &metadata)
            })
        })
    }

    fn fetch_binder(&self) -> FetchResult<Arc<Binder>> {
        self.binder
            .get_or_run(|| self.run_stage("binder", || self.build_binder().map(Arc::new)))
    }

    fn build_binder(&self) -> FetchResult<Binder> {
        let response = self
            .fetcher
            .fetch_metadata_response(&self.character_id)
            .map_err(|err| FetchError::wrap(ErrorKind::FetchMetadataFailed, err))?;
        let metadata = self
            .fetcher
            .create_binder(&self.character_id, response)
            .map_err(|err| FetchError::wrap(ErrorKind::MalformedMetadata, err))?;
        let books = self
            .fetcher
            .fetch_book_responses(&metadata)
            .map_err(|err| FetchError::wrap(ErrorKind::FetchBookFailed, err))?;
        Ok(Binder { metadata, books })
    }

    fn build_metadata(&self, binder: &Binder) -> FetchResult<Metadata> {
        let mut card = self
            .fetcher
            .fetch_card_info(&binder.metadata)
            .map_err(|err| FetchError::wrap(ErrorKind::MalformedMetadata, err))?;
        let mut creator = self
            .fetcher
            .fetch_creator_info(&binder.metadata)
            .map_err(|err| FetchError::wrap(ErrorKind::MalformedMetadata, err))?;

        fill_blank(&mut card.character_id, &binder.metadata.character_id);
        fill_blank(&mut card.normalized_url, &self.normalized_url);
        fill_blank(&mut card.direct_url, &self.direct_url);
        card.tags = merge_tags(&card.tags, &[]).tags;
        creator.sync_identity();

        Ok(Metadata::new(
            self.source_id.clone(),
            card,
            creator,
            binder.books.update_time,
        ))
    }

    fn build_card(&self, binder: &Binder, metadata: &Metadata) -> FetchResult<FetchedCard> {
        let mut sheet = self
            .fetcher
            .fetch_character_card(binder)
            .map_err(|err| FetchError::wrap(ErrorKind::FetchCardDataFailed, err))?;
        let books = self
            .fetcher
            .extract_books(binder)
            .map_err(|err| FetchError::wrap(ErrorKind::MalformedBook, err))?;
        sheet.merge_books(books);

        let mut reconciled = metadata.clone();
        patch_sheet(&mut reconciled, &mut sheet);
        Ok(FetchedCard {
            metadata: Arc::new(reconciled),
            sheet: Arc::new(sheet),
        })
    }

    fn run_stage<T>(
        &self,
        stage: &'static str,
        body: impl FnOnce() -> FetchResult<T>,
    ) -> FetchResult<T> {
        let started_at = Instant::now();
        info!(
            "event=stage_run module=fetch status=start stage={} source={} character_id={}",
            stage, self.source_id, self.character_id
        );
        let result = body();
        match &result {
            Ok(_) => info!(
                "event=stage_run module=fetch status=ok stage={} source={} character_id={} duration_ms={}",
                stage,
                self.source_id,
                self.character_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=stage_run module=fetch status=error stage={} source={} character_id={} duration_ms={} error_code={} error={}",
                stage,
                self.source_id,
                self.character_id,
                started_at.elapsed().as_millis(),
                err.code(),
                err.message()
            ),
        }
        result
    }
}

impl Debug for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("source_id", &self.source_id)
            .field("original_url", &self.original_url)
            .field("character_id", &self.character_id)
            .field("normalized_url", &self.normalized_url)
            .finish_non_exhaustive()
    }
}

fn fill_blank(target: &mut String, fallback: &str) {
    if target.trim().is_empty() {
        *target = fallback.to_string();
    }
}
