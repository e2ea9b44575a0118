//! Integration status evaluation.

use crate::fetch::fetcher::Fetcher;
use crate::fetch::router::Router;
use crate::fetch::task::{FetchedCard, Task};
use crate::integration::config::IntegrationConfig;
use crate::model::metadata::SourceId;
use log::{error, info, warn};
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

/// Health outcome for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationStatus {
    SourceDown,
    RemoteResourceMissing,
    Mismatched,
    LocalResourceMissing,
    ConsistencyFailure,
    Success,
}

impl IntegrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceDown => "source_down",
            Self::RemoteResourceMissing => "remote_resource_missing",
            Self::Mismatched => "mismatched",
            Self::LocalResourceMissing => "local_resource_missing",
            Self::ConsistencyFailure => "consistency_failure",
            Self::Success => "success",
        }
    }
}

/// Check outcome for one source.
#[derive(Debug, Clone)]
pub struct IntegrationResult {
    pub source: SourceId,
    pub status: IntegrationStatus,
    pub detail: Option<String>,
    /// Present whenever the canonical fetch succeeded, so callers can refresh
    /// the stored snapshot.
    pub fetched: Option<FetchedCard>,
}

impl IntegrationResult {
    fn new(source: SourceId, status: IntegrationStatus) -> Self {
        Self {
            source,
            status,
            detail: None,
            fetched: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_fetched(mut self, fetched: FetchedCard) -> Self {
        self.fetched = Some(fetched);
        self
    }
}

/// Results of one checker run, in adapter registration order.
#[derive(Debug, Clone)]
pub struct IntegrationReport {
    pub run_id: Uuid,
    pub results: Vec<IntegrationResult>,
}

impl IntegrationReport {
    pub fn all_succeeded(&self) -> bool {
        self.results
            .iter()
            .all(|result| result.status == IntegrationStatus::Success)
    }

    pub fn status_of(&self, source: &SourceId) -> Option<IntegrationStatus> {
        self.results
            .iter()
            .find(|result| result.source == *source)
            .map(|result| result.status)
    }
}

impl Router {
    /// Checks every registered adapter against `config`.
    pub fn check_integrations(&self, config: &IntegrationConfig) -> IntegrationReport {
        check_integrations(&self.fetchers(), config)
    }
}

/// Runs one check thread per adapter and joins them all.
pub fn check_integrations(
    fetchers: &[Arc<dyn Fetcher>],
    config: &IntegrationConfig,
) -> IntegrationReport {
    let run_id = Uuid::new_v4();
    info!(
        "event=integration_check module=integration status=start run_id={} sources={}",
        run_id,
        fetchers.len()
    );

    let results: Vec<IntegrationResult> = thread::scope(|scope| {
        let handles: Vec<_> = fetchers
            .iter()
            .map(|fetcher| {
                let fetcher = Arc::clone(fetcher);
                let source = fetcher.source_id();
                (source, scope.spawn(move || check_source(fetcher, config)))
            })
            .collect();

        handles
            .into_iter()
            .map(|(source, handle)| {
                handle.join().unwrap_or_else(|_| {
                    IntegrationResult::new(source, IntegrationStatus::RemoteResourceMissing)
                        .with_detail("integration check panicked")
                })
            })
            .collect()
    });

    for result in &results {
        let detail = result.detail.as_deref().unwrap_or("-");
        match result.status {
            IntegrationStatus::Success => info!(
                "event=integration_result module=integration status=ok run_id={} source={} result={}",
                run_id,
                result.source,
                result.status.as_str()
            ),
            IntegrationStatus::SourceDown | IntegrationStatus::LocalResourceMissing => warn!(
                "event=integration_result module=integration status=warn run_id={} source={} result={} detail={}",
                run_id,
                result.source,
                result.status.as_str(),
                detail
            ),
            _ => error!(
                "event=integration_result module=integration status=error run_id={} source={} result={} detail={}",
                run_id,
                result.source,
                result.status.as_str(),
                detail
            ),
        }
    }

    IntegrationReport { run_id, results }
}

fn check_source(fetcher: Arc<dyn Fetcher>, config: &IntegrationConfig) -> IntegrationResult {
    let source = fetcher.source_id();
    if !fetcher.is_source_up() {
        return IntegrationResult::new(source, IntegrationStatus::SourceDown);
    }

    let Some(url) = config.canonical_url(&source) else {
        return IntegrationResult::new(source, IntegrationStatus::LocalResourceMissing)
            .with_detail("no canonical url configured");
    };
    let Some(matched) = fetcher
        .base_urls()
        .into_iter()
        .find(|base_url| !base_url.is_empty() && url.contains(base_url.as_str()))
    else {
        return IntegrationResult::new(source, IntegrationStatus::LocalResourceMissing)
            .with_detail(format!("canonical url `{url}` matches no base url"));
    };

    let task = Task::new(fetcher, url, &matched);
    let (metadata, sheet) = match task.fetch_all() {
        Ok(fetched) => fetched,
        Err(err) => {
            return IntegrationResult::new(source, IntegrationStatus::RemoteResourceMissing)
                .with_detail(err.to_string());
        }
    };
    let fetched = FetchedCard {
        metadata: Arc::clone(&metadata),
        sheet: Arc::clone(&sheet),
    };

    if !metadata.is_consistent_with(&sheet) {
        return IntegrationResult::new(source, IntegrationStatus::ConsistencyFailure)
            .with_fetched(fetched);
    }

    let Some(snapshot) = config.snapshot(&source) else {
        return IntegrationResult::new(source, IntegrationStatus::LocalResourceMissing)
            .with_detail("no snapshot stored")
            .with_fetched(fetched);
    };

    if snapshot.metadata != *metadata {
        return IntegrationResult::new(source, IntegrationStatus::Mismatched)
            .with_detail("metadata differs from snapshot")
            .with_fetched(fetched);
    }
    if snapshot.sheet != *sheet {
        return IntegrationResult::new(source, IntegrationStatus::Mismatched)
            .with_detail("sheet differs from snapshot")
            .with_fetched(fetched);
    }

    IntegrationResult::new(source, IntegrationStatus::Success).with_fetched(fetched)
}
