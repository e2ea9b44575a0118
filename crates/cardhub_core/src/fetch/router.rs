//! URL router over registered adapters.
//!
//! # Responsibility
//! - Hold registered adapters in registration order.
//! - Build a `Task` for the first adapter whose base URL occurs in a URL.
//!
//! # Invariants
//! - Registration order is the only tie-break between matching adapters.
//! - Source ids are unique among registered adapters.
//! - A URL no adapter matches is reported as `None`, never as an error.

use crate::fetch::fetcher::Fetcher;
use crate::fetch::task::Task;
use crate::model::metadata::SourceId;
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Adapter registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    InvalidSourceId(String),
    DuplicateSourceId(String),
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSourceId(value) => write!(f, "source id is invalid: {value}"),
            Self::DuplicateSourceId(value) => write!(f, "source id already registered: {value}"),
        }
    }
}

impl Error for RouterError {}

/// Tasks keyed by normalized URL plus URLs no adapter matched.
#[derive(Debug, Default)]
pub struct RoutedTaskMap {
    pub valid: BTreeMap<String, Task>,
    pub invalid: Vec<String>,
}

/// Tasks in input order plus URLs no adapter matched.
#[derive(Debug, Default)]
pub struct RoutedTaskSlice {
    pub valid: Vec<Task>,
    pub invalid: Vec<String>,
}

/// Read-mostly adapter registry.
#[derive(Default)]
pub struct Router {
    fetchers: RwLock<Vec<Arc<dyn Fetcher>>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers adapters in order.
    ///
    /// The batch is validated as a whole; on error nothing is registered.
    pub fn register_fetchers(
        &self,
        fetchers: impl IntoIterator<Item = Arc<dyn Fetcher>>,
    ) -> Result<(), RouterError> {
        let incoming: Vec<Arc<dyn Fetcher>> = fetchers.into_iter().collect();
        let mut registered = self
            .fetchers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut seen: BTreeSet<SourceId> = registered.iter().map(|f| f.source_id()).collect();
        for fetcher in &incoming {
            let source_id = fetcher.source_id();
            if !is_valid_source_id(source_id.as_str()) {
                return Err(RouterError::InvalidSourceId(source_id.to_string()));
            }
            if !seen.insert(source_id.clone()) {
                return Err(RouterError::DuplicateSourceId(source_id.to_string()));
            }
        }

        for fetcher in incoming {
            info!(
                "event=fetcher_register module=router status=ok source={} base_urls={}",
                fetcher.source_id(),
                fetcher.base_urls().len()
            );
            registered.push(fetcher);
        }
        Ok(())
    }

    /// Returns source ids in registration order.
    pub fn sources(&self) -> Vec<SourceId> {
        self.read().iter().map(|fetcher| fetcher.source_id()).collect()
    }

    /// Returns adapters in registration order.
    pub fn fetchers(&self) -> Vec<Arc<dyn Fetcher>> {
        self.read().clone()
    }

    pub fn fetcher(&self, source_id: &SourceId) -> Option<Arc<dyn Fetcher>> {
        self.read()
            .iter()
            .find(|fetcher| fetcher.source_id() == *source_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Builds a task from the first adapter matching `url`.
    pub fn task_of(&self, url: &str) -> Option<Task> {
        let fetchers = self.read();
        for fetcher in fetchers.iter() {
            let matched = fetcher
                .base_urls()
                .into_iter()
                .find(|base_url| !base_url.is_empty() && url.contains(base_url.as_str()));
            if let Some(base_url) = matched {
                return Some(Task::new(Arc::clone(fetcher), url, &base_url));
            }
        }
        None
    }

    /// Routes every URL; tasks sharing a normalized URL collapse to one entry.
    pub fn task_map_of<I, S>(&self, urls: I) -> RoutedTaskMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut routed = RoutedTaskMap::default();
        for url in urls {
            let url = url.as_ref();
            match self.task_of(url) {
                Some(task) => {
                    routed.valid.insert(task.normalized_url().to_string(), task);
                }
                None => routed.invalid.push(url.to_string()),
            }
        }
        routed
    }

    /// Routes every URL, keeping input order.
    pub fn task_slice_of<I, S>(&self, urls: I) -> RoutedTaskSlice
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut routed = RoutedTaskSlice::default();
        for url in urls {
            let url = url.as_ref();
            match self.task_of(url) {
                Some(task) => routed.valid.push(task),
                None => routed.invalid.push(url.to_string()),
            }
        }
        routed
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn Fetcher>>> {
        self.fetchers.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_valid_source_id(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
