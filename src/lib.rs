//! Lookup layer for spreadsheet-backed constructed-language dictionaries.
//!
//! ```
//! use conlang_dict::{Dictionary, Word, sheet::StaticSource};
//!
//! let row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();
//! let source = StaticSource::new(vec![row(&[
//!     "hello", "", "", "greeting", "", "", "", "", "meta", "meta",
//! ])]);
//!
//! let mut dict = tokio_test::block_on(Dictionary::<Word, _>::main(source)).unwrap();
//! let result = tokio_test::block_on(dict.search("Hello")).unwrap();
//! assert_eq!(result.records[0].word, "hello");
//! assert!(result.is_duplicate(0));
//! ```

// Declare modules
pub mod cache;
pub mod config;
pub mod embed;
pub mod error;
pub mod models;
pub mod normalise;
pub mod search;
pub mod sheet;

// Re-export key types for easier use
pub use config::{Config, DictionaryKind};
pub use embed::Embed;
pub use error::{DictError, Result};
pub use models::{EmbedField, Record, Row, SesameWord, ThravelemehWord, Word};
pub use search::SearchResult;

use cache::{HOURLY, SheetCache, WEEKLY};
use log::debug;
use rand::seq::IndexedRandom;
use sheet::RowSource;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A dictionary handle shareable across tasks; the lock serialises reload-then-read.
pub type SharedDictionary<R, S> = Arc<tokio::sync::Mutex<Dictionary<R, S>>>;

/// One dictionary sheet: a snapshot cache plus the record shape its rows decode to.
pub struct Dictionary<R, S> {
    cache: SheetCache<S>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, S: RowSource> Dictionary<R, S> {
    /// Wraps a source without fetching; the first search populates the cache.
    pub fn new(source: S, threshold: Duration) -> Self {
        Dictionary {
            cache: SheetCache::new(source, threshold),
            _record: PhantomData,
        }
    }

    /// Opens the dictionary and loads the first snapshot eagerly.
    pub async fn load(source: S, threshold: Duration) -> Result<Self> {
        let mut dict = Self::new(source, threshold);
        dict.cache.reload().await?;
        Ok(dict)
    }

    /// Main dictionary cadence: reload when older than a week.
    pub async fn main(source: S) -> Result<Self> {
        Self::load(source, WEEKLY).await
    }

    /// Thravelemeh cadence: reload when older than an hour.
    pub async fn thravelemeh(source: S) -> Result<Self> {
        Self::load(source, HOURLY).await
    }

    pub fn into_shared(self) -> SharedDictionary<R, S> {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    pub fn cache(&self) -> &SheetCache<S> {
        &self.cache
    }

    /// Replaces the snapshot unconditionally.
    pub async fn reload(&mut self) -> Result<()> {
        self.cache.reload().await
    }

    /// Searches the sheet, reloading first if the snapshot is stale.
    pub async fn search(&mut self, query: &str) -> Result<SearchResult<R>> {
        self.search_at(query, Instant::now()).await
    }

    /// Like `search`, judging staleness against `now`.
    pub async fn search_at(&mut self, query: &str, now: Instant) -> Result<SearchResult<R>> {
        let reloaded = self.cache.ensure_fresh_at(now).await?;

        let start = Instant::now();
        let (records, duplicates) = search::search_rows::<R>(query, self.cache.rows());
        debug!(
            "search for '{}' over {} rows took {:?}: {} matches, duplicates {:?}",
            query,
            self.cache.rows().len(),
            start.elapsed(),
            records.len(),
            duplicates
        );

        Ok(SearchResult {
            records,
            duplicates,
            reloaded,
        })
    }

    /// Picks a random well-formed entry, reloading first if stale.
    pub async fn random_record(&mut self) -> Result<R> {
        self.cache.ensure_fresh_at(Instant::now()).await?;
        let candidates: Vec<&Row> = self
            .cache
            .rows()
            .iter()
            .filter(|row| row.first().is_some_and(|w| !w.trim().is_empty()))
            .filter(|row| R::SCHEMA.check(row).is_ok())
            .collect();
        let row = candidates
            .choose(&mut rand::rng())
            .ok_or(DictError::EmptyDictionary)?;
        R::decode(row)
    }
}
