//! Snapshot cache with a lazy, request-triggered staleness check.

use crate::error::Result;
use crate::models::Row;
use crate::sheet::RowSource;
use log::info;
use std::time::{Duration, Instant};

/// Main dictionary reload cadence.
pub const WEEKLY: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Thravelemeh dictionary reload cadence.
pub const HOURLY: Duration = Duration::from_secs(60 * 60);

/// Full copy of the sheet and when it was taken.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub rows: Vec<Row>,
    pub taken_at: Instant,
}

/// Holds the latest snapshot of a row source.
///
/// The snapshot is only ever replaced as a whole: a failed fetch leaves the
/// previous rows and timestamp in place.
pub struct SheetCache<S> {
    source: S,
    threshold: Duration,
    snapshot: Option<Snapshot>,
}

impl<S: RowSource> SheetCache<S> {
    /// Creates an empty cache; nothing is fetched until first use.
    pub fn new(source: S, threshold: Duration) -> Self {
        SheetCache {
            source,
            threshold,
            snapshot: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Rows of the current snapshot, empty before the first load.
    pub fn rows(&self) -> &[Row] {
        self.snapshot
            .as_ref()
            .map(|s| s.rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn last_reload(&self) -> Option<Instant> {
        self.snapshot.as_ref().map(|s| s.taken_at)
    }

    /// Replaces the snapshot with a fresh fetch, stamped with the current time.
    pub async fn reload(&mut self) -> Result<()> {
        self.reload_at(Instant::now()).await
    }

    /// Like `reload`, stamping the snapshot with `now`.
    pub async fn reload_at(&mut self, now: Instant) -> Result<()> {
        info!("Reloading {}", self.source.describe());
        let rows = self.source.fetch_rows().await?;
        info!("Loaded {} rows", rows.len());
        self.snapshot = Some(Snapshot {
            rows,
            taken_at: now,
        });
        Ok(())
    }

    /// True when the snapshot is missing or strictly older than the threshold.
    pub fn is_stale_at(&self, now: Instant) -> bool {
        match &self.snapshot {
            None => true,
            Some(snapshot) => now.saturating_duration_since(snapshot.taken_at) > self.threshold,
        }
    }

    /// Reloads if stale at `now`; returns whether a reload happened.
    pub async fn ensure_fresh_at(&mut self, now: Instant) -> Result<bool> {
        if !self.is_stale_at(now) {
            return Ok(false);
        }
        self.reload_at(now).await?;
        Ok(true)
    }
}
