//! Single-summary cache
//!
//! Rendered detail summaries keyed by paper identifier. Entries live for
//! the whole session and are never evicted or invalidated; a repeat click
//! on a summarized paper re-opens its modal without touching the backend.
//!
//! Stored values are the formatted summary body without the source-link
//! header; the header is composed at render time from the clicked link.

use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Summaries currently stored.
    pub entries: u64,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to the backend.
    pub misses: u64,
}

/// Session-lifetime store of rendered single-paper summaries.
///
/// Clones share one underlying store.
#[derive(Clone)]
pub struct SummaryCache {
    inner: Cache<String, String>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stores the rendered summary body for a paper.
    pub fn insert(&self, paper_id: impl Into<String>, body: impl Into<String>) {
        self.inner.insert(paper_id.into(), body.into());
    }

    /// Looks up the rendered summary for a paper, counting the outcome.
    #[must_use]
    pub fn get(&self, paper_id: &str) -> Option<String> {
        match self.inner.get(paper_id) {
            Some(body) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(paper_id, "summary served from cache");
                Some(body)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(paper_id, "summary not cached");
                None
            }
        }
    }

    /// Whether a summary is stored for a paper, without counting.
    #[must_use]
    pub fn contains(&self, paper_id: &str) -> bool {
        self.inner.contains_key(paper_id)
    }

    /// Number of stored summaries.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Whether the cache holds no summaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
