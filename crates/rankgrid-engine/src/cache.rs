//! Bounded, time-expiring memoization of whole search reports.
//!
//! Keyed by canonicalized search parameters (term lowercased, coordinates
//! rounded to 4 decimal places, grid size, radius). Capacity overflow evicts
//! the oldest-inserted entry: insertion-order FIFO, not
//! recency-based LRU. A periodic sweep task removes expired entries; it takes
//! the same lock as `get`/`set` and is cancelled by [`SearchCache::shutdown`].
//! The cache is an explicit object owned by its constructor's caller, not a
//! process-wide singleton.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::types::{RankingReport, SearchParams};

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_CAPACITY: usize = 100;

/// Canonical cache key for a set of search parameters.
///
/// Coordinates are rounded to 4 decimal places (≈11 m) so requests that
/// differ only by geocoding jitter share an entry.
#[must_use]
pub fn cache_key(params: &SearchParams) -> String {
    let lat = (params.center_lat * 10_000.0).round() / 10_000.0;
    let lng = (params.center_lng * 10_000.0).round() / 10_000.0;
    format!(
        "{}_{}_{}_{}_{}",
        params.term.to_lowercase(),
        lat,
        lng,
        params.grid_size,
        params.radius_miles
    )
}

struct CacheEntry {
    payload: RankingReport,
    created_at: DateTime<Utc>,
    search_id: Uuid,
    expires_at: Instant,
}

/// Metadata for one live cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryInfo {
    pub key: String,
    pub search_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Point-in-time view of cache occupancy, in insertion (eviction) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub keys: Vec<CacheEntryInfo>,
}

struct Inner {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order for FIFO eviction. Overwrites keep their original slot.
    order: VecDeque<String>,
    capacity: usize,
    default_ttl: Duration,
}

impl Inner {
    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    fn sweep_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| now >= e.expires_at)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }
}

/// Bounded TTL cache over computed [`RankingReport`]s.
pub struct SearchCache {
    inner: Arc<Mutex<Inner>>,
    sweeper: Option<JoinHandle<()>>,
}

impl SearchCache {
    #[must_use]
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
                default_ttl,
            })),
            sweeper: None,
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch a cached report. An expired entry is removed and reported as a
    /// miss.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<RankingReport> {
        let mut inner = self.lock();
        match inner.entries.get(key) {
            None => {
                tracing::debug!(key, "cache miss");
                None
            }
            Some(entry) if Instant::now() >= entry.expires_at => {
                tracing::debug!(key, "cache entry expired, removing");
                inner.remove(key);
                None
            }
            Some(entry) => {
                tracing::debug!(key, search_id = %entry.search_id, "cache hit");
                Some(entry.payload.clone())
            }
        }
    }

    /// Insert or overwrite an entry. At capacity, the oldest-inserted entry
    /// is evicted first. `ttl` of `None` uses the cache default.
    pub fn set(&self, key: &str, payload: RankingReport, ttl: Option<Duration>) {
        let mut inner = self.lock();
        let ttl = ttl.unwrap_or(inner.default_ttl);

        if !inner.entries.contains_key(key) {
            if inner.entries.len() >= inner.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                    tracing::debug!(key = %oldest, "evicted oldest cache entry");
                }
            }
            inner.order.push_back(key.to_string());
        }

        let search_id = payload.search_id;
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                created_at: Utc::now(),
                search_id,
                expires_at: Instant::now() + ttl,
            },
        );
        tracing::debug!(key, %search_id, "cached search report");
    }

    /// Explicitly remove one entry.
    pub fn invalidate(&self, key: &str) {
        if self.lock().remove(key) {
            tracing::debug!(key, "invalidated cache entry");
        }
    }

    /// Remove every expired entry now; returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let removed = self.lock().sweep_expired(Instant::now());
        if removed > 0 {
            tracing::debug!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Snapshot of current occupancy and per-entry metadata.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let keys = inner
            .order
            .iter()
            .filter_map(|key| {
                inner.entries.get(key).map(|entry| CacheEntryInfo {
                    key: key.clone(),
                    search_id: entry.search_id,
                    created_at: entry.created_at,
                })
            })
            .collect();
        CacheStats {
            entries: inner.entries.len(),
            capacity: inner.capacity,
            keys,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Start the periodic sweep task. Replaces any previously running sweeper.
    pub fn spawn_sweeper(&mut self, interval: Duration) {
        self.shutdown();
        let inner = Arc::clone(&self.inner);
        self.sweeper = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .sweep_expired(Instant::now());
                if removed > 0 {
                    tracing::debug!(removed, "swept expired cache entries");
                }
            }
        }));
    }

    /// Cancel the sweep task. Idempotent; also invoked on drop.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}
