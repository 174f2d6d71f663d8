//! Read-through TTL cache of normalized payloads keyed by target year-month.
//!
//! [`PayloadCache`] is designed to be shared (`Arc<PayloadCache>`) between
//! tasks. Entries are stored in a `DashMap` and stamped with a
//! [`tokio::time::Instant`], so tests can drive expiry with paused time.
//!
//! Concurrent misses for the same key are not coalesced: each caller runs
//! its own computation and the last one to finish overwrites the entry.
//! Failed computations are never stored.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::{debug, instrument, trace};

use crate::schema::CanonicalPayload;

/// Default time-to-live for a cached payload (10 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    payload: Arc<CanonicalPayload>,
}

/// TTL cache of canonical payloads.
#[derive(Debug)]
pub struct PayloadCache {
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
}

impl Default for PayloadCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl PayloadCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached payload for `key` if it is still fresh.
    ///
    /// Expired entries are evicted on lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<CanonicalPayload>> {
        let fresh = {
            let entry = self.entries.get(key)?;
            (entry.stored_at.elapsed() < self.ttl).then(|| Arc::clone(&entry.payload))
        };
        if fresh.is_none() {
            trace!(key, "evicting expired payload");
            self.entries
                .remove_if(key, |_, entry| entry.stored_at.elapsed() >= self.ttl);
        }
        fresh
    }

    /// Stores `payload` under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, payload: Arc<CanonicalPayload>) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                stored_at: Instant::now(),
                payload,
            },
        );
    }

    /// Returns the fresh entry for `key`, or runs `compute` and caches its result.
    ///
    /// # Errors
    ///
    /// Returns the error of `compute`; nothing is cached in that case.
    #[instrument(skip(self, compute))]
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: &str,
        compute: F,
    ) -> Result<Arc<CanonicalPayload>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CanonicalPayload, E>>,
    {
        if let Some(payload) = self.get(key) {
            debug!("payload cache hit");
            return Ok(payload);
        }

        debug!("payload cache miss");
        let payload = Arc::new(compute().await?);
        self.insert(key, Arc::clone(&payload));
        Ok(payload)
    }

    /// Drops the entry for `key`, if any.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
