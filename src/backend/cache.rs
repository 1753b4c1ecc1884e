/**
 * Decision Cache
 *
 * Short-lived memoization of authorization verdicts keyed by the flattened
 * request parameters.
 *
 * # Semantics
 *
 * - Only successful computations are stored; failures are returned to the
 *   caller and the next identical request tries again.
 * - Expiry is passive. Nothing is purged in the background; a read past the
 *   expiry instant is a miss and the fresh value overwrites the stale one.
 * - Concurrent misses on the same key may each run the producer. There is
 *   no in-flight de-duplication.
 * - Expired entries are swept whenever a new entry is written.
 *
 * Time is read from `tokio::time::Instant` so tests can drive expiry with a
 * paused clock.
 */

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::Instant;

/// Cached value and its expiry
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Thread-safe TTL memoizing cache
#[derive(Clone, Debug)]
pub struct DecisionCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
}

impl<V> Default for DecisionCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V: Clone> DecisionCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unexpired value for `key`, if any
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` for `ttl`
    ///
    /// Expired entries are swept while the write lock is held. A `ttl` whose
    /// expiry instant cannot be represented leaves the cache untouched.
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        let Some(expires_at) = now.checked_add(ttl) else {
            tracing::warn!(ttl_secs = ttl.as_secs(), "decision cache TTL out of range, not caching");
            return;
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.is_fresh(now));
        entries.insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Return the cached value or compute, store and return a new one
    ///
    /// The lock is never held while `producer` runs. An `Err` from the
    /// producer is passed through and leaves the cache untouched.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            tracing::debug!(key_digest = %key_digest(key), "decision cache hit");
            return Ok(value);
        }

        tracing::debug!(key_digest = %key_digest(key), "decision cache miss");
        let value = producer().await?;
        self.insert(key, value.clone(), ttl);
        Ok(value)
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Short SHA-256 digest of a cache key for log output
///
/// Keys embed the caller's API key, so they are never logged verbatim.
pub fn key_digest(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut hex = base16ct::lower::encode_string(&digest);
    hex.truncate(16);
    hex
}
