//! Memoization of optimization results.
//!
//! Entries are keyed by trip id and stop-set fingerprint and expire after a
//! fixed TTL. A changed stop produces a new fingerprint and therefore a
//! natural miss; nothing is invalidated explicitly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::error::CacheError;
use crate::model::{OptimizationResult, TripId};
use crate::traits::{CacheStore, Clock};

/// Default lifetime of a cached order.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

const KEY_PREFIX: &str = "route_opt";

/// Cache key for a trip and fingerprint.
pub fn cache_key(trip_id: TripId, fingerprint: &str) -> String {
    format!("{}:{}:{}", KEY_PREFIX, trip_id, fingerprint)
}

/// Whether a lookup was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Miss,
}

/// Typed get-or-compute layer over a [`CacheStore`].
///
/// Backend failures degrade to computing directly.
#[derive(Debug)]
pub struct OptimizationCache<C> {
    store: C,
    ttl: Duration,
}

impl<C: CacheStore> OptimizationCache<C> {
    pub fn new(store: C, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    /// Return the cached result for the key, or run `compute` once and store it.
    pub fn get_or_compute<F>(
        &self,
        trip_id: TripId,
        fingerprint: &str,
        compute: F,
    ) -> (OptimizationResult, Lookup)
    where
        F: FnOnce() -> OptimizationResult,
    {
        let key = cache_key(trip_id, fingerprint);

        if let Some(result) = self.lookup(&key) {
            debug!(%trip_id, key = %key, "route optimization cache hit");
            return (result, Lookup::Hit);
        }
        debug!(%trip_id, key = %key, "route optimization cache miss");

        let result = compute();
        self.remember(&key, &result);
        (result, Lookup::Miss)
    }

    fn lookup(&self, key: &str) -> Option<OptimizationResult> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, key, "route optimization cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(error = %err, key, "discarding unreadable cache entry");
                None
            }
        }
    }

    fn remember(&self, key: &str, result: &OptimizationResult) {
        let encoded = match serde_json::to_string(result) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(error = %err, key, "could not encode optimization result");
                return;
            }
        };
        if let Err(err) = self.store.set(key, encoded, self.ttl) {
            warn!(error = %err, key, "route optimization cache write failed");
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: SystemTime,
}

/// Process-local [`CacheStore`] with expiry driven by an injected clock.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired ones included until the next write.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl CacheStore for InMemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| CacheError::Unavailable(err.to_string()))?;

        let now = self.clock.now();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| CacheError::Unavailable(err.to_string()))?;

        // Superseded fingerprints are never read again; drop them here.
        let now = self.clock.now();
        entries.retain(|_, entry| now < entry.expires_at);
        entries.insert(key.to_string(), Entry { value, expires_at: now + ttl });
        Ok(())
    }
}

impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        (**self).set(key, value, ttl)
    }
}
