//! Collaborator traits for the route optimizer.
//!
//! The optimizer owns no persistence or transport. Applications implement
//! these for their own trip storage, cache backend and completion service.

use std::time::{Duration, SystemTime};

use crate::error::{CacheError, ReasoningError, StoreError};
use crate::model::{Stop, TripId, TripMeta};

/// Read access to trip stops and read/merge access to trip metadata.
pub trait TripStore: Send + Sync {
    /// Current stops of the trip, in whatever order the store keeps them.
    fn stops_for_trip(&self, trip_id: TripId) -> Result<Vec<Stop>, StoreError>;

    fn trip_meta(&self, trip_id: TripId) -> Result<TripMeta, StoreError>;

    /// Merge `patch` into the trip's metadata.
    ///
    /// Keys absent from `patch` must be left untouched. Implementations
    /// should apply the merge atomically with respect to other writers.
    fn merge_trip_meta(&self, trip_id: TripId, patch: TripMeta) -> Result<(), StoreError>;
}

/// A text-completion service used to propose visiting orders.
pub trait ReasoningClient: Send + Sync {
    fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ReasoningError>;
}

/// A string key/value cache with per-entry expiry.
pub trait CacheStore: Send + Sync {
    /// Returns `Ok(None)` on a miss or an expired entry.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}
