//! In-memory trip store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::model::{Stop, TripId, TripMeta};
use crate::traits::TripStore;

#[derive(Debug, Clone, Default)]
struct TripRecord {
    stops: Vec<Stop>,
    meta: TripMeta,
}

/// A [`TripStore`] kept in process memory.
///
/// Metadata merges happen under a single lock, so concurrent writers never
/// drop each other's keys.
#[derive(Debug, Default)]
pub struct InMemoryTripStore {
    trips: Mutex<HashMap<TripId, TripRecord>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a trip's stops, keeping its metadata.
    pub fn put_stops(&self, trip_id: TripId, stops: Vec<Stop>) -> Result<(), StoreError> {
        let mut trips = self.lock()?;
        trips.entry(trip_id).or_default().stops = stops;
        Ok(())
    }

    /// Replace a single stop by id, or append it if the trip lacks it.
    pub fn upsert_stop(&self, trip_id: TripId, stop: Stop) -> Result<(), StoreError> {
        let mut trips = self.lock()?;
        let record = trips
            .get_mut(&trip_id)
            .ok_or(StoreError::TripNotFound(trip_id))?;
        match record.stops.iter_mut().find(|existing| existing.id == stop.id) {
            Some(existing) => *existing = stop,
            None => record.stops.push(stop),
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TripId, TripRecord>>, StoreError> {
        self.trips
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

impl TripStore for InMemoryTripStore {
    fn stops_for_trip(&self, trip_id: TripId) -> Result<Vec<Stop>, StoreError> {
        self.lock()?
            .get(&trip_id)
            .map(|record| record.stops.clone())
            .ok_or(StoreError::TripNotFound(trip_id))
    }

    fn trip_meta(&self, trip_id: TripId) -> Result<TripMeta, StoreError> {
        self.lock()?
            .get(&trip_id)
            .map(|record| record.meta.clone())
            .ok_or(StoreError::TripNotFound(trip_id))
    }

    fn merge_trip_meta(&self, trip_id: TripId, patch: TripMeta) -> Result<(), StoreError> {
        let mut trips = self.lock()?;
        let record = trips
            .get_mut(&trip_id)
            .ok_or(StoreError::TripNotFound(trip_id))?;
        record.meta.extend(patch);
        Ok(())
    }
}
