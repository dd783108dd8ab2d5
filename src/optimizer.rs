//! Trip route optimizer.
//!
//! Orders a trip's stops by trying the reasoning service first and falling
//! back to nearest-neighbor, memoizes the result per stop-set fingerprint,
//! and records telemetry in the trip's metadata.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::ai::{self, AiOrderingOutcome, AiRequestOptions};
use crate::cache::{self, Lookup, OptimizationCache};
use crate::clock::{SystemClock, unix_seconds};
use crate::error::OptimizeError;
use crate::fingerprint::fingerprint;
use crate::haversine;
use crate::model::{Method, OptimizationResult, Stop, StopId, Trip, TripId, TripMeta};
use crate::nearest_neighbor;
use crate::traits::{CacheStore, Clock, ReasoningClient, TripStore};

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Lifetime of a memoized order.
    pub cache_ttl: Duration,
    /// Completion length limit for the reasoning service.
    pub ai_max_tokens: u32,
    /// Sampling temperature for the reasoning service.
    pub ai_temperature: f32,
    /// Below this many stops the reasoning service is not consulted.
    pub min_stops_for_ai: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            cache_ttl: cache::DEFAULT_TTL,
            ai_max_tokens: 1000,
            ai_temperature: 0.2,
            min_stops_for_ai: 2,
        }
    }
}

/// Details of a single optimize call.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimization {
    pub result: OptimizationResult,
    pub fingerprint: String,
    pub lookup: Lookup,
    /// Wall-clock time of this call, cache lookup included.
    pub elapsed: Duration,
    pub distance_km: f64,
}

pub struct RouteOptimizer<S, C> {
    store: S,
    cache: OptimizationCache<C>,
    reasoner: Option<Box<dyn ReasoningClient>>,
    clock: Arc<dyn Clock>,
    config: OptimizerConfig,
}

impl<S, C> RouteOptimizer<S, C>
where
    S: TripStore,
    C: CacheStore,
{
    /// Build an optimizer. Pass `None` as `reasoner` to disable AI ordering.
    pub fn new(
        store: S,
        cache_store: C,
        reasoner: Option<Box<dyn ReasoningClient>>,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            store,
            cache: OptimizationCache::new(cache_store, config.cache_ttl),
            reasoner,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Use `clock` for the optimization timestamp written to trip metadata.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn ai_enabled(&self) -> bool {
        self.reasoner.is_some()
    }

    /// Compute the visiting order for `trip` as a list of stop ids.
    pub fn optimize(&self, trip: &Trip) -> Result<Vec<StopId>, OptimizeError> {
        Ok(self.optimize_detailed(trip)?.result.order)
    }

    /// Like [`optimize`](Self::optimize), returning the stops themselves.
    pub fn optimize_stops(&self, trip: &Trip) -> Result<Vec<Stop>, OptimizeError> {
        let (optimization, stops) = self.run(trip)?;
        let mut by_id: HashMap<StopId, Stop> =
            stops.into_iter().map(|stop| (stop.id, stop)).collect();
        Ok(optimization
            .result
            .order
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect())
    }

    /// Compute the visiting order and report how it was obtained.
    pub fn optimize_detailed(&self, trip: &Trip) -> Result<Optimization, OptimizeError> {
        self.run(trip).map(|(optimization, _)| optimization)
    }

    /// Optimize independent trips in parallel. Results keep the input order.
    pub fn optimize_many(
        &self,
        trips: &[Trip],
    ) -> Vec<(TripId, Result<Vec<StopId>, OptimizeError>)> {
        trips
            .par_iter()
            .map(|trip| (trip.id, self.optimize(trip)))
            .collect()
    }

    fn run(&self, trip: &Trip) -> Result<(Optimization, Vec<Stop>), OptimizeError> {
        let started = Instant::now();

        trip.origin
            .validate()
            .map_err(|reason| OptimizeError::InvalidOrigin { reason })?;
        let stops = self.store.stops_for_trip(trip.id)?;
        validate_stops(&stops)?;

        let fingerprint = fingerprint(&stops);
        let (result, lookup) = self
            .cache
            .get_or_compute(trip.id, &fingerprint, || self.compute(trip, &stops));
        let elapsed = started.elapsed();

        let distance_km = route_distance(trip, &stops, &result.order);
        let optimization = Optimization {
            result,
            fingerprint,
            lookup,
            elapsed,
            distance_km,
        };

        let cache_hit = lookup == Lookup::Hit;
        info!(
            trip_id = %trip.id,
            method = %optimization.result.method,
            stops = stops.len(),
            cache_hit,
            elapsed_ms = elapsed.as_millis() as u64,
            "trip route optimized"
        );

        self.record(trip.id, &optimization, stops.len());
        Ok((optimization, stops))
    }

    fn compute(&self, trip: &Trip, stops: &[Stop]) -> OptimizationResult {
        match self.ai_outcome(trip, stops) {
            Some(AiOrderingOutcome::Accepted(order)) => {
                return OptimizationResult {
                    order,
                    method: Method::Ai,
                };
            }
            Some(AiOrderingOutcome::Rejected(reason)) => {
                debug!(trip_id = %trip.id, %reason, "falling back to nearest-neighbor");
            }
            Some(AiOrderingOutcome::Unavailable(reason)) => {
                debug!(trip_id = %trip.id, %reason, "falling back to nearest-neighbor");
            }
            None => {}
        }

        OptimizationResult {
            order: nearest_neighbor::order(trip.origin, stops),
            method: Method::Heuristic,
        }
    }

    fn ai_outcome(&self, trip: &Trip, stops: &[Stop]) -> Option<AiOrderingOutcome> {
        let client = self.reasoner.as_deref()?;
        if stops.len() < self.config.min_stops_for_ai {
            debug!(
                trip_id = %trip.id,
                stops = stops.len(),
                "skipping AI ordering for trivial trip"
            );
            return None;
        }

        let options = AiRequestOptions {
            max_tokens: self.config.ai_max_tokens,
            temperature: self.config.ai_temperature,
        };
        Some(ai::propose_order(client, trip.origin, stops, options))
    }

    fn record(&self, trip_id: TripId, optimization: &Optimization, stop_count: usize) {
        let mut patch = TripMeta::new();
        patch.insert(
            "route_optimized_at".to_string(),
            json!(unix_seconds(self.clock.now())),
        );
        patch.insert("method".to_string(), json!(optimization.result.method));
        patch.insert(
            "time_ms".to_string(),
            json!(optimization.elapsed.as_millis() as u64),
        );
        patch.insert("locations_count".to_string(), json!(stop_count));
        patch.insert("fingerprint".to_string(), json!(optimization.fingerprint));
        patch.insert(
            "distance_km".to_string(),
            json!((optimization.distance_km * 1000.0).round() / 1000.0),
        );
        patch.insert(
            "cache_hit".to_string(),
            json!(optimization.lookup == Lookup::Hit),
        );

        if let Err(err) = self.store.merge_trip_meta(trip_id, patch) {
            warn!(%trip_id, error = %err, "failed to record route optimization metadata");
        }
    }
}

fn validate_stops(stops: &[Stop]) -> Result<(), OptimizeError> {
    let mut seen = HashSet::with_capacity(stops.len());
    for stop in stops {
        stop.location
            .validate()
            .map_err(|reason| OptimizeError::InvalidStop {
                stop_id: stop.id,
                reason,
            })?;
        if !seen.insert(stop.id) {
            return Err(OptimizeError::DuplicateStop(stop.id));
        }
    }
    Ok(())
}

fn route_distance(trip: &Trip, stops: &[Stop], order: &[StopId]) -> f64 {
    let by_id: HashMap<StopId, &Stop> = stops.iter().map(|stop| (stop.id, stop)).collect();
    haversine::route_length_km(trip.origin, order.iter().filter_map(|id| by_id.get(id).copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::store::InMemoryTripStore;

    fn optimizer() -> RouteOptimizer<InMemoryTripStore, InMemoryCache> {
        RouteOptimizer::new(
            InMemoryTripStore::new(),
            InMemoryCache::new(Arc::new(SystemClock)),
            None,
            OptimizerConfig::default(),
        )
    }

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert!((config.ai_temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.min_stops_for_ai, 2);
    }

    #[test]
    fn test_validate_stops_rejects_bad_data() {
        let nan = vec![Stop::new(1, f64::NAN, 39.0, 0)];
        assert!(matches!(
            validate_stops(&nan),
            Err(OptimizeError::InvalidStop { stop_id: StopId(1), .. })
        ));

        let duplicate = vec![Stop::new(1, 0.0, 1.0, 0), Stop::new(1, 0.0, 2.0, 0)];
        assert!(matches!(
            validate_stops(&duplicate),
            Err(OptimizeError::DuplicateStop(StopId(1)))
        ));
    }

    #[test]
    fn test_route_distance_follows_order() {
        let trip = Trip::new(1, 0.0, 0.0);
        let stops = vec![Stop::new(1, 0.0, 1.0, 0), Stop::new(2, 0.0, 2.0, 0)];
        let straight = route_distance(&trip, &stops, &[StopId(1), StopId(2)]);
        let zigzag = route_distance(&trip, &stops, &[StopId(2), StopId(1)]);
        assert!(straight < zigzag);
    }

    #[test]
    fn test_unknown_trip_is_a_store_error() {
        let optimizer = optimizer();
        assert!(matches!(
            optimizer.optimize(&Trip::new(99, 0.0, 0.0)),
            Err(OptimizeError::Store(_))
        ));
    }

    #[test]
    fn test_invalid_origin() {
        let optimizer = optimizer();
        optimizer.store().put_stops(TripId(1), Vec::new()).unwrap();
        assert!(matches!(
            optimizer.optimize(&Trip::new(1, 95.0, 0.0)),
            Err(OptimizeError::InvalidOrigin { .. })
        ));
    }
}
