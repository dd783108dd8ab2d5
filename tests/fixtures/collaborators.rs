//! Fake collaborators for optimizer tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use trip_router::error::{ReasoningError, StoreError};
use trip_router::store::InMemoryTripStore;
use trip_router::traits::{ReasoningClient, TripStore};
use trip_router::{Stop, TripId, TripMeta};

/// Reasoning client that replays a fixed answer and counts calls.
#[derive(Clone)]
pub struct ScriptedReasoner {
    response: Result<String, String>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedReasoner {
    pub fn answering(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            ..Self::answering("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn boxed(&self) -> Option<Box<dyn ReasoningClient>> {
        Some(Box::new(self.clone()))
    }
}

impl ReasoningClient for ScriptedReasoner {
    fn complete(
        &self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, ReasoningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone().map_err(ReasoningError::Other)
    }
}

/// Trip store whose metadata writes always fail.
pub struct ReadOnlyTripStore {
    pub inner: InMemoryTripStore,
}

impl TripStore for ReadOnlyTripStore {
    fn stops_for_trip(&self, trip_id: TripId) -> Result<Vec<Stop>, StoreError> {
        self.inner.stops_for_trip(trip_id)
    }

    fn trip_meta(&self, trip_id: TripId) -> Result<TripMeta, StoreError> {
        self.inner.trip_meta(trip_id)
    }

    fn merge_trip_meta(&self, _trip_id: TripId, _patch: TripMeta) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only replica".to_string()))
    }
}
