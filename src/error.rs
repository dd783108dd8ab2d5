//! Error types.

use thiserror::Error;

use crate::model::{StopId, TripId};

/// Failures that reject an optimize call.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("stop {stop_id} has invalid coordinates: {reason}")]
    InvalidStop { stop_id: StopId, reason: String },
    #[error("trip origin is invalid: {reason}")]
    InvalidOrigin { reason: String },
    #[error("stop {0} appears more than once in the trip")]
    DuplicateStop(StopId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a [`TripStore`](crate::traits::TripStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("trip {0} not found")]
    TripNotFound(TripId),
    #[error("trip store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a [`CacheStore`](crate::traits::CacheStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a [`ReasoningClient`](crate::traits::ReasoningClient).
#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("service returned no completion text")]
    EmptyResponse,
    #[error("{0}")]
    Other(String),
}
