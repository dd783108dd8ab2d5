//! trip-router: delivery trip stop ordering
//!
//! Orders a trip's stops with an optional AI-assisted proposal, a
//! nearest-neighbor fallback and a fingerprint-keyed result cache.

pub mod model;
pub mod error;
pub mod traits;
pub mod clock;
pub mod haversine;
pub mod nearest_neighbor;
pub mod fingerprint;
pub mod ai;
pub mod openai;
pub mod cache;
pub mod store;
pub mod optimizer;

pub use error::OptimizeError;
pub use model::{Coordinate, Method, OptimizationResult, Stop, StopId, Trip, TripId, TripMeta};
pub use optimizer::{Optimization, OptimizerConfig, RouteOptimizer};
