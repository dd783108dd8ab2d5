//! Domain types for trip route optimization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Free-form metadata attached to a trip.
pub type TripMeta = serde_json::Map<String, serde_json::Value>;

/// Stable identifier of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u64);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub u64);

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns a description of the problem if the coordinate is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(format!("non-finite coordinate ({}, {})", self.lat, self.lng));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} out of range", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!("longitude {} out of range", self.lng));
        }
        Ok(())
    }
}

/// A geographic waypoint belonging to a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub location: Coordinate,
    /// Last-modified time (unix seconds).
    pub updated_at: i64,
}

impl Stop {
    pub fn new(id: u64, lat: f64, lng: f64, updated_at: i64) -> Self {
        Self {
            id: StopId(id),
            location: Coordinate::new(lat, lng),
            updated_at,
        }
    }
}

/// The part of a trip the optimizer needs from the caller.
///
/// Stops and metadata are owned by the [`TripStore`](crate::traits::TripStore).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trip {
    pub id: TripId,
    pub origin: Coordinate,
}

impl Trip {
    pub fn new(id: u64, start_lat: f64, start_lng: f64) -> Self {
        Self {
            id: TripId(id),
            origin: Coordinate::new(start_lat, start_lng),
        }
    }
}

/// Which strategy produced an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Ai,
    Heuristic,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Ai => "ai",
            Method::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A visiting order over every stop of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub order: Vec<StopId>,
    pub method: Method,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_serializes_lowercase() {
        let json = serde_json::to_string(&Method::Heuristic).unwrap();
        assert_eq!(json, "\"heuristic\"");
        let parsed: Method = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(parsed, Method::Ai);
    }

    #[test]
    fn test_result_json_shape() {
        let result = OptimizationResult {
            order: vec![StopId(3), StopId(1)],
            method: Method::Ai,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"order":[3,1],"method":"ai"}"#);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(-6.8, 39.28).validate().is_ok());
        assert!(Coordinate::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).validate().is_err());
        assert!(Coordinate::new(91.0, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -180.5).validate().is_err());
    }
}
