//! Real Dar es Salaam locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Rounded to four decimals, which
//! is ~11m and plenty for ordering deliveries.

use trip_router::Stop;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn stop(&self, id: u64, updated_at: i64) -> Stop {
        Stop::new(id, self.lat, self.lng, updated_at)
    }
}

// ============================================================================
// Dispatch points (good for trip origins)
// ============================================================================

pub const DEPOTS: &[Location] = &[
    Location::new("Posta Mpya", -6.8163, 39.2894),
    Location::new("Ubungo Bus Terminal", -6.7890, 39.2089),
    Location::new("Julius Nyerere International Airport", -6.8781, 39.2026),
];

// ============================================================================
// Delivery drop-offs
// ============================================================================

pub const DROP_OFFS: &[Location] = &[
    Location::new("Kariakoo Market", -6.8190, 39.2734),
    Location::new("Kivukoni Fish Market", -6.8171, 39.2968),
    Location::new("Oyster Bay", -6.7770, 39.2850),
    Location::new("Masaki", -6.7500, 39.2800),
    Location::new("Slipway Msasani", -6.7480, 39.2736),
    Location::new("Mwenge Carvers Market", -6.7668, 39.2306),
    Location::new("Mlimani City", -6.7727, 39.2213),
    Location::new("University of Dar es Salaam", -6.7790, 39.2040),
    Location::new("Kigamboni Ferry", -6.8267, 39.2996),
    Location::new("Mbagala Rangi Tatu", -6.8870, 39.2640),
];

/// Stops for the first `count` drop-offs, numbered from 101.
pub fn drop_off_stops(count: usize) -> Vec<Stop> {
    DROP_OFFS
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, location)| location.stop(101 + index as u64, 1_760_000_000))
        .collect()
}
