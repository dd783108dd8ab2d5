//! Great-circle distance between coordinates.
//!
//! Straight-line distance ignores roads, but it is always available and
//! good enough to rank nearby delivery stops.

use crate::model::{Coordinate, Stop};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// NaN or out-of-range input yields an unspecified result; callers validate
/// coordinates first.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Distance between two coordinates in kilometers.
pub fn between(from: Coordinate, to: Coordinate) -> f64 {
    distance_km(from.lat, from.lng, to.lat, to.lng)
}

/// Total length of a route that starts at `origin` and visits `stops` in order.
pub fn route_length_km<'a>(origin: Coordinate, stops: impl IntoIterator<Item = &'a Stop>) -> f64 {
    let mut current = origin;
    let mut total = 0.0;
    for stop in stops {
        total += between(current, stop.location);
        current = stop.location;
    }
    total
}
