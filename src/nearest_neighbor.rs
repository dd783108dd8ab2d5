//! Nearest-neighbor ordering heuristic.
//!
//! Starting from the trip origin, always visit the closest remaining stop.
//! Equidistant candidates resolve to the lowest stop id so the order is
//! reproducible regardless of input order.
//!
//! O(n²) distance evaluations; trips carry a handful of stops.

use crate::haversine;
use crate::model::{Coordinate, Stop, StopId};

/// Order every stop exactly once by greedy nearest-neighbor.
///
/// An empty stop set yields an empty order.
pub fn order(origin: Coordinate, stops: &[Stop]) -> Vec<StopId> {
    let mut remaining: Vec<&Stop> = stops.iter().collect();
    let mut ordered = Vec::with_capacity(stops.len());
    let mut current = origin;

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_distance = haversine::between(current, remaining[0].location);

        for (index, stop) in remaining.iter().enumerate().skip(1) {
            let distance = haversine::between(current, stop.location);
            let closer = distance < best_distance;
            let tie_with_lower_id =
                distance == best_distance && stop.id < remaining[best_index].id;
            if closer || tie_with_lower_id {
                best_index = index;
                best_distance = distance;
            }
        }

        let next = remaining.swap_remove(best_index);
        ordered.push(next.id);
        current = next.location;
    }

    ordered
}
