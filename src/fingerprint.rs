//! Content fingerprint of a trip's stop set.
//!
//! Hashes id, latitude, longitude and last-modified time of every stop.
//! Stops are sorted by id first so the digest does not depend on the order
//! the store returned them in.

use crate::model::Stop;

const FIELD_SEPARATOR: char = ',';
const STOP_SEPARATOR: char = '|';

/// Hex-encoded blake3 digest over the stop set.
pub fn fingerprint(stops: &[Stop]) -> String {
    let mut sorted: Vec<&Stop> = stops.iter().collect();
    sorted.sort_by_key(|stop| stop.id);

    let mut hasher = blake3::Hasher::new();
    for (index, stop) in sorted.iter().enumerate() {
        if index > 0 {
            hasher.update(&[STOP_SEPARATOR as u8]);
        }
        let entry = format!(
            "{}{sep}{}{sep}{}{sep}{}",
            stop.id,
            // -0.0 + 0.0 is 0.0, so the sign of zero never changes the digest.
            stop.location.lat + 0.0,
            stop.location.lng + 0.0,
            stop.updated_at,
            sep = FIELD_SEPARATOR
        );
        hasher.update(entry.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<Stop> {
        vec![
            Stop::new(1, -6.8161, 39.2894, 1_700_000_000),
            Stop::new(2, -6.7924, 39.2083, 1_700_000_100),
            Stop::new(3, -6.7730, 39.2400, 1_700_000_200),
        ]
    }

    #[test]
    fn test_stable() {
        assert_eq!(fingerprint(&stops()), fingerprint(&stops()));
        assert_eq!(fingerprint(&stops()).len(), 64);
    }

    #[test]
    fn test_order_independent() {
        let mut reversed = stops();
        reversed.reverse();
        assert_eq!(fingerprint(&stops()), fingerprint(&reversed));
    }

    #[test]
    fn test_sensitive_to_each_field() {
        let base = fingerprint(&stops());

        let mut moved_lat = stops();
        moved_lat[1].location.lat += 0.0001;
        assert_ne!(fingerprint(&moved_lat), base);

        let mut moved_lng = stops();
        moved_lng[2].location.lng -= 0.0001;
        assert_ne!(fingerprint(&moved_lng), base);

        let mut touched = stops();
        touched[0].updated_at += 1;
        assert_ne!(fingerprint(&touched), base);
    }

    #[test]
    fn test_sensitive_to_ids() {
        let mut renumbered = stops();
        renumbered[2].id = crate::model::StopId(30);
        assert_ne!(fingerprint(&renumbered), fingerprint(&stops()));
    }

    #[test]
    fn test_signed_zero_is_ignored() {
        let positive = vec![Stop::new(1, 0.0, 0.0, 5)];
        let negative = vec![Stop::new(1, -0.0, -0.0, 5)];
        assert_eq!(fingerprint(&positive), fingerprint(&negative));
    }

    #[test]
    fn test_membership_changes_digest() {
        let mut fewer = stops();
        fewer.pop();
        assert_ne!(fingerprint(&fewer), fingerprint(&stops()));
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(fingerprint(&[]), blake3::hash(b"").to_hex().to_string());
    }
}
