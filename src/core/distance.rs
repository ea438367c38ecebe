use crate::models::Coordinates;
use geo::{HaversineDistance, Point};

/// Meters in one statute mile
const METERS_PER_MILE: f64 = 1609.344;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `from` - First point, `lat`/`lng` in degrees
/// * `to` - Second point, `lat`/`lng` in degrees
///
/// # Returns
/// Great-circle distance in miles
#[inline]
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let from = Point::new(from.lng, from.lat);
    let to = Point::new(to.lng, to.lat);

    from.haversine_distance(&to) / METERS_PER_MILE
}

/// Distance in miles between two optional points.
///
/// Returns `None` when either side is unknown. An unknown distance is never
/// reported as zero miles.
#[inline]
pub fn distance(from: Option<Coordinates>, to: Option<Coordinates>) -> Option<f64> {
    match (from, to) {
        (Some(from), Some(to)) => Some(haversine_miles(from, to)),
        _ => None,
    }
}

/// Check whether `point` lies within `radius_miles` of `origin`
///
/// Unknown points are never within any radius.
#[inline]
pub fn is_within_radius(origin: Coordinates, point: Option<Coordinates>, radius_miles: f64) -> bool {
    distance(Some(origin), point).is_some_and(|d| d <= radius_miles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Providence to Boston (approximately 41 miles)
        let providence = Coordinates::new(41.8240, -71.4128);
        let boston = Coordinates::new(42.3601, -71.0589);

        let miles = haversine_miles(providence, boston);
        assert!((miles - 41.0).abs() < 2.0, "Distance should be ~41mi, got {}", miles);
    }

    #[test]
    fn test_distance_unknown_is_none() {
        let point = Coordinates::new(41.8, -71.4);

        assert_eq!(distance(Some(point), None), None);
        assert_eq!(distance(None, Some(point)), None);
        assert_eq!(distance(None, None), None);
    }

    #[test]
    fn test_distance_symmetric_and_zero_on_identity() {
        let a = Coordinates::new(41.8, -71.4);
        let b = Coordinates::new(40.7128, -74.0060);

        assert_eq!(distance(Some(a), Some(a)), Some(0.0));
        assert!((haversine_miles(a, b) - haversine_miles(b, a)).abs() < 1e-9);
        assert!(haversine_miles(a, b) > 0.0);
    }

    #[test]
    fn test_point_within_radius() {
        let origin = Coordinates::new(41.8, -71.4);

        assert!(is_within_radius(origin, Some(origin), 0.0));
        assert!(is_within_radius(origin, Some(Coordinates::new(41.81, -71.41)), 5.0));
        assert!(!is_within_radius(origin, Some(Coordinates::new(42.3601, -71.0589)), 25.0));
        assert!(!is_within_radius(origin, None, 9999.0));
    }
}
