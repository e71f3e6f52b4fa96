//! Great-circle distance computation for provider matching

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Distance between two points in kilometers (haversine formula)
///
/// Inputs are validated upstream as finite numbers; identical points
/// return 0.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: GeoPoint = GeoPoint {
        latitude: 48.8566,
        longitude: 2.3522,
    };

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(distance_km(PARIS, PARIS), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let london = GeoPoint::new(51.5074, -0.1278);
        assert_eq!(distance_km(PARIS, london), distance_km(london, PARIS));
    }

    #[test]
    fn test_known_distance_paris_london() {
        let london = GeoPoint::new(51.5074, -0.1278);
        let d = distance_km(PARIS, london);
        // Great-circle distance Paris <-> London is roughly 344 km
        assert!((d - 344.0).abs() < 2.0, "got {}", d);
    }

    #[test]
    fn test_due_north_displacement() {
        // Moving 10/R radians of latitude due north is 10 km along the
        // great circle, up to floating-point error.
        let north = GeoPoint::new(
            PARIS.latitude + (10.0_f64 / EARTH_RADIUS_KM).to_degrees(),
            PARIS.longitude,
        );
        let d = distance_km(PARIS, north);
        assert!((d - 10.0).abs() < 1e-6, "got {}", d);
    }

    #[test]
    fn test_antipodal_points() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = distance_km(a, b);
        // Half the Earth's circumference
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-3);
    }
}
