// Geodesy primitives shared by the projector and the metrics calculator
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
pub const FEET_TO_METERS: f64 = 0.3048;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_heading(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Haversine direct (forward) geodesic: the point reached after travelling
/// `distance_meters` from `origin` along `bearing_degrees`.
pub fn destination_point(origin: GeoPoint, bearing_degrees: f64, distance_meters: f64) -> GeoPoint {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let bearing = bearing_degrees.to_radians();
    let angular_distance = distance_meters / EARTH_RADIUS_METERS;

    let lat2 = (lat1.sin() * angular_distance.cos()
        + lat1.cos() * angular_distance.sin() * bearing.cos())
    .asin();

    let lon2 = lon1
        + (bearing.sin() * angular_distance.sin() * lat1.cos())
            .atan2(angular_distance.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Initial bearing (forward azimuth) of the great circle from `from` to `to`,
/// in degrees [0, 360).
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_heading(y.atan2(x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(-10.0), 350.0);
        assert_eq!(normalize_heading(725.0), 5.0);
    }

    #[test]
    fn test_destination_point_zero_distance() {
        let origin = GeoPoint::new(35.123, 139.456);
        let dest = destination_point(origin, 45.0, 0.0);
        assert!((dest.latitude - origin.latitude).abs() < 1e-12);
        assert!((dest.longitude - origin.longitude).abs() < 1e-12);
    }

    #[test]
    fn test_destination_point_north() {
        // 111.19 km due north is roughly one degree of latitude
        let origin = GeoPoint::new(0.0, 0.0);
        let dest = destination_point(origin, 0.0, 111_195.0);
        assert!((dest.latitude - 1.0).abs() < 1e-3);
        assert!(dest.longitude.abs() < 1e-9);
    }

    #[test]
    fn test_bearing_round_trip() {
        let origin = GeoPoint::new(35.0, 139.0);
        let dest = destination_point(origin, 123.0, 500.0);
        assert!((initial_bearing(origin, dest) - 123.0).abs() < 0.1);
    }

    #[test]
    fn test_initial_bearing_due_east() {
        let from = GeoPoint::new(0.0, 0.0);
        let to = GeoPoint::new(0.0, 1.0);
        assert!((initial_bearing(from, to) - 90.0).abs() < 1e-9);
    }
}
