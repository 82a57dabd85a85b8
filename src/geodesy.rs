//! Local ellipsoidal distance approximation
//!
//! Degree lengths are evaluated at the first point's latitude using the
//! series approximations below. The coefficients are fixed so results are
//! reproducible bit for bit across runs and platforms.

use crate::types::GeoPoint;

/// Meters per degree of latitude at `lat_rad`
pub fn meters_per_degree_latitude(lat_rad: f64) -> f64 {
    111132.92 + 1.175 * (4.0 * lat_rad).cos() - 559.82 * (2.0 * lat_rad).cos()
}

/// Meters per degree of longitude at `lat_rad`
pub fn meters_per_degree_longitude(lat_rad: f64) -> f64 {
    111412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos()
}

/// Distance in meters from `a` to `b`.
///
/// The vertical component is `b`'s altitude minus `held_altitude` when both
/// are known, otherwise zero. Both points must carry real coordinates.
pub fn estimate_distance(a: &GeoPoint, b: &GeoPoint, held_altitude: Option<f64>) -> f64 {
    let lat_rad = a.latitude.to_radians();

    let dx = (b.longitude - a.longitude) * meters_per_degree_longitude(lat_rad);
    let dy = (b.latitude - a.latitude) * meters_per_degree_latitude(lat_rad);
    let dz = match (b.altitude, held_altitude) {
        (Some(alt), Some(held)) => alt - held,
        _ => 0.0,
    };

    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = GeoPoint::new(45.0, 7.0);
        assert_eq!(estimate_distance(&p, &p, None), 0.0);
    }

    #[test]
    fn test_degree_lengths_at_equator() {
        assert!((meters_per_degree_latitude(0.0) - 110574.275).abs() < 1e-6);
        assert!((meters_per_degree_longitude(0.0) - 111319.34).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_north_at_equator() {
        let a = GeoPoint::new(0.0, 10.0);
        let b = GeoPoint::new(1.0, 10.0);
        let d = estimate_distance(&a, &b, None);
        assert!((d - 110574.275).abs() < 1e-6, "got {}", d);
    }

    #[test]
    fn test_vertical_component_uses_held_altitude() {
        let a = GeoPoint::with_altitude(45.0, 7.0, 100.0);
        let b = GeoPoint::with_altitude(45.0, 7.0, 130.0);
        assert_eq!(estimate_distance(&a, &b, Some(90.0)), 40.0);
        assert_eq!(estimate_distance(&a, &b, None), 0.0);

        let flat = GeoPoint::new(45.0, 7.0);
        assert_eq!(estimate_distance(&a, &flat, Some(90.0)), 0.0);
    }

    #[test]
    fn test_three_dimensional_norm() {
        let a = GeoPoint::new(0.0, 0.001);
        let b = GeoPoint::with_altitude(0.0, 0.002, 10.0);
        let dx = 0.001 * meters_per_degree_longitude(0.0);
        let expected = (dx * dx + 10.0 * 10.0).sqrt();
        assert_eq!(estimate_distance(&a, &b, Some(0.0)), expected);
    }

    #[test]
    fn test_direction_changes_reference_latitude() {
        let a = GeoPoint::new(60.0, 10.0);
        let b = GeoPoint::new(60.0, 11.0);
        let c = GeoPoint::new(61.0, 11.0);
        // Pure east-west legs are symmetric; north-south legs are not, since
        // the degree length is taken at the starting latitude.
        assert_eq!(estimate_distance(&a, &b, None), estimate_distance(&b, &a, None));
        assert_ne!(estimate_distance(&b, &c, None), estimate_distance(&c, &b, None));
    }
}
