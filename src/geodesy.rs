//! Geodesic distance and compass bearing between GPS coordinates.
//!
//! Distances use the `geo` crate's geodesic solver on the WGS84 ellipsoid
//! (Karney's algorithm, sub-meter accurate — the same class of solution as
//! Vincenty's formulae). Bearings use the great-circle forward-azimuth
//! formula, normalized into compass convention (0° = due north, clockwise).
//!
//! Both primitives come in a scalar form and a vectorized form over
//! equal-length slices of points.

use geo::{Distance, Geodesic, Point};

use crate::error::{Result, TrackError};
use crate::GeoPoint;

/// Geodesic distance between two points, in kilometers.
///
/// Satisfies `distance_km(p, p) == 0.0` and is symmetric up to solver
/// round-off.
///
/// # Example
/// ```
/// use track_metrics::{geodesy::distance_km, GeoPoint};
///
/// let grenoble = GeoPoint::new(45.1885, 5.7245);
/// let lyon = GeoPoint::new(45.7640, 4.8357);
/// let d = distance_km(grenoble, lyon);
/// assert!(d > 90.0 && d < 100.0);
/// ```
pub fn distance_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
    if p1 == p2 {
        return 0.0;
    }
    let a = Point::new(p1.longitude, p1.latitude);
    let b = Point::new(p2.longitude, p2.latitude);
    Geodesic::distance(a, b) / 1000.0
}

/// Compass bearing of the path from `p1` to `p2`, in decimal degrees [0, 360).
///
/// Uses the forward-azimuth formula
/// `θ = atan2(sin Δλ · cos φ₂, cos φ₁ · sin φ₂ − sin φ₁ · cos φ₂ · cos Δλ)`
/// with the result shifted from atan2's (−180°, 180°] range into compass
/// range. The bearing of a point to itself is direction-free; the formula
/// yields 0° rather than failing.
///
/// # Example
/// ```
/// use track_metrics::{geodesy::bearing, GeoPoint};
///
/// assert_eq!(bearing(GeoPoint::new(0.0, 0.0), GeoPoint::new(45.0, 0.0)), 0.0);
/// assert_eq!(bearing(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 30.0)), 90.0);
/// ```
pub fn bearing(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let d_long = (p2.longitude - p1.longitude).to_radians();

    let x = d_long.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_long.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Elementwise [`distance_km`] over two equal-length slices of points.
///
/// Returns `InvalidInput` if the slices differ in length.
pub fn distance_km_many(pts1: &[GeoPoint], pts2: &[GeoPoint]) -> Result<Vec<f64>> {
    check_same_length(pts1, pts2)?;
    Ok(pts1
        .iter()
        .zip(pts2)
        .map(|(&a, &b)| distance_km(a, b))
        .collect())
}

/// Elementwise [`bearing`] over two equal-length slices of points.
///
/// Returns `InvalidInput` if the slices differ in length.
pub fn bearing_many(pts1: &[GeoPoint], pts2: &[GeoPoint]) -> Result<Vec<f64>> {
    check_same_length(pts1, pts2)?;
    Ok(pts1
        .iter()
        .zip(pts2)
        .map(|(&a, &b)| bearing(a, b))
        .collect())
}

fn check_same_length(pts1: &[GeoPoint], pts2: &[GeoPoint]) -> Result<()> {
    if pts1.len() != pts2.len() {
        return Err(TrackError::invalid(format!(
            "point slices differ in length ({} vs {})",
            pts1.len(),
            pts2.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_identical_points_is_zero() {
        let p = GeoPoint::new(45.0133, 5.888);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_near_symmetry() {
        let a = GeoPoint::new(45.011, 5.883);
        let b = GeoPoint::new(45.017, 5.895);
        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        assert!(ab > 0.0);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_distance_known_scale() {
        // One degree of latitude on the WGS84 ellipsoid near 45°N is ~111.1 km.
        let a = GeoPoint::new(45.0, 5.0);
        let b = GeoPoint::new(46.0, 5.0);
        let d = distance_km(a, b);
        assert!((d - 111.1).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        assert_eq!(bearing(GeoPoint::new(0.0, 0.0), GeoPoint::new(45.0, 0.0)), 0.0);
        assert_eq!(bearing(GeoPoint::new(45.0, 0.0), GeoPoint::new(0.0, 0.0)), 180.0);
        assert_eq!(bearing(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 30.0)), 90.0);
        assert_eq!(bearing(GeoPoint::new(0.0, 30.0), GeoPoint::new(0.0, -30.0)), 270.0);
    }

    #[test]
    fn test_bearing_identical_points_does_not_fail() {
        let p = GeoPoint::new(51.5074, -0.1278);
        assert_eq!(bearing(p, p), 0.0);
    }

    #[test]
    fn test_bearing_range() {
        let pts = [
            GeoPoint::new(45.0, 5.0),
            GeoPoint::new(45.1, 5.2),
            GeoPoint::new(44.9, 4.8),
            GeoPoint::new(45.0, 5.0),
        ];
        for w in pts.windows(2) {
            let b = bearing(w[0], w[1]);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
    }

    #[test]
    fn test_vectorized_matches_scalar() {
        let pts1 = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(45.0, 0.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 30.0),
        ];
        let pts2 = vec![
            GeoPoint::new(45.0, 0.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 30.0),
            GeoPoint::new(0.0, -30.0),
        ];
        let bearings = bearing_many(&pts1, &pts2).unwrap();
        assert_eq!(bearings, vec![0.0, 180.0, 90.0, 270.0]);

        let distances = distance_km_many(&pts1, &pts2).unwrap();
        for (i, d) in distances.iter().enumerate() {
            assert_eq!(*d, distance_km(pts1[i], pts2[i]));
        }
    }

    #[test]
    fn test_vectorized_length_mismatch() {
        let pts1 = vec![GeoPoint::new(0.0, 0.0)];
        let pts2 = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)];
        assert!(matches!(
            bearing_many(&pts1, &pts2),
            Err(TrackError::InvalidInput { .. })
        ));
        assert!(matches!(
            distance_km_many(&pts1, &pts2),
            Err(TrackError::InvalidInput { .. })
        ));
    }
}
