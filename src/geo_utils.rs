//! # Geographic Utilities
//!
//! Distance and conversion helpers shared by the stitching and reporting code.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`planar_distance`] | Euclidean distance in degree space (used for matching) |
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`polyline_length`] | Total length of a track in meters |
//! | [`to_line_string`] | Convert points into a `geo::LineString` |
//!
//! ## Algorithm Notes
//!
//! Endpoint matching uses [`planar_distance`] on raw longitude/latitude. It is
//! an approximation: a degree of longitude shrinks with latitude, so the same
//! tolerance is tighter east-west than north-south away from the equator.
//! Matching thresholds are expressed in these units, so swapping in a
//! geodesic metric changes their meaning.
//!
//! Reporting uses [`haversine_distance`] so lengths come out in meters.

use geo::{Coord, Distance, Haversine, LineString, Point};

use crate::GpsPoint;

// =============================================================================
// Distance Functions
// =============================================================================

/// Planar Euclidean distance between two points, in degrees.
///
/// # Example
///
/// ```rust
/// use trail_stitcher::{GpsPoint, geo_utils};
///
/// let a = GpsPoint::new(1.0, 1.0);
/// let b = GpsPoint::new(1.05, 1.05);
/// assert!((geo_utils::planar_distance(&a, &b) - 0.0707).abs() < 1e-4);
/// ```
#[inline]
pub fn planar_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let dlng = p1.longitude - p2.longitude;
    let dlat = p1.latitude - p2.latitude;
    (dlng * dlng + dlat * dlat).sqrt()
}

/// Great-circle distance between two GPS points using the Haversine formula.
///
/// Returns meters, assuming a spherical Earth.
///
/// # Example
///
/// ```rust
/// use trail_stitcher::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Total length of a polyline in meters.
///
/// Empty or single-point tracks return 0.0.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Conversions
// =============================================================================

/// Convert points into a `geo::LineString` with `x = longitude`, `y = latitude`.
pub fn to_line_string(points: &[GpsPoint]) -> LineString<f64> {
    points
        .iter()
        .map(|p| Coord { x: p.longitude, y: p.latitude })
        .collect()
}

/// Inverse of [`to_line_string`].
pub fn from_line_string(line: &LineString<f64>) -> Vec<GpsPoint> {
    line.coords().map(|c| GpsPoint::new(c.y, c.x)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_planar_distance() {
        let a = GpsPoint::new(0.0, 0.0);
        let b = GpsPoint::new(4.0, 3.0);
        assert_eq!(planar_distance(&a, &b), 5.0);
        assert_eq!(planar_distance(&b, &a), 5.0);
        assert_eq!(planar_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_planar_distance_nan() {
        let a = GpsPoint::new(f64::NAN, 0.0);
        let b = GpsPoint::new(0.0, 0.0);
        assert!(planar_distance(&a, &b).is_nan());
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GpsPoint::new(34.6295, -84.1927);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_polyline_length_empty() {
        let empty: Vec<GpsPoint> = vec![];
        assert_eq!(polyline_length(&empty), 0.0);
        assert_eq!(polyline_length(&[GpsPoint::new(34.6, -84.2)]), 0.0);
    }

    #[test]
    fn test_polyline_length_one_degree_latitude() {
        let track = vec![GpsPoint::new(34.0, -84.0), GpsPoint::new(35.0, -84.0)];
        // One degree of latitude is ~111 km
        assert!(approx_eq(polyline_length(&track), 111_195.0, 500.0));
    }

    #[test]
    fn test_line_string_conversion() {
        let track = vec![GpsPoint::new(34.6, -84.2), GpsPoint::new(34.7, -84.1)];
        let line = to_line_string(&track);
        assert_eq!(line.0[0], Coord { x: -84.2, y: 34.6 });
        assert_eq!(from_line_string(&line), track);
    }
}
