//! # Web Mercator Reprojection
//!
//! Converts projected Web Mercator coordinates (EPSG:3857, meters) into WGS84
//! longitude/latitude in degrees.
//!
//! Longitude scales linearly with easting. Latitude goes through the inverse
//! Gudermannian function (`atan`/`exp`). Outputs are rounded to
//! [`OUTPUT_DECIMALS`] places to bound output size; the rounding is lossy and
//! one-way.
//!
//! ```rust
//! use trail_stitcher::projection;
//!
//! let p = projection::project(0.0, 0.0);
//! assert_eq!(p.longitude, 0.0);
//! assert_eq!(p.latitude, 0.0);
//! ```

use std::f64::consts::PI;

use crate::{GpsPoint, Segment};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Half the Web Mercator world width in meters.
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;

/// Decimal places kept on reprojected coordinates (~0.1 m).
pub const OUTPUT_DECIMALS: i32 = 6;

/// Project a Web Mercator `(x, y)` pair to a geographic point.
///
/// Pure and deterministic. Non-finite input is not guarded and produces
/// non-finite or NaN output.
#[inline]
pub fn project(x: f64, y: f64) -> GpsPoint {
    let lon = (x / EARTH_MERCATOR_MAX) * 180.0;
    let lat = (y / EARTH_MERCATOR_MAX) * 180.0;
    let lat = (180.0 / PI) * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);

    GpsPoint::new(
        round_to(lat, OUTPUT_DECIMALS),
        round_to(lon, OUTPUT_DECIMALS),
    )
}

/// Forward spherical Mercator: geographic degrees to projected meters.
///
/// Inverse of [`project`] up to its output rounding. Latitude is not clamped.
#[inline]
pub fn mercator_from_lon_lat(longitude: f64, latitude: f64) -> (f64, f64) {
    let x = longitude * EARTH_MERCATOR_MAX / 180.0;
    let y = ((90.0 + latitude) * PI / 360.0).tan().ln() / (PI / 180.0);
    (x, y * EARTH_MERCATOR_MAX / 180.0)
}

/// Round `value` to `decimals` decimal places (half away from zero).
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Reproject one raw path of `[x, y]` pairs into a segment.
///
/// Returns `None` for an empty path.
pub fn project_segment(path: &[[f64; 2]]) -> Option<Segment> {
    Segment::new(path.iter().map(|&[x, y]| project(x, y)).collect())
}

/// Reproject every raw path, dropping empty ones. Path order is preserved.
pub fn project_paths(paths: &[Vec<[f64; 2]>]) -> Vec<Segment> {
    paths.iter().filter_map(|path| project_segment(path)).collect()
}

/// Parallel variant of [`project_paths`]. Output order matches input order.
#[cfg(feature = "parallel")]
pub fn project_paths_parallel(paths: &[Vec<[f64; 2]>]) -> Vec<Segment> {
    paths
        .par_iter()
        .filter_map(|path| project_segment(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_origin_projects_to_origin() {
        let p = project(0.0, 0.0);
        assert_eq!(p.longitude, 0.0);
        assert_eq!(p.latitude, 0.0);
    }

    #[test]
    fn test_world_edge_is_antimeridian() {
        let p = project(EARTH_MERCATOR_MAX, 0.0);
        assert_eq!(p.longitude, 180.0);
        let p = project(-EARTH_MERCATOR_MAX, 0.0);
        assert_eq!(p.longitude, -180.0);
    }

    #[test]
    fn test_known_point_springer_mountain() {
        // Springer Mountain, GA in EPSG:3857
        let p = project(-9372288.49, 4113644.97);
        assert!(approx_eq(p.longitude, -84.1927, 0.001));
        assert!(approx_eq(p.latitude, 34.6295, 0.001));
    }

    #[test]
    fn test_output_has_six_decimals() {
        let p = project(1234567.891, 7654321.123);
        assert_eq!(p.longitude, round_to(p.longitude, OUTPUT_DECIMALS));
        assert_eq!(p.latitude, round_to(p.latitude, OUTPUT_DECIMALS));
    }

    #[test]
    fn test_project_is_deterministic() {
        let a = project(-8_000_000.5, 5_000_000.25);
        let b = project(-8_000_000.5, 5_000_000.25);
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_trip_within_rounding_error() {
        // 1e-6 degrees is at most ~0.11 m of easting; northing grows with
        // 1/cos(lat) so stay below 60 degrees.
        for &(x, y) in &[
            (-9372288.49, 4113644.97),
            (-7596000.0, 5720000.0),
            (1000.0, -2500000.0),
            (0.0, 0.0),
        ] {
            let p = project(x, y);
            let (rx, ry) = mercator_from_lon_lat(p.longitude, p.latitude);
            assert!(approx_eq(rx, x, 0.2), "x: {} vs {}", rx, x);
            assert!(approx_eq(ry, y, 0.3), "y: {} vs {}", ry, y);
        }
    }

    #[test]
    fn test_nan_is_not_guarded() {
        let p = project(f64::NAN, 0.0);
        assert!(p.longitude.is_nan());
    }

    #[test]
    fn test_project_segment_empty_path() {
        assert!(project_segment(&[]).is_none());
    }

    #[test]
    fn test_project_paths_skips_empty_and_keeps_order() {
        let paths = vec![
            vec![[0.0, 0.0], [EARTH_MERCATOR_MAX / 2.0, 0.0]],
            vec![],
            vec![[EARTH_MERCATOR_MAX, 0.0]],
        ];
        let segments = project_paths(&paths);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].end().longitude, 90.0);
        assert_eq!(segments[1].start().longitude, 180.0);
    }
}
