//! Point-count reduction for the finished chain.
//!
//! [`downsample`] keeps every `stride`-th point and always the true terminus.
//! [`simplify`] is an optional Douglas-Peucker pass run before striding.

use geo::algorithm::simplify::Simplify;

use crate::geo_utils::{from_line_string, to_line_string};
use crate::GpsPoint;

/// Default point budget for the published trail.
pub const DEFAULT_TARGET_POINTS: usize = 500;

/// Reduce `points` to roughly `target_points` by uniform striding.
///
/// `stride = max(1, len / target_points)` (integer division). Indices
/// `0, stride, 2 * stride, ...` are kept, then the final point is appended if
/// striding skipped it. A target of 0 is treated as 1. Only the first and last
/// points are guaranteed to survive.
///
/// # Example
/// ```
/// use trail_stitcher::{GpsPoint, downsample};
///
/// let track: Vec<GpsPoint> = (0..10).map(|i| GpsPoint::new(i as f64, 0.0)).collect();
/// let sampled = downsample(&track, 4);
/// // stride 2: indices 0, 2, 4, 6, 8, then the terminus
/// assert_eq!(sampled.len(), 6);
/// assert_eq!(sampled.last(), track.last());
/// ```
pub fn downsample(points: &[GpsPoint], target_points: usize) -> Vec<GpsPoint> {
    if points.is_empty() {
        return Vec::new();
    }

    let stride = (points.len() / target_points.max(1)).max(1);
    let last_idx = points.len() - 1;

    let mut sampled: Vec<GpsPoint> = points.iter().step_by(stride).copied().collect();
    // Compare positions, not values: a loop trail may revisit its terminus.
    if last_idx % stride != 0 {
        sampled.push(points[last_idx]);
    }

    sampled
}

/// Douglas-Peucker simplification with `tolerance` in degrees.
///
/// Keeps the first and last points. Tracks shorter than three points are
/// returned unchanged.
pub fn simplify(points: &[GpsPoint], tolerance: f64) -> Vec<GpsPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let line = to_line_string(points);
    from_line_string(&line.simplify(&tolerance))
}
