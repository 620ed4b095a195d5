//! Exact-match endpoint lookup.
//!
//! Every segment endpoint is bucketed under an [`EndpointKey`]: its longitude
//! and latitude rounded to [`KEY_DECIMALS`] places (~11 m) and joined with a
//! comma. Endpoints sharing a key are treated as coincident.
//!
//! The index is built once from the full segment set and never updated.
//! Entries for segments that have since been consumed stay in place; callers
//! skip them at query time.

use std::collections::HashMap;
use std::fmt;

use crate::{GpsPoint, Segment};

/// Decimal places used when bucketing endpoints.
pub const KEY_DECIMALS: usize = 4;

/// Which end of a segment an index entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentEnd {
    Start,
    End,
}

/// Rounded-coordinate bucket, e.g. `"-84.1927,34.6295"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey(String);

impl EndpointKey {
    /// Key for a point: `"{lon:.4},{lat:.4}"`.
    ///
    /// Negative zero keys as `0.0000`, so points either side of the prime
    /// meridian or equator that round to zero share a bucket.
    pub fn from_point(point: &GpsPoint) -> Self {
        // -0.0 + 0.0 == +0.0
        Self(format!(
            "{:.prec$},{:.prec$}",
            point.longitude + 0.0,
            point.latitude + 0.0,
            prec = KEY_DECIMALS
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One indexed endpoint: a segment index and the end it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointRef {
    pub segment: usize,
    pub end: SegmentEnd,
}

/// Map from [`EndpointKey`] to the endpoints that round to it.
///
/// Candidates under a key are kept in insertion order: ascending segment
/// index, `Start` before `End` within a segment. Chain extension relies on
/// this order for its first-match-wins rule.
#[derive(Debug, Clone, Default)]
pub struct EndpointIndex {
    buckets: HashMap<EndpointKey, Vec<EndpointRef>>,
}

impl EndpointIndex {
    /// Index both endpoints of every segment. O(N).
    pub fn build(segments: &[Segment]) -> Self {
        let mut buckets: HashMap<EndpointKey, Vec<EndpointRef>> =
            HashMap::with_capacity(segments.len() * 2);

        for (idx, seg) in segments.iter().enumerate() {
            for end in [SegmentEnd::Start, SegmentEnd::End] {
                buckets
                    .entry(EndpointKey::from_point(&seg.endpoint(end)))
                    .or_default()
                    .push(EndpointRef { segment: idx, end });
            }
        }

        Self { buckets }
    }

    /// All endpoints under `key`, possibly empty. Includes used segments.
    pub fn candidates(&self, key: &EndpointKey) -> &[EndpointRef] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(points: &[(f64, f64)]) -> Segment {
        Segment::new(
            points
                .iter()
                .map(|&(lon, lat)| GpsPoint::new(lat, lon))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_key_format() {
        let key = EndpointKey::from_point(&GpsPoint::new(34.62951, -84.19274));
        assert_eq!(key.as_str(), "-84.1927,34.6295");
        assert_eq!(key.to_string(), "-84.1927,34.6295");
    }

    #[test]
    fn test_nearby_points_share_key() {
        let a = EndpointKey::from_point(&GpsPoint::new(1.00001, 1.00002));
        let b = EndpointKey::from_point(&GpsPoint::new(1.00003, 0.99998));
        assert_eq!(a, b);

        let c = EndpointKey::from_point(&GpsPoint::new(1.05, 1.05));
        assert_ne!(a, c);
    }

    #[test]
    fn test_negative_zero_keys_as_zero() {
        let key = EndpointKey::from_point(&GpsPoint::new(-0.0, -0.0));
        assert_eq!(key.as_str(), "0.0000,0.0000");

        // Tiny westward easting reprojects to -0.0 longitude
        let west = crate::projection::project(-0.01, 0.0);
        let east = crate::projection::project(0.01, 0.0);
        assert_eq!(EndpointKey::from_point(&west), EndpointKey::from_point(&east));
    }

    #[test]
    fn test_build_indexes_both_ends() {
        let segments = vec![seg(&[(0.0, 0.0), (1.0, 1.0)]), seg(&[(1.0, 1.0), (2.0, 2.0)])];
        let index = EndpointIndex::build(&segments);

        assert_eq!(index.len(), 3);
        let shared = index.candidates(&EndpointKey::from_point(&GpsPoint::new(1.0, 1.0)));
        assert_eq!(
            shared,
            &[
                EndpointRef { segment: 0, end: SegmentEnd::End },
                EndpointRef { segment: 1, end: SegmentEnd::Start },
            ]
        );
    }

    #[test]
    fn test_single_point_segment_indexes_start_then_end() {
        let segments = vec![seg(&[(5.0, 5.0)])];
        let index = EndpointIndex::build(&segments);

        let refs = index.candidates(&EndpointKey::from_point(&GpsPoint::new(5.0, 5.0)));
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].end, SegmentEnd::Start);
        assert_eq!(refs[1].end, SegmentEnd::End);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let index = EndpointIndex::build(&[seg(&[(0.0, 0.0), (1.0, 1.0)])]);
        assert!(index
            .candidates(&EndpointKey::from_point(&GpsPoint::new(9.0, 9.0)))
            .is_empty());
        assert!(EndpointIndex::default().is_empty());
    }
}
