//! # Trail Stitcher
//!
//! Rebuilds a long-distance trail from unordered polyline fragments.
//!
//! This library provides:
//! - Web Mercator to WGS84 reprojection
//! - Greedy endpoint stitching of segments into one ordered chain
//! - Point-budget downsampling that always keeps the terminus
//! - ArcGIS web-map input and GeoJSON output
//!
//! ## Features
//!
//! - **`parallel`** - Reproject source paths in parallel with rayon
//! - **`cli`** - Build the `trail-stitcher` command-line binary
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use trail_stitcher::{GpsPoint, Segment, ChainConfig, stitch_segments};
//!
//! let a = Segment::new(vec![GpsPoint::new(0.0, 0.0), GpsPoint::new(1.0, 1.0)]).unwrap();
//! let b = Segment::new(vec![GpsPoint::new(1.0, 1.0), GpsPoint::new(2.0, 2.0)]).unwrap();
//!
//! let config = ChainConfig {
//!     anchor: GpsPoint::new(0.0, 0.0),
//!     ..ChainConfig::default()
//! };
//!
//! let chain = stitch_segments(&[a, b], &config).unwrap();
//! assert_eq!(chain.points.len(), 3);
//! assert_eq!(chain.unused_count(), 0);
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Result, StitchError};

pub mod geo_utils;

// Web Mercator reprojection
pub mod projection;
pub use projection::project;

// Exact-match endpoint lookup
pub mod endpoint_index;
pub use endpoint_index::{EndpointIndex, EndpointKey, EndpointRef, SegmentEnd};

// Segment stitching engine
pub mod chain;
pub use chain::{
    stitch_segments, ChainBuilder, ChainConfig, ChainLink, ChainState, LinkKind, StitchedChain,
    Termination,
};

pub mod downsample;
pub use downsample::{downsample, simplify};

// Input and output collaborators
pub mod source;
pub use source::{read_source, SourceConfig, SourceSegments, SourceSummary};

pub mod export;
pub use export::{to_feature_collection, to_geojson_string};

pub mod pipeline;
pub use pipeline::{build_trail, build_trail_from_segments, ChainReport, TrailBuild, TrailConfig};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude in degrees.
///
/// # Example
/// ```
/// use trail_stitcher::GpsPoint;
/// let springer = GpsPoint::new(34.6295, -84.1927);
/// assert!(springer.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// `[longitude, latitude]`, the GeoJSON coordinate order.
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Bounding box for a trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self { min_lat, max_lat, min_lng, max_lng })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// An ordered, non-empty polyline fragment of the trail.
///
/// Immutable once built. Within a stitching run a segment is identified by
/// its position in the input slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    points: Vec<GpsPoint>,
}

impl Segment {
    /// Create a segment from its points.
    ///
    /// Returns `None` if `points` is empty.
    ///
    /// # Example
    /// ```
    /// use trail_stitcher::{GpsPoint, Segment};
    ///
    /// assert!(Segment::new(vec![]).is_none());
    /// let seg = Segment::new(vec![GpsPoint::new(34.6, -84.2)]).unwrap();
    /// assert_eq!(seg.start(), seg.end());
    /// ```
    pub fn new(points: Vec<GpsPoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self { points })
    }

    /// All points in input order.
    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    /// Number of points (always at least one).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point.
    pub fn start(&self) -> GpsPoint {
        self.points[0]
    }

    /// Last point.
    pub fn end(&self) -> GpsPoint {
        self.points[self.points.len() - 1]
    }

    /// The endpoint on the given side.
    pub fn endpoint(&self, end: SegmentEnd) -> GpsPoint {
        match end {
            SegmentEnd::Start => self.start(),
            SegmentEnd::End => self.end(),
        }
    }

    /// Points in traversal order, reversed when `reversed` is set.
    pub fn oriented(&self, reversed: bool) -> Box<dyn Iterator<Item = GpsPoint> + '_> {
        if reversed {
            Box::new(self.points.iter().rev().copied())
        } else {
            Box::new(self.points.iter().copied())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
