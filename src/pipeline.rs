//! End-to-end trail build: source → reproject → stitch → simplify → downsample.

use log::{info, warn};
use serde::Deserialize;

use crate::chain::{stitch_segments, ChainConfig, Termination};
use crate::downsample::{downsample, simplify, DEFAULT_TARGET_POINTS};
use crate::export::DEFAULT_TRAIL_NAME;
use crate::geo_utils::polyline_length;
use crate::projection::project_paths;
use crate::source::{read_source, SourceConfig, SourceSummary};
use crate::{Bounds, GpsPoint, Result, Segment};

/// Configuration for a full trail build.
///
/// Every field has a default, so a partial JSON config file is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Name written to the output feature. Default: "Appalachian Trail"
    pub name: String,

    /// Anchor and matching tolerance.
    #[serde(flatten)]
    pub chain: ChainConfig,

    /// Point budget for the output. Default: 500
    pub target_points: usize,

    /// Douglas-Peucker tolerance in degrees applied before downsampling.
    /// Default: None (stride sampling only)
    pub simplification_tolerance: Option<f64>,

    /// Reproject source paths with rayon when the `parallel` feature is on.
    /// Default: true
    pub parallel: bool,

    pub source: SourceConfig,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TRAIL_NAME.to_string(),
            chain: ChainConfig::default(),
            target_points: DEFAULT_TARGET_POINTS,
            simplification_tolerance: None,
            parallel: true,
            source: SourceConfig::default(),
        }
    }
}

/// Diagnostics for the stitching stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainReport {
    pub total_segments: usize,
    pub used_segments: usize,
    /// Segments never reached; nonzero means the trail is partial.
    pub unused_segments: usize,
    pub termination: Termination,
    /// Points in the full chain, before any reduction.
    pub chain_points: usize,
    /// Haversine length of the full chain in meters.
    pub length_meters: f64,
    pub bounds: Option<Bounds>,
    /// Input points that are non-finite or outside WGS84 ranges.
    pub invalid_points: usize,
}

/// Result of a trail build.
#[derive(Debug, Clone)]
pub struct TrailBuild {
    /// Output points, reduced to the configured budget.
    pub points: Vec<GpsPoint>,
    pub chain: ChainReport,
    /// Present when built from a source document.
    pub source: Option<SourceSummary>,
}

/// Build a trail from a web-map JSON document.
pub fn build_trail(document: &str, config: &TrailConfig) -> Result<TrailBuild> {
    let source = read_source(document, &config.source)?;

    #[cfg(feature = "parallel")]
    let segments = if config.parallel {
        crate::projection::project_paths_parallel(&source.paths)
    } else {
        project_paths(&source.paths)
    };
    #[cfg(not(feature = "parallel"))]
    let segments = project_paths(&source.paths);

    let mut build = build_trail_from_segments(&segments, config)?;
    build.source = Some(source.summary);
    Ok(build)
}

/// Build a trail from already-reprojected segments.
///
/// Fails only when `segments` is empty.
pub fn build_trail_from_segments(segments: &[Segment], config: &TrailConfig) -> Result<TrailBuild> {
    let chain = stitch_segments(segments, &config.chain)?;

    let invalid_points = segments
        .iter()
        .flat_map(Segment::points)
        .filter(|p| !p.is_valid())
        .count();
    if invalid_points > 0 {
        warn!("{} input points have invalid coordinates", invalid_points);
    }

    let report = ChainReport {
        total_segments: chain.total_segments,
        used_segments: chain.used_count(),
        unused_segments: chain.unused_count(),
        termination: chain.termination,
        chain_points: chain.points.len(),
        length_meters: polyline_length(&chain.points),
        bounds: Bounds::from_points(&chain.points),
        invalid_points,
    };

    let reduced = match config.simplification_tolerance {
        Some(tolerance) => simplify(&chain.points, tolerance),
        None => chain.points,
    };
    let points = downsample(&reduced, config.target_points);

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        info!(
            "Sampled points: {} (start: [{}, {}], end: [{}, {}], {:.1} km)",
            points.len(),
            first.longitude,
            first.latitude,
            last.longitude,
            last.latitude,
            report.length_meters / 1000.0
        );
    }

    Ok(TrailBuild {
        points,
        chain: report,
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StitchError;

    fn line(from: (f64, f64), to: (f64, f64), n: usize) -> Segment {
        let points = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                GpsPoint::new(from.1 + (to.1 - from.1) * t, from.0 + (to.0 - from.0) * t)
            })
            .collect();
        Segment::new(points).unwrap()
    }

    fn config() -> TrailConfig {
        TrailConfig {
            chain: ChainConfig {
                anchor: GpsPoint::new(0.0, 0.0),
                ..ChainConfig::default()
            },
            target_points: 10,
            ..TrailConfig::default()
        }
    }

    #[test]
    fn test_build_from_segments() {
        let segments = vec![
            line((1.0, 0.0), (2.0, 0.0), 30),
            line((0.0, 0.0), (1.0, 0.0), 30),
        ];
        let build = build_trail_from_segments(&segments, &config()).unwrap();

        assert_eq!(build.chain.used_segments, 2);
        assert_eq!(build.chain.unused_segments, 0);
        assert_eq!(build.chain.chain_points, 59);
        assert_eq!(build.chain.termination, Termination::AllConsumed);
        assert!(build.chain.length_meters > 200_000.0);
        // 59 / 10 = stride 5: indices 0..=55 plus the terminus
        assert_eq!(build.points.len(), 13);
        assert_eq!(build.points[0], GpsPoint::new(0.0, 0.0));
        assert_eq!(build.points[12], GpsPoint::new(0.0, 2.0));
        assert!(build.source.is_none());
        assert_eq!(build.chain.invalid_points, 0);
    }

    #[test]
    fn test_counts_invalid_points() {
        let bad = Segment::new(vec![
            GpsPoint::new(0.0, 1.0),
            GpsPoint::new(95.0, 1.5),
            GpsPoint::new(0.0, 2.0),
        ])
        .unwrap();
        let segments = vec![line((0.0, 0.0), (1.0, 0.0), 5), bad];
        let build = build_trail_from_segments(&segments, &config()).unwrap();

        assert_eq!(build.chain.used_segments, 2);
        assert_eq!(build.chain.invalid_points, 1);
    }

    #[test]
    fn test_simplification_before_downsampling() {
        let segments = vec![line((0.0, 0.0), (1.0, 0.0), 100)];
        let config = TrailConfig {
            simplification_tolerance: Some(0.0001),
            ..config()
        };
        let build = build_trail_from_segments(&segments, &config).unwrap();

        assert_eq!(build.chain.chain_points, 100);
        assert_eq!(build.points.len(), 2);
    }

    #[test]
    fn test_empty_segments_error() {
        let result = build_trail_from_segments(&[], &config());
        assert!(matches!(result, Err(StitchError::EmptySegmentSet)));
    }

    #[test]
    fn test_config_from_json() {
        let config: TrailConfig = serde_json::from_str(
            r#"{
                "name": "Long Trail",
                "tolerance": 0.02,
                "anchor": { "latitude": 42.73, "longitude": -73.16 },
                "target_points": 250,
                "source": { "eligible_status": "Main" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "Long Trail");
        assert_eq!(config.chain.tolerance, 0.02);
        assert_eq!(config.chain.anchor, GpsPoint::new(42.73, -73.16));
        assert_eq!(config.target_points, 250);
        assert_eq!(config.source.eligible_status, "Main");
        assert_eq!(config.source.status_field, "STATUS");
        assert!(config.simplification_tolerance.is_none());
    }
}
