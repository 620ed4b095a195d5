//! ArcGIS web-map input.
//!
//! Trail fragments arrive as a web-map JSON document whose feature layer holds
//! polyline features in Web Mercator meters:
//!
//! ```json
//! { "operationalLayers": [ ..., { "featureCollection": { "layers": [
//!     { "featureSet": { "features": [
//!         { "attributes": { "STATUS": "Official A.T. Route" },
//!           "geometry": { "paths": [ [[x, y], [x, y], ...] ] } }
//!     ] } }
//! ] } } ] }
//! ```
//!
//! Only features whose status attribute matches [`SourceConfig::eligible_status`]
//! are kept. Each non-empty path of an eligible feature becomes one raw
//! segment, in document order. Features without usable geometry are skipped
//! and counted in [`SourceSummary`].

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::{Result, StitchError};

/// Where to find features in the document and which ones to keep.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Index into `operationalLayers`. Default: 1
    pub operational_layer: usize,
    /// Index into that layer's `featureCollection.layers`. Default: 0
    pub feature_layer: usize,
    /// Attribute holding the route status. Default: "STATUS"
    pub status_field: String,
    /// Status value a feature needs to be included. Default: "Official A.T. Route"
    pub eligible_status: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            operational_layer: 1,
            feature_layer: 0,
            status_field: "STATUS".to_string(),
            eligible_status: "Official A.T. Route".to_string(),
        }
    }
}

/// Feature counts from one read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSummary {
    /// Features in the configured layer.
    pub total_features: usize,
    /// Features whose status matched.
    pub eligible_features: usize,
    /// Eligible features dropped for missing or empty geometry.
    pub skipped_features: usize,
    /// Raw segments produced.
    pub segments: usize,
}

/// Raw segments (Web Mercator `[x, y]` paths) plus read statistics.
#[derive(Debug, Clone, Default)]
pub struct SourceSegments {
    pub paths: Vec<Vec<[f64; 2]>>,
    pub summary: SourceSummary,
}

// Wire types. Everything optional so one malformed feature does not fail
// the whole document.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebMap {
    #[serde(default)]
    operational_layers: Vec<OperationalLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationalLayer {
    feature_collection: Option<FeatureCollectionLayer>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollectionLayer {
    #[serde(default)]
    layers: Vec<FeatureLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureLayer {
    feature_set: Option<FeatureSet>,
}

#[derive(Debug, Deserialize)]
struct FeatureSet {
    #[serde(default)]
    features: Vec<Option<SourceFeature>>,
}

/// Attributes and geometry stay untyped; `null` or a wrong type in one
/// feature only disqualifies that feature.
#[derive(Debug, Deserialize)]
struct SourceFeature {
    #[serde(default)]
    attributes: Value,
    #[serde(default)]
    geometry: Value,
}

impl SourceFeature {
    fn is_eligible(&self, config: &SourceConfig) -> bool {
        self.attributes
            .get(&config.status_field)
            .and_then(Value::as_str)
            .is_some_and(|status| status == config.eligible_status)
    }

    /// Non-empty paths as `[x, y]`. Vertices may carry z/m values after x and
    /// y; vertices without two leading numbers are dropped.
    fn into_paths(self) -> Vec<Vec<[f64; 2]>> {
        let Some(paths) = self.geometry.get("paths").and_then(Value::as_array) else {
            return Vec::new();
        };

        paths
            .iter()
            .filter_map(Value::as_array)
            .map(|path| path.iter().filter_map(vertex_xy).collect::<Vec<_>>())
            .filter(|path| !path.is_empty())
            .collect()
    }
}

fn vertex_xy(vertex: &Value) -> Option<[f64; 2]> {
    let x = vertex.get(0)?.as_f64()?;
    let y = vertex.get(1)?.as_f64()?;
    Some([x, y])
}

/// Parse a web-map document and extract eligible raw segments.
///
/// Fails with [`StitchError::Json`] for invalid JSON and
/// [`StitchError::MissingLayer`] when the configured layer does not exist.
pub fn read_source(document: &str, config: &SourceConfig) -> Result<SourceSegments> {
    let webmap: WebMap = serde_json::from_str(document)?;

    let layer_path = format!(
        "operationalLayers[{}].featureCollection.layers[{}].featureSet",
        config.operational_layer, config.feature_layer
    );

    let features = webmap
        .operational_layers
        .into_iter()
        .nth(config.operational_layer)
        .and_then(|layer| layer.feature_collection)
        .and_then(|collection| collection.layers.into_iter().nth(config.feature_layer))
        .and_then(|layer| layer.feature_set)
        .map(|set| set.features)
        .ok_or(StitchError::MissingLayer { path: layer_path })?;

    let mut summary = SourceSummary {
        total_features: features.len(),
        ..SourceSummary::default()
    };
    let mut paths = Vec::new();

    for feature in features.into_iter().flatten() {
        if !feature.is_eligible(config) {
            continue;
        }
        summary.eligible_features += 1;

        let feature_paths = feature.into_paths();
        if feature_paths.is_empty() {
            summary.skipped_features += 1;
            continue;
        }
        paths.extend(feature_paths);
    }

    summary.segments = paths.len();

    info!(
        "Source features: {} total, {} with status {:?}, {} segments",
        summary.total_features, summary.eligible_features, config.eligible_status, summary.segments
    );
    if summary.skipped_features > 0 {
        warn!(
            "Skipped {} eligible features with no usable geometry",
            summary.skipped_features
        );
    }

    Ok(SourceSegments { paths, summary })
}
