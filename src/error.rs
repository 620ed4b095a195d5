//! Error types for trail stitching.
//!
//! Only conditions the caller must act on are errors. A chain that stalls
//! before consuming every segment is a successful, partial result and is
//! reported through [`crate::StitchedChain`] instead.

use thiserror::Error;

/// Errors produced while reading, stitching or writing a trail.
#[derive(Debug, Error)]
pub enum StitchError {
    /// The chain builder was given no segments to start from.
    #[error("empty segment set: nothing to stitch")]
    EmptySegmentSet,

    /// The source document does not contain the configured feature layer.
    #[error("source document has no feature layer at {path}")]
    MissingLayer { path: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StitchError>;
