//! Comparison metadata structures

use serde::{Deserialize, Serialize};

use super::result::ComparisonFlag;

/// Comparison metadata
///
/// Lets callers distinguish "scored zero" from "could not be scored" and
/// records what the engine actually did for this invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    /// Reference sequence duration in seconds
    pub reference_duration_seconds: f64,

    /// Recorded sequence duration in seconds
    pub recorded_duration_seconds: f64,

    /// Voiced frames in the reference sequence
    pub reference_voiced_frames: usize,

    /// Voiced frames in the recorded sequence
    pub recorded_voiced_frames: usize,

    /// Aligned pairs produced by the DTW path
    pub aligned_pair_count: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f64,

    /// Algorithm version
    pub algorithm_version: String,

    /// Band radius the aligner ran with, when the banded path was engaged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_radius: Option<usize>,

    /// Comparison flags
    pub flags: Vec<ComparisonFlag>,

    /// Plain-text warnings (insufficient data, degenerate inputs, etc.)
    pub warnings: Vec<String>,
}

impl Default for ComparisonMetadata {
    fn default() -> Self {
        Self {
            reference_duration_seconds: 0.0,
            recorded_duration_seconds: 0.0,
            reference_voiced_frames: 0,
            recorded_voiced_frames: 0,
            aligned_pair_count: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            band_radius: None,
            flags: vec![],
            warnings: vec![],
        }
    }
}
