//! # Vocalscore DSP
//!
//! A pitch comparison and scoring engine for karaoke-style applications,
//! scoring a singer's recorded pitch contour against a reference contour
//! extracted from the backing track.
//!
//! ## Features
//!
//! - **DTW Alignment**: Monotonic, non-crossing alignment between contours of
//!   independent length, with a banded matrix for long recordings
//! - **Pitch Accuracy**: Perceptual (cents-based) error scoring over the
//!   aligned pairs
//! - **Stability & Vibrato**: Local jitter analysis and FFT-autocorrelation
//!   vibrato detection
//! - **Timing**: Transition-pattern accuracy and systematic offset estimation
//! - **Comprehensive Score**: Weighted 0–100 total with a discrete grade and
//!   practice suggestions
//!
//! ## Quick Start
//!
//! ```
//! use vocalscore_dsp::{compare_performance, ComparisonConfig};
//!
//! // Per-frame pitch readings in Hz (32 ms frames); <= 0 means unvoiced
//! let reference: Vec<f64> = vec![261.63; 20];
//! let recorded: Vec<f64> = vec![261.63; 20];
//!
//! let result = compare_performance(&reference, &recorded, ComparisonConfig::default())?;
//!
//! println!("Score: {:.1} ({})", result.overall_score, result.grade.letter());
//! # Ok::<(), vocalscore_dsp::ComparisonError>(())
//! ```
//!
//! ## Architecture
//!
//! The comparison pipeline follows this flow:
//!
//! ```text
//! Pitch Input → Preprocessing → DTW Alignment → {Accuracy, Stability,
//! Vibrato, Timing} (parallel) → Scoring → Output
//! ```
//!
//! The engine is a pure synchronous computation: no I/O, no shared mutable
//! state, every invocation returns a freshly constructed result.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod preprocessing;

// Re-export main types
pub use analysis::metadata::ComparisonMetadata;
pub use analysis::result::{
    AlignedPitchPair, ComparisonFlag, ComparisonResult, Grade, PitchAccuracyAnalysis,
    ScoreBreakdown, ScoreWeights, StabilityAnalysis, TimingAnalysis, VibratoAnalysis,
};
pub use config::ComparisonConfig;
pub use error::ComparisonError;
pub use preprocessing::sequence::{PitchSample, PitchSequence};

use std::time::Instant;

/// Main comparison function
///
/// Scores a recorded pitch contour against a reference contour and returns
/// the comprehensive result: overall score, weighted breakdown, per-dimension
/// analyses, the full aligned-pair list, and practice suggestions.
///
/// # Arguments
///
/// * `reference_hz` - Reference pitch per frame in Hz (≤ 0 = unvoiced),
///   32 ms frames by default
/// * `recorded_hz` - Recorded pitch per frame in Hz, same frame duration,
///   independent length
/// * `config` - Comparison configuration parameters
///
/// # Returns
///
/// `ComparisonResult` with the overall score and all sub-analyses. Empty or
/// entirely unvoiced input is **not** an error: the result carries score 0
/// with explicit insufficient-data flags so callers can tell "scored zero"
/// from "could not be scored".
///
/// # Errors
///
/// Returns `ComparisonError::InvalidConfig` for a malformed configuration
/// (weights not summing to 1.0, inverted thresholds, …) before any
/// comparison runs.
///
/// # Example
///
/// ```
/// use vocalscore_dsp::{compare_performance, ComparisonConfig};
///
/// let reference = vec![261.63; 20];
/// let recorded = vec![523.25; 20]; // one octave sharp throughout
/// let result = compare_performance(&reference, &recorded, ComparisonConfig::default())?;
/// assert!(result.score_breakdown.pitch_accuracy_score < 1.0);
/// # Ok::<(), vocalscore_dsp::ComparisonError>(())
/// ```
pub fn compare_performance(
    reference_hz: &[f64],
    recorded_hz: &[f64],
    config: ComparisonConfig,
) -> Result<ComparisonResult, ComparisonError> {
    config.validate()?;
    let start_time = Instant::now();

    log::debug!(
        "Starting comparison: {} reference frames, {} recorded frames",
        reference_hz.len(),
        recorded_hz.len()
    );

    let reference = PitchSequence::from_hz(reference_hz);
    let recorded = PitchSequence::from_hz(recorded_hz);

    // Insufficient data is a result, not an error
    let mut flags = Vec::new();
    let mut warnings = Vec::new();
    if reference.voiced_count() == 0 {
        flags.push(ComparisonFlag::InsufficientReferenceData);
        warnings.push("Reference sequence is empty or entirely unvoiced".to_string());
    }
    if recorded.voiced_count() == 0 {
        flags.push(ComparisonFlag::InsufficientRecordedData);
        warnings.push("Recorded sequence is empty or entirely unvoiced".to_string());
    }
    if !flags.is_empty() {
        log::warn!("Insufficient data for comparison: {:?}", flags);
        return Ok(insufficient_result(
            &reference, &recorded, flags, warnings, &config, start_time,
        ));
    }

    let alignment = features::alignment::align(&reference, &recorded, &config)?;
    if alignment.pairs.is_empty() {
        warnings.push("Alignment produced no pairs".to_string());
        return Ok(insufficient_result(
            &reference, &recorded, flags, warnings, &config, start_time,
        ));
    }

    // The four analyzers only read the shared aligned-pair list and the
    // input sequences; they are independent and run concurrently. The scorer
    // below is the single join point.
    let ((pitch_accuracy, stability_analysis), (vibrato_analysis, timing_analysis)) = rayon::join(
        || {
            rayon::join(
                || features::cents::score_pitch_accuracy(&alignment.pairs, &config),
                || features::stability::analyze(&recorded, &config),
            )
        },
        || {
            rayon::join(
                || features::vibrato::analyze_pairs(&alignment.pairs, &config),
                || features::timing::analyze(&alignment.pairs, &reference, &recorded, &config),
            )
        },
    );

    let score_breakdown = analysis::scorer::score(
        pitch_accuracy.score,
        stability_analysis.stability_score,
        timing_analysis.accuracy_score,
        &config,
    );
    let overall_score = score_breakdown.total_weighted_score;
    let grade = Grade::from_score(overall_score);

    let suggestions = analysis::suggestions::generate(
        &score_breakdown,
        &pitch_accuracy,
        &stability_analysis,
        &vibrato_analysis,
        &timing_analysis,
        &config,
    );

    if pitch_accuracy.comparable_count == 0 {
        flags.push(ComparisonFlag::NoComparablePairs);
        warnings.push("No aligned pair had voiced pitch on both sides".to_string());
    }
    if alignment.band_radius.is_some() {
        flags.push(ComparisonFlag::BandedAlignment);
    }
    if stability_analysis.unstable_region_count > 0 {
        flags.push(ComparisonFlag::UnstablePitch);
    }

    let metadata = ComparisonMetadata {
        reference_duration_seconds: reference.duration_seconds(config.frame_duration_secs),
        recorded_duration_seconds: recorded.duration_seconds(config.frame_duration_secs),
        reference_voiced_frames: reference.voiced_count(),
        recorded_voiced_frames: recorded.voiced_count(),
        aligned_pair_count: alignment.pairs.len(),
        processing_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        band_radius: alignment.band_radius,
        flags,
        warnings,
    };

    log::debug!(
        "Comparison done: overall {:.1} ({}) in {:.2} ms",
        overall_score,
        grade.letter(),
        metadata.processing_time_ms
    );

    Ok(ComparisonResult {
        overall_score,
        grade,
        score_breakdown,
        pitch_accuracy,
        stability_analysis,
        vibrato_analysis,
        timing_analysis,
        aligned_pairs: alignment.pairs,
        alignment_cost: alignment.total_cost,
        suggestions,
        metadata,
    })
}

/// Zeroed result for inputs that cannot be scored
fn insufficient_result(
    reference: &PitchSequence,
    recorded: &PitchSequence,
    flags: Vec<ComparisonFlag>,
    warnings: Vec<String>,
    config: &ComparisonConfig,
    start_time: Instant,
) -> ComparisonResult {
    let score_breakdown = analysis::scorer::score(0.0, 0.0, 0.0, config);
    let pitch_accuracy = PitchAccuracyAnalysis::empty();
    let stability_analysis = StabilityAnalysis::insufficient();
    let vibrato_analysis = VibratoAnalysis::none();
    let timing_analysis = TimingAnalysis::insufficient();

    let suggestions = analysis::suggestions::generate(
        &score_breakdown,
        &pitch_accuracy,
        &stability_analysis,
        &vibrato_analysis,
        &timing_analysis,
        config,
    );

    ComparisonResult {
        overall_score: 0.0,
        grade: Grade::F,
        score_breakdown,
        pitch_accuracy,
        stability_analysis,
        vibrato_analysis,
        timing_analysis,
        aligned_pairs: Vec::new(),
        alignment_cost: 0.0,
        suggestions,
        metadata: ComparisonMetadata {
            reference_duration_seconds: reference.duration_seconds(config.frame_duration_secs),
            recorded_duration_seconds: recorded.duration_seconds(config.frame_duration_secs),
            reference_voiced_frames: reference.voiced_count(),
            recorded_voiced_frames: recorded.voiced_count(),
            aligned_pair_count: 0,
            processing_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            band_radius: None,
            flags,
            warnings,
        },
    }
}
