//! Comparison result types

use serde::{Deserialize, Serialize};

use super::metadata::ComparisonMetadata;

/// One matched reference/recorded frame correspondence from the DTW path
///
/// Index sequences along the path are each non-decreasing (monotonic
/// alignment, no backward jumps). `cent_difference` is `None` when either
/// side is unvoiced - the pair is non-comparable but retained for
/// completeness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedPitchPair {
    /// Reference pitch in Hz (≤ 0 = unvoiced)
    pub reference_pitch: f64,

    /// Recorded pitch in Hz (≤ 0 = unvoiced)
    pub recorded_pitch: f64,

    /// Frame index into the reference sequence
    pub reference_index: usize,

    /// Frame index into the recorded sequence
    pub recorded_index: usize,

    /// Signed pitch error in cents (recorded relative to reference), or
    /// `None` when the pair is non-comparable
    pub cent_difference: Option<f64>,
}

/// Pitch accuracy aggregation over the comparable aligned pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchAccuracyAnalysis {
    /// Accuracy score (0–100)
    pub score: f64,

    /// Number of comparable pairs (both sides voiced)
    pub comparable_count: usize,

    /// Pairs within the perfect threshold
    pub perfect_count: usize,

    /// Pairs within the acceptable threshold (includes perfect)
    pub acceptable_count: usize,

    /// Signed mean cent error (positive = sharp, negative = flat)
    pub mean_cent_error: f64,

    /// Mean absolute cent error
    pub mean_abs_cent_error: f64,
}

impl PitchAccuracyAnalysis {
    /// Zeroed analysis for the no-comparable-data case
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            comparable_count: 0,
            perfect_count: 0,
            acceptable_count: 0,
            mean_cent_error: 0.0,
            mean_abs_cent_error: 0.0,
        }
    }
}

/// Stability analysis of the recorded contour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityAnalysis {
    /// Stability score (0–100), monotonically decreasing in variance
    pub stability_score: f64,

    /// Mean windowed squared frame-to-frame deviation in cents²
    pub pitch_variance: f64,

    /// Number of merged unstable regions (not raw windows)
    pub unstable_region_count: usize,

    /// Unstable regions as (first frame, last frame) index ranges
    pub unstable_regions: Vec<(usize, usize)>,

    /// True when there were too few voiced samples to measure stability;
    /// the score is reported as 0 in that case, but it is "could not be
    /// scored", not "scored zero"
    pub insufficient_data: bool,
}

impl StabilityAnalysis {
    /// Analysis for the too-few-voiced-samples case
    pub fn insufficient() -> Self {
        Self {
            stability_score: 0.0,
            pitch_variance: 0.0,
            unstable_region_count: 0,
            unstable_regions: Vec::new(),
            insufficient_data: true,
        }
    }
}

/// Vibrato analysis of the pitch-error signal
///
/// When `vibrato_detected` is false the numeric fields are zero and must not
/// be interpreted as measured values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibratoAnalysis {
    /// True only when a dominant periodicity with sufficient depth and cycle
    /// count was found
    pub vibrato_detected: bool,

    /// Oscillation rate in Hz (cycles per second)
    pub vibrato_rate_hz: f64,

    /// Oscillation depth in cents (half of peak-to-peak amplitude)
    pub vibrato_depth_cents: f64,

    /// Regularity of cycle-to-cycle period length, scaled 0–100
    pub regularity_score: f64,
}

impl VibratoAnalysis {
    /// The common no-vibrato case, represented cleanly
    pub fn none() -> Self {
        Self {
            vibrato_detected: false,
            vibrato_rate_hz: 0.0,
            vibrato_depth_cents: 0.0,
            regularity_score: 0.0,
        }
    }
}

/// Timing analysis derived from the warping path and local transition patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingAnalysis {
    /// Timing accuracy score (0–100), mean of per-pair pattern similarity
    pub accuracy_score: f64,

    /// Systematic offset in milliseconds (positive = the singer is late)
    pub average_time_offset_ms: f64,

    /// Largest absolute offset in milliseconds along the path
    pub max_time_offset_ms: f64,

    /// Offsets exceeding the significant-delay threshold
    pub significant_delay_count: usize,

    /// Aligned pairs inside the on-time tolerance band
    pub on_time_count: usize,

    /// Aligned pairs ahead of the tolerance band
    pub early_count: usize,

    /// Aligned pairs behind the tolerance band
    pub late_count: usize,

    /// True when there were no aligned pairs to analyze
    pub insufficient_data: bool,
}

impl TimingAnalysis {
    /// Analysis for the no-aligned-pairs case
    pub fn insufficient() -> Self {
        Self {
            accuracy_score: 0.0,
            average_time_offset_ms: 0.0,
            max_time_offset_ms: 0.0,
            significant_delay_count: 0,
            on_time_count: 0,
            early_count: 0,
            late_count: 0,
            insufficient_data: true,
        }
    }
}

/// Sub-score weights for the comprehensive scorer
///
/// Must sum to exactly 1.0; `ComparisonConfig::validate` enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the pitch accuracy sub-score (default: 0.7)
    pub pitch_accuracy: f64,

    /// Weight of the stability sub-score (default: 0.2)
    pub stability: f64,

    /// Weight of the timing sub-score (default: 0.1)
    pub timing: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            pitch_accuracy: 0.7,
            stability: 0.2,
            timing: 0.1,
        }
    }
}

/// Weighted score breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Pitch accuracy sub-score, clamped to [0, 100]
    pub pitch_accuracy_score: f64,

    /// Stability sub-score, clamped to [0, 100]
    pub stability_score: f64,

    /// Timing sub-score, clamped to [0, 100]
    pub timing_score: f64,

    /// The weights that produced the total
    pub weights: ScoreWeights,

    /// Weighted total (0–100)
    pub total_weighted_score: f64,
}

/// Discrete performance grade
///
/// Derived from the fixed score-range table in [`crate::analysis::scorer`]:
/// S ≥ 95, A ≥ 85, B ≥ 70, C ≥ 55, D ≥ 40, F below.
///
/// # Example
///
/// ```
/// use vocalscore_dsp::analysis::result::Grade;
///
/// assert_eq!(Grade::from_score(100.0), Grade::S);
/// assert_eq!(Grade::from_score(72.5), Grade::B);
/// assert_eq!(Grade::from_score(10.0), Grade::F);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 95 and above
    S,
    /// 85 to below 95
    A,
    /// 70 to below 85
    B,
    /// 55 to below 70
    C,
    /// 40 to below 55
    D,
    /// Below 40
    F,
}

impl Grade {
    /// Grade for a total score, per the scorer's threshold table
    pub fn from_score(score: f64) -> Self {
        crate::analysis::scorer::grade_for(score)
    }

    /// Letter form of the grade
    pub fn letter(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Flags describing why a result looks the way it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonFlag {
    /// Reference sequence was empty or entirely unvoiced
    InsufficientReferenceData,
    /// Recorded sequence was empty or entirely unvoiced
    InsufficientRecordedData,
    /// Alignment produced no comparable (both-voiced) pairs
    NoComparablePairs,
    /// The banded aligner was engaged for this comparison
    BandedAlignment,
    /// Stability analysis found unstable regions
    UnstablePitch,
}

/// Complete comparison result
///
/// A read-only snapshot created fresh per comparison invocation; nothing in
/// it is mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Overall weighted score (0–100)
    pub overall_score: f64,

    /// Discrete grade for the overall score
    pub grade: Grade,

    /// Weighted breakdown behind the overall score
    pub score_breakdown: ScoreBreakdown,

    /// Pitch accuracy aggregation
    pub pitch_accuracy: PitchAccuracyAnalysis,

    /// Stability analysis
    pub stability_analysis: StabilityAnalysis,

    /// Vibrato analysis
    pub vibrato_analysis: VibratoAnalysis,

    /// Timing analysis
    pub timing_analysis: TimingAnalysis,

    /// Full DTW-aligned pair list in forward time order
    pub aligned_pairs: Vec<AlignedPitchPair>,

    /// Total cumulative alignment cost from the DTW matrix
    pub alignment_cost: f64,

    /// Human-readable practice suggestions
    pub suggestions: Vec<String>,

    /// Comparison metadata
    pub metadata: ComparisonMetadata,
}
