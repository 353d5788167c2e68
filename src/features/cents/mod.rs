//! Cent-difference math and pitch-accuracy scoring
//!
//! Converts frequency pairs into a perceptually meaningful log-scale error
//! (cents; 1200 cents = one octave) and aggregates the error distribution
//! across the comparable aligned pairs into a 0–100 accuracy score.

use crate::analysis::result::{AlignedPitchPair, PitchAccuracyAnalysis};
use crate::config::ComparisonConfig;

/// Signed pitch error in cents of `recorded_hz` relative to `reference_hz`
///
/// Defined only when both values are positive; unvoiced frames (≤ 0) make the
/// pair non-comparable and yield `None`. Antisymmetric:
/// `cent_difference(a, b) == -cent_difference(b, a)` for all a, b > 0.
pub fn cent_difference(reference_hz: f64, recorded_hz: f64) -> Option<f64> {
    if reference_hz > 0.0 && recorded_hz > 0.0 {
        Some(1200.0 * (recorded_hz / reference_hz).log2())
    } else {
        None
    }
}

/// Per-pair accuracy credit in [0, 1]
///
/// Full credit at or below the perfect threshold, linear falloff to zero at
/// the acceptable threshold, nothing beyond. The falloff makes the aggregate
/// score decrease monotonically as a constant detune grows.
fn pair_credit(abs_cents: f64, config: &ComparisonConfig) -> f64 {
    if abs_cents <= config.perfect_threshold_cents {
        1.0
    } else if abs_cents < config.acceptable_threshold_cents {
        (config.acceptable_threshold_cents - abs_cents)
            / (config.acceptable_threshold_cents - config.perfect_threshold_cents)
    } else {
        0.0
    }
}

/// Score pitch accuracy over an aligned pair list
///
/// Non-comparable pairs (either side unvoiced) are excluded from aggregation
/// but remain in the pair list for completeness. With no comparable pairs at
/// all the score is 0 and `comparable_count` shows why.
///
/// # Arguments
///
/// * `pairs` - Aligned pairs from the DTW path
/// * `config` - Comparison configuration (cent thresholds)
pub fn score_pitch_accuracy(
    pairs: &[AlignedPitchPair],
    config: &ComparisonConfig,
) -> PitchAccuracyAnalysis {
    let mut comparable_count = 0usize;
    let mut perfect_count = 0usize;
    let mut acceptable_count = 0usize;
    let mut credit_sum = 0.0;
    let mut error_sum = 0.0;
    let mut abs_error_sum = 0.0;

    for pair in pairs {
        let Some(cents) = pair.cent_difference else {
            continue;
        };
        let abs_cents = cents.abs();

        comparable_count += 1;
        error_sum += cents;
        abs_error_sum += abs_cents;
        credit_sum += pair_credit(abs_cents, config);
        if abs_cents <= config.perfect_threshold_cents {
            perfect_count += 1;
        }
        if abs_cents <= config.acceptable_threshold_cents {
            acceptable_count += 1;
        }
    }

    if comparable_count == 0 {
        log::debug!("No comparable pairs; pitch accuracy scored 0");
        return PitchAccuracyAnalysis::empty();
    }

    let count = comparable_count as f64;
    let score = (credit_sum / count * 100.0).clamp(0.0, 100.0);

    log::debug!(
        "Pitch accuracy: {:.1} over {} comparable pairs ({} perfect, {} acceptable)",
        score,
        comparable_count,
        perfect_count,
        acceptable_count
    );

    PitchAccuracyAnalysis {
        score,
        comparable_count,
        perfect_count,
        acceptable_count,
        mean_cent_error: error_sum / count,
        mean_abs_cent_error: abs_error_sum / count,
    }
}
