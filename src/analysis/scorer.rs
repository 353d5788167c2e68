//! Comprehensive scoring
//!
//! The single point where the sub-analyses are reconciled into one weighted
//! total and a discrete grade. The weight constants live in
//! [`ComparisonConfig`](crate::config::ComparisonConfig) (validated to sum to
//! 1.0 before any comparison runs) and the grade thresholds live in
//! [`GRADE_TABLE`] - other components must not duplicate either.

use crate::analysis::result::{Grade, ScoreBreakdown};
use crate::config::ComparisonConfig;

/// Grade thresholds: minimum total score for each grade, highest first.
/// Scores below every threshold grade F.
pub const GRADE_TABLE: [(f64, Grade); 5] = [
    (95.0, Grade::S),
    (85.0, Grade::A),
    (70.0, Grade::B),
    (55.0, Grade::C),
    (40.0, Grade::D),
];

/// Grade for a total score, per [`GRADE_TABLE`]
pub fn grade_for(score: f64) -> Grade {
    for &(threshold, grade) in GRADE_TABLE.iter() {
        if score >= threshold {
            return grade;
        }
    }
    Grade::F
}

/// Combine the sub-scores into a weighted breakdown
///
/// Each sub-score is clamped to [0, 100] before weighting. The weights come
/// from the validated configuration, so the total is guaranteed to land in
/// [0, 100] as well.
pub fn score(
    pitch_accuracy_score: f64,
    stability_score: f64,
    timing_score: f64,
    config: &ComparisonConfig,
) -> ScoreBreakdown {
    let pitch_accuracy_score = pitch_accuracy_score.clamp(0.0, 100.0);
    let stability_score = stability_score.clamp(0.0, 100.0);
    let timing_score = timing_score.clamp(0.0, 100.0);

    let weights = config.weights;
    let total_weighted_score = pitch_accuracy_score * weights.pitch_accuracy
        + stability_score * weights.stability
        + timing_score * weights.timing;

    log::debug!(
        "Score: pitch {:.1} × {:.2} + stability {:.1} × {:.2} + timing {:.1} × {:.2} = {:.1}",
        pitch_accuracy_score,
        weights.pitch_accuracy,
        stability_score,
        weights.stability,
        timing_score,
        weights.timing,
        total_weighted_score
    );

    ScoreBreakdown {
        pitch_accuracy_score,
        stability_score,
        timing_score,
        weights,
        total_weighted_score,
    }
}
