//! Timing analysis
//!
//! Estimates how well the singer's note transitions line up with the
//! reference in time. Two views are combined:
//!
//! - A per-pair local accuracy: the short-range pattern of pitch change
//!   (finite differences over a small look-around window) is correlated
//!   between the two signals. Similarity near 1.0 means the transition
//!   happened at the expected time; near 0 a transition is present in one
//!   signal but absent or shifted in the other.
//! - A global systematic offset from the warping path's step bias, converted
//!   to milliseconds with the known frame duration. Positive offsets mean
//!   the singer is late.

use crate::analysis::result::{AlignedPitchPair, TimingAnalysis};
use crate::config::ComparisonConfig;
use crate::preprocessing::sequence::PitchSequence;

const EPSILON: f64 = 1e-9;

/// Analyze timing over the full aligned-pair list
///
/// # Arguments
///
/// * `pairs` - Aligned pairs from the DTW path, forward time order
/// * `reference` - Reference pitch sequence
/// * `recorded` - Recorded pitch sequence
/// * `config` - Comparison configuration (look-around, tolerance bands)
pub fn analyze(
    pairs: &[AlignedPitchPair],
    reference: &PitchSequence,
    recorded: &PitchSequence,
    config: &ComparisonConfig,
) -> TimingAnalysis {
    if pairs.is_empty() {
        log::debug!("Timing: no aligned pairs, insufficient data");
        return TimingAnalysis::insufficient();
    }

    let reference_deltas = contour_deltas(&reference.cents_contour());
    let recorded_deltas = contour_deltas(&recorded.cents_contour());
    let frame_ms = config.frame_ms();
    let look = config.timing_lookaround as i64;

    let mut similarity_sum = 0.0;
    let mut offset_sum_ms = 0.0;
    let mut max_offset_ms: f64 = 0.0;
    let mut on_time_count = 0usize;
    let mut early_count = 0usize;
    let mut late_count = 0usize;
    let mut significant_delay_count = 0usize;

    for pair in pairs {
        similarity_sum += pattern_similarity(
            &reference_deltas,
            &recorded_deltas,
            pair.reference_index,
            pair.recorded_index,
            look,
        );

        let offset_ms =
            (pair.recorded_index as f64 - pair.reference_index as f64) * frame_ms;
        offset_sum_ms += offset_ms;
        max_offset_ms = max_offset_ms.max(offset_ms.abs());

        if offset_ms.abs() <= config.timing_tolerance_ms {
            on_time_count += 1;
        } else if offset_ms < 0.0 {
            early_count += 1;
        } else {
            late_count += 1;
        }
        if offset_ms > config.significant_delay_ms {
            significant_delay_count += 1;
        }
    }

    let count = pairs.len() as f64;
    let accuracy_score = (similarity_sum / count * 100.0).clamp(0.0, 100.0);
    let average_time_offset_ms = offset_sum_ms / count;

    log::debug!(
        "Timing: accuracy {:.1}, avg offset {:.1} ms, max {:.1} ms, {} significant delay(s)",
        accuracy_score,
        average_time_offset_ms,
        max_offset_ms,
        significant_delay_count
    );

    TimingAnalysis {
        accuracy_score,
        average_time_offset_ms,
        max_time_offset_ms: max_offset_ms,
        significant_delay_count,
        on_time_count,
        early_count,
        late_count,
        insufficient_data: false,
    }
}

/// Frame-to-frame pitch change in cents; 0.0 across unvoiced gaps
fn contour_deltas(contour: &[Option<f64>]) -> Vec<f64> {
    contour
        .windows(2)
        .map(|w| match (w[0], w[1]) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        })
        .collect()
}

/// Local transition-pattern similarity in [0, 1] around one aligned pair
///
/// Correlates the finite-difference windows centered on the pair's indices.
/// Two flat windows agree perfectly; a transition on one side only scores 0;
/// otherwise the normalized cross-correlation clamped at 0.
fn pattern_similarity(
    reference_deltas: &[f64],
    recorded_deltas: &[f64],
    reference_index: usize,
    recorded_index: usize,
    look: i64,
) -> f64 {
    let mut dot = 0.0;
    let mut reference_energy = 0.0;
    let mut recorded_energy = 0.0;

    for d in -look..look {
        let ri = reference_index as i64 + d;
        let ci = recorded_index as i64 + d;
        if ri < 0 || ci < 0 {
            continue;
        }
        let (ri, ci) = (ri as usize, ci as usize);
        if ri >= reference_deltas.len() || ci >= recorded_deltas.len() {
            continue;
        }
        let a = reference_deltas[ri];
        let b = recorded_deltas[ci];
        dot += a * b;
        reference_energy += a * a;
        recorded_energy += b * b;
    }

    let reference_norm = reference_energy.sqrt();
    let recorded_norm = recorded_energy.sqrt();

    if reference_norm < EPSILON && recorded_norm < EPSILON {
        // No transition on either side: the (non-)event matches
        1.0
    } else if reference_norm < EPSILON || recorded_norm < EPSILON {
        0.0
    } else {
        (dot / (reference_norm * recorded_norm)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_pairs(reference: &PitchSequence, recorded: &PitchSequence) -> Vec<AlignedPitchPair> {
        let len = reference.len().min(recorded.len());
        (0..len)
            .map(|k| {
                let rp = reference.get(k).unwrap().frequency_hz;
                let cp = recorded.get(k).unwrap().frequency_hz;
                AlignedPitchPair {
                    reference_pitch: rp,
                    recorded_pitch: cp,
                    reference_index: k,
                    recorded_index: k,
                    cent_difference: crate::features::cents::cent_difference(rp, cp),
                }
            })
            .collect()
    }

    #[test]
    fn test_identical_constant_sequences_score_100() {
        let config = ComparisonConfig::default();
        let s = PitchSequence::from_hz(&vec![261.63; 20]);
        let pairs = diagonal_pairs(&s, &s);
        let analysis = analyze(&pairs, &s, &s, &config);

        assert_eq!(analysis.accuracy_score, 100.0);
        assert_eq!(analysis.average_time_offset_ms, 0.0);
        assert_eq!(analysis.max_time_offset_ms, 0.0);
        assert_eq!(analysis.on_time_count, 20);
        assert_eq!(analysis.early_count, 0);
        assert_eq!(analysis.late_count, 0);
    }

    #[test]
    fn test_identical_melodies_score_100() {
        let config = ComparisonConfig::default();
        let values: Vec<f64> = [220.0, 220.0, 261.63, 261.63, 293.66, 293.66, 329.63, 329.63]
            .repeat(3);
        let s = PitchSequence::from_hz(&values);
        let pairs = diagonal_pairs(&s, &s);
        let analysis = analyze(&pairs, &s, &s, &config);

        assert_eq!(analysis.accuracy_score, 100.0);
        assert_eq!(analysis.on_time_count, pairs.len());
    }

    #[test]
    fn test_transition_missing_on_one_side_lowers_accuracy() {
        let config = ComparisonConfig::default();
        // Reference steps up mid-way; recorded never moves
        let mut reference_values = vec![220.0; 20];
        for v in reference_values.iter_mut().skip(10) {
            *v = 330.0;
        }
        let reference = PitchSequence::from_hz(&reference_values);
        let recorded = PitchSequence::from_hz(&vec![220.0; 20]);
        let pairs = diagonal_pairs(&reference, &recorded);
        let analysis = analyze(&pairs, &reference, &recorded, &config);

        assert!(
            analysis.accuracy_score < 100.0,
            "missing transition must cost accuracy, got {}",
            analysis.accuracy_score
        );
    }

    #[test]
    fn test_late_pairs_are_classified() {
        let config = ComparisonConfig::default();
        let s = PitchSequence::from_hz(&vec![261.63; 30]);
        // Recorded index runs 3 frames (96 ms) behind the reference
        let pairs: Vec<AlignedPitchPair> = (0..20)
            .map(|k| AlignedPitchPair {
                reference_pitch: 261.63,
                recorded_pitch: 261.63,
                reference_index: k,
                recorded_index: k + 3,
                cent_difference: Some(0.0),
            })
            .collect();
        let analysis = analyze(&pairs, &s, &s, &config);

        assert!(analysis.average_time_offset_ms > 90.0);
        assert_eq!(analysis.late_count, 20);
        assert_eq!(analysis.on_time_count, 0);
        // 96 ms is beyond the tolerance band but under the significant threshold
        assert_eq!(analysis.significant_delay_count, 0);
        assert!((analysis.max_time_offset_ms - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_significant_delay_counted() {
        let config = ComparisonConfig::default();
        let s = PitchSequence::from_hz(&vec![261.63; 40]);
        // 6 frames = 192 ms, past the 150 ms significant threshold
        let pairs: Vec<AlignedPitchPair> = (0..20)
            .map(|k| AlignedPitchPair {
                reference_pitch: 261.63,
                recorded_pitch: 261.63,
                reference_index: k,
                recorded_index: k + 6,
                cent_difference: Some(0.0),
            })
            .collect();
        let analysis = analyze(&pairs, &s, &s, &config);

        assert_eq!(analysis.significant_delay_count, 20);
        assert_eq!(analysis.late_count, 20);
    }

    #[test]
    fn test_early_pairs_are_classified() {
        let config = ComparisonConfig::default();
        let s = PitchSequence::from_hz(&vec![261.63; 30]);
        let pairs: Vec<AlignedPitchPair> = (0..20)
            .map(|k| AlignedPitchPair {
                reference_pitch: 261.63,
                recorded_pitch: 261.63,
                reference_index: k + 4,
                recorded_index: k,
                cent_difference: Some(0.0),
            })
            .collect();
        let analysis = analyze(&pairs, &s, &s, &config);

        assert_eq!(analysis.early_count, 20);
        assert!(analysis.average_time_offset_ms < -100.0);
    }

    #[test]
    fn test_empty_pairs_is_insufficient() {
        let config = ComparisonConfig::default();
        let s = PitchSequence::from_hz(&[261.63]);
        let analysis = analyze(&[], &s, &s, &config);

        assert!(analysis.insufficient_data);
        assert_eq!(analysis.accuracy_score, 0.0);
    }
}
