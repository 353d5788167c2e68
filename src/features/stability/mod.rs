//! Pitch stability analysis
//!
//! Scans the recorded contour for local jitter, independent of absolute
//! accuracy: a singer can be perfectly steady on the wrong note. The measure
//! works on frame-to-frame pitch deltas in cents (register-independent)
//! between adjacent voiced frames - an unvoiced gap breaks the chain, so
//! silence never manufactures a jump. A sliding window over the deltas yields
//! a local deviation per window.

use crate::analysis::result::StabilityAnalysis;
use crate::config::ComparisonConfig;
use crate::preprocessing::sequence::PitchSequence;

/// Analyze the stability of a recorded pitch contour
///
/// Each window's deviation is the RMS of its signed deltas (their standard
/// deviation around the steady-pitch expectation of zero).
/// `stability_score = 100 − penalty · mean windowed deviation`, clamped to
/// [0, 100]; a constant pitch scores exactly 100. Windows whose deviation
/// exceeds the unstable threshold merge into contiguous unstable regions,
/// reported as frame-index ranges of the original sequence.
///
/// # Edge cases
///
/// Fewer adjacent-voiced deltas than one full window makes the score
/// undefined; it is reported as 0 with `insufficient_data` set rather than
/// risking a degenerate variance.
pub fn analyze(recorded: &PitchSequence, config: &ComparisonConfig) -> StabilityAnalysis {
    // (first frame of the pair, delta in cents) for adjacent voiced frames
    let voiced = recorded.voiced_cents();
    let deltas: Vec<(usize, f64)> = voiced
        .windows(2)
        .filter(|w| w[1].0 == w[0].0 + 1)
        .map(|w| (w[0].0, w[1].1 - w[0].1))
        .collect();

    let window = config.stability_window;
    if deltas.len() < window {
        log::debug!(
            "Stability: {} voiced deltas < window of {}, insufficient data",
            deltas.len(),
            window
        );
        return StabilityAnalysis::insufficient();
    }

    let window_count = deltas.len() - window + 1;
    let mut variance_sum = 0.0;
    let mut deviation_sum = 0.0;
    let mut unstable_regions: Vec<(usize, usize)> = Vec::new();

    for start in 0..window_count {
        let slice = &deltas[start..start + window];
        let mean_square =
            slice.iter().map(|&(_, d)| d * d).sum::<f64>() / window as f64;
        let deviation = mean_square.sqrt();

        variance_sum += mean_square;
        deviation_sum += deviation;

        if deviation > config.unstable_std_threshold_cents {
            let first_frame = slice[0].0;
            let last_frame = slice[window - 1].0 + 1;
            match unstable_regions.last_mut() {
                // Contiguous unstable windows merge into one region
                Some(region) if first_frame <= region.1 + 1 => region.1 = last_frame,
                _ => unstable_regions.push((first_frame, last_frame)),
            }
        }
    }

    let mean_variance = variance_sum / window_count as f64;
    let mean_deviation = deviation_sum / window_count as f64;
    let stability_score =
        (100.0 - config.stability_penalty_per_cent * mean_deviation).clamp(0.0, 100.0);

    log::debug!(
        "Stability: score {:.1}, mean deviation {:.1} cents, {} unstable region(s)",
        stability_score,
        mean_deviation,
        unstable_regions.len()
    );

    StabilityAnalysis {
        stability_score,
        pitch_variance: mean_variance,
        unstable_region_count: unstable_regions.len(),
        unstable_regions,
        insufficient_data: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_pitch_scores_100() {
        let config = ComparisonConfig::default();
        let recorded = PitchSequence::from_hz(&vec![261.63; 30]);
        let analysis = analyze(&recorded, &config);

        assert_eq!(analysis.stability_score, 100.0);
        assert_eq!(analysis.pitch_variance, 0.0);
        assert_eq!(analysis.unstable_region_count, 0);
        assert!(!analysis.insufficient_data);
    }

    #[test]
    fn test_wild_jumps_score_near_0() {
        let config = ComparisonConfig::default();
        // Two octaves apart every other frame: every delta is ±2400 cents
        let values: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 220.0 } else { 880.0 })
            .collect();
        let analysis = analyze(&PitchSequence::from_hz(&values), &config);

        assert!(analysis.stability_score < 1.0);
        assert_eq!(analysis.unstable_region_count, 1, "all windows merge into one region");
        assert!(!analysis.insufficient_data);
    }

    #[test]
    fn test_score_decreases_with_jitter_size() {
        let config = ComparisonConfig::default();
        let score_for = |jitter_cents: f64| {
            let values: Vec<f64> = (0..40)
                .map(|i| {
                    let cents = if i % 2 == 0 { jitter_cents } else { -jitter_cents };
                    220.0 * (cents / 1200.0).exp2()
                })
                .collect();
            analyze(&PitchSequence::from_hz(&values), &config).stability_score
        };

        let small = score_for(5.0);
        let medium = score_for(12.0);
        let large = score_for(40.0);
        assert!(small > medium, "small {} vs medium {}", small, medium);
        assert!(medium > large, "medium {} vs large {}", medium, large);
        assert!(large < 1.0);
    }

    #[test]
    fn test_too_few_voiced_samples_is_insufficient() {
        let config = ComparisonConfig::default();
        let recorded = PitchSequence::from_hz(&[220.0, 0.0, 220.0, 220.0, 0.0, 220.0]);
        let analysis = analyze(&recorded, &config);

        assert!(analysis.insufficient_data);
        assert_eq!(analysis.stability_score, 0.0);
    }

    #[test]
    fn test_gaps_break_the_delta_chain() {
        let config = ComparisonConfig::default();
        // Steady pitch interrupted by silence: no delta spans the gaps, so
        // the contour is still perfectly stable
        let mut values = vec![261.63; 15];
        values.insert(7, 0.0);
        values.insert(3, 0.0);
        let analysis = analyze(&PitchSequence::from_hz(&values), &config);

        assert_eq!(analysis.stability_score, 100.0);
        assert_eq!(analysis.unstable_region_count, 0);
    }

    #[test]
    fn test_unstable_region_localized() {
        let config = ComparisonConfig::default();
        // Steady, then a burst of large wobble, then steady again
        let mut values = vec![261.63; 50];
        for (k, v) in values.iter_mut().enumerate().take(30).skip(20) {
            *v = if k % 2 == 0 { 220.0 } else { 311.13 };
        }
        let analysis = analyze(&PitchSequence::from_hz(&values), &config);

        assert!(analysis.unstable_region_count >= 1);
        assert!(analysis.stability_score < 100.0);
        let (first, last) = analysis.unstable_regions[0];
        assert!(first >= 10, "region starts near the wobble, got {}", first);
        assert!(last <= 40, "region ends near the wobble, got {}", last);
    }

    #[test]
    fn test_single_note_change_is_not_wild_instability() {
        let config = ComparisonConfig::default();
        // One clean step of a whole tone: far better than constant jitter
        let mut values = vec![261.63; 40];
        for v in values.iter_mut().skip(20) {
            *v = 293.66;
        }
        let one_step = analyze(&PitchSequence::from_hz(&values), &config).stability_score;

        let jittery: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 261.63 } else { 293.66 })
            .collect();
        let constant_jitter = analyze(&PitchSequence::from_hz(&jittery), &config).stability_score;

        assert!(
            one_step > constant_jitter,
            "one step ({:.1}) must beat constant jitter ({:.1})",
            one_step,
            constant_jitter
        );
    }
}
