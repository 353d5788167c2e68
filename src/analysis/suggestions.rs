//! Rule-based practice suggestions
//!
//! Maps score ranges and derived statistics to human-readable feedback. A
//! downstream consumer of the analyses - nothing here feeds back into any
//! score.

use crate::analysis::result::{
    PitchAccuracyAnalysis, ScoreBreakdown, StabilityAnalysis, TimingAnalysis, VibratoAnalysis,
};
use crate::config::ComparisonConfig;

/// Generate practice suggestions for a scored comparison
pub fn generate(
    breakdown: &ScoreBreakdown,
    pitch: &PitchAccuracyAnalysis,
    stability: &StabilityAnalysis,
    vibrato: &VibratoAnalysis,
    timing: &TimingAnalysis,
    config: &ComparisonConfig,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if breakdown.total_weighted_score >= 95.0 {
        suggestions.push("Outstanding performance - keep it up!".to_string());
        return suggestions;
    }

    if pitch.comparable_count == 0 {
        suggestions.push(
            "Too little voiced singing overlapped the melody to judge pitch. \
             Try singing along for the whole track."
                .to_string(),
        );
    } else if breakdown.pitch_accuracy_score < 70.0 {
        if pitch.mean_cent_error > 20.0 {
            suggestions.push(format!(
                "You sing consistently sharp (about {:.0} cents above the melody). \
                 Try easing off and listening before each phrase.",
                pitch.mean_cent_error
            ));
        } else if pitch.mean_cent_error < -20.0 {
            suggestions.push(format!(
                "You sing consistently flat (about {:.0} cents below the melody). \
                 More breath support will help you reach the pitch.",
                -pitch.mean_cent_error
            ));
        } else {
            suggestions.push(format!(
                "Your pitch drifts around the melody (average error {:.0} cents). \
                 Practice the hard phrases slowly until they settle.",
                pitch.mean_abs_cent_error
            ));
        }
    }

    if stability.insufficient_data {
        suggestions.push(
            "Not enough sustained singing to judge steadiness - hold your notes longer."
                .to_string(),
        );
    } else if breakdown.stability_score < 70.0 {
        if stability.unstable_region_count > 0 {
            suggestions.push(format!(
                "Your pitch wobbles in {} passage(s). Long steady tones on one note \
                 will build control.",
                stability.unstable_region_count
            ));
        } else {
            suggestions.push(
                "Your pitch wavers overall. Practice long steady tones with even airflow."
                    .to_string(),
            );
        }
    }

    if vibrato.vibrato_detected && vibrato.regularity_score < 40.0 {
        suggestions.push(
            "Your vibrato is uneven. Slow it down until the pulse is regular, then speed up."
                .to_string(),
        );
    }

    if !timing.insufficient_data {
        if timing.average_time_offset_ms > config.timing_tolerance_ms {
            suggestions.push(format!(
                "You tend to come in late (about {:.0} ms behind). Anticipate the beat \
                 and breathe earlier.",
                timing.average_time_offset_ms
            ));
        } else if timing.average_time_offset_ms < -config.timing_tolerance_ms {
            suggestions.push(format!(
                "You tend to rush ahead (about {:.0} ms early). Hold back and listen \
                 to the backing track.",
                -timing.average_time_offset_ms
            ));
        }
        if timing.significant_delay_count > 0 {
            suggestions.push(
                "Some entrances are badly delayed - mark the tricky entries and count \
                 yourself in."
                    .to_string(),
            );
        }
    }

    if suggestions.is_empty() {
        suggestions.push("Good performance. Polish the details and aim for the top grade!".to_string());
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::ScoreWeights;

    fn breakdown(pitch: f64, stability: f64, timing: f64) -> ScoreBreakdown {
        let weights = ScoreWeights::default();
        ScoreBreakdown {
            pitch_accuracy_score: pitch,
            stability_score: stability,
            timing_score: timing,
            weights,
            total_weighted_score: pitch * weights.pitch_accuracy
                + stability * weights.stability
                + timing * weights.timing,
        }
    }

    fn good_pitch() -> PitchAccuracyAnalysis {
        PitchAccuracyAnalysis {
            score: 95.0,
            comparable_count: 100,
            perfect_count: 95,
            acceptable_count: 100,
            mean_cent_error: 2.0,
            mean_abs_cent_error: 8.0,
        }
    }

    fn good_stability() -> StabilityAnalysis {
        StabilityAnalysis {
            stability_score: 95.0,
            pitch_variance: 10.0,
            unstable_region_count: 0,
            unstable_regions: vec![],
            insufficient_data: false,
        }
    }

    fn good_timing() -> TimingAnalysis {
        TimingAnalysis {
            accuracy_score: 95.0,
            average_time_offset_ms: 5.0,
            max_time_offset_ms: 32.0,
            significant_delay_count: 0,
            on_time_count: 100,
            early_count: 0,
            late_count: 0,
            insufficient_data: false,
        }
    }

    #[test]
    fn test_top_score_gets_praise_only() {
        let config = ComparisonConfig::default();
        let suggestions = generate(
            &breakdown(100.0, 100.0, 100.0),
            &good_pitch(),
            &good_stability(),
            &VibratoAnalysis::none(),
            &good_timing(),
            &config,
        );
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("Outstanding"));
    }

    #[test]
    fn test_sharp_singer_is_told_so() {
        let config = ComparisonConfig::default();
        let pitch = PitchAccuracyAnalysis {
            score: 40.0,
            mean_cent_error: 60.0,
            mean_abs_cent_error: 60.0,
            ..good_pitch()
        };
        let suggestions = generate(
            &breakdown(40.0, 95.0, 95.0),
            &pitch,
            &good_stability(),
            &VibratoAnalysis::none(),
            &good_timing(),
            &config,
        );
        assert!(suggestions.iter().any(|s| s.contains("sharp")));
    }

    #[test]
    fn test_late_singer_is_told_so() {
        let config = ComparisonConfig::default();
        let timing = TimingAnalysis {
            average_time_offset_ms: 120.0,
            ..good_timing()
        };
        let suggestions = generate(
            &breakdown(90.0, 90.0, 60.0),
            &good_pitch(),
            &good_stability(),
            &VibratoAnalysis::none(),
            &timing,
            &config,
        );
        assert!(suggestions.iter().any(|s| s.contains("late")));
    }

    #[test]
    fn test_insufficient_stability_is_reported() {
        let config = ComparisonConfig::default();
        let suggestions = generate(
            &breakdown(90.0, 0.0, 90.0),
            &good_pitch(),
            &StabilityAnalysis::insufficient(),
            &VibratoAnalysis::none(),
            &good_timing(),
            &config,
        );
        assert!(suggestions.iter().any(|s| s.contains("sustained singing")));
    }

    #[test]
    fn test_decent_performance_gets_generic_encouragement() {
        let config = ComparisonConfig::default();
        let suggestions = generate(
            &breakdown(90.0, 90.0, 90.0),
            &good_pitch(),
            &good_stability(),
            &VibratoAnalysis::none(),
            &good_timing(),
            &config,
        );
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("Polish"));
    }
}
