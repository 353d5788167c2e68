//! Example: Compare a synthetic performance against its reference
//!
//! This example builds a reference contour and a slightly imperfect "sung"
//! take, runs the comparison, and prints the scored result. Pass `--json`
//! to dump the full result as JSON instead.

use vocalscore_dsp::{compare_performance, ComparisonConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let config = ComparisonConfig::default();
    let frame_rate = 1.0 / config.frame_duration_secs;

    // Reference: four held notes, ~0.8 s each
    let notes = [261.63, 293.66, 329.63, 261.63];
    let mut reference = Vec::new();
    for &note in &notes {
        reference.extend(std::iter::repeat(note).take(25));
    }

    // Recorded take: 15 cents sharp with a 5.5 Hz vibrato, entering a frame late
    let mut recorded = vec![0.0];
    recorded.extend(reference.iter().enumerate().map(|(k, &note)| {
        let vibrato = 20.0 * (2.0 * std::f64::consts::PI * 5.5 * k as f64 / frame_rate).sin();
        note * ((15.0 + vibrato) / 1200.0).exp2()
    }));

    let result = compare_performance(&reference, &recorded, config)?;

    if std::env::args().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Comparison Results:");
    println!(
        "  Overall: {:.1} (grade {})",
        result.overall_score,
        result.grade.letter()
    );
    println!(
        "  Pitch accuracy: {:.1} ({} of {} pairs perfect)",
        result.score_breakdown.pitch_accuracy_score,
        result.pitch_accuracy.perfect_count,
        result.pitch_accuracy.comparable_count
    );
    println!(
        "  Stability: {:.1} ({} unstable region(s))",
        result.score_breakdown.stability_score, result.stability_analysis.unstable_region_count
    );
    println!(
        "  Timing: {:.1} (avg offset {:.0} ms)",
        result.score_breakdown.timing_score, result.timing_analysis.average_time_offset_ms
    );
    if result.vibrato_analysis.vibrato_detected {
        println!(
            "  Vibrato: {:.1} Hz, {:.0} cents deep, regularity {:.0}",
            result.vibrato_analysis.vibrato_rate_hz,
            result.vibrato_analysis.vibrato_depth_cents,
            result.vibrato_analysis.regularity_score
        );
    } else {
        println!("  Vibrato: none detected");
    }
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);
    println!();
    for suggestion in &result.suggestions {
        println!("  > {}", suggestion);
    }

    Ok(())
}
