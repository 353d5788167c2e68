//! Example: Score a batch of takes against one reference in parallel
//!
//! Simulates several singers of varying quality and scores them all with
//! rayon, printing a summary table sorted by score.

use rayon::prelude::*;
use vocalscore_dsp::{compare_performance, ComparisonConfig};

struct Take {
    name: &'static str,
    detune_cents: f64,
    jitter_cents: f64,
    delay_frames: usize,
}

fn build_reference() -> Vec<f64> {
    let notes = [220.0, 246.94, 261.63, 293.66, 261.63, 246.94];
    let mut values = Vec::new();
    for &note in &notes {
        values.extend(std::iter::repeat(note).take(20));
    }
    values
}

fn build_take(reference: &[f64], take: &Take) -> Vec<f64> {
    let mut recorded = vec![0.0; take.delay_frames];
    recorded.extend(reference.iter().enumerate().map(|(k, &note)| {
        // Deterministic alternating jitter keeps the takes reproducible
        let jitter = if k % 2 == 0 {
            take.jitter_cents
        } else {
            -take.jitter_cents
        };
        note * ((take.detune_cents + jitter) / 1200.0).exp2()
    }));
    recorded
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let reference = build_reference();
    let takes = [
        Take { name: "steady-ann", detune_cents: 3.0, jitter_cents: 2.0, delay_frames: 0 },
        Take { name: "sharp-bob", detune_cents: 65.0, jitter_cents: 4.0, delay_frames: 0 },
        Take { name: "wobbly-cat", detune_cents: 10.0, jitter_cents: 45.0, delay_frames: 0 },
        Take { name: "late-dee", detune_cents: 8.0, jitter_cents: 3.0, delay_frames: 5 },
        Take { name: "octave-eve", detune_cents: 1200.0, jitter_cents: 2.0, delay_frames: 0 },
    ];

    let mut rows: Vec<_> = takes
        .par_iter()
        .map(|take| {
            let recorded = build_take(&reference, take);
            let result = compare_performance(&reference, &recorded, ComparisonConfig::default())
                .expect("default config is valid");
            (take.name, result)
        })
        .collect();

    rows.sort_by(|a, b| {
        b.1.overall_score
            .partial_cmp(&a.1.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!(
        "{:<12} {:>7} {:>6} {:>7} {:>9} {:>7}",
        "take", "overall", "grade", "pitch", "stability", "timing"
    );
    for (name, result) in &rows {
        println!(
            "{:<12} {:>7.1} {:>6} {:>7.1} {:>9.1} {:>7.1}",
            name,
            result.overall_score,
            result.grade.letter(),
            result.score_breakdown.pitch_accuracy_score,
            result.score_breakdown.stability_score,
            result.score_breakdown.timing_score
        );
    }

    Ok(())
}
