//! Banded DTW cumulative-cost matrix and path backtracking
//!
//! One implementation serves both shapes: the full matrix is a band whose
//! radius covers every cell. Rows store only their in-band span, so memory is
//! O(N·radius) in the banded case.

use super::cost::pair_cost;
use crate::analysis::result::AlignedPitchPair;
use crate::config::ComparisonConfig;
use crate::features::cents::cent_difference;
use crate::preprocessing::sequence::PitchSequence;

/// Cumulative-cost matrix restricted to |i − j| ≤ radius
struct BandedMatrix {
    radius: usize,
    cols: usize,
    /// Row-major in-band values; row i spans columns lo(i)..=hi(i)
    rows: Vec<Vec<f64>>,
}

impl BandedMatrix {
    fn new(rows: usize, cols: usize, radius: usize) -> Self {
        let rows = (0..rows)
            .map(|i| {
                let lo = i.saturating_sub(radius);
                let hi = (i + radius).min(cols - 1);
                vec![f64::INFINITY; hi - lo + 1]
            })
            .collect();
        Self { radius, cols, rows }
    }

    fn lo(&self, i: usize) -> usize {
        i.saturating_sub(self.radius)
    }

    fn hi(&self, i: usize) -> usize {
        (i + self.radius).min(self.cols - 1)
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        if j < self.lo(i) || j > self.hi(i) {
            return f64::INFINITY;
        }
        self.rows[i][j - self.lo(i)]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        let lo = self.lo(i);
        self.rows[i][j - lo] = value;
    }
}

/// Compute the DTW path for a given band radius
///
/// Matrix coordinates are (N+1)×(M+1): cell (i, j) with i, j ≥ 1 aligns
/// reference frame i−1 against recorded frame j−1; the first row and column
/// accumulate the per-step gap cost. Backtracking prefers the diagonal
/// predecessor on ties, which keeps warp runs as short as possible.
///
/// Returns the aligned pairs in forward time order and the cumulative cost at
/// the corner. The caller guarantees both sequences are non-empty and the
/// radius is at least |N − M|.
pub(super) fn align_with_radius(
    reference: &PitchSequence,
    recorded: &PitchSequence,
    radius: usize,
    config: &ComparisonConfig,
) -> (Vec<AlignedPitchPair>, f64) {
    let n = reference.len();
    let m = recorded.len();
    let ref_samples = reference.samples();
    let rec_samples = recorded.samples();

    let mut matrix = BandedMatrix::new(n + 1, m + 1, radius);
    matrix.set(0, 0, 0.0);

    // Edge cells accumulate pure insertion penalties
    for j in 1..=matrix.hi(0) {
        matrix.set(0, j, j as f64 * config.gap_cost_cents);
    }
    for i in 1..=n.min(radius) {
        matrix.set(i, 0, i as f64 * config.gap_cost_cents);
    }

    for i in 1..=n {
        let lo = matrix.lo(i).max(1);
        let hi = matrix.hi(i);
        for j in lo..=hi {
            let cell = pair_cost(&ref_samples[i - 1], &rec_samples[j - 1], config);
            let best_predecessor = matrix
                .get(i - 1, j - 1)
                .min(matrix.get(i - 1, j))
                .min(matrix.get(i, j - 1));
            matrix.set(i, j, cell + best_predecessor);
        }
    }

    let total_cost = matrix.get(n, m);

    // Backtrack from the corner, emitting a pair per interior cell; edge
    // cells are pure insertions and pair nothing.
    let mut pairs = Vec::with_capacity(n.max(m));
    let mut i = n;
    let mut j = m;
    while i > 0 && j > 0 {
        let reference_index = i - 1;
        let recorded_index = j - 1;
        let reference_pitch = ref_samples[reference_index].frequency_hz;
        let recorded_pitch = rec_samples[recorded_index].frequency_hz;
        pairs.push(AlignedPitchPair {
            reference_pitch,
            recorded_pitch,
            reference_index,
            recorded_index,
            cent_difference: cent_difference(reference_pitch, recorded_pitch),
        });

        let diagonal = matrix.get(i - 1, j - 1);
        let up = matrix.get(i - 1, j);
        let left = matrix.get(i, j - 1);

        if diagonal <= up && diagonal <= left {
            i -= 1;
            j -= 1;
        } else if up <= left {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    pairs.reverse();
    (pairs, total_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: &[f64]) -> PitchSequence {
        PitchSequence::from_hz(values)
    }

    #[test]
    fn test_diagonal_path_for_identical_input() {
        let config = ComparisonConfig::default();
        let s = seq(&[220.0, 330.0, 440.0]);
        let (pairs, cost) = align_with_radius(&s, &s, 3, &config);

        assert_eq!(pairs.len(), 3);
        assert!(cost.abs() < 1e-9);
        for (k, pair) in pairs.iter().enumerate() {
            assert_eq!((pair.reference_index, pair.recorded_index), (k, k));
        }
    }

    #[test]
    fn test_banded_matches_full_when_path_fits() {
        let config = ComparisonConfig::default();
        let reference = seq(&[220.0, 220.0, 330.0, 330.0, 440.0, 493.88, 440.0, 440.0]);
        let recorded = seq(&[220.0, 330.0, 330.0, 392.0, 440.0, 493.88, 440.0]);

        let (_, full_cost) = align_with_radius(&reference, &recorded, 8, &config);
        let (_, banded_cost) = align_with_radius(&reference, &recorded, 3, &config);
        assert!(
            (full_cost - banded_cost).abs() < 1e-9,
            "banded cost {} deviates from full cost {}",
            banded_cost,
            full_cost
        );
    }

    #[test]
    fn test_warp_absorbs_local_tempo_difference() {
        let config = ComparisonConfig::default();
        // Recorded holds the first note twice as long; same notes otherwise
        let reference = seq(&[220.0, 330.0, 440.0]);
        let recorded = seq(&[220.0, 220.0, 330.0, 440.0]);
        let (pairs, cost) = align_with_radius(&reference, &recorded, 4, &config);

        assert!(cost.abs() < 1e-9, "pure time warp should cost nothing");
        assert_eq!(pairs.last().unwrap().reference_index, 2);
        assert_eq!(pairs.last().unwrap().recorded_index, 3);
        // Recorded frame 1 aligns against reference frame 0 during the hold
        assert!(pairs
            .iter()
            .any(|p| p.reference_index == 0 && p.recorded_index == 1));
    }

    #[test]
    fn test_path_spans_both_sequences() {
        let config = ComparisonConfig::default();
        let reference = seq(&[220.0, 246.94, 261.63, 293.66]);
        let recorded = seq(&[220.0, 261.63, 293.66, 329.63, 293.66, 261.63]);
        let (pairs, _) = align_with_radius(&reference, &recorded, 6, &config);

        // Interior pairs cover the corner frames on both ends
        assert_eq!(pairs.first().unwrap().reference_index, 0);
        assert_eq!(pairs.first().unwrap().recorded_index, 0);
        assert_eq!(pairs.last().unwrap().reference_index, 3);
        assert_eq!(pairs.last().unwrap().recorded_index, 5);
    }
}
