//! DTW alignment between reference and recorded pitch sequences
//!
//! Computes a monotonic, non-crossing alignment between the two contours
//! using a perceptual pitch-distance cost matrix, then backtracks the
//! minimal-cost warping path into an ordered list of
//! [`AlignedPitchPair`](crate::analysis::result::AlignedPitchPair).
//!
//! Mismatched sequence lengths are the normal case - DTW exists precisely to
//! handle them - and never produce an error. For large inputs the aligner
//! switches to a Sakoe-Chiba band to bound memory; see [`align`].

mod cost;
mod dtw;

pub use cost::pair_cost;

use crate::analysis::result::AlignedPitchPair;
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::preprocessing::sequence::PitchSequence;

/// Alignment output: the warping path and its cost
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Aligned pairs in forward time order
    pub pairs: Vec<AlignedPitchPair>,

    /// Total cumulative cost of the minimal path
    pub total_cost: f64,

    /// Total cost divided by the path length (0.0 for an empty alignment)
    pub normalized_cost: f64,

    /// Band radius the matrix was restricted to, when banding was engaged
    pub band_radius: Option<usize>,
}

impl Alignment {
    fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            total_cost: 0.0,
            normalized_cost: 0.0,
            band_radius: None,
        }
    }
}

/// Align two pitch sequences
///
/// Builds the cumulative-cost matrix with the standard DTW recurrence
/// `C(i,j) = cost(i,j) + min(C(i−1,j), C(i,j−1), C(i−1,j−1))` and backtracks
/// from `C(N,M)` to `C(0,0)`, emitting pairs in forward time order.
///
/// When `N·M` exceeds `config.max_full_matrix_cells` the matrix is restricted
/// to a Sakoe-Chiba band of radius `max(config.band_radius, |N−M|+1)`. This
/// bounds memory to O(N·band) and is required, not optional, for long
/// recordings.
///
/// # Arguments
///
/// * `reference` - Reference pitch sequence (from the backing track)
/// * `recorded` - Recorded pitch sequence (from the singer)
/// * `config` - Comparison configuration (costs and banding thresholds)
///
/// # Returns
///
/// An [`Alignment`] holding the ordered pair list and the minimal cumulative
/// cost. Either sequence empty yields an empty alignment (downstream
/// components report insufficient data).
///
/// # Errors
///
/// Returns `ComparisonError::NumericalError` if the matrix corner is
/// unreachable, which cannot happen for a band radius ≥ |N−M|.
pub fn align(
    reference: &PitchSequence,
    recorded: &PitchSequence,
    config: &ComparisonConfig,
) -> Result<Alignment, ComparisonError> {
    let n = reference.len();
    let m = recorded.len();

    if n == 0 || m == 0 {
        log::debug!("Empty input sequence(s): reference={} recorded={}", n, m);
        return Ok(Alignment::empty());
    }

    let length_gap = n.abs_diff(m);
    let banded = n.saturating_mul(m) > config.max_full_matrix_cells;
    let radius = if banded {
        config.band_radius.max(length_gap + 1)
    } else {
        // Full matrix: a band wide enough to cover every cell
        n.max(m)
    };

    log::debug!(
        "Aligning {}x{} frames (banded={}, radius={})",
        n,
        m,
        banded,
        radius
    );

    let (pairs, total_cost) = dtw::align_with_radius(reference, recorded, radius, config);

    if !total_cost.is_finite() {
        return Err(ComparisonError::NumericalError(format!(
            "DTW corner unreachable for {}x{} matrix with radius {}",
            n, m, radius
        )));
    }

    let normalized_cost = if pairs.is_empty() {
        0.0
    } else {
        total_cost / pairs.len() as f64
    };

    log::debug!(
        "Alignment done: {} pairs, total cost {:.1}, normalized {:.2}",
        pairs.len(),
        total_cost,
        normalized_cost
    );

    Ok(Alignment {
        pairs,
        total_cost,
        normalized_cost,
        band_radius: if banded { Some(radius) } else { None },
    })
}
