//! Configuration parameters for pitch comparison
//!
//! Every tuning constant of the engine lives here, passed in explicitly at
//! the comparison entry point. There are no module-level tuning constants
//! elsewhere in the crate; tests can reproduce any behavior by varying a
//! single `ComparisonConfig` value.

use crate::analysis::result::ScoreWeights;
use crate::error::ComparisonError;

/// Tolerance for the weight-sum invariant check.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Comparison configuration parameters
///
/// `ComparisonConfig::default()` gives the calibrated defaults; callers that
/// override values must pass the result through [`ComparisonConfig::validate`]
/// (the engine does this on every invocation) and malformed configurations are
/// rejected with [`ComparisonError::InvalidConfig`] before any comparison runs.
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    // Frame timing
    /// Duration of one pitch frame in seconds (default: 0.032, ~31.25 frames/s)
    pub frame_duration_secs: f64,

    // DTW alignment
    /// Cost in cents charged when exactly one side of a cell is unvoiced (default: 300.0)
    /// Silence aligned against silence costs nothing.
    pub unvoiced_cost_cents: f64,

    /// Per-step cost in cents for leading insertions/deletions along the
    /// matrix edges (default: 150.0)
    pub gap_cost_cents: f64,

    /// Matrix size (N·M cells) above which the banded aligner is engaged
    /// (default: 4,000,000 - roughly two 64-second contours)
    pub max_full_matrix_cells: usize,

    /// Sakoe-Chiba band radius in frames for banded alignment (default: 128)
    /// The effective radius is widened to |N−M|+1 when the sequences differ
    /// in length by more than this.
    pub band_radius: usize,

    // Pitch accuracy
    /// Absolute cent error at or below which a pair counts as perfect (default: 50.0)
    pub perfect_threshold_cents: f64,

    /// Absolute cent error above which a pair earns no credit (default: 100.0)
    /// Credit falls off linearly between the perfect and acceptable thresholds.
    pub acceptable_threshold_cents: f64,

    // Stability
    /// Sliding window length in voiced frames (default: 10, ~320 ms)
    pub stability_window: usize,

    /// Score points deducted per cent of mean windowed standard deviation (default: 2.0)
    pub stability_penalty_per_cent: f64,

    /// Windowed standard deviation in cents above which a window is unstable (default: 30.0)
    pub unstable_std_threshold_cents: f64,

    // Vibrato
    /// Lower bound of the vibrato rate search band in Hz (default: 4.0)
    pub vibrato_min_rate_hz: f64,

    /// Upper bound of the vibrato rate search band in Hz (default: 8.0)
    pub vibrato_max_rate_hz: f64,

    /// Minimum oscillation depth in cents for a detection (default: 15.0)
    pub vibrato_min_depth_cents: f64,

    /// Minimum number of complete cycles observed for a detection (default: 3)
    /// Excludes spurious single wobbles.
    pub vibrato_min_cycles: usize,

    /// Minimum normalized autocorrelation at the dominant lag (default: 0.3)
    pub vibrato_min_autocorr: f64,

    // Timing
    /// Look-around half-window in frames for the local transition pattern (default: 3)
    pub timing_lookaround: usize,

    /// Offset tolerance band in milliseconds for the on-time classification
    /// (default: 64.0, two frames)
    pub timing_tolerance_ms: f64,

    /// Offset in milliseconds beyond which a delay counts as significant (default: 150.0)
    pub significant_delay_ms: f64,

    // Aggregation
    /// Sub-score weights (default: pitch 0.7, stability 0.2, timing 0.1)
    /// Must sum to exactly 1.0; validation rejects anything else rather than
    /// renormalizing.
    pub weights: ScoreWeights,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            frame_duration_secs: 0.032,
            unvoiced_cost_cents: 300.0,
            gap_cost_cents: 150.0,
            max_full_matrix_cells: 4_000_000,
            band_radius: 128,
            perfect_threshold_cents: 50.0,
            acceptable_threshold_cents: 100.0,
            stability_window: 10,
            stability_penalty_per_cent: 2.0,
            unstable_std_threshold_cents: 30.0,
            vibrato_min_rate_hz: 4.0,
            vibrato_max_rate_hz: 8.0,
            vibrato_min_depth_cents: 15.0,
            vibrato_min_cycles: 3,
            vibrato_min_autocorr: 0.3,
            timing_lookaround: 3,
            timing_tolerance_ms: 64.0,
            significant_delay_ms: 150.0,
            weights: ScoreWeights::default(),
        }
    }
}

impl ComparisonConfig {
    /// Frames per second implied by the frame duration
    pub fn frame_rate(&self) -> f64 {
        1.0 / self.frame_duration_secs
    }

    /// Duration of one frame in milliseconds
    pub fn frame_ms(&self) -> f64 {
        self.frame_duration_secs * 1000.0
    }

    /// Validate the configuration
    ///
    /// Invariant violations are fatal at this point, before any comparison
    /// runs. In particular the score weights must sum to 1.0 - they are never
    /// silently renormalized.
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<(), ComparisonError> {
        if !(self.frame_duration_secs.is_finite() && self.frame_duration_secs > 0.0) {
            return Err(ComparisonError::InvalidConfig(format!(
                "frame_duration_secs must be positive, got {}",
                self.frame_duration_secs
            )));
        }

        if !(self.unvoiced_cost_cents.is_finite() && self.unvoiced_cost_cents >= 0.0) {
            return Err(ComparisonError::InvalidConfig(format!(
                "unvoiced_cost_cents must be non-negative, got {}",
                self.unvoiced_cost_cents
            )));
        }

        if !(self.gap_cost_cents.is_finite() && self.gap_cost_cents >= 0.0) {
            return Err(ComparisonError::InvalidConfig(format!(
                "gap_cost_cents must be non-negative, got {}",
                self.gap_cost_cents
            )));
        }

        if self.band_radius == 0 {
            return Err(ComparisonError::InvalidConfig(
                "band_radius must be at least 1".to_string(),
            ));
        }

        if !(self.perfect_threshold_cents > 0.0
            && self.acceptable_threshold_cents > self.perfect_threshold_cents)
        {
            return Err(ComparisonError::InvalidConfig(format!(
                "cent thresholds must satisfy 0 < perfect < acceptable, got [{}, {}]",
                self.perfect_threshold_cents, self.acceptable_threshold_cents
            )));
        }

        if self.stability_window < 2 {
            return Err(ComparisonError::InvalidConfig(format!(
                "stability_window must be at least 2 frames, got {}",
                self.stability_window
            )));
        }

        if !(self.stability_penalty_per_cent.is_finite() && self.stability_penalty_per_cent > 0.0) {
            return Err(ComparisonError::InvalidConfig(format!(
                "stability_penalty_per_cent must be positive, got {}",
                self.stability_penalty_per_cent
            )));
        }

        if !(self.unstable_std_threshold_cents > 0.0) {
            return Err(ComparisonError::InvalidConfig(format!(
                "unstable_std_threshold_cents must be positive, got {}",
                self.unstable_std_threshold_cents
            )));
        }

        if !(self.vibrato_min_rate_hz > 0.0 && self.vibrato_max_rate_hz > self.vibrato_min_rate_hz)
        {
            return Err(ComparisonError::InvalidConfig(format!(
                "vibrato rate band must satisfy 0 < min < max, got [{}, {}]",
                self.vibrato_min_rate_hz, self.vibrato_max_rate_hz
            )));
        }

        if self.vibrato_max_rate_hz > self.frame_rate() / 2.0 {
            return Err(ComparisonError::InvalidConfig(format!(
                "vibrato_max_rate_hz {} exceeds the Nyquist rate for {} frames/s",
                self.vibrato_max_rate_hz,
                self.frame_rate()
            )));
        }

        if !(self.vibrato_min_depth_cents > 0.0) {
            return Err(ComparisonError::InvalidConfig(format!(
                "vibrato_min_depth_cents must be positive, got {}",
                self.vibrato_min_depth_cents
            )));
        }

        if self.vibrato_min_cycles == 0 {
            return Err(ComparisonError::InvalidConfig(
                "vibrato_min_cycles must be at least 1".to_string(),
            ));
        }

        if self.timing_lookaround == 0 {
            return Err(ComparisonError::InvalidConfig(
                "timing_lookaround must be at least 1 frame".to_string(),
            ));
        }

        if !(self.timing_tolerance_ms.is_finite() && self.timing_tolerance_ms >= 0.0) {
            return Err(ComparisonError::InvalidConfig(format!(
                "timing_tolerance_ms must be non-negative, got {}",
                self.timing_tolerance_ms
            )));
        }

        if self.significant_delay_ms < self.timing_tolerance_ms {
            return Err(ComparisonError::InvalidConfig(format!(
                "significant_delay_ms ({}) must not be smaller than timing_tolerance_ms ({})",
                self.significant_delay_ms, self.timing_tolerance_ms
            )));
        }

        let w = &self.weights;
        for (name, value) in [
            ("pitch_accuracy", w.pitch_accuracy),
            ("stability", w.stability),
            ("timing", w.timing),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ComparisonError::InvalidConfig(format!(
                    "weight {} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        let sum = w.pitch_accuracy + w.stability + w.timing;
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ComparisonError::InvalidConfig(format!(
                "score weights must sum to 1.0, got {:.6}",
                sum
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ComparisonConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_weight_sum() {
        let mut config = ComparisonConfig::default();
        config.weights.pitch_accuracy = 0.8; // sum now 1.1
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"), "got: {}", err);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut config = ComparisonConfig::default();
        config.weights.pitch_accuracy = 1.1;
        config.weights.stability = -0.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_cent_thresholds() {
        let config = ComparisonConfig {
            perfect_threshold_cents: 100.0,
            acceptable_threshold_cents: 50.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_frame_duration() {
        let config = ComparisonConfig {
            frame_duration_secs: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_vibrato_band_above_nyquist() {
        let config = ComparisonConfig {
            vibrato_max_rate_hz: 20.0, // Nyquist at 31.25 frames/s is ~15.6 Hz
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_significant_delay_below_tolerance() {
        let config = ComparisonConfig {
            timing_tolerance_ms: 100.0,
            significant_delay_ms: 50.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_rate_from_duration() {
        let config = ComparisonConfig::default();
        assert!((config.frame_rate() - 31.25).abs() < 1e-9);
        assert!((config.frame_ms() - 32.0).abs() < 1e-9);
    }
}
