//! Vibrato detection
//!
//! Looks for periodic oscillation in the pitch-error signal at plausible
//! human vibrato rates (4–8 Hz by default). The dominant periodicity is found
//! with an FFT-accelerated autocorrelation (`ACF = IFFT(|FFT(x)|²)`) searched
//! over the lag range the rate band maps to, refined with parabolic
//! interpolation for sub-lag resolution.
//!
//! Absence of vibrato is the common case and is represented cleanly as
//! `vibrato_detected = false` with zeroed fields - never as default numbers
//! that could be mistaken for measurements.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::analysis::result::{AlignedPitchPair, VibratoAnalysis};
use crate::config::ComparisonConfig;

const EPSILON: f64 = 1e-12;

/// Detect vibrato over the comparable cent differences of an aligned pair list
pub fn analyze_pairs(pairs: &[AlignedPitchPair], config: &ComparisonConfig) -> VibratoAnalysis {
    let signal: Vec<f64> = pairs.iter().filter_map(|p| p.cent_difference).collect();
    analyze_signal(&signal, config)
}

/// Detect vibrato in a cents-scale signal over time
///
/// Detection requires a dominant periodicity inside the configured rate band,
/// oscillation depth at or above the minimum, and at least the minimum number
/// of complete cycles - a single wobble never counts.
///
/// # Arguments
///
/// * `signal_cents` - Pitch-error (or pitch) signal in cents, one value per frame
/// * `config` - Comparison configuration (rate band, depth and cycle minimums)
pub fn analyze_signal(signal_cents: &[f64], config: &ComparisonConfig) -> VibratoAnalysis {
    let n = signal_cents.len();
    let frame_rate = config.frame_rate();

    // Lag bounds for the rate band; lag 1 is never meaningful
    let lag_min = ((frame_rate / config.vibrato_max_rate_hz).floor() as usize).max(2);
    let lag_max = (frame_rate / config.vibrato_min_rate_hz).ceil() as usize;

    if n < 2 * lag_max + 2 {
        log::debug!("Vibrato: {} frames too short for lag range up to {}", n, lag_max);
        return VibratoAnalysis::none();
    }

    // Mean-removed oscillation
    let mean = signal_cents.iter().sum::<f64>() / n as f64;
    let oscillation: Vec<f64> = signal_cents.iter().map(|&v| v - mean).collect();

    // Depth from the oscillation RMS: √2·rms equals the peak amplitude of a
    // sinusoid (half the peak-to-peak swing), robust to sample phase
    let rms = (oscillation.iter().map(|v| v * v).sum::<f64>() / n as f64).sqrt();
    let depth_cents = rms * std::f64::consts::SQRT_2;

    if depth_cents < config.vibrato_min_depth_cents {
        log::debug!(
            "Vibrato: depth {:.1} cents below minimum {:.1}",
            depth_cents,
            config.vibrato_min_depth_cents
        );
        return VibratoAnalysis::none();
    }

    let acf = autocorrelation_fft(&oscillation);
    if acf[0] < EPSILON {
        return VibratoAnalysis::none();
    }

    // Dominant lag inside the rate band
    let search_max = lag_max.min(acf.len().saturating_sub(2));
    let mut best_lag = 0usize;
    let mut best_value = f64::NEG_INFINITY;
    for lag in lag_min..=search_max {
        let value = acf[lag] / acf[0];
        if value > best_value {
            best_value = value;
            best_lag = lag;
        }
    }

    if best_lag == 0 || best_value < config.vibrato_min_autocorr {
        log::debug!(
            "Vibrato: no dominant periodicity (best autocorr {:.2})",
            best_value.max(0.0)
        );
        return VibratoAnalysis::none();
    }

    // Parabolic interpolation around the ACF peak for sub-lag rate resolution
    let refined_lag = refine_peak(&acf, best_lag);
    let vibrato_rate_hz = frame_rate / refined_lag;

    // Cycle periods from peak picking, for the cycle count and regularity
    let peaks = pick_peaks(&oscillation, depth_cents * 0.5);
    let periods: Vec<f64> = peaks.windows(2).map(|w| (w[1] - w[0]) as f64).collect();

    if periods.len() < config.vibrato_min_cycles {
        log::debug!(
            "Vibrato: only {} complete cycle(s), need {}",
            periods.len(),
            config.vibrato_min_cycles
        );
        return VibratoAnalysis::none();
    }

    let period_mean = periods.iter().sum::<f64>() / periods.len() as f64;
    let period_variance = periods
        .iter()
        .map(|p| (p - period_mean).powi(2))
        .sum::<f64>()
        / periods.len() as f64;
    let regularity_score = (100.0 / (1.0 + period_variance)).clamp(0.0, 100.0);

    log::debug!(
        "Vibrato detected: {:.2} Hz, depth {:.1} cents, {} cycles, regularity {:.1}",
        vibrato_rate_hz,
        depth_cents,
        periods.len(),
        regularity_score
    );

    VibratoAnalysis {
        vibrato_detected: true,
        vibrato_rate_hz,
        vibrato_depth_cents: depth_cents,
        regularity_score,
    }
}

/// Compute autocorrelation using FFT acceleration
///
/// Uses the identity `ACF = IFFT(|FFT(signal)|²)` with zero-padding to the
/// next power of two, which turns the O(n²) sum into O(n log n). Values are
/// left unnormalized by overlap length; the caller normalizes by `acf[0]`.
fn autocorrelation_fft(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    for x in &mut buffer {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_size as f64;
    buffer[..n].iter().map(|x| (x.re * scale).max(0.0)).collect()
}

/// Refine an ACF peak position with parabolic interpolation
fn refine_peak(acf: &[f64], lag: usize) -> f64 {
    if lag == 0 || lag + 1 >= acf.len() {
        return lag as f64;
    }
    let y1 = acf[lag - 1];
    let y2 = acf[lag];
    let y3 = acf[lag + 1];
    let denom = y1 - 2.0 * y2 + y3;
    if denom.abs() < EPSILON {
        return lag as f64;
    }
    let delta = (0.5 * (y1 - y3) / denom).clamp(-0.5, 0.5);
    lag as f64 + delta
}

/// Indices of local maxima above an amplitude floor
fn pick_peaks(signal: &[f64], floor: f64) -> Vec<usize> {
    let mut peaks = Vec::new();
    for i in 1..signal.len().saturating_sub(1) {
        if signal[i] > signal[i - 1] && signal[i] >= signal[i + 1] && signal[i] > floor {
            peaks.push(i);
        }
    }
    peaks
}
