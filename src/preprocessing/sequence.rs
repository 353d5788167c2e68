//! Pitch sequence types and boundary normalization
//!
//! A [`PitchSequence`] is an ordered run of per-frame frequency readings.
//! Values at or below zero mean "no voiced pitch at this frame" - silence or
//! noise, never an error. Non-finite readings are normalized to unvoiced at
//! construction so nothing downstream has to guard against NaN. Indices are
//! never discarded: frame position is time position.

use serde::{Deserialize, Serialize};

/// Reference frequency for the cents scale (A1). Any fixed positive anchor
/// works; variance and differences in cents are anchor-independent.
const CENTS_REFERENCE_HZ: f64 = 55.0;

/// A single frequency reading at a fixed frame index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSample {
    /// Frequency in Hz; ≤ 0 means unvoiced
    pub frequency_hz: f64,
}

impl PitchSample {
    /// True when this frame carries a voiced pitch
    pub fn is_voiced(&self) -> bool {
        self.frequency_hz > 0.0
    }

    /// Frequency on a log scale in cents relative to a fixed anchor,
    /// or `None` for unvoiced frames
    pub fn cents(&self) -> Option<f64> {
        if self.is_voiced() {
            Some(1200.0 * (self.frequency_hz / CENTS_REFERENCE_HZ).log2())
        } else {
            None
        }
    }
}

/// Ordered sequence of pitch samples, insertion order = time order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchSequence {
    samples: Vec<PitchSample>,
}

impl PitchSequence {
    /// Build a sequence from raw Hz readings
    ///
    /// Readings ≤ 0, NaN, or infinite become unvoiced markers. Every index is
    /// kept so time alignment with the backing track is preserved.
    pub fn from_hz(values: &[f64]) -> Self {
        let samples = values
            .iter()
            .map(|&v| {
                let frequency_hz = if v.is_finite() && v > 0.0 { v } else { 0.0 };
                PitchSample { frequency_hz }
            })
            .collect();
        Self { samples }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the sequence holds no frames at all
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at a frame index
    pub fn get(&self, index: usize) -> Option<&PitchSample> {
        self.samples.get(index)
    }

    /// All samples in time order
    pub fn samples(&self) -> &[PitchSample] {
        &self.samples
    }

    /// Number of voiced frames
    pub fn voiced_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_voiced()).count()
    }

    /// Fraction of frames that are voiced (0.0 for an empty sequence)
    pub fn voiced_ratio(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.voiced_count() as f64 / self.samples.len() as f64
        }
    }

    /// Voiced frames as (frame index, cents) pairs in time order
    pub fn voiced_cents(&self) -> Vec<(usize, f64)> {
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.cents().map(|c| (i, c)))
            .collect()
    }

    /// Per-frame cents contour (`None` at unvoiced frames)
    pub fn cents_contour(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.cents()).collect()
    }

    /// Sequence duration in seconds for a given frame duration
    pub fn duration_seconds(&self, frame_duration_secs: f64) -> f64 {
        self.samples.len() as f64 * frame_duration_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hz_preserves_indices() {
        let seq = PitchSequence::from_hz(&[220.0, 0.0, -1.0, 440.0]);
        assert_eq!(seq.len(), 4);
        assert!(seq.get(0).unwrap().is_voiced());
        assert!(!seq.get(1).unwrap().is_voiced());
        assert!(!seq.get(2).unwrap().is_voiced());
        assert!(seq.get(3).unwrap().is_voiced());
    }

    #[test]
    fn test_from_hz_sanitizes_non_finite() {
        let seq = PitchSequence::from_hz(&[f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 100.0]);
        assert_eq!(seq.voiced_count(), 1);
        // Sanitized frames read back as plain unvoiced markers
        assert_eq!(seq.get(0).unwrap().frequency_hz, 0.0);
    }

    #[test]
    fn test_cents_octave_relation() {
        let low = PitchSample { frequency_hz: 220.0 };
        let high = PitchSample { frequency_hz: 440.0 };
        let diff = high.cents().unwrap() - low.cents().unwrap();
        assert!((diff - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_unvoiced_has_no_cents() {
        let silent = PitchSample { frequency_hz: 0.0 };
        assert!(silent.cents().is_none());
    }

    #[test]
    fn test_voiced_cents_skips_gaps() {
        let seq = PitchSequence::from_hz(&[220.0, 0.0, 220.0]);
        let voiced = seq.voiced_cents();
        assert_eq!(voiced.len(), 2);
        assert_eq!(voiced[0].0, 0);
        assert_eq!(voiced[1].0, 2);
    }

    #[test]
    fn test_duration_and_ratio() {
        let seq = PitchSequence::from_hz(&[220.0, 0.0, 220.0, 220.0]);
        assert!((seq.duration_seconds(0.032) - 0.128).abs() < 1e-12);
        assert!((seq.voiced_ratio() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sequence() {
        let seq = PitchSequence::from_hz(&[]);
        assert!(seq.is_empty());
        assert_eq!(seq.voiced_ratio(), 0.0);
    }
}
