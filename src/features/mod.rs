//! Feature analysis modules
//!
//! This module contains all comparison analyses:
//! - DTW alignment between reference and recorded contours
//! - Cent-difference math and pitch-accuracy scoring
//! - Stability (local jitter) analysis
//! - Vibrato detection
//! - Timing-offset estimation

pub mod alignment;
pub mod cents;
pub mod stability;
pub mod timing;
pub mod vibrato;
