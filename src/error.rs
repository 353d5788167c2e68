//! Error types for the pitch comparison engine

use std::fmt;

/// Errors that can occur during a pitch comparison
#[derive(Debug, Clone)]
pub enum ComparisonError {
    /// Malformed configuration (rejected before any comparison runs)
    InvalidConfig(String),

    /// Invalid input parameters
    InvalidInput(String),

    /// Processing error during comparison
    ProcessingError(String),

    /// Numerical error (overflow, degenerate matrix, etc.)
    NumericalError(String),
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ComparisonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ComparisonError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            ComparisonError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for ComparisonError {}
