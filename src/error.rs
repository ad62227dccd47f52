//! Error types for arrival detection and refinement

use std::fmt;

/// Errors that can occur while detecting or refining arrivals
#[derive(Debug, Clone, PartialEq)]
pub enum PickingError {
    /// No data to search (e.g. an empty characteristic function in picking mode)
    EmptyInput(String),

    /// Refinement window cannot be clipped to a usable range
    InvalidWindow(String),

    /// AR fit is numerically singular (constant or perfectly predictable segment)
    DegenerateFit(String),

    /// Sorting requested by a field that is not a totally ordered scalar
    UnsupportedSortKey(String),

    /// Invalid parameters (sample rate, window lengths, thresholds, indices)
    InvalidInput(String),

    /// Signal source could not provide samples
    SourceError(String),
}

impl fmt::Display for PickingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickingError::EmptyInput(msg) => write!(f, "Empty input: {}", msg),
            PickingError::InvalidWindow(msg) => write!(f, "Invalid window: {}", msg),
            PickingError::DegenerateFit(msg) => write!(f, "Degenerate AR fit: {}", msg),
            PickingError::UnsupportedSortKey(key) => {
                write!(f, "Sorting not allowed using key '{}'", key)
            }
            PickingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PickingError::SourceError(msg) => write!(f, "Signal source error: {}", msg),
        }
    }
}

impl std::error::Error for PickingError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PickingError>;
