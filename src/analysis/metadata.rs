//! Detection run metadata

use serde::{Deserialize, Serialize};

/// Summary of the most recent detection run on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionMetadata {
    /// Crate version that produced the run
    pub algorithm_version: String,

    /// Name of the characteristic-function algorithm
    pub algorithm: String,

    /// Threshold used (`None` = picking mode)
    pub threshold: Option<f64>,

    /// Peak window in seconds
    pub peak_window_seconds: f64,

    /// Number of events produced
    pub event_count: usize,

    /// Events whose arrival was refined
    pub refined_count: usize,

    /// Events left at their coarse arrival because the AR fit was
    /// singular or the refinement window was too short
    pub refinement_failures: usize,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f32,
}

impl Default for DetectionMetadata {
    fn default() -> Self {
        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            algorithm: String::new(),
            threshold: None,
            peak_window_seconds: 0.0,
            event_count: 0,
            refined_count: 0,
            refinement_failures: 0,
            processing_time_ms: 0.0,
        }
    }
}
