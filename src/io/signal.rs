//! Immutable sampled signal

use std::ops::Range;
use std::sync::Arc;

use crate::error::{PickingError, Result};

/// Immutable sequence of samples with its sample rate
///
/// Samples are shared behind an `Arc`, so cloning a `Signal` is cheap and
/// refinement tasks can read it from several threads.
#[derive(Debug, Clone)]
pub struct Signal {
    samples: Arc<[f64]>,
    fs: f64,
}

impl Signal {
    /// Create a signal, validating the sample rate
    pub fn new(samples: Vec<f64>, fs: f64) -> Result<Self> {
        if !fs.is_finite() || fs <= 0.0 {
            return Err(PickingError::InvalidInput(format!(
                "Sample rate must be a positive number of Hz, got {}",
                fs
            )));
        }
        Ok(Self {
            samples: samples.into(),
            fs,
        })
    }

    /// Sample rate in Hz
    pub fn fs(&self) -> f64 {
        self.fs
    }

    /// All samples
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.fs
    }

    /// Sample index to seconds
    pub fn to_seconds(&self, index: usize) -> f64 {
        index as f64 / self.fs
    }

    /// Seconds to the nearest number of samples (may be negative)
    pub fn to_samples(&self, seconds: f64) -> i64 {
        (seconds * self.fs).round() as i64
    }

    /// Clip a signed inclusive index range to the valid sample range.
    ///
    /// Returns a half-open range, or `None` when nothing of the window
    /// overlaps the signal.
    pub fn clip(&self, start: i64, end: i64) -> Option<Range<usize>> {
        clip_inclusive(self.samples.len(), start, end)
    }
}

/// Clip an inclusive `[start, end]` window to `0..len`
pub(crate) fn clip_inclusive(len: usize, start: i64, end: i64) -> Option<Range<usize>> {
    if len == 0 || end < start || end < 0 {
        return None;
    }
    let last = len as i64 - 1;
    if start > last {
        return None;
    }
    let lo = start.max(0) as usize;
    let hi = end.min(last) as usize;
    Some(lo..hi + 1)
}
