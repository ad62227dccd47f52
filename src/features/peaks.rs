//! Peak extraction from a characteristic function
//!
//! Turns a characteristic function into discrete arrival candidates:
//! - **Picking mode** (no threshold): the single global maximum
//! - **Detection mode** (threshold): every point that dominates a window of
//!   `±round(peak_window_seconds * fs)` samples and reaches the threshold
//!
//! # Example
//!
//! ```
//! use arrival_picker::features::peaks::extract;
//!
//! let cf = vec![0.0, 2.0, 9.0, 2.0, 0.0, 0.0, 3.0, 0.0];
//! let peaks = extract(&cf, Some(1.0), 1.0, 1.0)?;
//! assert_eq!(peaks, vec![2, 6]);
//! # Ok::<(), arrival_picker::PickingError>(())
//! ```

use std::collections::VecDeque;

use crate::error::{PickingError, Result};

/// Which extraction policy a threshold selects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeakMode {
    /// Global maximum only
    Picking,
    /// All window-dominant points at or above the threshold
    Detection {
        /// Minimum qualifying value
        threshold: f64,
    },
}

impl PeakMode {
    /// `None` selects picking mode, `Some` selects detection mode
    pub fn from_threshold(threshold: Option<f64>) -> Self {
        match threshold {
            Some(threshold) => PeakMode::Detection { threshold },
            None => PeakMode::Picking,
        }
    }
}

/// Extract candidate arrival indices from a characteristic function
///
/// # Arguments
///
/// * `cf` - Characteristic function values
/// * `threshold` - `None` for picking mode, `Some(t)` for detection mode
/// * `peak_window_seconds` - Half-width of the local-maximum window in seconds
/// * `fs` - Sample rate in Hz
///
/// # Returns
///
/// Sample indices in ascending order. Picking mode always yields exactly one.
///
/// # Errors
///
/// `EmptyInput` for an empty `cf` in picking mode, `InvalidInput` for a
/// non-positive sample rate, a negative window or a NaN / +inf threshold.
pub fn extract(
    cf: &[f64],
    threshold: Option<f64>,
    peak_window_seconds: f64,
    fs: f64,
) -> Result<Vec<usize>> {
    match PeakMode::from_threshold(threshold) {
        PeakMode::Picking => Ok(vec![global_maximum(cf)?]),
        PeakMode::Detection { threshold } => {
            let window = window_samples(peak_window_seconds, fs)?;
            local_maxima(cf, threshold, window)
        }
    }
}

/// Convert a window in seconds to a half-width in samples
pub fn window_samples(peak_window_seconds: f64, fs: f64) -> Result<usize> {
    if !fs.is_finite() || fs <= 0.0 {
        return Err(PickingError::InvalidInput(format!(
            "Sample rate must be positive, got {}",
            fs
        )));
    }
    if !peak_window_seconds.is_finite() || peak_window_seconds < 0.0 {
        return Err(PickingError::InvalidInput(format!(
            "Peak window must be non-negative, got {}",
            peak_window_seconds
        )));
    }
    Ok((peak_window_seconds * fs).round() as usize)
}

/// Index of the first occurrence of the largest value
///
/// NaN values never win against a number.
pub fn global_maximum(cf: &[f64]) -> Result<usize> {
    let mut best: Option<usize> = None;
    for (i, &value) in cf.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) if value > cf[b] || (cf[b].is_nan() && !value.is_nan()) => best = Some(i),
            _ => {}
        }
    }
    best.ok_or_else(|| {
        PickingError::EmptyInput("Characteristic function has no samples".to_string())
    })
}

/// Indices that reach `threshold` and are the first maximum of
/// `[i - window, i + window]` clipped to the function.
///
/// Runs in O(n) with a monotonic deque: the deque front is always the
/// earliest index holding the window maximum, so a plateau yields only its
/// first sample.
pub fn local_maxima(cf: &[f64], threshold: f64, window: usize) -> Result<Vec<usize>> {
    if threshold.is_nan() || threshold == f64::INFINITY {
        return Err(PickingError::InvalidInput(format!(
            "Threshold must be finite or -inf, got {}",
            threshold
        )));
    }

    log::debug!(
        "Extracting peaks: {} values, threshold={:.3}, window=±{} samples",
        cf.len(),
        threshold,
        window
    );

    let n = cf.len();
    let mut peaks = Vec::new();
    let mut deque: VecDeque<usize> = VecDeque::new();
    let mut next = 0usize;

    for i in 0..n {
        let right = i.saturating_add(window).min(n - 1);
        while next <= right {
            // Keep equal values so the earliest of a plateau stays in front
            while let Some(&back) = deque.back() {
                if cf[back] < cf[next] {
                    deque.pop_back();
                } else {
                    break;
                }
            }
            deque.push_back(next);
            next += 1;
        }
        let left = i.saturating_sub(window);
        while let Some(&front) = deque.front() {
            if front < left {
                deque.pop_front();
            } else {
                break;
            }
        }

        if deque.front() == Some(&i) && cf[i] >= threshold {
            peaks.push(i);
        }
    }

    log::debug!("Found {} peaks", peaks.len());

    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Window maximum check done the slow way
    fn brute_force(cf: &[f64], threshold: f64, window: usize) -> Vec<usize> {
        (0..cf.len())
            .filter(|&i| {
                let lo = i.saturating_sub(window);
                let hi = (i + window).min(cf.len() - 1);
                cf[i] >= threshold
                    && (lo..i).all(|j| cf[j] < cf[i])
                    && (i + 1..=hi).all(|j| cf[j] <= cf[i])
            })
            .collect()
    }

    fn pseudo_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) as f64 / (1u64 << 31) as f64).abs()
            })
            .collect()
    }

    #[test]
    fn test_picking_mode_global_maximum() {
        let cf = vec![0.0, 1.0, 5.0, 2.0, 0.0];
        assert_eq!(extract(&cf, None, 1.0, 1.0).unwrap(), vec![2]);
        // window has no effect in picking mode
        assert_eq!(extract(&cf, None, 100.0, 50.0).unwrap(), vec![2]);
    }

    #[test]
    fn test_picking_mode_first_of_ties() {
        let cf = vec![1.0, 4.0, 4.0, 0.0];
        assert_eq!(extract(&cf, None, 1.0, 1.0).unwrap(), vec![1]);
    }

    #[test]
    fn test_picking_mode_empty() {
        let result = extract(&[], None, 1.0, 1.0);
        assert!(matches!(result, Err(PickingError::EmptyInput(_))));
    }

    #[test]
    fn test_detection_mode_basic() {
        let cf = vec![0.0, 2.0, 9.0, 2.0, 0.0, 0.0, 3.0, 0.0];
        assert_eq!(extract(&cf, Some(1.0), 1.0, 1.0).unwrap(), vec![2, 6]);
    }

    #[test]
    fn test_detection_mode_threshold_filters() {
        let cf = vec![0.0, 2.0, 9.0, 2.0, 0.0, 0.0, 3.0, 0.0];
        assert_eq!(extract(&cf, Some(5.0), 1.0, 1.0).unwrap(), vec![2]);
        assert!(extract(&cf, Some(10.0), 1.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_detection_mode_wide_window_suppresses_neighbours() {
        let cf = vec![0.0, 2.0, 9.0, 2.0, 0.0, 0.0, 3.0, 0.0];
        // window of 4 samples reaches from 6 back to 2
        assert_eq!(extract(&cf, Some(1.0), 4.0, 1.0).unwrap(), vec![2]);
    }

    #[test]
    fn test_detection_mode_plateau_single_representative() {
        let cf = vec![0.0, 5.0, 5.0, 5.0, 0.0];
        assert_eq!(extract(&cf, Some(1.0), 1.0, 1.0).unwrap(), vec![1]);

        let cf = vec![5.0; 6];
        assert_eq!(extract(&cf, Some(1.0), 1.0, 1.0).unwrap(), vec![0]);
    }

    #[test]
    fn test_detection_mode_zero_window_keeps_everything_above_threshold() {
        let cf = vec![0.5, 1.0, 3.0, 0.2, 2.0];
        assert_eq!(extract(&cf, Some(0.9), 0.0, 100.0).unwrap(), vec![1, 2, 4]);
    }

    #[test]
    fn test_negative_infinity_zero_window_matches_brute_force() {
        let cf = pseudo_noise(257, 7);
        let fast = local_maxima(&cf, f64::NEG_INFINITY, 0).unwrap();
        let slow = brute_force(&cf, f64::NEG_INFINITY, 0);
        assert_eq!(fast, slow);
        assert_eq!(fast.len(), cf.len());
    }

    #[test]
    fn test_matches_brute_force_on_noise() {
        for (seed, window) in [(1u64, 1usize), (2, 3), (3, 10), (4, 50)] {
            let cf = pseudo_noise(500, seed);
            let fast = local_maxima(&cf, 0.3, window).unwrap();
            let slow = brute_force(&cf, 0.3, window);
            assert_eq!(fast, slow, "seed {} window {}", seed, window);
        }
    }

    #[test]
    fn test_matches_brute_force_on_quantised_plateaus() {
        let cf: Vec<f64> = pseudo_noise(300, 11)
            .into_iter()
            .map(|v| (v * 4.0).floor())
            .collect();
        for window in [1usize, 2, 5] {
            assert_eq!(
                local_maxima(&cf, 0.0, window).unwrap(),
                brute_force(&cf, 0.0, window)
            );
        }
    }

    #[test]
    fn test_negative_threshold_not_clamped() {
        let cf = vec![-3.0, -1.0, -4.0];
        assert_eq!(extract(&cf, Some(-2.0), 1.0, 1.0).unwrap(), vec![1]);
    }

    #[test]
    fn test_detection_mode_empty_is_not_an_error() {
        assert!(extract(&[], Some(0.0), 1.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_window_rounding() {
        assert_eq!(window_samples(1.0, 50.0).unwrap(), 50);
        assert_eq!(window_samples(0.02, 100.0).unwrap(), 2);
        assert_eq!(window_samples(0.26, 10.0).unwrap(), 3);
        assert!(window_samples(-1.0, 50.0).is_err());
        assert!(window_samples(1.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let cf = vec![1.0, 2.0];
        assert!(extract(&cf, Some(f64::NAN), 1.0, 1.0).is_err());
        assert!(extract(&cf, Some(f64::INFINITY), 1.0, 1.0).is_err());
    }
}
