//! Takanami-style AR-AIC arrival refinement
//!
//! Given a window bracketing a coarse arrival, every interior sample `k` is
//! tried as the boundary between a "noise" regime `[lo, k)` and an "event"
//! regime `[k, hi]`. Both sides get their own AR model and the split is
//! scored with the sum of the two segment criteria. The arrival is the split
//! with the lowest score.
//!
//! # Reference
//!
//! Takanami, T., & Kitagawa, G. (1988). A new efficient procedure for the
//! estimation of onset times of seismic waves.
//! *Journal of Physics of the Earth*, 36(6), 267-290.
//!
//! # Example
//!
//! ```
//! use arrival_picker::features::refinement::takanami::Takanami;
//!
//! let mut state = 17u64;
//! let samples: Vec<f64> = (0..400)
//!     .map(|i| {
//!         state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
//!         let u = ((state >> 33) as f64 / (1u64 << 31) as f64) * 2.0 - 1.0;
//!         if i < 250 { 0.05 * u } else { 4.0 * u }
//!     })
//!     .collect();
//!
//! let refinement = Takanami::default().refine(&samples, 150, 350)?;
//! assert!((refinement.index as i64 - 250).abs() <= 6);
//! # Ok::<(), arrival_picker::PickingError>(())
//! ```

use crate::config::RefinerConfig;
use crate::error::{PickingError, Result};
use crate::features::refinement::ar::fit_segment;
use crate::features::refinement::Refinement;
use crate::io::signal::{clip_inclusive, Signal};

/// AR-AIC arrival refiner
///
/// Holds nothing but its configuration, so one instance can refine any
/// number of arrivals from several threads.
#[derive(Debug, Clone, Default)]
pub struct Takanami {
    config: RefinerConfig,
}

impl Takanami {
    /// Create a refiner with the given AR configuration
    pub fn new(config: RefinerConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &RefinerConfig {
        &self.config
    }

    /// Refine an arrival inside the inclusive sample window `[t_start, t_end]`
    ///
    /// # Arguments
    ///
    /// * `samples` - The full signal
    /// * `t_start` - First sample of the search window (may be negative)
    /// * `t_end` - Last sample of the search window (may exceed the signal)
    ///
    /// # Returns
    ///
    /// The split minimising the criterion, the criterion curve and the sample
    /// index where the curve begins.
    ///
    /// # Errors
    ///
    /// `InvalidWindow` if fewer than `2 * segment_floor` samples remain after
    /// clipping, `DegenerateFit` if any AR fit in the window is singular.
    pub fn refine(&self, samples: &[f64], t_start: i64, t_end: i64) -> Result<Refinement> {
        self.config.validate()?;
        let floor = self.config.segment_floor();

        let window = clip_inclusive(samples.len(), t_start, t_end).ok_or_else(|| {
            PickingError::InvalidWindow(format!(
                "window [{}, {}] does not overlap a signal of {} samples",
                t_start,
                t_end,
                samples.len()
            ))
        })?;
        if window.len() < 2 * floor {
            return Err(PickingError::InvalidWindow(format!(
                "window [{}, {}] clips to {} samples, need at least {}",
                t_start,
                t_end,
                window.len(),
                2 * floor
            )));
        }

        let lo = window.start;
        let end = window.end;
        let first_split = lo + floor;
        let last_split = end - floor;

        log::debug!(
            "AR-AIC refinement over [{}, {}): splits {}..={}, order {:?}",
            lo,
            end,
            first_split,
            last_split,
            self.config.order
        );

        let mut aic = Vec::with_capacity(last_split - first_split + 1);
        let mut best_index = first_split;
        let mut best_score = f64::INFINITY;

        for k in first_split..=last_split {
            let noise = fit_segment(&samples[lo..k], self.config.order)
                .map_err(|e| degenerate_at(e, k, "noise"))?;
            let event = fit_segment(&samples[k..end], self.config.order)
                .map_err(|e| degenerate_at(e, k, "event"))?;

            let score = noise.score + event.score;
            if score < best_score {
                best_score = score;
                best_index = k;
            }
            aic.push(score);
        }

        log::debug!(
            "AR-AIC minimum {:.3} at sample {}",
            best_score,
            best_index
        );

        Ok(Refinement {
            index: best_index,
            aic,
            n0_aic: first_split,
        })
    }

    /// Refine an arrival within `margin_seconds` on each side of `center`
    pub fn refine_around(
        &self,
        signal: &Signal,
        center: usize,
        margin_seconds: f64,
    ) -> Result<Refinement> {
        if !margin_seconds.is_finite() || margin_seconds < 0.0 {
            return Err(PickingError::InvalidInput(format!(
                "Refinement margin must be non-negative, got {}",
                margin_seconds
            )));
        }
        let margin = signal.to_samples(margin_seconds);
        let center = center as i64;
        self.refine(
            signal.samples(),
            center.saturating_sub(margin),
            center.saturating_add(margin),
        )
    }
}

/// Tag a fit error with the split it happened at
fn degenerate_at(error: PickingError, k: usize, side: &str) -> PickingError {
    match error {
        PickingError::DegenerateFit(msg) => {
            PickingError::DegenerateFit(format!("{} segment at split {}: {}", side, k, msg))
        }
        other => other,
    }
}
