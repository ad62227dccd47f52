//! STA/LTA characteristic function
//!
//! Ratio of short-term to long-term average energy. At sample `i` the STA
//! averages `x²` over the `sta` samples ending at `i`, the LTA over the
//! `lta + 1 - sta` samples `[i - lta, i + 1 - sta)` preceding the STA
//! window. Samples without a full LTA history get 0, so the function keeps
//! the signal's length and indexing.
//!
//! # Example
//!
//! ```
//! use arrival_picker::features::characteristic::sta_lta::{StaLta, StaLtaConfig};
//! use arrival_picker::CharacteristicAlgorithm;
//!
//! let alg = StaLta::new(StaLtaConfig { sta_seconds: 0.1, lta_seconds: 1.0 });
//! let signal = vec![0.01f64; 1000];
//! let cf = alg.characteristic_function(&signal, 100.0)?;
//! assert_eq!(cf.len(), signal.len());
//! # Ok::<(), arrival_picker::PickingError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::CharacteristicAlgorithm;
use crate::error::{PickingError, Result};

/// Energy below which the LTA is treated as silence
const EPSILON: f64 = 1e-30;

/// STA/LTA window lengths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaLtaConfig {
    /// Short-term window in seconds (default: 5.0)
    pub sta_seconds: f64,
    /// Long-term window in seconds, including the STA window (default: 100.0)
    pub lta_seconds: f64,
}

impl Default for StaLtaConfig {
    fn default() -> Self {
        Self {
            sta_seconds: 5.0,
            lta_seconds: 100.0,
        }
    }
}

/// STA/LTA detector
#[derive(Debug, Clone, Default)]
pub struct StaLta {
    config: StaLtaConfig,
}

impl StaLta {
    /// Name reported as the event method
    pub const NAME: &'static str = "STA-LTA";

    /// Create a detector with the given windows
    pub fn new(config: StaLtaConfig) -> Self {
        Self { config }
    }

    /// Window lengths in use
    pub fn config(&self) -> &StaLtaConfig {
        &self.config
    }

    fn window_lengths(&self, fs: f64) -> Result<(usize, usize)> {
        if !fs.is_finite() || fs <= 0.0 {
            return Err(PickingError::InvalidInput(format!(
                "Sample rate must be positive, got {}",
                fs
            )));
        }
        let sta = (self.config.sta_seconds * fs).round();
        let lta = (self.config.lta_seconds * fs).round();
        if !(sta >= 1.0 && lta.is_finite() && lta > sta) {
            return Err(PickingError::InvalidInput(format!(
                "STA/LTA windows must satisfy 1 <= sta < lta samples, got sta={} lta={}",
                sta, lta
            )));
        }
        Ok((sta as usize, lta as usize))
    }
}

impl CharacteristicAlgorithm for StaLta {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn characteristic_function(&self, signal: &[f64], fs: f64) -> Result<Vec<f64>> {
        let (sta_len, lta_len) = self.window_lengths(fs)?;

        log::debug!(
            "Computing STA/LTA: {} samples, sta={} lta={}",
            signal.len(),
            sta_len,
            lta_len
        );

        // energy[i] = sum of x² over signal[..i]
        let mut energy = Vec::with_capacity(signal.len() + 1);
        energy.push(0.0);
        let mut acc = 0.0;
        for x in signal {
            acc += x * x;
            energy.push(acc);
        }

        let mut cf = vec![0.0; signal.len()];
        for i in lta_len..signal.len() {
            let sta_start = i + 1 - sta_len;
            let sta = (energy[i + 1] - energy[sta_start]) / sta_len as f64;

            let lta_start = i - lta_len;
            let lta = (energy[sta_start] - energy[lta_start]) / (sta_start - lta_start) as f64;

            if lta > EPSILON {
                cf[i] = (sta / lta).max(0.0);
            }
        }

        Ok(cf)
    }
}
