//! Configuration parameters for detection and refinement

use serde::{Deserialize, Serialize};

use crate::error::{PickingError, Result};
use crate::features::refinement::ar::ArOrder;

/// Detection configuration passed to [`Record::detect`](crate::Record::detect)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Local maxima of the characteristic function at or above this value are
    /// reported (detection mode). `None` reports only the global maximum
    /// (picking mode).
    pub threshold: Option<f64>,

    /// Seconds on each side of a point used to decide whether it is a local
    /// maximum (default: 1.0). Ignored in picking mode.
    pub peak_window_seconds: f64,

    /// Refine every detected arrival with the AR-AIC refiner (default: false)
    pub refine: bool,

    /// Seconds on each side of a coarse arrival searched by the refiner
    /// (default: 5.0)
    pub refine_margin_seconds: f64,

    /// AR model settings used when `refine` is set
    pub refiner: RefinerConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            peak_window_seconds: 1.0,
            refine: false,
            refine_margin_seconds: 5.0,
            refiner: RefinerConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Detection-mode configuration with the given threshold
    pub fn detection(threshold: f64) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::default()
        }
    }

    /// Enable refinement with the given margin in seconds
    pub fn with_refinement(mut self, margin_seconds: f64) -> Self {
        self.refine = true;
        self.refine_margin_seconds = margin_seconds;
        self
    }

    /// Check parameter ranges before any work is done
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.threshold {
            if threshold.is_nan() || threshold == f64::INFINITY {
                return Err(PickingError::InvalidInput(format!(
                    "Threshold must be finite or -inf, got {}",
                    threshold
                )));
            }
        }
        if !self.peak_window_seconds.is_finite() || self.peak_window_seconds < 0.0 {
            return Err(PickingError::InvalidInput(format!(
                "Peak window must be a non-negative number of seconds, got {}",
                self.peak_window_seconds
            )));
        }
        if self.refine {
            if !self.refine_margin_seconds.is_finite() || self.refine_margin_seconds < 0.0 {
                return Err(PickingError::InvalidInput(format!(
                    "Refinement margin must be a non-negative number of seconds, got {}",
                    self.refine_margin_seconds
                )));
            }
            self.refiner.validate()?;
        }
        Ok(())
    }
}

/// AR-AIC refiner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinerConfig {
    /// AR model order, fixed or selected per segment (default: Fixed(2))
    pub order: ArOrder,

    /// Minimum number of samples on each side of a candidate split.
    /// `None` uses the smallest usable value, `max order + 1`.
    pub min_segment: Option<usize>,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            order: ArOrder::Fixed(2),
            min_segment: None,
        }
    }
}

impl RefinerConfig {
    /// Samples required on each side of a split
    pub fn segment_floor(&self) -> usize {
        let floor = self.order.max_order() + 1;
        self.min_segment.map_or(floor, |m| m.max(floor))
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.order.max_order() == 0 {
            return Err(PickingError::InvalidInput(
                "AR order must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = DetectionConfig::default();
        assert_eq!(config.threshold, None);
        assert_eq!(config.peak_window_seconds, 1.0);
        assert!(!config.refine);
        assert_eq!(config.refine_margin_seconds, 5.0);
        assert_eq!(config.refiner.order, ArOrder::Fixed(2));
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let config = DetectionConfig::detection(f64::NAN);
        assert!(matches!(config.validate(), Err(PickingError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_accepts_negative_infinity() {
        let config = DetectionConfig::detection(f64::NEG_INFINITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_window() {
        let config = DetectionConfig {
            peak_window_seconds: -1.0,
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_margin_only_checked_when_refining() {
        let mut config = DetectionConfig {
            refine_margin_seconds: f64::NAN,
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_ok());
        config.refine = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_segment_floor() {
        let config = RefinerConfig::default();
        assert_eq!(config.segment_floor(), 3);

        let config = RefinerConfig {
            order: ArOrder::Auto { max: 4 },
            min_segment: Some(20),
        };
        assert_eq!(config.segment_floor(), 20);

        let config = RefinerConfig {
            order: ArOrder::Fixed(6),
            min_segment: Some(2),
        };
        assert_eq!(config.segment_floor(), 7);
    }

    #[test]
    fn test_zero_order_rejected() {
        let config = RefinerConfig {
            order: ArOrder::Fixed(0),
            min_segment: None,
        };
        assert!(config.validate().is_err());
    }
}
