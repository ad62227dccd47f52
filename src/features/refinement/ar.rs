//! Autoregressive model fitting
//!
//! Segments are fitted with the Yule-Walker equations: the biased
//! autocorrelation of the mean-removed segment is solved by Levinson-Durbin
//! recursion, which also yields the prediction-error variance of every order
//! up to the requested one. Each segment is scored with
//!
//! ```text
//! AIC = m * ln(sigma2_p) + 2 * (p + 1)
//! ```
//!
//! where `m` is the segment length and `sigma2_p` the order-`p` prediction
//! error variance.

use serde::{Deserialize, Serialize};

use crate::error::{PickingError, Result};

/// Prediction-error variance below this fraction of the zero-lag
/// autocorrelation is treated as a singular fit.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Zero-lag autocorrelation below this fraction of the mean square is
/// treated as a constant segment.
const CONSTANT_TOLERANCE: f64 = 1e-24;

/// AR model order policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArOrder {
    /// Always fit this order
    Fixed(usize),
    /// Pick the order in `1..=max` with the lowest criterion per segment
    Auto {
        /// Highest order tried
        max: usize,
    },
}

impl ArOrder {
    /// Highest order this policy may fit
    pub fn max_order(&self) -> usize {
        match *self {
            ArOrder::Fixed(p) => p,
            ArOrder::Auto { max } => max,
        }
    }
}

/// AR fit of one segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFit {
    /// Order actually used
    pub order: usize,
    /// Prediction-error variance at that order
    pub variance: f64,
    /// Segment information criterion (lower is better)
    pub score: f64,
}

/// Levinson-Durbin solution
#[derive(Debug, Clone, PartialEq)]
pub struct Levinson {
    /// Prediction coefficients `a[0..p]`, `x[n] ~ sum a[j] * x[n - 1 - j]`
    pub coefficients: Vec<f64>,
    /// Prediction-error variance for orders `0..=p`
    pub errors: Vec<f64>,
}

/// Biased autocorrelation of the mean-removed data for lags `0..=max_lag`
pub fn autocorrelation(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return vec![0.0; max_lag + 1];
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    (0..=max_lag)
        .map(|lag| {
            if lag >= n {
                return 0.0;
            }
            let sum: f64 = data[..n - lag]
                .iter()
                .zip(&data[lag..])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum();
            sum / n as f64
        })
        .collect()
}

/// Solve the Yule-Walker equations of the given order
///
/// # Errors
///
/// `DegenerateFit` when the zero-lag term or any intermediate prediction
/// error is not strictly positive, i.e. the Toeplitz system is singular.
pub fn levinson_durbin(r: &[f64], order: usize) -> Result<Levinson> {
    if r.len() <= order {
        return Err(PickingError::InvalidInput(format!(
            "Need {} autocorrelation lags for order {}, got {}",
            order + 1,
            order,
            r.len()
        )));
    }
    let r0 = r[0];
    if !(r0.is_finite() && r0 > 0.0) {
        return Err(PickingError::DegenerateFit(format!(
            "zero-lag autocorrelation is {}",
            r0
        )));
    }

    let mut a = vec![0.0; order];
    let mut prev = vec![0.0; order];
    let mut errors = Vec::with_capacity(order + 1);
    let mut error = r0;
    errors.push(error);

    for i in 0..order {
        let mut acc = r[i + 1];
        for j in 0..i {
            acc -= prev[j] * r[i - j];
        }
        let k = acc / error;

        a[i] = k;
        for j in 0..i {
            a[j] = prev[j] - k * prev[i - 1 - j];
        }

        error *= 1.0 - k * k;
        if !(error.is_finite() && error > r0 * SINGULAR_TOLERANCE) {
            return Err(PickingError::DegenerateFit(format!(
                "prediction error vanishes at order {}",
                i + 1
            )));
        }
        errors.push(error);
        prev[..=i].copy_from_slice(&a[..=i]);
    }

    Ok(Levinson {
        coefficients: a,
        errors,
    })
}

/// Information criterion of a segment of `len` samples
pub fn segment_aic(len: usize, variance: f64, order: usize) -> f64 {
    len as f64 * variance.ln() + 2.0 * (order as f64 + 1.0)
}

/// Fit an AR model to `data` and score it
///
/// # Errors
///
/// `InvalidInput` if the segment is shorter than `order + 1` samples,
/// `DegenerateFit` for constant or perfectly predictable segments.
pub fn fit_segment(data: &[f64], order: ArOrder) -> Result<SegmentFit> {
    let max_order = order.max_order();
    if max_order == 0 {
        return Err(PickingError::InvalidInput(
            "AR order must be at least 1".to_string(),
        ));
    }
    if data.len() <= max_order {
        return Err(PickingError::InvalidInput(format!(
            "Segment of {} samples is too short for AR order {}",
            data.len(),
            max_order
        )));
    }

    let r = autocorrelation(data, max_order);
    let mean_square = data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64;
    if r[0] <= mean_square * CONSTANT_TOLERANCE {
        return Err(PickingError::DegenerateFit(format!(
            "constant segment of {} samples",
            data.len()
        )));
    }

    let solution = levinson_durbin(&r, max_order)?;
    let m = data.len();

    let fit = match order {
        ArOrder::Fixed(p) => {
            let variance = solution.errors[p];
            SegmentFit {
                order: p,
                variance,
                score: segment_aic(m, variance, p),
            }
        }
        ArOrder::Auto { max } => {
            let mut best: Option<SegmentFit> = None;
            for p in 1..=max {
                let variance = solution.errors[p];
                let score = segment_aic(m, variance, p);
                if best.as_ref().map_or(true, |b| score < b.score) {
                    best = Some(SegmentFit {
                        order: p,
                        variance,
                        score,
                    });
                }
            }
            // max >= 1 was checked above
            best.ok_or_else(|| {
                PickingError::InvalidInput("AR order must be at least 1".to_string())
            })?
        }
    };

    Ok(fit)
}
