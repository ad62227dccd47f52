//! Arrival-time refinement
//!
//! - [`ar`]: Yule-Walker AR fitting and per-segment information criterion
//! - [`takanami`]: two-model AR-AIC split search around a coarse arrival

pub mod ar;
pub mod takanami;

/// Result of refining one arrival
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// Refined arrival, as a sample index into the full signal
    pub index: usize,

    /// Criterion value for every candidate split, in index order
    pub aic: Vec<f64>,

    /// Sample index of the first element of `aic`
    pub n0_aic: usize,
}
