//! Feature extraction modules
//!
//! - Characteristic-function algorithms (pluggable, STA/LTA built in)
//! - Peak extraction (picking and detection modes)
//! - AR-AIC arrival refinement

pub mod characteristic;
pub mod peaks;
pub mod refinement;
