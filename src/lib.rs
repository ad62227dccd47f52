//! # Arrival Picker
//!
//! Detection and refinement of transient arrivals (e.g. seismic phases) in
//! long time series.
//!
//! ## Features
//!
//! - **Pluggable detectors**: any characteristic-function algorithm behind
//!   [`CharacteristicAlgorithm`]; STA/LTA is built in
//! - **Peak extraction**: global maximum (picking) or thresholded local
//!   maxima (detection)
//! - **AR-AIC refinement**: Takanami-style two-model split search around each
//!   coarse arrival
//! - **Records and events**: ownership, sorting and review metadata
//!
//! ## Quick Start
//!
//! ```no_run
//! use arrival_picker::{DetectionConfig, Record, Signal, StaLta};
//!
//! let samples: Vec<f64> = vec![]; // Your trace
//! let mut record = Record::new(Signal::new(samples, 50.0)?);
//!
//! let config = DetectionConfig::detection(3.0).with_refinement(5.0);
//! for event in record.detect(&StaLta::default(), &config)? {
//!     println!("{} at {:.2} s", event.method, event.time_seconds(50.0));
//! }
//! # Ok::<(), arrival_picker::PickingError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Signal → Characteristic function → Peak extraction → Events → AR-AIC refinement
//! ```
//!
//! All times are sample indices internally; seconds appear only through the
//! conversion helpers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;

use rayon::prelude::*;

// Re-export main types
pub use analysis::event::{Event, Method, Mode, SortKey, Status};
pub use analysis::metadata::DetectionMetadata;
pub use analysis::record::{Record, RecordFactory, RecordId};
pub use config::{DetectionConfig, RefinerConfig};
pub use error::{PickingError, Result};
pub use features::characteristic::registry::AlgorithmRegistry;
pub use features::characteristic::sta_lta::{StaLta, StaLtaConfig};
pub use features::characteristic::{AlgorithmOutput, CharacteristicAlgorithm};
pub use features::refinement::ar::ArOrder;
pub use features::refinement::takanami::Takanami;
pub use features::refinement::Refinement;
pub use io::signal::Signal;
pub use io::source::{MemorySource, SignalSource};

/// Run detection on several independent records in parallel
///
/// Each record is handled by one rayon task; a failure on one record does
/// not affect the others.
///
/// # Returns
///
/// The number of events found per record, in record order
///
/// # Example
///
/// ```
/// use arrival_picker::{detect_all, DetectionConfig, Record, Signal, StaLta, StaLtaConfig};
///
/// let mut records: Vec<Record> = (0..3)
///     .map(|_| Record::new(Signal::new(vec![0.0; 10], 10.0).unwrap()))
///     .collect();
/// let alg = StaLta::new(StaLtaConfig { sta_seconds: 0.1, lta_seconds: 0.5 });
/// let results = detect_all(&mut records, &alg, &DetectionConfig::default());
/// assert_eq!(results.len(), 3);
/// ```
pub fn detect_all<A>(
    records: &mut [Record],
    algorithm: &A,
    config: &DetectionConfig,
) -> Vec<Result<usize>>
where
    A: CharacteristicAlgorithm + ?Sized,
{
    log::debug!("Detecting on {} records", records.len());

    records
        .par_iter_mut()
        .map(|record| record.detect(algorithm, config).map(|events| events.len()))
        .collect()
}
