//! Records: a signal, its characteristic function and its events
//!
//! # Example
//!
//! ```
//! use arrival_picker::{DetectionConfig, Record, Signal, StaLta, StaLtaConfig};
//!
//! let mut state = 5u64;
//! let samples: Vec<f64> = (0..3000)
//!     .map(|i| {
//!         state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
//!         let u = ((state >> 33) as f64 / (1u64 << 31) as f64) * 2.0 - 1.0;
//!         if i < 2000 { 0.01 * u } else { u }
//!     })
//!     .collect();
//!
//! let mut record = Record::new(Signal::new(samples, 100.0)?).with_label("station-a");
//! let alg = StaLta::new(StaLtaConfig { sta_seconds: 0.2, lta_seconds: 5.0 });
//! let events = record.detect(&alg, &DetectionConfig::default().with_refinement(1.0))?;
//!
//! assert_eq!(events.len(), 1);
//! assert!((events[0].time as i64 - 2000).abs() < 20);
//! # Ok::<(), arrival_picker::PickingError>(())
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::event::{Event, Method, Mode, SortKey, Status};
use super::metadata::DetectionMetadata;
use crate::config::DetectionConfig;
use crate::error::{PickingError, Result};
use crate::features::characteristic::CharacteristicAlgorithm;
use crate::features::refinement::takanami::Takanami;
use crate::features::refinement::Refinement;
use crate::io::signal::Signal;
use crate::io::source::SignalSource;

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique record identifier, used by events to refer back to their
/// record without owning it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        RecordId(NEXT_RECORD_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw value
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A signal with its characteristic function and detected events
///
/// The record owns its events; events carry only the record's [`RecordId`].
/// [`detect`](Self::detect) replaces the characteristic function and the
/// event list together, and leaves both untouched when it fails.
///
/// Cloning allocates a new [`RecordId`] and points the copied events at it.
#[derive(Debug)]
pub struct Record {
    id: RecordId,
    signal: Signal,
    cf: Vec<f64>,
    events: Vec<Event>,
    last_detection: Option<DetectionMetadata>,

    /// Short identifier of the data
    pub label: String,

    /// Free-text description
    pub description: String,

    /// Where the samples came from (usually a file path)
    pub source: String,
}

impl Clone for Record {
    fn clone(&self) -> Self {
        let id = RecordId::next();
        Self {
            id,
            signal: self.signal.clone(),
            cf: self.cf.clone(),
            events: self
                .events
                .iter()
                .map(|e| Event {
                    record: id,
                    ..e.clone()
                })
                .collect(),
            last_detection: self.last_detection.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            source: self.source.clone(),
        }
    }
}

impl Record {
    /// Create a record around a signal
    pub fn new(signal: Signal) -> Self {
        Self {
            id: RecordId::next(),
            signal,
            cf: Vec::new(),
            events: Vec::new(),
            last_detection: None,
            label: String::new(),
            description: String::new(),
            source: String::new(),
        }
    }

    /// Read a signal source into a record
    ///
    /// `fs` is used when the source does not report its own sample rate.
    /// The label defaults to the file stem of the source identifier.
    pub fn from_source(source: &dyn SignalSource, fs: f64) -> Result<Self> {
        let samples = source.read()?;
        let fs = source.sample_rate().unwrap_or(fs);
        let signal = Signal::new(samples, fs)?;
        let identifier = source.identifier();
        Ok(Self::new(signal)
            .with_source(identifier)
            .with_label(default_label(identifier)))
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the source identifier, and the label from it if none is set
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        if self.label.is_empty() {
            self.label = default_label(&self.source);
        }
        self
    }

    /// Identifier shared with this record's events
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// The raw signal
    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// Sample rate in Hz
    pub fn fs(&self) -> f64 {
        self.signal.fs()
    }

    /// Signal duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.signal.duration_seconds()
    }

    /// Characteristic function of the last detection run (empty before)
    pub fn characteristic_function(&self) -> &[f64] {
        &self.cf
    }

    /// Events, in list order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Mutable access for manual edits (status, name, comments...)
    pub fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    /// Event at `index`
    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Summary of the last successful detection run
    pub fn last_detection(&self) -> Option<&DetectionMetadata> {
        self.last_detection.as_ref()
    }

    /// Arrival times of all events in seconds
    pub fn event_times_seconds(&self) -> Vec<f64> {
        let fs = self.fs();
        self.events.iter().map(|e| e.time_seconds(fs)).collect()
    }

    /// Run a characteristic-function algorithm and build the event list
    ///
    /// # Steps
    ///
    /// 1. Compute the characteristic function and candidates with `algorithm`
    /// 2. Create one automatic, reported event per candidate
    /// 3. If `config.refine` is set, refine each event with the AR-AIC
    ///    refiner over `time ± refine_margin_seconds` (in parallel). Events
    ///    whose AR fit is singular, or whose window is clipped too short by
    ///    the signal edges, keep their coarse arrival.
    /// 4. Replace the characteristic function and events
    ///
    /// # Errors
    ///
    /// Invalid configuration, algorithm failures, `EmptyInput` in picking
    /// mode and `InvalidWindow` when the whole signal is shorter than two
    /// refinement segments are fatal; the record is left as it was.
    pub fn detect<A>(&mut self, algorithm: &A, config: &DetectionConfig) -> Result<&[Event]>
    where
        A: CharacteristicAlgorithm + ?Sized,
    {
        let start_time = Instant::now();
        config.validate()?;

        log::debug!(
            "Detecting on record '{}': {} samples at {} Hz with {}",
            self.label,
            self.signal.len(),
            self.fs(),
            algorithm.name()
        );

        let output = algorithm.run(
            self.signal.samples(),
            self.fs(),
            config.threshold,
            config.peak_window_seconds,
        )?;
        let cf = output.cf;

        if cf.len() > self.signal.len() {
            return Err(PickingError::InvalidInput(format!(
                "Characteristic function has {} values for a signal of {} samples",
                cf.len(),
                self.signal.len()
            )));
        }

        let method = Method::from_label(algorithm.name());
        let mut events = Vec::with_capacity(output.candidates.len());
        for &t in &output.candidates {
            let cf_value = *cf.get(t).ok_or_else(|| {
                PickingError::InvalidInput(format!(
                    "Candidate {} lies outside the characteristic function ({} values)",
                    t,
                    cf.len()
                ))
            })?;
            events.push(
                Event::new(self.id, t, cf_value)
                    .with_method(method)
                    .with_mode(Mode::Automatic)
                    .with_status(Status::Reported),
            );
        }

        let mut refined_count = 0;
        let mut refinement_failures = 0;
        if config.refine && !events.is_empty() {
            let floor = config.refiner.segment_floor();
            if self.signal.len() < 2 * floor {
                return Err(PickingError::InvalidWindow(format!(
                    "signal of {} samples is shorter than two {}-sample segments",
                    self.signal.len(),
                    floor
                )));
            }

            let refiner = Takanami::new(config.refiner.clone());
            let margin = self.signal.to_samples(config.refine_margin_seconds);
            let samples = self.signal.samples();

            let outcomes: Vec<Result<Refinement>> = events
                .par_iter()
                .map(|event| {
                    let center = event.time as i64;
                    refiner.refine(
                        samples,
                        center.saturating_sub(margin),
                        center.saturating_add(margin),
                    )
                })
                .collect();

            for (event, outcome) in events.iter_mut().zip(outcomes) {
                match outcome {
                    Ok(refinement) => {
                        apply_refinement(event, refinement, &cf);
                        refined_count += 1;
                    }
                    Err(PickingError::DegenerateFit(msg) | PickingError::InvalidWindow(msg)) => {
                        log::warn!(
                            "Keeping coarse arrival at sample {} on record '{}': {}",
                            event.time,
                            self.label,
                            msg
                        );
                        refinement_failures += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        let metadata = DetectionMetadata {
            algorithm: algorithm.name().to_string(),
            threshold: config.threshold,
            peak_window_seconds: config.peak_window_seconds,
            event_count: events.len(),
            refined_count,
            refinement_failures,
            processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
            ..DetectionMetadata::default()
        };

        log::info!(
            "Record '{}': {} events ({} refined, {} kept coarse) in {:.2} ms",
            self.label,
            metadata.event_count,
            metadata.refined_count,
            metadata.refinement_failures,
            metadata.processing_time_ms
        );

        self.cf = cf;
        self.events = events;
        self.last_detection = Some(metadata);

        Ok(&self.events)
    }

    /// Stable-sort the events by a scalar field
    ///
    /// Valid keys: `time`, `cf_value`, `name`, `comments`, `method`, `mode`,
    /// `status`, `n0_aic`. With `reverse`, events comparing equal keep
    /// their relative order.
    ///
    /// # Errors
    ///
    /// `UnsupportedSortKey` for `aic` or an unknown field; the list is left
    /// unchanged.
    pub fn sort_events(&mut self, key: &str, reverse: bool) -> Result<&[Event]> {
        let key: SortKey = key.parse()?;
        if reverse {
            self.events.sort_by(|a, b| b.compare_by(a, key));
        } else {
            self.events.sort_by(|a, b| a.compare_by(b, key));
        }
        Ok(&self.events)
    }

    /// Add a manually picked event at sample `time`
    ///
    /// The event takes the characteristic-function value at `time` when one
    /// has been computed, 0.0 otherwise.
    pub fn add_manual_event(&mut self, time: usize) -> Result<&Event> {
        if time >= self.signal.len() {
            return Err(PickingError::InvalidInput(format!(
                "Event at sample {} lies outside a signal of {} samples",
                time,
                self.signal.len()
            )));
        }
        let cf_value = self.cf.get(time).copied().unwrap_or(0.0);
        self.events
            .push(Event::new(self.id, time, cf_value).with_mode(Mode::Manual));
        let index = self.events.len() - 1;
        Ok(&self.events[index])
    }

    /// Remove and return the event at `index`
    pub fn remove_event(&mut self, index: usize) -> Option<Event> {
        if index < self.events.len() {
            Some(self.events.remove(index))
        } else {
            None
        }
    }

    /// Drop every event
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Refine a single event in place, e.g. after a manual pick
    ///
    /// Unlike [`detect`](Self::detect), a singular AR fit is returned to the
    /// caller; the event is only modified on success.
    pub fn refine_event(
        &mut self,
        index: usize,
        refiner: &Takanami,
        margin_seconds: f64,
    ) -> Result<&Event> {
        let time = self
            .events
            .get(index)
            .map(|e| e.time)
            .ok_or_else(|| PickingError::InvalidInput(format!("No event at index {}", index)))?;
        let refinement = refiner.refine_around(&self.signal, time, margin_seconds)?;
        let event = &mut self.events[index];
        apply_refinement(event, refinement, &self.cf);
        Ok(event)
    }
}

/// Move an event to its refined arrival
fn apply_refinement(event: &mut Event, refinement: Refinement, cf: &[f64]) {
    log::debug!(
        "Refined arrival {} -> {}",
        event.time,
        refinement.index
    );
    event.time = refinement.index;
    if let Some(&value) = cf.get(refinement.index) {
        event.cf_value = value;
    }
    event.method = event.method.refined();
    event.aic = Some(refinement.aic);
    event.n0_aic = Some(refinement.n0_aic);
}

/// File stem of a source identifier, or empty
fn default_label(identifier: &str) -> String {
    Path::new(identifier)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builds records from signal sources with shared defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFactory {
    /// Sample rate used when a source does not report one (default: 50.0 Hz)
    pub fs: f64,

    /// Records longer than this many seconds are reported with a warning
    /// (default: one week)
    pub max_record_seconds: f64,
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self {
            fs: 50.0,
            max_record_seconds: 7.0 * 24.0 * 3600.0,
        }
    }
}

impl RecordFactory {
    /// Factory with a default sample rate
    pub fn new(fs: f64) -> Self {
        Self {
            fs,
            ..Self::default()
        }
    }

    /// Create a record from a source
    pub fn create_record(&self, source: &dyn SignalSource) -> Result<Record> {
        let record = Record::from_source(source, self.fs)?;
        if record.duration_seconds() > self.max_record_seconds {
            log::warn!(
                "Record '{}' lasts {:.0} s, longer than the {:.0} s limit",
                record.label,
                record.duration_seconds(),
                self.max_record_seconds
            );
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::refinement::ar::ArOrder;
    use crate::io::source::MemorySource;

    /// Returns the signal itself as characteristic function
    struct Passthrough(&'static str);

    impl CharacteristicAlgorithm for Passthrough {
        fn name(&self) -> &str {
            self.0
        }

        fn characteristic_function(&self, signal: &[f64], _fs: f64) -> Result<Vec<f64>> {
            Ok(signal.to_vec())
        }
    }

    /// Fixed characteristic function regardless of the signal
    struct FixedCf(Vec<f64>);

    impl CharacteristicAlgorithm for FixedCf {
        fn name(&self) -> &str {
            "AMPA"
        }

        fn characteristic_function(&self, _signal: &[f64], _fs: f64) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    fn pseudo_noise(n: usize, seed: u64, amplitude: f64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let val = ((state >> 33) as f64 / (1u64 << 31) as f64) * 2.0 - 1.0;
                val * amplitude
            })
            .collect()
    }

    fn record(samples: Vec<f64>, fs: f64) -> Record {
        Record::new(Signal::new(samples, fs).unwrap())
    }

    #[test]
    fn test_detect_picking_mode() {
        let mut rec = record(vec![0.0, 1.0, 5.0, 2.0, 0.0], 1.0);
        let id = rec.id();
        let events = rec.detect(&Passthrough("STA-LTA"), &DetectionConfig::default()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time, 2);
        assert_eq!(events[0].cf_value, 5.0);
        assert_eq!(events[0].method, Method::StaLta);
        assert_eq!(events[0].mode, Mode::Automatic);
        assert_eq!(events[0].status, Status::Reported);
        assert_eq!(events[0].record, id);
    }

    #[test]
    fn test_detect_detection_mode() {
        let mut rec = record(vec![0.0, 2.0, 9.0, 2.0, 0.0, 0.0, 3.0, 0.0], 1.0);
        let config = DetectionConfig::detection(1.0);
        rec.detect(&Passthrough("custom"), &config).unwrap();
        let times: Vec<usize> = rec.events().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![2, 6]);
        assert!(rec.events().iter().all(|e| e.method == Method::Other));
        assert_eq!(rec.characteristic_function().len(), 8);
    }

    #[test]
    fn test_second_detect_replaces_everything() {
        let mut rec = record(vec![0.0; 10], 1.0);
        rec.detect(&FixedCf(vec![0.0, 5.0, 0.0, 0.0, 6.0, 0.0]), &DetectionConfig::detection(1.0))
            .unwrap();
        assert_eq!(rec.events().len(), 2);

        rec.detect(&FixedCf(vec![0.0, 0.0, 0.0, 7.0]), &DetectionConfig::detection(1.0))
            .unwrap();
        assert_eq!(rec.characteristic_function(), &[0.0, 0.0, 0.0, 7.0]);
        assert_eq!(rec.events().len(), 1);
        assert_eq!(rec.events()[0].time, 3);
        assert_eq!(rec.events()[0].cf_value, 7.0);
    }

    #[test]
    fn test_failed_detect_leaves_record_untouched() {
        let mut rec = record(vec![0.0, 3.0, 1.0], 1.0);
        rec.detect(&Passthrough("STA-LTA"), &DetectionConfig::default()).unwrap();
        let before_cf = rec.characteristic_function().to_vec();
        let before_events = rec.events().to_vec();

        let result = rec.detect(&FixedCf(Vec::new()), &DetectionConfig::default());
        assert!(matches!(result, Err(PickingError::EmptyInput(_))));
        assert_eq!(rec.characteristic_function(), before_cf.as_slice());
        assert_eq!(rec.events(), before_events.as_slice());
    }

    #[test]
    fn test_cf_longer_than_signal_rejected() {
        let mut rec = record(vec![0.0; 3], 1.0);
        let result = rec.detect(&FixedCf(vec![1.0; 4]), &DetectionConfig::default());
        assert!(matches!(result, Err(PickingError::InvalidInput(_))));
    }

    #[test]
    fn test_detect_with_refinement_moves_to_onset() {
        let fs = 100.0;
        let quiet = pseudo_noise(1000, 3, 0.02);
        let loud = pseudo_noise(1000, 4, 2.0);
        let samples: Vec<f64> = (0..1000).map(|i| if i < 600 { quiet[i] } else { loud[i] }).collect();
        // coarse pick 30 samples late
        let mut cf = vec![0.0; 1000];
        cf[630] = 10.0;
        cf[600] = 4.0;

        let mut rec = record(samples, fs);
        let config = DetectionConfig::default().with_refinement(1.0);
        let events = rec.detect(&FixedCf(cf), &config).unwrap();

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert!((event.time as i64 - 600).abs() <= 6, "refined to {}", event.time);
        assert_eq!(event.method, Method::AmpaTakanami);
        let span = event.aic_span().unwrap();
        assert_eq!(span.start, event.n0_aic.unwrap());
        assert!(span.contains(&event.time));
        // window [530, 730] with a 3-sample floor on each side
        assert_eq!(event.n0_aic, Some(533));
        assert_eq!(rec.last_detection().unwrap().refined_count, 1);
    }

    #[test]
    fn test_degenerate_fit_keeps_coarse_time() {
        let mut rec = record(vec![1.0; 500], 50.0);
        let mut cf = vec![0.0; 500];
        cf[240] = 3.0;
        let config = DetectionConfig::default().with_refinement(2.0);
        let events = rec.detect(&FixedCf(cf), &config).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time, 240);
        assert_eq!(events[0].cf_value, 3.0);
        assert!(events[0].aic.is_none());
        assert!(events[0].n0_aic.is_none());
        assert_eq!(events[0].method, Method::Ampa);

        let meta = rec.last_detection().unwrap();
        assert_eq!(meta.refinement_failures, 1);
        assert_eq!(meta.refined_count, 0);
    }

    #[test]
    fn test_degenerate_event_does_not_block_siblings() {
        let fs = 100.0;
        let noise = pseudo_noise(1000, 9, 1.0);
        // constant first half, noisy second half
        let samples: Vec<f64> = (0..1000).map(|i| if i < 500 { 0.0 } else { noise[i] }).collect();
        let mut cf = vec![0.0; 1000];
        cf[100] = 5.0;
        cf[800] = 5.0;

        let mut rec = record(samples, fs);
        let config = DetectionConfig::detection(1.0).with_refinement(0.5);
        let events = rec.detect(&FixedCf(cf), &config).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].time, 100);
        assert!(events[0].aic.is_none());
        assert!(events[1].aic.is_some());
    }

    #[test]
    fn test_signal_shorter_than_two_segments_is_fatal() {
        let mut rec = record(pseudo_noise(5, 1, 1.0), 1.0);
        let mut cf = vec![0.0; 5];
        cf[2] = 1.0;
        let config = DetectionConfig::default().with_refinement(10.0);
        let result = rec.detect(&FixedCf(cf), &config);
        assert!(matches!(result, Err(PickingError::InvalidWindow(_))));
        assert!(rec.events().is_empty());
        assert!(rec.characteristic_function().is_empty());
    }

    #[test]
    fn test_clipped_window_keeps_coarse_time_for_edge_event() {
        let mut rec = record(pseudo_noise(100, 1, 1.0), 1.0);
        let mut cf = vec![0.0; 100];
        cf[0] = 2.0;
        cf[50] = 2.0;
        // [-3, 3] clips to 4 samples, [47, 53] keeps all 7
        let config = DetectionConfig::detection(1.0).with_refinement(3.0);
        let events = rec.detect(&FixedCf(cf), &config).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].time, 0);
        assert!(events[0].aic.is_none());
        assert_eq!(events[0].method, Method::Ampa);
        assert_eq!(events[1].time, 50);
        assert_eq!(events[1].n0_aic, Some(50));
        assert_eq!(events[1].method, Method::AmpaTakanami);

        let meta = rec.last_detection().unwrap();
        assert_eq!(meta.refined_count, 1);
        assert_eq!(meta.refinement_failures, 1);
    }

    #[test]
    fn test_huge_margin_covers_whole_signal() {
        let mut rec = record(pseudo_noise(200, 12, 1.0), 1.0);
        let mut cf = vec![0.0; 200];
        cf[100] = 1.0;
        let config = DetectionConfig::default().with_refinement(1e300);
        let events = rec.detect(&FixedCf(cf), &config).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].n0_aic, Some(3));
        assert_eq!(events[0].aic.as_ref().map(Vec::len), Some(195));
    }

    #[test]
    fn test_sort_events_by_cf_value() {
        let mut rec = record(vec![0.0, 4.0, 0.0, 9.0, 0.0, 1.5, 0.0], 1.0);
        rec.detect(&Passthrough("STA-LTA"), &DetectionConfig::detection(1.0))
            .unwrap();
        let sorted: Vec<usize> = rec
            .sort_events("cf_value", true)
            .unwrap()
            .iter()
            .map(|e| e.time)
            .collect();
        assert_eq!(sorted, vec![3, 1, 5]);

        let sorted: Vec<usize> = rec
            .sort_events("time", false)
            .unwrap()
            .iter()
            .map(|e| e.time)
            .collect();
        assert_eq!(sorted, vec![1, 3, 5]);
    }

    #[test]
    fn test_sort_reverse_is_stable() {
        let mut rec = record(vec![0.0; 10], 1.0);
        for t in [1, 2, 3] {
            rec.add_manual_event(t).unwrap();
        }
        rec.events_mut()[1].status = Status::Confirmed;
        let order: Vec<usize> = rec
            .sort_events("mode", true)
            .unwrap()
            .iter()
            .map(|e| e.time)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_aic_rejected_without_mutation() {
        let mut rec = record(vec![0.0; 10], 1.0);
        for t in [5, 2, 8] {
            rec.add_manual_event(t).unwrap();
        }
        let before = rec.events().to_vec();
        let result = rec.sort_events("aic", false);
        assert!(matches!(result, Err(PickingError::UnsupportedSortKey(_))));
        assert_eq!(rec.events(), before.as_slice());

        assert!(rec.sort_events("bogus", true).is_err());
        assert_eq!(rec.events(), before.as_slice());
    }

    #[test]
    fn test_manual_events() {
        let mut rec = record(vec![0.0, 1.0, 2.0], 1.0);
        rec.detect(&Passthrough("STA-LTA"), &DetectionConfig::default()).unwrap();
        let event = rec.add_manual_event(1).unwrap();
        assert_eq!(event.mode, Mode::Manual);
        assert_eq!(event.cf_value, 1.0);
        assert_eq!(rec.events().len(), 2);

        assert!(rec.add_manual_event(3).is_err());
        let removed = rec.remove_event(0).unwrap();
        assert_eq!(removed.time, 2);
        assert!(rec.remove_event(5).is_none());
        rec.clear_events();
        assert!(rec.events().is_empty());
    }

    #[test]
    fn test_refine_event_reports_degenerate_fit() {
        let mut rec = record(vec![2.0; 300], 100.0);
        rec.add_manual_event(150).unwrap();
        let result = rec.refine_event(0, &Takanami::default(), 1.0);
        assert!(matches!(result, Err(PickingError::DegenerateFit(_))));
        assert_eq!(rec.events()[0].time, 150);
        assert!(rec.refine_event(3, &Takanami::default(), 1.0).is_err());
    }

    #[test]
    fn test_refine_event_on_manual_pick() {
        let quiet = pseudo_noise(600, 8, 0.01);
        let loud = pseudo_noise(600, 2, 1.0);
        let samples: Vec<f64> = (0..600).map(|i| if i < 320 { quiet[i] } else { loud[i] }).collect();
        let mut rec = record(samples, 100.0);
        rec.add_manual_event(300).unwrap();
        let refiner = Takanami::new(crate::config::RefinerConfig {
            order: ArOrder::Fixed(3),
            min_segment: None,
        });
        let event = rec.refine_event(0, &refiner, 1.0).unwrap();
        assert!((event.time as i64 - 320).abs() <= 8);
        assert_eq!(event.mode, Mode::Manual);
        assert!(event.is_refined());
    }

    #[test]
    fn test_event_times_seconds() {
        let mut rec = record(vec![0.0; 100], 50.0);
        rec.add_manual_event(25).unwrap();
        rec.add_manual_event(75).unwrap();
        assert_eq!(rec.event_times_seconds(), vec![0.5, 1.5]);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = record(vec![0.0], 1.0);
        let b = record(vec![0.0], 1.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clone_gets_its_own_id() {
        let mut original = record(vec![0.0, 3.0, 1.0, 4.0, 0.0], 1.0);
        original.add_manual_event(1).unwrap();
        original.add_manual_event(3).unwrap();

        let copy = original.clone();
        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.events().len(), 2);
        assert!(copy.events().iter().all(|e| e.record == copy.id()));
        assert!(original.events().iter().all(|e| e.record == original.id()));
        assert_eq!(copy.events()[1].time, 3);
    }

    #[test]
    fn test_from_source_label_and_rate() {
        let source = MemorySource::new(vec![0.0; 20])
            .with_sample_rate(200.0)
            .with_identifier("/data/2013/station_b.bin");
        let rec = Record::from_source(&source, 50.0).unwrap();
        assert_eq!(rec.fs(), 200.0);
        assert_eq!(rec.label, "station_b");
        assert_eq!(rec.source, "/data/2013/station_b.bin");
    }

    #[test]
    fn test_explicit_label_kept() {
        let rec = record(vec![0.0], 1.0)
            .with_label("mine")
            .with_source("/tmp/other.txt")
            .with_description("test");
        assert_eq!(rec.label, "mine");
        assert_eq!(rec.description, "test");
    }

    #[test]
    fn test_factory_defaults() {
        let factory = RecordFactory::default();
        assert_eq!(factory.fs, 50.0);
        assert_eq!(factory.max_record_seconds, 604_800.0);

        let rec = factory
            .create_record(&MemorySource::new(vec![0.0; 100]))
            .unwrap();
        assert_eq!(rec.fs(), 50.0);
        assert_eq!(rec.duration_seconds(), 2.0);
        assert!(rec.label.is_empty());
    }
}
