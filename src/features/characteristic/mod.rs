//! Characteristic-function algorithms
//!
//! A characteristic function (CF) is a scalar series, aligned sample for
//! sample with the signal it was computed from, whose peaks mark candidate
//! arrivals. Algorithms plug in through [`CharacteristicAlgorithm`] and are
//! looked up by name through the [`registry`].

pub mod registry;
pub mod sta_lta;

use crate::error::Result;
use crate::features::peaks;

/// Output of one algorithm run
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmOutput {
    /// Candidate arrival sample indices, ascending
    pub candidates: Vec<usize>,

    /// Characteristic function, indexed like the input signal
    pub cf: Vec<f64>,
}

/// A characteristic-function algorithm
///
/// Implementors provide the CF itself; [`run`](Self::run) turns it into
/// candidates with the shared peak extractor unless overridden.
pub trait CharacteristicAlgorithm: Send + Sync {
    /// Identifier used as the method of the events it produces,
    /// e.g. `"STA-LTA"` or `"AMPA"`
    fn name(&self) -> &str;

    /// Compute the characteristic function of `signal` sampled at `fs`.
    ///
    /// The result must not be longer than `signal`; index `i` of the CF
    /// refers to sample `i` of the signal.
    fn characteristic_function(&self, signal: &[f64], fs: f64) -> Result<Vec<f64>>;

    /// Compute the CF and extract candidates from it
    ///
    /// `threshold = None` selects picking mode (global maximum only).
    fn run(
        &self,
        signal: &[f64],
        fs: f64,
        threshold: Option<f64>,
        peak_window_seconds: f64,
    ) -> Result<AlgorithmOutput> {
        let cf = self.characteristic_function(signal, fs)?;
        let candidates = peaks::extract(&cf, threshold, peak_window_seconds, fs)?;
        Ok(AlgorithmOutput { candidates, cf })
    }
}

impl<T: CharacteristicAlgorithm + ?Sized> CharacteristicAlgorithm for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn characteristic_function(&self, signal: &[f64], fs: f64) -> Result<Vec<f64>> {
        (**self).characteristic_function(signal, fs)
    }

    fn run(
        &self,
        signal: &[f64],
        fs: f64,
        threshold: Option<f64>,
        peak_window_seconds: f64,
    ) -> Result<AlgorithmOutput> {
        (**self).run(signal, fs, threshold, peak_window_seconds)
    }
}

impl<T: CharacteristicAlgorithm + ?Sized> CharacteristicAlgorithm for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn characteristic_function(&self, signal: &[f64], fs: f64) -> Result<Vec<f64>> {
        (**self).characteristic_function(signal, fs)
    }

    fn run(
        &self,
        signal: &[f64],
        fs: f64,
        threshold: Option<f64>,
        peak_window_seconds: f64,
    ) -> Result<AlgorithmOutput> {
        (**self).run(signal, fs, threshold, peak_window_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl CharacteristicAlgorithm for Identity {
        fn name(&self) -> &str {
            "identity"
        }

        fn characteristic_function(&self, signal: &[f64], _fs: f64) -> Result<Vec<f64>> {
            Ok(signal.to_vec())
        }
    }

    #[test]
    fn test_default_run_picking_mode() {
        let output = Identity.run(&[0.0, 1.0, 5.0, 2.0, 0.0], 1.0, None, 1.0).unwrap();
        assert_eq!(output.candidates, vec![2]);
        assert_eq!(output.cf.len(), 5);
    }

    #[test]
    fn test_default_run_detection_mode() {
        let signal = [0.0, 2.0, 9.0, 2.0, 0.0, 0.0, 3.0, 0.0];
        let output = Identity.run(&signal, 1.0, Some(1.0), 1.0).unwrap();
        assert_eq!(output.candidates, vec![2, 6]);
    }

    #[test]
    fn test_boxed_algorithm_delegates() {
        let boxed: Box<dyn CharacteristicAlgorithm> = Box::new(Identity);
        assert_eq!(boxed.name(), "identity");
        assert_eq!(boxed.run(&[3.0, 1.0], 1.0, None, 0.0).unwrap().candidates, vec![0]);
    }
}
