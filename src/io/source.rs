//! Raw signal sources
//!
//! A [`SignalSource`] hands over samples and the rate they were taken at.
//! File readers with their byte-order and dtype handling implement this
//! trait elsewhere; [`MemorySource`] covers in-memory data and tests.

use crate::error::Result;

/// Anything that can produce a sampled signal
pub trait SignalSource {
    /// Read every sample, in order
    fn read(&self) -> Result<Vec<f64>>;

    /// Sample rate in Hz, if the source knows it
    fn sample_rate(&self) -> Option<f64> {
        None
    }

    /// Identifier of the source (usually a file path), empty if unknown
    fn identifier(&self) -> &str {
        ""
    }
}

/// In-memory signal source
#[derive(Debug, Clone)]
pub struct MemorySource {
    samples: Vec<f64>,
    fs: Option<f64>,
    identifier: String,
}

impl MemorySource {
    /// Wrap samples without a sample rate or identifier
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            fs: None,
            identifier: String::new(),
        }
    }

    /// Attach a sample rate
    pub fn with_sample_rate(mut self, fs: f64) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Attach an identifier, e.g. the path the samples came from
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }
}

impl SignalSource for MemorySource {
    fn read(&self) -> Result<Vec<f64>> {
        Ok(self.samples.clone())
    }

    fn sample_rate(&self) -> Option<f64> {
        self.fs
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
