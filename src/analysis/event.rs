//! Detected arrival events

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::record::RecordId;
use crate::error::PickingError;

/// Algorithm that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// STA/LTA detector
    #[serde(rename = "STA-LTA")]
    StaLta,
    /// STA/LTA detector with AR-AIC refinement
    #[serde(rename = "STA-LTA+Takanami")]
    StaLtaTakanami,
    /// AMPA detector
    #[serde(rename = "AMPA")]
    Ampa,
    /// AMPA detector with AR-AIC refinement
    #[serde(rename = "AMPA+Takanami")]
    AmpaTakanami,
    /// Unknown or manual
    #[serde(rename = "other", other)]
    Other,
}

impl Method {
    /// All methods, in label order of the original tool
    pub const ALL: [Method; 5] = [
        Method::Other,
        Method::StaLta,
        Method::StaLtaTakanami,
        Method::Ampa,
        Method::AmpaTakanami,
    ];

    /// Textual label, e.g. `"STA-LTA+Takanami"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Other => "other",
            Method::StaLta => "STA-LTA",
            Method::StaLtaTakanami => "STA-LTA+Takanami",
            Method::Ampa => "AMPA",
            Method::AmpaTakanami => "AMPA+Takanami",
        }
    }

    /// Parse an algorithm name; unknown names map to `Other`
    ///
    /// # Example
    ///
    /// ```
    /// use arrival_picker::Method;
    ///
    /// assert_eq!(Method::from_label("STA-LTA"), Method::StaLta);
    /// assert_eq!(Method::from_label("my-detector"), Method::Other);
    /// ```
    pub fn from_label(label: &str) -> Self {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == label)
            .unwrap_or(Method::Other)
    }

    /// The method after AR-AIC refinement was applied
    pub fn refined(self) -> Self {
        match self {
            Method::StaLta | Method::StaLtaTakanami => Method::StaLtaTakanami,
            Method::Ampa | Method::AmpaTakanami => Method::AmpaTakanami,
            Method::Other => Method::Other,
        }
    }

    /// True for the `+Takanami` variants
    pub fn is_refined(&self) -> bool {
        matches!(self, Method::StaLtaTakanami | Method::AmpaTakanami)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an event was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Picked by hand
    Manual,
    /// Picked by a detection run
    Automatic,
    /// Unknown
    #[serde(other)]
    Undefined,
}

impl Mode {
    /// Textual label
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Manual => "manual",
            Mode::Automatic => "automatic",
            Mode::Undefined => "undefined",
        }
    }

    /// Parse a label; anything unrecognised becomes `Undefined`
    pub fn from_label(label: &str) -> Self {
        match label {
            "manual" => Mode::Manual,
            "automatic" => Mode::Automatic,
            _ => Mode::Undefined,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Revision status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Reported by a detection run, not reviewed
    Reported,
    /// Edited by a reviewer
    Revised,
    /// Accepted by a reviewer
    Confirmed,
    /// Discarded by a reviewer
    Rejected,
    /// Unknown
    #[serde(other)]
    Undefined,
}

impl Status {
    /// Textual label
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Reported => "reported",
            Status::Revised => "revised",
            Status::Confirmed => "confirmed",
            Status::Rejected => "rejected",
            Status::Undefined => "undefined",
        }
    }

    /// Parse a label; anything unrecognised becomes `Undefined`
    ///
    /// # Example
    ///
    /// ```
    /// use arrival_picker::Status;
    ///
    /// assert_eq!(Status::from_label("confirmed"), Status::Confirmed);
    /// assert_eq!(Status::from_label("Confirmed!"), Status::Undefined);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label {
            "reported" => Status::Reported,
            "revised" => Status::Revised,
            "confirmed" => Status::Confirmed,
            "rejected" => Status::Rejected,
            _ => Status::Undefined,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected (or manually placed) arrival
///
/// `time` is always a sample index into the owning record's signal; use
/// [`time_seconds`](Self::time_seconds) for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Record this event belongs to (non-owning)
    pub record: RecordId,

    /// Arrival time in samples from the start of the signal
    pub time: usize,

    /// Characteristic-function value at `time`
    pub cf_value: f64,

    /// Free-text identifier
    pub name: String,

    /// Free-text comments
    pub comments: String,

    /// Algorithm that produced the event
    pub method: Method,

    /// Picking mode
    pub mode: Mode,

    /// Revision status
    pub status: Status,

    /// AR-AIC criterion curve, present after refinement
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aic: Option<Vec<f64>>,

    /// Sample index where `aic` starts
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub n0_aic: Option<usize>,
}

impl Event {
    /// Event with default metadata: method `other`, mode `automatic`,
    /// status `reported`, empty name and comments
    pub fn new(record: RecordId, time: usize, cf_value: f64) -> Self {
        Self {
            record,
            time,
            cf_value,
            name: String::new(),
            comments: String::new(),
            method: Method::Other,
            mode: Mode::Automatic,
            status: Status::Reported,
            aic: None,
            n0_aic: None,
        }
    }

    /// Set the method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the mode from a text label, coercing unknown labels to `undefined`
    pub fn set_mode_label(&mut self, label: &str) {
        self.mode = Mode::from_label(label);
    }

    /// Set the status from a text label, coercing unknown labels to `undefined`
    pub fn set_status_label(&mut self, label: &str) {
        self.status = Status::from_label(label);
    }

    /// Arrival time in seconds
    pub fn time_seconds(&self, fs: f64) -> f64 {
        self.time as f64 / fs
    }

    /// True once AR-AIC refinement has been applied
    pub fn is_refined(&self) -> bool {
        self.aic.is_some()
    }

    /// Absolute sample range covered by the criterion curve
    pub fn aic_span(&self) -> Option<Range<usize>> {
        match (&self.aic, self.n0_aic) {
            (Some(aic), Some(n0)) => Some(n0..n0 + aic.len()),
            _ => None,
        }
    }

    /// Compare two events by one field
    pub fn compare_by(&self, other: &Event, key: SortKey) -> Ordering {
        match key {
            SortKey::Time => self.time.cmp(&other.time),
            SortKey::CfValue => self.cf_value.total_cmp(&other.cf_value),
            SortKey::Name => self.name.cmp(&other.name),
            SortKey::Comments => self.comments.cmp(&other.comments),
            SortKey::Method => self.method.as_str().cmp(other.method.as_str()),
            SortKey::Mode => self.mode.as_str().cmp(other.mode.as_str()),
            SortKey::Status => self.status.as_str().cmp(other.status.as_str()),
            SortKey::N0Aic => self.n0_aic.cmp(&other.n0_aic),
        }
    }
}

/// Scalar event fields usable as a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// `time`
    Time,
    /// `cf_value`
    CfValue,
    /// `name`
    Name,
    /// `comments`
    Comments,
    /// `method`, by label
    Method,
    /// `mode`, by label
    Mode,
    /// `status`, by label
    Status,
    /// `n0_aic`, unrefined events first
    N0Aic,
}

impl FromStr for SortKey {
    type Err = PickingError;

    /// Parse a field name. `aic` is a sequence and unknown names are not
    /// fields, both are rejected.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "time" => Ok(SortKey::Time),
            "cf_value" => Ok(SortKey::CfValue),
            "name" => Ok(SortKey::Name),
            "comments" => Ok(SortKey::Comments),
            "method" => Ok(SortKey::Method),
            "mode" => Ok(SortKey::Mode),
            "status" => Ok(SortKey::Status),
            "n0_aic" => Ok(SortKey::N0Aic),
            _ => Err(PickingError::UnsupportedSortKey(key.to_string())),
        }
    }
}
