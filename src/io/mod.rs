//! Signal I/O modules
//!
//! The immutable [`Signal`](signal::Signal) container and the
//! [`SignalSource`](source::SignalSource) seam through which raw samples enter
//! the crate. On-disk formats live outside this crate.

pub mod signal;
pub mod source;
