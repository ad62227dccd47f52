//! Record and event data model
//!
//! - Events and their enumerated metadata
//! - Records owning a signal, its characteristic function and its events
//! - Detection run metadata

pub mod event;
pub mod metadata;
pub mod record;
