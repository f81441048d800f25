//! Data model produced by one sampling cycle.
//!
//! Everything here is rebuilt from scratch every cycle; nothing carries
//! state between snapshots. Long-lived state lives in [`crate::metrics`].

mod disk;
mod snapshot;

pub use disk::{DiskRecord, SmartAttribute};
pub use snapshot::DiskSnapshot;
