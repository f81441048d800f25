//! smart-exporter-core - shared library for the smart-exporter daemon and tools.
//!
//! Provides:
//! - `collector` - command runner, `geom disk list` / `smartctl -A` parsers, sampling
//! - `model` - per-cycle disk and SMART attribute data model
//! - `metrics` - process-wide Prometheus registry with runtime-discovered series
//! - `daemon` - sampling loop, control flags, exposition server seam

pub mod collector;
pub mod daemon;
pub mod error;
pub mod metrics;
pub mod model;

pub use error::ExporterError;

/// Crate version with the git SHA embedded at build time.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");
