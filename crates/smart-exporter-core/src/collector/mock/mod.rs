//! Mock command runner for testing.
//!
//! This module provides `MockRunner` and pre-built scenarios for testing
//! the collector without a FreeBSD host, `geom` or `smartctl`.

mod runner;
mod scenarios;

pub use runner::MockRunner;
pub use scenarios::{GEOM_TYPICAL, SMARTCTL_ADA0, SMARTCTL_ADA1, SMARTCTL_NVME};
