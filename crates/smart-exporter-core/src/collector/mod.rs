//! Disk inventory and SMART attribute collector.
//!
//! This module runs the storage tools, parses their text output and
//! assembles one `DiskSnapshot` per cycle, with support for mocking the
//! tools in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Collector                           │
//! │  ┌─────────────────────┐   ┌─────────────────────────────┐  │
//! │  │  parse_geom_disk_   │   │  parse_smartctl_attributes  │  │
//! │  │  list (once)        │──▶│  (once per device)          │  │
//! │  └──────────┬──────────┘   └──────────────┬──────────────┘  │
//! │             └──────────────┬──────────────┘                 │
//! │                            │                                │
//! │                     ┌──────▼────────┐                       │
//! │                     │ CommandRunner │ (trait)               │
//! │                     └──────┬────────┘                       │
//! └────────────────────────────┼────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!       ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!       │ ShellRunner │ │ MockRunner  │ │  Scenarios  │
//!       │ (sh -c)     │ │ (Testing)   │ │ (Fixtures)  │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```ignore
//! use smart_exporter_core::collector::{Collector, ShellRunner};
//!
//! let mut collector = Collector::new(ShellRunner::new());
//! let snapshot = collector.collect_snapshot();
//! ```
//!
//! ## Testing (with MockRunner)
//!
//! ```
//! use smart_exporter_core::collector::{Collector, MockRunner};
//!
//! let mut collector = Collector::new(MockRunner::typical_freebsd_host());
//! let snapshot = collector.collect_snapshot();
//! assert_eq!(snapshot.disks.len(), 4);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod parser;
pub mod traits;

pub use collector::{
    Collector, CollectorStats, CollectorTiming, DEFAULT_LIST_COMMAND, DEFAULT_SMART_COMMAND,
    DEVICE_PLACEHOLDER,
};
pub use mock::MockRunner;
pub use traits::{CommandRunner, ShellRunner};
