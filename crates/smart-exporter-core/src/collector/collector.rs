//! Main collector that combines the inventory and SMART parsers.
//!
//! The `Collector` struct runs one full sampling cycle and returns a
//! `DiskSnapshot` for the metrics registry.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, trace};

use crate::collector::parser::{parse_geom_disk_list, parse_smartctl_attributes};
use crate::collector::traits::CommandRunner;
use crate::error::{ExporterError, Result};
use crate::model::DiskSnapshot;

/// Default command listing disks.
pub const DEFAULT_LIST_COMMAND: &str = "geom disk list";
/// Default SMART command; `{device}` is replaced by the geom name.
pub const DEFAULT_SMART_COMMAND: &str = "smartctl -A /dev/{device}";
/// Placeholder substituted in the SMART command template.
pub const DEVICE_PLACEHOLDER: &str = "{device}";

/// Timing information for each collector phase.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    /// Time to run and parse the disk listing.
    pub inventory: Duration,
    /// Time spent in all per-device SMART queries.
    pub smart: Duration,
}

/// Counters from the last cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectorStats {
    pub disks: usize,
    pub attributes: usize,
    /// SMART table rows rejected across all devices.
    pub dropped_rows: usize,
}

/// Runs the sampling cycle against a `CommandRunner`.
pub struct Collector<R: CommandRunner> {
    runner: R,
    list_command: String,
    smart_command: String,
    last_timing: Option<CollectorTiming>,
    last_stats: Option<CollectorStats>,
}

impl<R: CommandRunner> Collector<R> {
    /// Creates a collector using the default `geom` and `smartctl` command lines.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            list_command: DEFAULT_LIST_COMMAND.to_string(),
            smart_command: DEFAULT_SMART_COMMAND.to_string(),
            last_timing: None,
            last_stats: None,
        }
    }

    /// Overrides the disk listing command.
    pub fn with_list_command(mut self, command: impl Into<String>) -> Self {
        self.list_command = command.into();
        self
    }

    /// Overrides the per-device SMART command template.
    ///
    /// The template must contain `{device}`.
    pub fn with_smart_command(mut self, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(DEVICE_PLACEHOLDER) {
            return Err(ExporterError::Config(format!(
                "smart command {:?} has no {} placeholder",
                template, DEVICE_PLACEHOLDER
            )));
        }
        self.smart_command = template;
        Ok(self)
    }

    pub fn list_command(&self) -> &str {
        &self.list_command
    }

    pub fn smart_command(&self) -> &str {
        &self.smart_command
    }

    /// Returns the underlying runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Returns timing information from the last `collect_snapshot` call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Returns counters from the last `collect_snapshot` call.
    pub fn last_stats(&self) -> Option<&CollectorStats> {
        self.last_stats.as_ref()
    }

    /// Collects a complete snapshot.
    ///
    /// Runs the disk listing once, then the SMART command once per disk,
    /// sequentially. Never fails: a command that produced nothing usable
    /// simply contributes no disks or no attributes.
    pub fn collect_snapshot(&mut self) -> DiskSnapshot {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();
        let timestamp = Utc::now().timestamp();

        let start = Instant::now();
        let lines = self.runner.run(&self.list_command);
        let mut disks = parse_geom_disk_list(&lines);
        timing.inventory = start.elapsed();
        trace!(lines = lines.len(), disks = disks.len(), "disk listing parsed");

        let start = Instant::now();
        let mut dropped_rows = 0;
        for (name, disk) in disks.iter_mut() {
            let command = self.smart_command.replace(DEVICE_PLACEHOLDER, name);
            let table = parse_smartctl_attributes(&self.runner.run(&command));
            if table.dropped_rows > 0 {
                debug!(
                    device = %name,
                    dropped = table.dropped_rows,
                    "smart table rows dropped"
                );
            }
            dropped_rows += table.dropped_rows;
            disk.attributes = table.attributes;
        }
        timing.smart = start.elapsed();
        timing.total = total_start.elapsed();

        let snapshot = DiskSnapshot::new(timestamp, disks);
        self.last_stats = Some(CollectorStats {
            disks: snapshot.disks.len(),
            attributes: snapshot.attribute_count(),
            dropped_rows,
        });
        self.last_timing = Some(timing);
        snapshot
    }
}
