use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::DiskRecord;

/// Complete result of one sampling cycle.
///
/// Handed to the metrics registry as a whole; a partially collected
/// snapshot is never applied.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DiskSnapshot {
    /// Unix timestamp (seconds) at which the cycle started.
    pub timestamp: i64,
    /// Disks keyed by device name.
    pub disks: BTreeMap<String, DiskRecord>,
}

impl DiskSnapshot {
    pub fn new(timestamp: i64, disks: BTreeMap<String, DiskRecord>) -> Self {
        Self { timestamp, disks }
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Total number of SMART attributes across all disks.
    pub fn attribute_count(&self) -> usize {
        self.disks.values().map(|d| d.attributes.len()).sum()
    }

    /// Short human-readable summary for logging.
    pub fn describe(&self) -> String {
        let without_serial = self.disks.values().filter(|d| d.serial.is_none()).count();
        let mut parts = vec![
            format!("{} disks", self.disks.len()),
            format!("{} smart attributes", self.attribute_count()),
        ];
        if without_serial > 0 {
            parts.push(format!("{} without serial", without_serial));
        }
        parts.join(", ")
    }
}
