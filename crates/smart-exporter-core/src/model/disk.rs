use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One discovered disk.
///
/// Source: a `Geom name:` block of `geom disk list`, plus the attribute
/// table of `smartctl -A /dev/<name>`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DiskRecord {
    /// Geom/device identifier (ada0, da3, nvd0, ...).
    /// Primary key within one cycle; not stable across reboots.
    pub name: String,

    /// Manufacturer serial number.
    /// Source: `ident:` line. Disks without it get no metrics.
    #[serde(default)]
    pub serial: Option<String>,

    /// Media size in bytes.
    /// Source: first token of the `Mediasize:` line.
    #[serde(default)]
    pub mediasize: Option<u64>,

    /// Logical sector size in bytes.
    /// Source: `Sectorsize:` line.
    #[serde(default)]
    pub sectorsize: Option<u64>,

    /// Rotation rate in RPM (0 for solid state).
    /// Source: `rotationrate:` line; `unknown` leaves it absent.
    #[serde(default)]
    pub rotationrate: Option<u64>,

    /// Stripe size in bytes.
    /// Source: `Stripesize:` line.
    #[serde(default)]
    pub stripesize: Option<u64>,

    /// Model description.
    /// Source: `descr:` line.
    #[serde(default)]
    pub description: Option<String>,

    /// Logical unit identifier.
    /// Source: `lunid:` line.
    #[serde(default)]
    pub lunid: Option<String>,

    /// SMART attributes keyed by normalized name.
    #[serde(default)]
    pub attributes: BTreeMap<String, SmartAttribute>,
}

impl DiskRecord {
    /// Creates an empty record for the given device.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One row of the `smartctl -A` attribute table.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SmartAttribute {
    /// Vendor attribute ID (`ID#` column).
    pub id: u16,
    /// Attribute name with `-` and `_` removed.
    pub name: String,
    /// `FLAG` column, passed through unexamined.
    pub flags: String,
    /// Normalized current value (`VALUE`).
    pub value: u16,
    /// Worst normalized value seen (`WORST`).
    pub worst: u16,
    /// Failure threshold (`THRESH`).
    pub threshold: u16,
    /// `TYPE` column (Pre-fail / Old_age).
    pub kind: String,
    /// `UPDATED` column (Always / Offline).
    pub updated: String,
    /// `RAW_VALUE` column, verbatim. Not guaranteed numeric.
    pub raw_value: String,
}

impl SmartAttribute {
    /// Interprets the raw value as a metric sample.
    ///
    /// Returns `None` for vendor formats such as `12h+34m` that are not a
    /// plain number.
    pub fn raw_sample(&self) -> Option<f64> {
        self.raw_value.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}
