use std::collections::HashMap;
use std::sync::RwLock;

use prometheus::proto::{Metric, MetricFamily};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::{debug, info, warn};

use super::describe_attribute;
use crate::error::{ExporterError, Result};
use crate::model::{DiskRecord, DiskSnapshot, SmartAttribute};

/// Label names shared by every series.
pub const LABELS: &[&str] = &["serial", "name"];
/// Name prefix of runtime-discovered SMART series.
pub const SMART_PREFIX: &str = "smart_";

/// Counters describing one `apply` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyStats {
    /// Disks whose metrics were updated.
    pub disks_applied: usize,
    /// Disks skipped because they report no serial.
    pub disks_skipped: usize,
    /// Label values set.
    pub values_set: usize,
    /// SMART values skipped (non-numeric raw value or unusable name).
    pub values_skipped: usize,
    /// `smart_*` series registered by this call.
    pub series_created: usize,
}

/// Process-wide registry of disk metrics.
///
/// The sampling loop is the only writer; the exposition server reads it
/// concurrently through [`MetricRegistry::encode`]. Gauge values are atomic,
/// so every scrape sees a consistent value per series and label pair.
pub struct MetricRegistry {
    registry: Registry,
    mediasize: GaugeVec,
    sectorsize: GaugeVec,
    rotationrate: GaugeVec,
    /// Normalized attribute name -> series. `None` marks a name Prometheus
    /// rejected, so it is reported once and never retried.
    smart: RwLock<HashMap<String, Option<GaugeVec>>>,
}

impl MetricRegistry {
    /// Creates the registry with the fixed `geom_*` series registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let mediasize = GaugeVec::new(
            Opts::new("geom_mediasize", "Media size of disks"),
            LABELS,
        )?;
        let sectorsize = GaugeVec::new(
            Opts::new("geom_sectorsize", "Size of sectors on disk"),
            LABELS,
        )?;
        let rotationrate = GaugeVec::new(
            Opts::new("geom_rotationrate", "Rotation rate of disk"),
            LABELS,
        )?;

        registry.register(Box::new(mediasize.clone()))?;
        registry.register(Box::new(sectorsize.clone()))?;
        registry.register(Box::new(rotationrate.clone()))?;

        Ok(Self {
            registry,
            mediasize,
            sectorsize,
            rotationrate,
            smart: RwLock::new(HashMap::new()),
        })
    }

    /// Applies one snapshot to the metric state.
    ///
    /// Disks without a serial are skipped. Absent fields leave the previous
    /// value in place. Series are never removed, so a disk or attribute that
    /// disappears keeps exporting its last value.
    pub fn apply(&self, snapshot: &DiskSnapshot) -> ApplyStats {
        let mut stats = ApplyStats::default();

        for disk in snapshot.disks.values() {
            let Some(serial) = disk.serial.as_deref() else {
                debug!(device = %disk.name, "no serial reported, skipping metrics");
                stats.disks_skipped += 1;
                continue;
            };
            self.apply_disk(disk, serial, &mut stats);
            stats.disks_applied += 1;
        }

        if stats.series_created > 0 {
            info!(
                created = stats.series_created,
                total = self.smart_series_count(),
                "registered new smart series"
            );
        }
        stats
    }

    fn apply_disk(&self, disk: &DiskRecord, serial: &str, stats: &mut ApplyStats) {
        let labels = [serial, disk.name.as_str()];

        for (gauge, value) in [
            (&self.mediasize, disk.mediasize),
            (&self.sectorsize, disk.sectorsize),
            (&self.rotationrate, disk.rotationrate),
        ] {
            if let Some(value) = value {
                gauge.with_label_values(&labels).set(value as f64);
                stats.values_set += 1;
            }
        }

        for attribute in disk.attributes.values() {
            let Some(gauge) = self.smart_series(attribute, stats) else {
                stats.values_skipped += 1;
                continue;
            };
            match attribute.raw_sample() {
                Some(sample) => {
                    gauge.with_label_values(&labels).set(sample);
                    stats.values_set += 1;
                }
                None => {
                    debug!(
                        device = %disk.name,
                        attribute = %attribute.name,
                        raw = %attribute.raw_value,
                        "raw value is not numeric, skipping"
                    );
                    stats.values_skipped += 1;
                }
            }
        }
    }

    /// Looks up the series for an attribute, creating it on first sight.
    fn smart_series(&self, attribute: &SmartAttribute, stats: &mut ApplyStats) -> Option<GaugeVec> {
        let name = attribute.name.as_str();
        {
            let series = self.smart.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = series.get(name) {
                return entry.clone();
            }
        }

        let mut series = self.smart.write().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = series.get(name) {
            return entry.clone();
        }

        let entry = match self.register_smart(name) {
            Ok(gauge) => {
                stats.series_created += 1;
                debug!(metric = %format!("{SMART_PREFIX}{name}"), "created smart series");
                Some(gauge)
            }
            Err(e) => {
                warn!(attribute = name, error = %e, "cannot export smart attribute");
                None
            }
        };
        series.insert(name.to_string(), entry.clone());
        entry
    }

    fn register_smart(&self, name: &str) -> Result<GaugeVec> {
        let gauge = GaugeVec::new(
            Opts::new(format!("{SMART_PREFIX}{name}"), describe_attribute(name)),
            LABELS,
        )?;
        self.registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }

    /// Number of `smart_*` series registered so far.
    pub fn smart_series_count(&self) -> usize {
        let series = self.smart.read().unwrap_or_else(|e| e.into_inner());
        series.values().filter(|g| g.is_some()).count()
    }

    /// Names of all registered series, fixed ones first, then SMART ones
    /// sorted.
    pub fn metric_names(&self) -> Vec<String> {
        let mut smart: Vec<String> = {
            let series = self.smart.read().unwrap_or_else(|e| e.into_inner());
            series
                .iter()
                .filter(|(_, g)| g.is_some())
                .map(|(name, _)| format!("{SMART_PREFIX}{name}"))
                .collect()
        };
        smart.sort();

        let mut names = vec![
            "geom_mediasize".to_string(),
            "geom_sectorsize".to_string(),
            "geom_rotationrate".to_string(),
        ];
        names.extend(smart);
        names
    }

    /// Current value of `metric{serial, name}`, if that label pair was ever set.
    pub fn value(&self, metric: &str, serial: &str, name: &str) -> Option<f64> {
        let families = self.registry.gather();
        let family = families.iter().find(|f| f.get_name() == metric)?;
        family
            .get_metric()
            .iter()
            .find(|m| has_label(m, "serial", serial) && has_label(m, "name", name))
            .map(|m| m.get_gauge().get_value())
    }

    /// Gathers all metric families that have at least one labeled value.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ExporterError::Metrics(prometheus::Error::Msg(e.to_string())))
    }

    /// Content type of [`MetricRegistry::encode`] output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

fn has_label(metric: &Metric, label: &str, value: &str) -> bool {
    metric
        .get_label()
        .iter()
        .any(|l| l.get_name() == label && l.get_value() == value)
}
