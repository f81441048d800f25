//! Prometheus metrics for disks and SMART attributes.
//!
//! Fixed series (`geom_mediasize`, `geom_sectorsize`, `geom_rotationrate`)
//! are registered up front. SMART series (`smart_<attribute>`) are created
//! the first time an attribute name is seen and live for the rest of the
//! process. All series are labeled by `serial` and `name` (geom name).

mod descriptions;
mod registry;

pub use descriptions::describe_attribute;
pub use registry::{ApplyStats, LABELS, MetricRegistry, SMART_PREFIX};
