//! Parsers for storage tool output.
//!
//! These are pure functions over already-captured, trimmed lines. They never
//! fail as a whole: anything they cannot make sense of is dropped and the
//! rest of the input is still used.

pub mod geom;
pub mod smartctl;

pub use geom::parse_geom_disk_list;
pub use smartctl::{RowError, SmartTable, normalize_attribute_name, parse_smartctl_attributes};
