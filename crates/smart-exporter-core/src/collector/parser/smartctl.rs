//! Parser for the attribute table printed by `smartctl -A`.
//!
//! Everything up to and including the `ID#` header line (version banner,
//! section titles, error text) is skipped. Each following line is a row only
//! if it splits into exactly ten whitespace-separated columns:
//!
//! ```text
//! ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE
//!   5 Reallocated_Sector_Ct   0x0033   200   200   140    Pre-fail  Always       -       0
//! 194 Temperature_Celsius     0x0022   108   093   000    Old_age   Always       -       35 (Min/Max 21/45)
//! ```
//!
//! The second row above has more than ten columns and is dropped.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::trace;

use crate::model::SmartAttribute;

const TABLE_HEADER: &str = "ID#";
const ROW_COLUMNS: usize = 10;

/// Why a table row was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("expected 10 columns, got {0}")]
    ColumnCount(usize),
    #[error("invalid integer in column {column}: {value:?}")]
    InvalidInteger { column: &'static str, value: String },
    #[error("attribute name {0:?} is empty after normalization")]
    EmptyName(String),
}

/// Attributes parsed from one device's table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmartTable {
    /// Attributes keyed by normalized name. A later row wins over an
    /// earlier one with the same normalized name.
    pub attributes: BTreeMap<String, SmartAttribute>,
    /// Non-blank lines after the header that were not accepted as rows.
    pub dropped_rows: usize,
}

/// Removes `-` and `_` from a raw attribute name.
///
/// `Power-Off_Retract_Count` becomes `PowerOffRetractCount`.
pub fn normalize_attribute_name(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && *c != '_').collect()
}

/// Parses `smartctl -A` output into a table of attributes.
pub fn parse_smartctl_attributes<S: AsRef<str>>(lines: &[S]) -> SmartTable {
    let mut table = SmartTable::default();
    let mut in_table = false;

    for line in lines {
        let line = line.as_ref().trim();

        if !in_table {
            in_table = line.starts_with(TABLE_HEADER);
            continue;
        }
        if line.is_empty() {
            continue;
        }

        match parse_attribute_row(line) {
            Ok(attribute) => {
                table.attributes.insert(attribute.name.clone(), attribute);
            }
            Err(e) => {
                trace!(line, error = %e, "dropping smart table row");
                table.dropped_rows += 1;
            }
        }
    }

    table
}

/// Parses one table row. Any malformed numeric column rejects the row.
pub fn parse_attribute_row(line: &str) -> Result<SmartAttribute, RowError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != ROW_COLUMNS {
        return Err(RowError::ColumnCount(fields.len()));
    }

    let name = normalize_attribute_name(fields[1]);
    if name.is_empty() {
        return Err(RowError::EmptyName(fields[1].to_string()));
    }

    // fields[8] is WHEN_FAILED, not exported
    Ok(SmartAttribute {
        id: parse_column(fields[0], "id")?,
        name,
        flags: fields[2].to_string(),
        value: parse_column(fields[3], "value")?,
        worst: parse_column(fields[4], "worst")?,
        threshold: parse_column(fields[5], "threshold")?,
        kind: fields[6].to_string(),
        updated: fields[7].to_string(),
        raw_value: fields[9].to_string(),
    })
}

fn parse_column(value: &str, column: &'static str) -> Result<u16, RowError> {
    value.parse().map_err(|_| RowError::InvalidInteger {
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE";

    #[test]
    fn test_normalize_attribute_name() {
        assert_eq!(normalize_attribute_name("Power_On-Hours"), "PowerOnHours");
        assert_eq!(
            normalize_attribute_name("Power-Off_Retract_Count"),
            "PowerOffRetractCount"
        );
        assert_eq!(normalize_attribute_name("Unknown_Attribute"), "UnknownAttribute");
        assert_eq!(normalize_attribute_name("--__"), "");
    }

    #[test]
    fn test_parse_full_row() {
        let lines = [
            HEADER,
            "  5 Reallocated_Sector_Ct   0x0033   200   200   140    Pre-fail  Always       -       0",
        ];
        let table = parse_smartctl_attributes(&lines);

        assert_eq!(table.dropped_rows, 0);
        let attr = &table.attributes["ReallocatedSectorCt"];
        assert_eq!(attr.id, 5);
        assert_eq!(attr.name, "ReallocatedSectorCt");
        assert_eq!(attr.flags, "0x0033");
        assert_eq!(attr.value, 200);
        assert_eq!(attr.worst, 200);
        assert_eq!(attr.threshold, 140);
        assert_eq!(attr.kind, "Pre-fail");
        assert_eq!(attr.updated, "Always");
        assert_eq!(attr.raw_value, "0");
    }

    #[test]
    fn test_raw_value_is_tenth_column_not_when_failed() {
        let lines = [
            HEADER,
            "  9 Power_On-Hours          0x0032   043   043   000    Old_age   Always   FAILING_NOW 41623",
        ];
        let table = parse_smartctl_attributes(&lines);
        let attr = &table.attributes["PowerOnHours"];
        assert_eq!(attr.raw_value, "41623");
        assert_eq!(attr.value, 43);
    }

    #[test]
    fn test_rows_before_header_are_ignored() {
        let lines = [
            "smartctl 7.2 2020-12-30 r5155 [FreeBSD 13.1-RELEASE amd64] (local build)",
            "  1 Raw_Read_Error_Rate     0x002f   200   200   051    Pre-fail  Always       -       0",
            "=== START OF READ SMART DATA SECTION ===",
        ];
        let table = parse_smartctl_attributes(&lines);
        assert!(table.attributes.is_empty());
        assert_eq!(table.dropped_rows, 0);
    }

    #[test]
    fn test_wrong_column_counts_are_dropped() {
        let lines = [
            HEADER,
            // 9 columns
            "  3 Spin_Up_Time            0x0027   142   140   021    Pre-fail  Always       3866",
            // 11 columns
            "  4 Start_Stop_Count        0x0032   100   100   000    Old_age   Always       -       1187 extra",
            // compound raw value
            "194 Temperature_Celsius     0x0022   108   093   000    Old_age   Always       -       35 (Min/Max 21/45)",
            " 12 Power_Cycle_Count       0x0032   100   100   000    Old_age   Always       -       1185",
        ];
        let table = parse_smartctl_attributes(&lines);

        assert_eq!(table.attributes.len(), 1);
        assert!(table.attributes.contains_key("PowerCycleCount"));
        assert!(!table.attributes.contains_key("SpinUpTime"));
        assert!(!table.attributes.contains_key("StartStopCount"));
        assert!(!table.attributes.contains_key("TemperatureCelsius"));
        assert_eq!(table.dropped_rows, 3);
    }

    #[test]
    fn test_malformed_integer_drops_whole_row() {
        let lines = [
            HEADER,
            "  1 Raw_Read_Error_Rate     0x002f   200   200   ---    Pre-fail  Always       -       0",
            "0x0a Spin_Retry_Count       0x0032   100   100   000    Old_age   Always       -       0",
            "  7 Seek_Error_Rate         0x002e   200   200   000    Old_age   Always       -       0",
        ];
        let table = parse_smartctl_attributes(&lines);
        assert_eq!(table.attributes.len(), 1);
        assert!(table.attributes.contains_key("SeekErrorRate"));
        assert_eq!(table.dropped_rows, 2);
    }

    #[test]
    fn test_parse_attribute_row_errors() {
        assert_eq!(
            parse_attribute_row("1 2 3"),
            Err(RowError::ColumnCount(3))
        );
        assert_eq!(
            parse_attribute_row("x Name 0x0 1 1 1 Old_age Always - 0"),
            Err(RowError::InvalidInteger {
                column: "id",
                value: "x".to_string()
            })
        );
        assert_eq!(
            parse_attribute_row("1 -_- 0x0 1 1 1 Old_age Always - 0"),
            Err(RowError::EmptyName("-_-".to_string()))
        );
    }

    #[test]
    fn test_colliding_normalized_names_last_wins() {
        let lines = [
            HEADER,
            "190 Airflow_Temperature     0x0022   070   050   045    Old_age   Always       -       30",
            "231 Airflow-Temperature     0x0022   090   090   000    Old_age   Always       -       10",
        ];
        let table = parse_smartctl_attributes(&lines);
        assert_eq!(table.attributes.len(), 1);
        let attr = &table.attributes["AirflowTemperature"];
        assert_eq!(attr.id, 231);
        assert_eq!(attr.raw_value, "10");
    }

    #[test]
    fn test_blank_lines_and_footer() {
        let lines = [
            HEADER,
            "  5 Reallocated_Sector_Ct   0x0033   200   200   140    Pre-fail  Always       -       0",
            "",
            "",
        ];
        let table = parse_smartctl_attributes(&lines);
        assert_eq!(table.attributes.len(), 1);
        assert_eq!(table.dropped_rows, 0);
    }

    #[test]
    fn test_no_header_nvme_output() {
        let lines = [
            "=== START OF SMART DATA SECTION ===",
            "SMART/Health Information (NVMe Log 0x02)",
            "Critical Warning:                   0x00",
            "Temperature:                        38 Celsius",
            "Power On Hours:                     3,127",
        ];
        let table = parse_smartctl_attributes(&lines);
        assert!(table.attributes.is_empty());
        assert_eq!(table.dropped_rows, 0);
    }
}
