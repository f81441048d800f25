//! Parser for `geom disk list` output.
//!
//! Format: one block per disk, opened by a `Geom name:` line, followed by
//! `key: value` lines for the disk's provider. Only a handful of keys are
//! used; everything else (`Mode:`, `fwheads:`, `Providers:`, ...) is ignored.
//!
//! ```text
//! Geom name: ada0
//! Providers:
//! 1. Name: ada0
//!    Mediasize: 500107862016 (466G)
//!    Sectorsize: 512
//!    Stripesize: 4096
//!    Stripeoffset: 0
//!    Mode: r2w2e3
//!    descr: WDC WD5000AAKX-00ERMA0
//!    lunid: 50014ee2b3d2c5f0
//!    ident: WD-WCC2EA123456
//!    rotationrate: 7200
//! ```

use std::collections::BTreeMap;

use crate::model::DiskRecord;

const GEOM_HEADER: &str = "Geom name:";

#[derive(Debug, Clone, Copy)]
enum Field {
    Mediasize,
    Sectorsize,
    Description,
    Lunid,
    Ident,
    RotationRate,
    Stripesize,
}

const FIELDS: &[(&str, Field)] = &[
    ("Mediasize:", Field::Mediasize),
    ("Sectorsize:", Field::Sectorsize),
    ("descr:", Field::Description),
    ("lunid:", Field::Lunid),
    ("ident:", Field::Ident),
    ("rotationrate:", Field::RotationRate),
    ("Stripesize:", Field::Stripesize),
];

/// Parses `geom disk list` output into disk records keyed by geom name.
///
/// Lines before the first `Geom name:` header are ignored. Integer fields
/// that fail to parse (e.g. `rotationrate: unknown`) are left absent; the
/// rest of the record is kept. A repeated header for the same name starts
/// that record over.
pub fn parse_geom_disk_list<S: AsRef<str>>(lines: &[S]) -> BTreeMap<String, DiskRecord> {
    let mut disks: BTreeMap<String, DiskRecord> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in lines {
        let line = line.as_ref().trim();

        if let Some(name) = line.strip_prefix(GEOM_HEADER) {
            let name = name.trim();
            if name.is_empty() {
                current = None;
                continue;
            }
            disks.insert(name.to_string(), DiskRecord::new(name));
            current = Some(name.to_string());
            continue;
        }

        let Some(disk) = current.as_ref().and_then(|name| disks.get_mut(name)) else {
            continue;
        };
        apply_field(disk, line);
    }

    disks
}

fn apply_field(disk: &mut DiskRecord, line: &str) {
    let Some((field, value)) = FIELDS.iter().find_map(|(prefix, field)| {
        line.strip_prefix(*prefix)
            .map(|rest| (*field, rest.trim()))
    }) else {
        return;
    };
    if value.is_empty() {
        return;
    }

    match field {
        // "500107862016 (466G)": only the byte count is used
        Field::Mediasize => set_u64(&mut disk.mediasize, value.split_whitespace().next()),
        Field::Sectorsize => set_u64(&mut disk.sectorsize, Some(value)),
        Field::RotationRate => set_u64(&mut disk.rotationrate, Some(value)),
        Field::Stripesize => set_u64(&mut disk.stripesize, Some(value)),
        Field::Description => disk.description = Some(value.to_string()),
        Field::Lunid => disk.lunid = Some(value.to_string()),
        Field::Ident => disk.serial = Some(value.to_string()),
    }
}

fn set_u64(slot: &mut Option<u64>, value: Option<&str>) {
    if let Some(v) = value.and_then(|v| v.parse::<u64>().ok()) {
        *slot = Some(v);
    }
}
