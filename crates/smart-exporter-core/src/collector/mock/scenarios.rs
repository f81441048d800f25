//! Pre-built command output scenarios for testing.
//!
//! Output captured from a FreeBSD 13 host (serials altered) with a spinning
//! disk, a SATA SSD, an NVMe drive and an optical drive.

use super::runner::MockRunner;

/// `geom disk list` for the typical host.
pub const GEOM_TYPICAL: &str = "\
Geom name: ada0
Providers:
1. Name: ada0
   Mediasize: 500107862016 (466G)
   Sectorsize: 512
   Stripesize: 4096
   Stripeoffset: 0
   Mode: r2w2e3
   descr: WDC WD5000AAKX-00ERMA0
   lunid: 50014ee2b3d2c5f0
   ident: WD-ABC123
   rotationrate: 7200
   fwsectors: 63
   fwheads: 16

Geom name: ada1
Providers:
1. Name: ada1
   Mediasize: 250059350016 (233G)
   Sectorsize: 512
   Mode: r1w1e2
   descr: Samsung SSD 860 EVO 250GB
   lunid: 5002538e40a1b2c3
   ident: S3YHNX0K123456A
   rotationrate: 0
   fwsectors: 63
   fwheads: 16

Geom name: nvd0
Providers:
1. Name: nvd0
   Mediasize: 512110190592 (477G)
   Sectorsize: 512
   Mode: r0w0e0
   descr: Samsung SSD 970 EVO Plus 500GB
   lunid: 0025385891b0c1d2
   ident: S4EVNF0M654321B

Geom name: cd0
Providers:
1. Name: cd0
   Mediasize: 0 (0B)
   Sectorsize: 2048
   Mode: r0w0e0
   descr: HL-DT-ST DVDRAM GH24NSD1
   rotationrate: unknown
";

/// `smartctl -A /dev/ada0` (spinning disk).
pub const SMARTCTL_ADA0: &str = "\
smartctl 7.2 2020-12-30 r5155 [FreeBSD 13.1-RELEASE amd64] (local build)
Copyright (C) 2002-20, Bruce Allen, Christian Franke, www.smartmontools.org

=== START OF READ SMART DATA SECTION ===
SMART Attributes Data Structure revision number: 16
Vendor Specific SMART Attributes with Thresholds:
ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE
  1 Raw_Read_Error_Rate     0x002f   200   200   051    Pre-fail  Always       -       0
  3 Spin_Up_Time            0x0027   142   140   021    Pre-fail  Always       -       3866
  4 Start_Stop_Count        0x0032   100   100   000    Old_age   Always       -       1187
  5 Reallocated_Sector_Ct   0x0033   200   200   140    Pre-fail  Always       -       0
  7 Seek_Error_Rate         0x002e   200   200   000    Old_age   Always       -       0
  9 Power_On_Hours          0x0032   043   043   000    Old_age   Always       -       41623
 10 Spin_Retry_Count        0x0032   100   100   000    Old_age   Always       -       0
 12 Power_Cycle_Count       0x0032   100   100   000    Old_age   Always       -       1185
192 Power-Off_Retract_Count 0x0032   200   200   000    Old_age   Always       -       104
193 Load_Cycle_Count        0x0032   200   200   000    Old_age   Always       -       1082
194 Temperature_Celsius     0x0022   108   093   000    Old_age   Always       -       35 (Min/Max 21/45)
196 Reallocated_Event_Count 0x0032   200   200   000    Old_age   Always       -       0
197 Current_Pending_Sector  0x0032   200   200   000    Old_age   Always       -       0
198 Offline_Uncorrectable   0x0030   100   253   000    Old_age   Offline      -       0
199 UDMA_CRC_Error_Count    0x0032   200   200   000    Old_age   Always       -       0
200 Multi_Zone_Error_Rate   0x0008   200   200   000    Old_age   Offline      -       0

";

/// `smartctl -A /dev/ada1` (SATA SSD).
pub const SMARTCTL_ADA1: &str = "\
smartctl 7.2 2020-12-30 r5155 [FreeBSD 13.1-RELEASE amd64] (local build)
Copyright (C) 2002-20, Bruce Allen, Christian Franke, www.smartmontools.org

=== START OF READ SMART DATA SECTION ===
SMART Attributes Data Structure revision number: 1
Vendor Specific SMART Attributes with Thresholds:
ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE
  5 Reallocated_Sector_Ct   0x0033   100   100   010    Pre-fail  Always       -       0
  9 Power_On_Hours          0x0032   095   095   000    Old_age   Always       -       21034
 12 Power_Cycle_Count       0x0032   099   099   000    Old_age   Always       -       412
177 Wear_Leveling_Count     0x0013   097   097   000    Pre-fail  Always       -       31
179 Used_Rsvd_Blk_Cnt_Tot   0x0013   100   100   010    Pre-fail  Always       -       0
181 Program_Fail_Cnt_Total  0x0032   100   100   010    Old_age   Always       -       0
182 Erase_Fail_Count_Total  0x0032   100   100   010    Old_age   Always       -       0
183 Runtime_Bad_Block       0x0013   100   100   010    Pre-fail  Always       -       0
187 Uncorrectable_Error_Cnt 0x0032   100   100   000    Old_age   Always       -       0
190 Airflow_Temperature_Cel 0x0032   067   052   000    Old_age   Always       -       33
195 ECC_Error_Rate          0x001a   200   200   000    Old_age   Always       -       0
199 CRC_Error_Count         0x003e   100   100   000    Old_age   Always       -       0
235 POR_Recovery_Count      0x0012   099   099   000    Old_age   Always       -       37
241 Total_LBAs_Written      0x0032   099   099   000    Old_age   Always       -       18853107045

";

/// `smartctl -A /dev/nvd0` (NVMe: no attribute table).
pub const SMARTCTL_NVME: &str = "\
smartctl 7.2 2020-12-30 r5155 [FreeBSD 13.1-RELEASE amd64] (local build)
Copyright (C) 2002-20, Bruce Allen, Christian Franke, www.smartmontools.org

=== START OF SMART DATA SECTION ===
SMART/Health Information (NVMe Log 0x02)
Critical Warning:                   0x00
Temperature:                        38 Celsius
Available Spare:                    100%
Available Spare Threshold:          10%
Percentage Used:                    1%
Data Units Read:                    6,331,145 [3.24 TB]
Data Units Written:                 9,217,203 [4.71 TB]
Power Cycles:                       318
Power On Hours:                     3,127
Unsafe Shutdowns:                   22
Media and Data Integrity Errors:    0
";

impl MockRunner {
    /// Creates a runner emulating a typical FreeBSD host with the default
    /// command lines.
    ///
    /// Includes: ada0 (HDD), ada1 (SSD), nvd0 (NVMe, no attribute table) and
    /// cd0 (no serial; `smartctl` prints nothing).
    pub fn typical_freebsd_host() -> Self {
        let mut runner = Self::new();
        runner.add_output("geom disk list", GEOM_TYPICAL);
        runner.add_output("smartctl -A /dev/ada0", SMARTCTL_ADA0);
        runner.add_output("smartctl -A /dev/ada1", SMARTCTL_ADA1);
        runner.add_output("smartctl -A /dev/nvd0", SMARTCTL_NVME);
        runner
    }

    /// Creates a runner for a single disk `ada0` with serial `WD-ABC123` and
    /// one SMART attribute, `Reallocated_Sector_Ct`, raw value `0`.
    pub fn single_disk() -> Self {
        let mut runner = Self::new();
        runner.add_output(
            "geom disk list",
            "\
Geom name: ada0
Mediasize: 500107862016 (466G)
Sectorsize: 512
ident: WD-ABC123
",
        );
        runner.add_output(
            "smartctl -A /dev/ada0",
            "\
ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE
  5 Reallocated_Sector_Ct   0x0033   200   200   140    Pre-fail  Always       -       0
",
        );
        runner
    }
}

#[cfg(test)]
mod tests {
    use crate::collector::parser::{parse_geom_disk_list, parse_smartctl_attributes};
    use crate::collector::traits::split_lines;

    use super::*;

    #[test]
    fn test_typical_geom_fixture() {
        let disks = parse_geom_disk_list(&split_lines(GEOM_TYPICAL));
        assert_eq!(disks.len(), 4);
        assert_eq!(disks["ada1"].rotationrate, Some(0));
        assert_eq!(disks["cd0"].rotationrate, None);
        assert_eq!(disks["cd0"].serial, None);
        assert_eq!(disks["nvd0"].serial.as_deref(), Some("S4EVNF0M654321B"));
    }

    #[test]
    fn test_ada0_fixture() {
        let table = parse_smartctl_attributes(&split_lines(SMARTCTL_ADA0));
        // Temperature_Celsius has a compound raw value and is dropped
        assert_eq!(table.attributes.len(), 15);
        assert_eq!(table.dropped_rows, 1);
        assert_eq!(table.attributes["PowerOnHours"].raw_value, "41623");
        assert!(table.attributes.contains_key("PowerOffRetractCount"));
        assert!(table.attributes.contains_key("UDMACRCErrorCount"));
    }

    #[test]
    fn test_ada1_fixture() {
        let table = parse_smartctl_attributes(&split_lines(SMARTCTL_ADA1));
        assert_eq!(table.attributes.len(), 14);
        assert_eq!(table.dropped_rows, 0);
        assert_eq!(table.attributes["TotalLBAsWritten"].raw_value, "18853107045");
    }

    #[test]
    fn test_nvme_fixture_has_no_table() {
        let table = parse_smartctl_attributes(&split_lines(SMARTCTL_NVME));
        assert!(table.attributes.is_empty());
    }
}
