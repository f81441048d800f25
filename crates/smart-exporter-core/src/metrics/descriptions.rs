//! Help strings for well-known SMART attributes, keyed by normalized name.

const NO_DESCRIPTION: &str = "No description";

/// Returns the help string for a `smart_<name>` series.
pub fn describe_attribute(name: &str) -> &'static str {
    match name {
        "RawReadErrorRate" => "Rate of hardware read errors",
        "ThroughputPerformance" => "Overall throughput performance",
        "SpinUpTime" => "Average time of spindle spin up",
        "StartStopCount" => "Count of spindle start/stop cycles",
        "ReallocatedSectorCt" => "Count of reallocated sectors",
        "SeekErrorRate" => "Rate of seek errors of the magnetic heads",
        "PowerOnHours" => "Count of hours in power-on state",
        "SpinRetryCount" => "Count of retries of spin start attempts",
        "CalibrationRetryCount" => "Count of recalibration retries",
        "PowerCycleCount" => "Count of full power on/off cycles",
        "WearLevelingCount" => "Count of erase cycles of the most worn block",
        "UsedRsvdBlkCntTot" => "Count of reserved blocks used",
        "ProgramFailCntTotal" => "Count of flash program failures",
        "EraseFailCountTotal" => "Count of flash erase failures",
        "RuntimeBadBlock" => "Count of bad blocks found at runtime",
        "ReportedUncorrect" => "Count of errors not recoverable with ECC",
        "UncorrectableErrorCnt" => "Count of uncorrectable errors",
        "CommandTimeout" => "Count of aborted operations due to timeout",
        "AirflowTemperatureCel" => "Airflow temperature in degrees Celsius",
        "PowerOffRetractCount" => "Count of emergency head retracts",
        "LoadCycleCount" => "Count of head load/unload cycles",
        "TemperatureCelsius" => "Drive temperature in degrees Celsius",
        "HardwareECCRecovered" => "Count of errors recovered by hardware ECC",
        "ReallocatedEventCount" => "Count of remap operations",
        "CurrentPendingSector" => "Count of unstable sectors waiting to be remapped",
        "OfflineUncorrectable" => "Count of uncorrectable errors found offline",
        "UDMACRCErrorCount" => "Count of interface CRC errors",
        "CRCErrorCount" => "Count of interface CRC errors",
        "MultiZoneErrorRate" => "Rate of errors found when writing a sector",
        "ECCErrorRate" => "Rate of ECC errors",
        "PORRecoveryCount" => "Count of unexpected power loss recoveries",
        "TotalLBAsWritten" => "Total count of LBAs written",
        "TotalLBAsRead" => "Total count of LBAs read",
        _ => NO_DESCRIPTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_attributes() {
        assert_eq!(describe_attribute("ReallocatedSectorCt"), "Count of reallocated sectors");
        assert_eq!(describe_attribute("VendorSpecific253"), "No description");
    }
}
