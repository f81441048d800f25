//! smart-exporter-dump - runs one sampling cycle and prints what was parsed.
//!
//! Useful to check how `geom disk list` and `smartctl -A` output on a given
//! host is understood, without starting the daemon.

use std::fmt::Write as _;
use std::process;

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;

use smart_exporter_core::collector::{
    Collector, CollectorStats, DEFAULT_LIST_COMMAND, DEFAULT_SMART_COMMAND, ShellRunner,
};
use smart_exporter_core::metrics::MetricRegistry;
use smart_exporter_core::model::{DiskRecord, DiskSnapshot};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "smart-exporter-dump",
    about = "Run one disk sampling cycle and print the result",
    version = smart_exporter_core::VERSION
)]
struct Cli {
    /// Command listing disks.
    #[arg(long, default_value = DEFAULT_LIST_COMMAND)]
    list_command: String,

    /// SMART command template; `{device}` is replaced by the disk name.
    #[arg(long, default_value = DEFAULT_SMART_COMMAND)]
    smart_command: String,

    /// Output as JSON
    #[arg(long, conflicts_with = "metrics")]
    json: bool,

    /// Print the Prometheus exposition the daemon would serve
    #[arg(long)]
    metrics: bool,
}

fn main() {
    let cli = Cli::parse();

    let collector = Collector::new(ShellRunner::new())
        .with_list_command(cli.list_command.clone())
        .with_smart_command(cli.smart_command.clone());
    let mut collector = match collector {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let snapshot = collector.collect_snapshot();
    let stats = collector.last_stats().cloned().unwrap_or_default();
    let duration_ms = collector
        .last_timing()
        .map(|t| t.total.as_millis() as u64)
        .unwrap_or_default();

    if cli.json {
        let json = DumpJson {
            snapshot: &snapshot,
            stats: StatsJson::from(&stats),
            duration_ms,
        };
        match serde_json::to_string_pretty(&json) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        }
    } else if cli.metrics {
        match render_metrics(&snapshot) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("Error encoding metrics: {e}");
                process::exit(1);
            }
        }
    } else {
        print!("{}", render_text(&snapshot, &stats, duration_ms));
    }
}

// ── JSON ─────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DumpJson<'a> {
    snapshot: &'a DiskSnapshot,
    stats: StatsJson,
    duration_ms: u64,
}

#[derive(Serialize)]
struct StatsJson {
    disks: usize,
    attributes: usize,
    dropped_rows: usize,
}

impl From<&CollectorStats> for StatsJson {
    fn from(stats: &CollectorStats) -> Self {
        Self {
            disks: stats.disks,
            attributes: stats.attributes,
            dropped_rows: stats.dropped_rows,
        }
    }
}

// ── Text ─────────────────────────────────────────────────────────────────────

fn fmt_ts(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn fmt_field(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn render_metrics(snapshot: &DiskSnapshot) -> smart_exporter_core::error::Result<String> {
    let registry = MetricRegistry::new()?;
    registry.apply(snapshot);
    registry.encode()
}

fn render_text(snapshot: &DiskSnapshot, stats: &CollectorStats, duration_ms: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Snapshot at {}: {} ({} ms)",
        fmt_ts(snapshot.timestamp),
        snapshot.describe(),
        duration_ms
    );
    if stats.dropped_rows > 0 {
        let _ = writeln!(out, "Dropped SMART rows: {}", stats.dropped_rows);
    }

    for disk in snapshot.disks.values() {
        render_disk(&mut out, disk);
    }
    out
}

fn render_disk(out: &mut String, disk: &DiskRecord) {
    let _ = writeln!(
        out,
        "\n{}  serial={}  mediasize={}  sectorsize={}  rotationrate={}",
        disk.name,
        disk.serial.as_deref().unwrap_or("-"),
        fmt_field(disk.mediasize),
        fmt_field(disk.sectorsize),
        fmt_field(disk.rotationrate),
    );
    if let Some(descr) = &disk.description {
        let _ = writeln!(out, "  descr: {descr}");
    }
    if disk.serial.is_none() {
        let _ = writeln!(out, "  (no serial: not exported)");
    }
    if disk.attributes.is_empty() {
        let _ = writeln!(out, "  no SMART attributes");
        return;
    }

    let _ = writeln!(
        out,
        "  {:>3}  {:<28} {:>5} {:>5} {:>6}  {}",
        "ID", "NAME", "VALUE", "WORST", "THRESH", "RAW"
    );
    let _ = writeln!(out, "  {}", "─".repeat(60));
    let mut attributes: Vec<_> = disk.attributes.values().collect();
    attributes.sort_by_key(|a| a.id);
    for attr in attributes {
        let _ = writeln!(
            out,
            "  {:>3}  {:<28} {:>5} {:>5} {:>6}  {}",
            attr.id, attr.name, attr.value, attr.worst, attr.threshold, attr.raw_value
        );
    }
}
