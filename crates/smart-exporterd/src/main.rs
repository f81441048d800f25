//! smart-exporterd - Prometheus exporter for disk inventory and SMART attributes.
//!
//! Periodically runs `geom disk list` and `smartctl -A` for every disk and
//! exposes the parsed values over HTTP in the Prometheus text format.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod server;

use std::net::{IpAddr, SocketAddr};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use smart_exporter_core::collector::{
    Collector, DEFAULT_LIST_COMMAND, DEFAULT_SMART_COMMAND, ShellRunner,
};
use smart_exporter_core::daemon::{ControlFlags, Daemon};
use smart_exporter_core::error::Result;
use smart_exporter_core::metrics::MetricRegistry;
use smart_exporter_core::{ExporterError, VERSION};

use server::HttpServer;

/// Disk SMART metrics exporter daemon.
#[derive(Parser, Debug)]
#[command(name = "smart-exporterd", about = "Disk SMART metrics exporter", version = VERSION)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0", env = "SMART_EXPORTER_LISTEN")]
    listen: String,

    /// Port to listen on.
    #[arg(short, long, default_value = "9248", env = "SMART_EXPORTER_PORT")]
    port: u16,

    /// Sampling interval in seconds.
    #[arg(short, long, default_value = "300", env = "SMART_EXPORTER_INTERVAL")]
    interval: u64,

    /// Command listing disks.
    #[arg(long, default_value = DEFAULT_LIST_COMMAND, env = "SMART_EXPORTER_LIST_COMMAND")]
    list_command: String,

    /// SMART command template; `{device}` is replaced by the disk name.
    #[arg(long, default_value = DEFAULT_SMART_COMMAND, env = "SMART_EXPORTER_SMART_COMMAND")]
    smart_command: String,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = log_level(verbose, quiet);

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("smart_exporterd={}", level).parse().unwrap())
        .add_directive(format!("smart_exporter_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Combines `--listen` and `--port` into a socket address.
fn listen_addr(listen: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = listen
        .parse()
        .map_err(|e| ExporterError::Config(format!("invalid listen address {listen:?}: {e}")))?;
    Ok(SocketAddr::new(ip, port))
}

fn run(args: Args) -> Result<()> {
    let addr = listen_addr(&args.listen, args.port)?;
    let collector = Collector::new(ShellRunner::new())
        .with_list_command(args.list_command)
        .with_smart_command(args.smart_command)?;
    let registry = Arc::new(MetricRegistry::new()?);

    info!("smart-exporterd {} starting", VERSION);
    info!(
        "Config: listen={}, interval={}s, list={:?}, smart={:?}",
        addr,
        args.interval,
        collector.list_command(),
        collector.smart_command()
    );

    let flags = ControlFlags::new();
    let mut server = HttpServer::new(addr);
    let mut daemon = Daemon::new(collector, registry, Duration::from_secs(args.interval));
    daemon.run(&flags, &mut server)?;

    info!("Shutdown complete");
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["smart-exporterd"]).unwrap();
        assert_eq!(args.listen, "0.0.0.0");
        assert_eq!(args.port, 9248);
        assert_eq!(args.interval, 300);
        assert_eq!(args.list_command, "geom disk list");
        assert_eq!(args.smart_command, "smartctl -A /dev/{device}");
    }

    #[test]
    fn test_listen_addr() {
        assert_eq!(
            listen_addr("127.0.0.1", 9100).unwrap(),
            "127.0.0.1:9100".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(listen_addr("::", 9248).unwrap().port(), 9248);
        assert!(matches!(
            listen_addr("localhost:80", 9248),
            Err(ExporterError::Config(_))
        ));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0, false), Level::INFO);
        assert_eq!(log_level(1, false), Level::DEBUG);
        assert_eq!(log_level(3, false), Level::TRACE);
        assert_eq!(log_level(2, true), Level::ERROR);
    }

    #[test]
    fn test_smart_command_without_placeholder_is_fatal() {
        let args = Args::try_parse_from([
            "smart-exporterd",
            "--listen",
            "127.0.0.1",
            "--smart-command",
            "smartctl -A /dev/ada0",
        ])
        .unwrap();
        assert!(matches!(run(args), Err(ExporterError::Config(_))));
    }
}
