//! Sampling loop shared by the daemon binary.
//!
//! The loop owns the collector and drives it on the calling thread. The
//! exposition server is started once through the [`MetricsServer`] seam and
//! only reads the registry afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::collector::{Collector, CommandRunner};
use crate::error::Result;
use crate::metrics::MetricRegistry;

const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Cooperative flags set by signal handlers and polled by the loop.
#[derive(Debug, Clone, Default)]
pub struct ControlFlags {
    terminate: Arc<AtomicBool>,
    reload: Arc<AtomicBool>,
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_terminate(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::SeqCst);
    }

    pub fn terminate_requested(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    pub fn reload_requested(&self) -> bool {
        self.reload.load(Ordering::SeqCst)
    }

    /// Clears the reload flag, returning whether it was set.
    pub fn take_reload(&self) -> bool {
        self.reload.swap(false, Ordering::SeqCst)
    }
}

/// Lifecycle of [`Daemon::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Serving,
    Sampling,
    Sleeping,
    Terminating,
}

/// Starts the metrics exposition endpoint.
///
/// `start` is called exactly once, before the first sampling cycle, and must
/// return once the endpoint is accepting requests. The server may keep a
/// clone of `flags` to deliver signals.
pub trait MetricsServer {
    fn start(&mut self, registry: Arc<MetricRegistry>, flags: ControlFlags) -> Result<()>;
}

/// Periodic sample-and-apply loop.
pub struct Daemon<R: CommandRunner> {
    collector: Collector<R>,
    registry: Arc<MetricRegistry>,
    interval: Duration,
    state: LoopState,
    cycles: u64,
}

impl<R: CommandRunner> Daemon<R> {
    pub fn new(collector: Collector<R>, registry: Arc<MetricRegistry>, interval: Duration) -> Self {
        Self {
            collector,
            registry,
            interval,
            state: LoopState::Idle,
            cycles: 0,
        }
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn collector(&self) -> &Collector<R> {
        &self.collector
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Completed sample+apply cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs until termination is requested.
    ///
    /// Termination is checked only between cycles: a cycle in flight always
    /// finishes its apply. A termination request during the sleep ends the
    /// loop without another cycle. Fails only if the server cannot start.
    pub fn run<S: MetricsServer>(&mut self, flags: &ControlFlags, server: &mut S) -> Result<()> {
        self.state = LoopState::Serving;
        server.start(Arc::clone(&self.registry), flags.clone())?;
        info!(interval_s = self.interval.as_secs(), "Starting sampling loop");

        loop {
            self.state = LoopState::Sampling;
            self.sample_once();

            if flags.terminate_requested() {
                break;
            }

            self.state = LoopState::Sleeping;
            self.sleep(flags);

            if flags.terminate_requested() {
                break;
            }
        }

        self.state = LoopState::Terminating;
        info!(cycles = self.cycles, "Shutting down");
        Ok(())
    }

    /// One collection cycle followed by a registry update.
    pub fn sample_once(&mut self) {
        let snapshot = self.collector.collect_snapshot();
        let applied = self.registry.apply(&snapshot);
        self.cycles += 1;

        let duration_ms = self
            .collector
            .last_timing()
            .map(|t| t.total.as_millis() as u64)
            .unwrap_or_default();
        info!(
            cycle = self.cycles,
            duration_ms,
            "Sample #{}: {}",
            self.cycles,
            snapshot.describe()
        );
        if let Some(stats) = self.collector.last_stats() {
            debug!(
                dropped_rows = stats.dropped_rows,
                values_set = applied.values_set,
                values_skipped = applied.values_skipped,
                series_created = applied.series_created,
                "cycle details"
            );
        }
    }

    fn sleep(&self, flags: &ControlFlags) {
        let mut remaining = self.interval;
        while remaining > Duration::ZERO && !flags.terminate_requested() {
            if flags.take_reload() {
                info!("Reload requested; configuration is read at startup only, ignoring");
            }
            let step = remaining.min(SLEEP_SLICE);
            std::thread::sleep(step);
            remaining = remaining.saturating_sub(step);
        }
        if flags.take_reload() {
            info!("Reload requested; configuration is read at startup only, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExporterError;
    use crate::collector::MockRunner;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    #[derive(Default)]
    struct RecordingServer {
        starts: usize,
        fail: bool,
    }

    impl MetricsServer for RecordingServer {
        fn start(&mut self, _registry: Arc<MetricRegistry>, _flags: ControlFlags) -> Result<()> {
            self.starts += 1;
            if self.fail {
                return Err(ExporterError::Server("address in use".into()));
            }
            Ok(())
        }
    }

    fn daemon(runner: MockRunner, interval: Duration) -> Daemon<MockRunner> {
        let registry = Arc::new(MetricRegistry::new().unwrap());
        Daemon::new(Collector::new(runner), registry, interval)
    }

    /// Requests termination on the `n`-th run of the disk listing.
    fn terminate_on_listing(runner: MockRunner, flags: &ControlFlags, n: usize) -> MockRunner {
        let flags = flags.clone();
        let seen = AtomicUsize::new(0);
        runner.on_run(move |command| {
            if command == "geom disk list" && seen.fetch_add(1, Ordering::SeqCst) + 1 == n {
                flags.request_terminate();
            }
        })
    }

    #[test]
    fn test_termination_mid_cycle_completes_apply() {
        let flags = ControlFlags::new();
        let hook_flags = flags.clone();
        let runner = MockRunner::typical_freebsd_host().on_run(move |command| {
            if command == "smartctl -A /dev/ada0" {
                hook_flags.request_terminate();
            }
        });
        let mut daemon = daemon(runner, Duration::from_secs(3600));
        let mut server = RecordingServer::default();

        daemon.run(&flags, &mut server).unwrap();

        assert_eq!(server.starts, 1);
        assert_eq!(daemon.cycles(), 1);
        assert_eq!(daemon.state(), LoopState::Terminating);
        // the rest of the cycle ran after the request
        assert_eq!(daemon.collector().runner().calls().len(), 5);
        assert_eq!(
            daemon
                .registry()
                .value("smart_PowerOnHours", "S3YHNX0K123456A", "ada1"),
            Some(21034.0)
        );
    }

    #[test]
    fn test_zero_interval_runs_back_to_back_cycles() {
        let flags = ControlFlags::new();
        let runner = terminate_on_listing(MockRunner::single_disk(), &flags, 3);
        let mut daemon = daemon(runner, Duration::ZERO);
        let mut server = RecordingServer::default();

        daemon.run(&flags, &mut server).unwrap();

        assert_eq!(server.starts, 1);
        assert_eq!(daemon.cycles(), 3);
        assert_eq!(daemon.registry().smart_series_count(), 1);
    }

    #[test]
    fn test_termination_during_sleep_skips_next_cycle() {
        let flags = ControlFlags::new();
        let mut daemon = daemon(MockRunner::single_disk(), Duration::from_secs(3600));
        let mut server = RecordingServer::default();

        let signal = flags.clone();
        let start = Instant::now();
        std::thread::scope(|s| {
            s.spawn(move || {
                std::thread::sleep(Duration::from_millis(200));
                signal.request_terminate();
            });
            daemon.run(&flags, &mut server).unwrap();
        });

        assert!(start.elapsed() < Duration::from_secs(30));
        assert_eq!(daemon.cycles(), 1);
    }

    #[test]
    fn test_reload_is_inert() {
        let flags = ControlFlags::new();
        let hook_flags = flags.clone();
        let listings = AtomicUsize::new(0);
        let runner = MockRunner::single_disk().on_run(move |command| {
            if command != "geom disk list" {
                return;
            }
            match listings.fetch_add(1, Ordering::SeqCst) {
                0 => hook_flags.request_reload(),
                _ => hook_flags.request_terminate(),
            }
        });
        let mut daemon = daemon(runner, Duration::ZERO);
        let mut server = RecordingServer::default();

        daemon.run(&flags, &mut server).unwrap();

        assert_eq!(daemon.cycles(), 2);
        assert_eq!(server.starts, 1);
        assert!(!flags.reload_requested());
        assert_eq!(
            daemon.collector().smart_command(),
            "smartctl -A /dev/{device}"
        );
    }

    #[test]
    fn test_server_failure_stops_before_sampling() {
        let flags = ControlFlags::new();
        let mut daemon = daemon(MockRunner::single_disk(), Duration::ZERO);
        let mut server = RecordingServer {
            fail: true,
            ..Default::default()
        };

        let result = daemon.run(&flags, &mut server);

        assert!(matches!(result, Err(ExporterError::Server(_))));
        assert_eq!(daemon.cycles(), 0);
        assert!(daemon.collector().runner().calls().is_empty());
    }

    #[test]
    fn test_control_flags_shared_between_clones() {
        let flags = ControlFlags::new();
        let clone = flags.clone();
        clone.request_reload();
        assert!(flags.reload_requested());
        assert!(flags.take_reload());
        assert!(!flags.take_reload());

        assert!(!flags.terminate_requested());
        clone.request_terminate();
        assert!(flags.terminate_requested());
    }
}
