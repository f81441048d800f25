//! Abstraction over external command execution to enable testing and mocking.
//!
//! The `CommandRunner` trait lets the collector run the real `geom` and
//! `smartctl` tools on a FreeBSD host, or replay canned output in tests.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// Executes a command line and returns its output.
///
/// Implementations are fail-open: a command that cannot be spawned or exits
/// non-zero yields whatever it wrote to stdout, possibly nothing. Callers
/// treat empty output as "no data", never as an error.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` through a shell and returns stdout split into lines,
    /// each trimmed of surrounding whitespace.
    fn run(&self, command: &str) -> Vec<String>;
}

/// Runs commands through `sh -c`.
///
/// Use this in production. No timeout is applied: a device that hangs
/// `smartctl` stalls the whole cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Vec<String> {
        let output = match Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!(command, error = %e, "failed to spawn command");
                return Vec::new();
            }
        };

        if !output.status.success() {
            debug!(command, status = %output.status, "command exited unsuccessfully");
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(command, stderr = %stderr.trim(), "command wrote to stderr");
        }

        split_lines(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Splits command output into trimmed lines.
pub fn split_lines(output: &str) -> Vec<String> {
    output.lines().map(|l| l.trim().to_string()).collect()
}
