//! In-memory command runner that replays canned output.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::collector::traits::{CommandRunner, split_lines};

type Hook = Arc<dyn Fn(&str) + Send + Sync>;

/// Replays registered output per exact command line.
///
/// Unknown commands produce no output, the same as a missing binary in
/// production. Every invocation is recorded so tests can assert on order
/// and count.
#[derive(Clone, Default)]
pub struct MockRunner {
    outputs: HashMap<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
    on_run: Option<Hook>,
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner")
            .field("outputs", &self.outputs.keys().collect::<Vec<_>>())
            .field("calls", &self.calls())
            .finish()
    }
}

impl MockRunner {
    /// Creates a runner with no registered commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the stdout returned for `command`.
    pub fn add_output(&mut self, command: impl Into<String>, output: impl Into<String>) {
        self.outputs.insert(command.into(), output.into());
    }

    /// Removes a registered command so it produces no output.
    pub fn remove_output(&mut self, command: &str) {
        self.outputs.remove(command);
    }

    /// Installs a callback invoked with every command line before it "runs".
    ///
    /// Used to simulate signals arriving while a cycle is in flight.
    pub fn on_run(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_run = Some(Arc::new(hook));
        self
    }

    /// Command lines run so far, in order. Shared between clones.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> Vec<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }
        if let Some(hook) = &self.on_run {
            hook(command);
        }
        self.outputs
            .get(command)
            .map(|out| split_lines(out))
            .unwrap_or_default()
    }
}
