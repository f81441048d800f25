//! Error type shared by the library and the binaries.
//!
//! Only startup and exposition failures surface as errors. Data-quality
//! problems in command output never do; they degrade to missing metrics.

use std::io;
use thiserror::Error;

/// Result alias for smart-exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

#[derive(Error, Debug)]
pub enum ExporterError {
    /// I/O error (binding the listener, spawning the server thread).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Prometheus registry rejected a metric or failed to encode.
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Exposition server could not be started.
    #[error("exposition server error: {0}")]
    Server(String),
}
