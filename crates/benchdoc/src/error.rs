//! Error types shared by every pipeline stage

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use crate::patcher::MissingMarker;

/// Errors produced while refreshing a benchmark table
#[derive(Debug, thiserror::Error)]
pub enum BenchdocError {
    #[error("Benchmark command exited with {status}: {stderr}")]
    ProcessFailure { status: ExitStatus, stderr: String },
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "Benchmark command '{command}' did not finish within {}",
        humantime::format_duration(*.timeout)
    )]
    Timeout { command: String, timeout: Duration },
    #[error("Document error for {}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{missing} marker not found in {}", .path.display())]
    MarkersMissing { path: PathBuf, missing: MissingMarker },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchdocError>;
