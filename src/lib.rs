//! setbench - linked set contention benchmark
//!
//! Measures how a linked set behaves when every access goes through one
//! global lock, against a single-threaded baseline, across workload mixes
//! and thread counts.

use std::fmt;

pub mod bench;
pub mod config;
pub mod models;
pub mod report;
pub mod set;
pub mod util;
pub mod workload;

// Common error types
#[derive(Debug)]
pub enum SetBenchError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Benchmark execution error
    BenchmarkError(String),
    /// A worker thread failed or panicked
    WorkerError(String),
    /// Report rendering or serialization error
    OutputError(String),
}

impl fmt::Display for SetBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetBenchError::IoError(err) => write!(f, "I/O error: {}", err),
            SetBenchError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            SetBenchError::BenchmarkError(msg) => write!(f, "Benchmark error: {}", msg),
            SetBenchError::WorkerError(msg) => write!(f, "Worker error: {}", msg),
            SetBenchError::OutputError(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for SetBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetBenchError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SetBenchError {
    fn from(err: std::io::Error) -> Self {
        SetBenchError::IoError(err)
    }
}

impl From<serde_json::Error> for SetBenchError {
    fn from(err: serde_json::Error) -> Self {
        SetBenchError::OutputError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for SetBenchError {
    fn from(err: toml::de::Error) -> Self {
        SetBenchError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for setbench operations
pub type Result<T> = std::result::Result<T, SetBenchError>;

// Common types and constants
pub const APP_NAME: &str = "setbench";
pub const CONFIG_FILE: &str = "setbench.toml";
/// Environment variable that points at an explicit config file
pub const CONFIG_ENV_VAR: &str = "SETBENCH_CONFIG";
