//! Benchmark engine module
//!
//! Contains the trial state machine, operation partitioning, the worker
//! loop and the experiment runner that ties them together.

pub mod partition;
pub mod runner;
pub mod trial;
pub mod worker;

// Re-export commonly used types
pub use partition::partition;
pub use runner::{ExperimentRunner, ProgressUpdate};
pub use trial::{Trial, TrialPhase};
pub use worker::Worker;
