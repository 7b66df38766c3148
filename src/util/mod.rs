//! Utility functions module
//!
//! Contains helper functions for unit conversion and formatting.

pub mod units;

// Re-export commonly used functions
pub use units::{calculate_ops_per_sec, duration_to_ms, format_ms, format_ops_per_sec};
