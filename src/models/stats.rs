//! Sample statistics over repeated trials

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::util::units::duration_to_ms;

/// Mean and spread of one configuration's elapsed times, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean_ms: f64,
    /// Sample standard deviation (Bessel's correction), 0 for one sample
    pub std_dev_ms: f64,
    /// Fastest sample
    pub min_ms: f64,
    /// Slowest sample
    pub max_ms: f64,
}

impl SampleStats {
    /// Compute statistics from elapsed-time samples
    pub fn from_samples(samples: &[Duration]) -> Self {
        let millis: Vec<f64> = samples.iter().copied().map(duration_to_ms).collect();
        Self::from_millis(&millis)
    }

    /// Compute statistics from samples already expressed in milliseconds
    pub fn from_millis(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;

        let std_dev = if count > 1 {
            let sum_sq: f64 = samples.iter().map(|s| (s - mean) * (s - mean)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count,
            mean_ms: mean,
            std_dev_ms: std_dev,
            min_ms: min,
            max_ms: max,
        }
    }
}
