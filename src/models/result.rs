//! Benchmark result data models
//!
//! Contains structures for per-trial outcomes, per-configuration summaries
//! and the report of a whole experiment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

use super::{duration_serde, durations_serde, SampleStats};
use crate::config::{ExperimentConfig, Strategy};
use crate::util::units::calculate_ops_per_sec;
use crate::workload::{OperationCounts, WorkloadMix};
use crate::Result;

/// Diagnostic counters kept by each worker and summed by the runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCounters {
    /// Operations executed, per tag
    pub executed: OperationCounts,
    /// Member calls that found their key
    pub member_hits: u64,
    /// Insert calls that added a key
    pub insert_ok: u64,
    /// Delete calls that removed a key
    pub delete_ok: u64,
    /// Insert probes that found the drawn key already present
    pub insert_redraws: u64,
}

impl WorkerCounters {
    /// Add another worker's counters to these
    pub fn merge(&mut self, other: &Self) {
        self.executed.merge(&other.executed);
        self.member_hits += other.member_hits;
        self.insert_ok += other.insert_ok;
        self.delete_ok += other.delete_ok;
        self.insert_redraws += other.insert_redraws;
    }

    /// Sum a collection of counters
    pub fn sum<'a>(counters: impl IntoIterator<Item = &'a WorkerCounters>) -> Self {
        let mut total = Self::default();
        for c in counters {
            total.merge(c);
        }
        total
    }
}

/// Outcome of one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    /// Time from barrier release to the last worker finishing
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
    /// Number of workers that shared the set
    pub threads: usize,
    /// Counters summed over all workers
    pub counters: WorkerCounters,
    /// Operation-sequence slice owned by each worker, in worker order
    pub slices: Vec<Range<usize>>,
    /// Set size before the timed phase
    pub initial_size: usize,
    /// Set size after the timed phase
    pub final_size: usize,
}

impl TrialResult {
    /// Check that the final size matches the successful inserts and deletes
    pub fn size_is_consistent(&self) -> bool {
        let expected = self.initial_size as i64 + self.counters.insert_ok as i64
            - self.counters.delete_ok as i64;
        expected == self.final_size as i64
    }
}

/// Summary of all trials of one (strategy, mix, thread count) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationResult {
    /// Execution strategy
    pub strategy: Strategy,
    /// Workload mix
    pub mix: WorkloadMix,
    /// Worker thread count
    pub threads: usize,
    /// Statistics over the elapsed-time samples
    pub stats: SampleStats,
    /// Counters summed over every trial
    pub counters: WorkerCounters,
    /// One elapsed time per trial, in trial order
    #[serde(with = "durations_serde")]
    pub samples: Vec<Duration>,
}

impl ConfigurationResult {
    /// Aggregate the trials of one configuration
    pub fn from_trials(
        strategy: Strategy,
        mix: WorkloadMix,
        threads: usize,
        trials: &[TrialResult],
    ) -> Self {
        let samples: Vec<Duration> = trials.iter().map(|t| t.elapsed).collect();
        Self {
            strategy,
            mix,
            threads,
            stats: SampleStats::from_samples(&samples),
            counters: WorkerCounters::sum(trials.iter().map(|t| &t.counters)),
            samples,
        }
    }

    /// Operations per second over every timed phase of this configuration
    pub fn ops_per_sec(&self) -> f64 {
        calculate_ops_per_sec(
            self.counters.executed.total(),
            self.samples.iter().sum::<Duration>(),
        )
    }

    /// Mean time of `baseline` divided by this configuration's mean time
    pub fn speedup_over(&self, baseline: &ConfigurationResult) -> f64 {
        if self.stats.mean_ms > 0.0 {
            baseline.stats.mean_ms / self.stats.mean_ms
        } else {
            0.0
        }
    }

    /// Get a human-readable summary of the configuration result
    pub fn summary(&self) -> String {
        let label = if self.strategy.is_threaded() {
            format!("{}, T={}", self.strategy.description(), self.threads)
        } else {
            self.strategy.description().to_string()
        };
        format!(
            "Summary ({}): Average = {:.3} ms, Std = {:.3} ms over {} runs",
            label, self.stats.mean_ms, self.stats.std_dev_ms, self.stats.count
        )
    }
}

/// Everything one experiment run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// When the experiment started
    pub timestamp: DateTime<Utc>,
    /// Seed of the master random source
    pub seed: u64,
    /// Configuration the experiment ran with
    pub config: ExperimentConfig,
    /// Wall time of the whole experiment, untimed phases included
    #[serde(with = "duration_serde")]
    pub total_elapsed: Duration,
    /// One entry per configuration, in run order
    pub results: Vec<ConfigurationResult>,
}

impl ExperimentReport {
    /// Look up the result of one configuration
    pub fn find(
        &self,
        strategy: Strategy,
        mix_name: &str,
        threads: usize,
    ) -> Option<&ConfigurationResult> {
        self.results
            .iter()
            .find(|r| r.strategy == strategy && r.mix.name == mix_name && r.threads == threads)
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(elapsed_ms: u64, member_hits: u64) -> TrialResult {
        TrialResult {
            elapsed: Duration::from_millis(elapsed_ms),
            threads: 2,
            counters: WorkerCounters {
                executed: OperationCounts {
                    member: 8,
                    insert: 1,
                    delete: 1,
                },
                member_hits,
                insert_ok: 1,
                delete_ok: 0,
                insert_redraws: 0,
            },
            slices: vec![0..5, 5..10],
            initial_size: 4,
            final_size: 5,
        }
    }

    #[test]
    fn test_worker_counters_sum() {
        let a = trial(1, 3).counters;
        let b = trial(1, 4).counters;
        let total = WorkerCounters::sum([&a, &b]);
        assert_eq!(total.member_hits, 7);
        assert_eq!(total.executed.total(), 20);
        assert_eq!(total.insert_ok, 2);
    }

    #[test]
    fn test_trial_size_consistency() {
        let t = trial(10, 3);
        assert!(t.size_is_consistent());

        let mut broken = t.clone();
        broken.final_size = 7;
        assert!(!broken.size_is_consistent());
    }

    #[test]
    fn test_configuration_from_trials() {
        let trials = vec![trial(10, 1), trial(20, 2), trial(30, 3)];
        let result =
            ConfigurationResult::from_trials(Strategy::Mutex, WorkloadMix::case_1(), 2, &trials);
        assert_eq!(result.samples.len(), 3);
        assert!((result.stats.mean_ms - 20.0).abs() < 1e-9);
        assert!((result.stats.std_dev_ms - 10.0).abs() < 1e-9);
        assert_eq!(result.counters.member_hits, 6);
        // 30 operations in 60 ms
        assert!((result.ops_per_sec() - 500.0).abs() < 1e-6);

        let summary = result.summary();
        assert!(summary.contains("mutex, T=2"));
        assert!(summary.contains("Average = 20.000 ms"));
        assert!(summary.contains("over 3 runs"));
    }

    #[test]
    fn test_speedup() {
        let slow = ConfigurationResult::from_trials(
            Strategy::Serial,
            WorkloadMix::case_1(),
            1,
            &[trial(40, 0)],
        );
        let fast = ConfigurationResult::from_trials(
            Strategy::Mutex,
            WorkloadMix::case_1(),
            4,
            &[trial(20, 0)],
        );
        assert!((fast.speedup_over(&slow) - 2.0).abs() < 1e-9);
        assert!(slow.summary().starts_with("Summary (serial): Average = 40.000 ms"));

        let empty =
            ConfigurationResult::from_trials(Strategy::Mutex, WorkloadMix::case_1(), 4, &[]);
        assert_eq!(empty.speedup_over(&slow), 0.0);
    }

    #[test]
    fn test_report_json_and_lookup() {
        let result =
            ConfigurationResult::from_trials(Strategy::Mutex, WorkloadMix::case_2(), 2, &[trial(5, 1)]);
        let report = ExperimentReport {
            timestamp: Utc::now(),
            seed: 99,
            config: ExperimentConfig::default(),
            total_elapsed: Duration::from_secs(1),
            results: vec![result],
        };

        assert!(report.find(Strategy::Mutex, "Case 2", 2).is_some());
        assert!(report.find(Strategy::Serial, "Case 2", 2).is_none());
        assert!(report.find(Strategy::Mutex, "Case 3", 2).is_none());

        let json = report.to_json().unwrap();
        let back: ExperimentReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 99);
        assert_eq!(back.timestamp, report.timestamp);
        assert_eq!(back.results[0].samples, vec![Duration::from_millis(5)]);
        assert_eq!(back.total_elapsed, Duration::from_secs(1));
    }
}
