//! Text rendering of an experiment report
//!
//! Mirrors the classic benchmark layout: a banner per (strategy, mix)
//! followed by one summary line per configuration.

use std::fmt::Write;

use crate::config::{ExperimentConfig, Strategy};
use crate::models::{ConfigurationResult, ExperimentReport};
use crate::util::units::format_ops_per_sec;

const RULE_HEAVY: &str = "=====================================================";
const RULE_LIGHT: &str = "-----------------------------------------------------";

/// Banner printed before the first configuration of a (strategy, mix)
pub fn render_banner(config: &ExperimentConfig, result: &ConfigurationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE_HEAVY);
    let _ = writeln!(
        out,
        "  {} ({})",
        result.mix.name,
        result.strategy.description()
    );
    let _ = writeln!(out, "  Initial linked list size (n) = {}", config.initial_size);
    let _ = writeln!(out, "  Number of operations (m)     = {}", config.operations);
    let _ = writeln!(out, "  Number of runs (REPS)        = {}", config.trials);
    let _ = writeln!(out, "  Mix: {}", result.mix.description());
    out
}

/// Summary block for one configuration
pub fn render_configuration(
    result: &ConfigurationResult,
    baseline: Option<&ConfigurationResult>,
) -> String {
    let mut out = String::new();
    if result.strategy.is_threaded() {
        let _ = writeln!(out, "[ Threads = {} ]", result.threads);
    }
    let _ = writeln!(out, "{}", RULE_LIGHT);
    let _ = writeln!(out, "{}", result.summary());

    let _ = write!(out, "Throughput = {}", format_ops_per_sec(result.ops_per_sec()));
    if let Some(baseline) = baseline {
        let _ = write!(out, ", Speedup vs serial = {:.2}x", result.speedup_over(baseline));
    }
    let _ = writeln!(out);
    let _ = writeln!(out);
    out
}

/// Render the full report as text
pub fn render_text(report: &ExperimentReport) -> String {
    let mut out = String::new();
    let mut current: Option<(Strategy, &str)> = None;

    for result in &report.results {
        let group = (result.strategy, result.mix.name.as_str());
        if current != Some(group) {
            out.push_str(&render_banner(&report.config, result));
            current = Some(group);
        }

        let baseline = if result.strategy.is_threaded() {
            report.find(Strategy::Serial, &result.mix.name, 1)
        } else {
            None
        };
        out.push_str(&render_configuration(result, baseline));
    }

    let _ = writeln!(
        out,
        "Completed {} configurations in {} (seed {})",
        report.results.len(),
        humantime::format_duration(report.total_elapsed),
        report.seed
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SampleStats, WorkerCounters};
    use crate::workload::{OperationCounts, WorkloadMix};
    use chrono::Utc;
    use std::time::Duration;

    fn result(strategy: Strategy, mix: WorkloadMix, threads: usize, mean_ms: f64) -> ConfigurationResult {
        ConfigurationResult {
            strategy,
            mix,
            threads,
            stats: SampleStats {
                count: 2,
                mean_ms,
                std_dev_ms: 0.5,
                min_ms: mean_ms - 0.5,
                max_ms: mean_ms + 0.5,
            },
            counters: WorkerCounters {
                executed: OperationCounts {
                    member: 19_800,
                    insert: 100,
                    delete: 100,
                },
                ..WorkerCounters::default()
            },
            samples: vec![Duration::from_micros((mean_ms * 1000.0) as u64); 2],
        }
    }

    fn report() -> ExperimentReport {
        ExperimentReport {
            timestamp: Utc::now(),
            seed: 42,
            config: ExperimentConfig::default(),
            total_elapsed: Duration::from_secs(3),
            results: vec![
                result(Strategy::Serial, WorkloadMix::case_1(), 1, 10.0),
                result(Strategy::Mutex, WorkloadMix::case_1(), 1, 20.0),
                result(Strategy::Mutex, WorkloadMix::case_1(), 2, 40.0),
            ],
        }
    }

    #[test]
    fn test_banner_lists_parameters() {
        let report = report();
        let banner = render_banner(&report.config, &report.results[0]);
        assert!(banner.contains("Case 1 (serial)"));
        assert!(banner.contains("Initial linked list size (n) = 1000"));
        assert!(banner.contains("Number of operations (m)     = 10000"));
        assert!(banner.contains("Number of runs (REPS)        = 100"));
        assert!(banner.contains("Mix: Member=0.990, Insert=0.005, Delete=0.005"));
    }

    #[test]
    fn test_configuration_block() {
        let report = report();
        let serial = render_configuration(&report.results[0], None);
        assert!(!serial.contains("[ Threads"));
        assert!(serial.contains("Summary (serial): Average = 10.000 ms, Std = 0.500 ms over 2 runs"));
        // 20000 ops over two 10 ms trials
        assert!(serial.contains("Throughput = 1.0M ops/s"));

        let threaded = render_configuration(&report.results[2], Some(&report.results[0]));
        assert!(threaded.contains("[ Threads = 2 ]"));
        assert!(threaded.contains("Speedup vs serial = 0.25x"));
    }

    #[test]
    fn test_render_text_groups_banners() {
        let text = render_text(&report());
        // one banner for serial, one for mutex
        assert_eq!(text.matches(RULE_HEAVY).count(), 2);
        assert_eq!(text.matches("Summary (").count(), 3);
        assert!(text.contains("Speedup vs serial = 0.50x"));
        assert!(text.contains("Completed 3 configurations in 3s (seed 42)"));
    }
}
