//! End-to-end trial scenarios through the public API.

use setbench::bench::{ExperimentRunner, Trial, TrialPhase};
use setbench::config::{ExperimentConfig, Strategy, TrialSpec};
use setbench::workload::{generate, OperationCounts, WorkloadMix};

fn spec(strategy: Strategy, threads: usize, mix: WorkloadMix) -> TrialSpec {
    TrialSpec {
        strategy,
        mix,
        threads,
        key_space: 65_536,
        initial_size: 1_000,
        operations: 10_000,
    }
}

#[test]
fn scenario_single_worker_executes_every_operation() {
    let spec = spec(Strategy::Mutex, 1, WorkloadMix::case_1());
    let result = Trial::new(&spec, 11).run().expect("trial");

    assert_eq!(result.counters.executed.total(), 10_000);
    assert_eq!(
        result.counters.executed,
        OperationCounts {
            member: 9_900,
            insert: 50,
            delete: 50
        }
    );
    assert_eq!(result.initial_size, 1_000);
    assert!(result.size_is_consistent());
}

#[test]
fn scenario_four_workers_cover_sequence() {
    let spec = spec(Strategy::Mutex, 4, WorkloadMix::case_1());
    let mut trial = Trial::new(&spec, 12);
    let result = trial.run().expect("trial");

    assert_eq!(trial.phase(), TrialPhase::TornDown);
    assert_eq!(result.counters.executed.total(), 10_000);
    assert_eq!(result.slices.len(), 4);

    let mut next = 0;
    for slice in &result.slices {
        assert_eq!(slice.start, next, "gap or overlap at {:?}", slice);
        next = slice.end;
    }
    assert_eq!(next, 10_000);
    assert!(result.size_is_consistent());
}

#[test]
fn scenario_single_sample_has_zero_std_dev() {
    let config = ExperimentConfig::default()
        .with_trials(1)
        .with_thread_counts(vec![2])
        .with_mixes(vec![WorkloadMix::case_2()])
        .with_seed(13);
    let report = ExperimentRunner::new(config)
        .expect("runner")
        .run()
        .expect("run");

    assert_eq!(report.results.len(), 2);
    for result in &report.results {
        assert_eq!(result.stats.count, 1);
        assert_eq!(result.stats.std_dev_ms, 0.0);
        assert_eq!(result.stats.min_ms, result.stats.max_ms);
    }
}

#[test]
fn scenario_even_mix_exact_counts() {
    let mut rng = rand::thread_rng();
    let ops = generate(10_000, &WorkloadMix::case_3(), &mut rng);
    assert_eq!(
        OperationCounts::tally(&ops),
        OperationCounts {
            member: 5_000,
            insert: 2_500,
            delete: 2_500
        }
    );
}

#[test]
fn serial_and_mutex_reports_for_every_mix() {
    let config = ExperimentConfig::default()
        .with_operations(2_000)
        .with_trials(2)
        .with_seed(14);
    let report = ExperimentRunner::new(config)
        .expect("runner")
        .run()
        .expect("run");

    // 3 serial configurations + 3 mixes x 4 thread counts
    assert_eq!(report.results.len(), 15);
    for mix in WorkloadMix::standard_cases() {
        let serial = report
            .find(Strategy::Serial, &mix.name, 1)
            .expect("serial baseline");
        assert_eq!(serial.counters.executed.total(), 4_000);
        for threads in [1, 2, 4, 8] {
            let threaded = report
                .find(Strategy::Mutex, &mix.name, threads)
                .expect("mutex configuration");
            assert_eq!(threaded.samples.len(), 2);
            assert!(threaded.speedup_over(serial) >= 0.0);
        }
    }
}

#[test]
fn same_seed_same_workload() {
    let spec = spec(Strategy::Serial, 1, WorkloadMix::case_3());
    let a = Trial::new(&spec, 99).run().expect("trial");
    let b = Trial::new(&spec, 99).run().expect("trial");

    // timings differ, the work does not
    assert_eq!(a.counters, b.counters);
    assert_eq!(a.final_size, b.final_size);
}
