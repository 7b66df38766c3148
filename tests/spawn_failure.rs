//! A worker thread that cannot be spawned takes the whole process down.
//!
//! The trial runs in a child copy of this test binary so the abort does not
//! take the test harness with it.

use setbench::bench::Trial;
use setbench::config::{Strategy, TrialSpec};
use setbench::workload::WorkloadMix;
use std::env;
use std::process::{Command, Stdio};

const CHILD_ENV: &str = "SETBENCH_SPAWN_FAILURE_CHILD";

// No address space can hold a stack this large
const IMPOSSIBLE_STACK: usize = 1 << 60;

fn run_unspawnable_trial() {
    let spec = TrialSpec {
        strategy: Strategy::Mutex,
        mix: WorkloadMix::case_1(),
        threads: 4,
        key_space: 65_536,
        initial_size: 1_000,
        operations: 10_000,
    };
    let outcome = Trial::new(&spec, 1)
        .with_stack_size(IMPOSSIBLE_STACK)
        .run();
    panic!("trial returned instead of aborting: {:?}", outcome.map(|r| r.elapsed));
}

#[test]
fn worker_spawn_failure_aborts() {
    if env::var_os(CHILD_ENV).is_some() {
        run_unspawnable_trial();
        return;
    }

    let exe = env::current_exe().expect("test binary path");
    let output = Command::new(exe)
        .env(CHILD_ENV, "1")
        .env("RUST_TEST_THREADS", "1")
        .arg("worker_spawn_failure_aborts")
        .arg("--exact")
        .arg("--nocapture")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("run child test");

    assert!(
        !output.status.success(),
        "child exited cleanly\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(
            output.status.signal(),
            Some(6),
            "expected SIGABRT, got {:?}\nstderr: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}
