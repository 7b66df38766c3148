//! A single build, generate, execute and measure cycle
//!
//! Phases run strictly in order:
//! `Building -> GeneratingOps -> AwaitingStart -> Running -> Draining ->
//! Collected -> TornDown`. Only `Running` through `Draining` is timed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::any::Any;
use std::io;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::bench::partition::partition;
use crate::bench::worker::Worker;
use crate::config::{Strategy, TrialSpec};
use crate::models::{TrialResult, WorkerCounters};
use crate::set::{GuardedSet, LinkedSet};
use crate::workload::{generate, Operation};
use crate::{Result, SetBenchError};

/// Lifecycle phase of a trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialPhase {
    /// Filling a fresh set with unique random keys
    Building,
    /// Generating the shuffled operation sequence
    GeneratingOps,
    /// Workers spawned and parked on the start barrier
    AwaitingStart,
    /// Timer started, workers released
    Running,
    /// Waiting for every worker to finish
    Draining,
    /// Elapsed time and counters gathered
    Collected,
    /// Set, lock and barrier released
    TornDown,
}

impl TrialPhase {
    /// The phase that follows this one, `None` once torn down
    pub fn next(self) -> Option<Self> {
        match self {
            TrialPhase::Building => Some(TrialPhase::GeneratingOps),
            TrialPhase::GeneratingOps => Some(TrialPhase::AwaitingStart),
            TrialPhase::AwaitingStart => Some(TrialPhase::Running),
            TrialPhase::Running => Some(TrialPhase::Draining),
            TrialPhase::Draining => Some(TrialPhase::Collected),
            TrialPhase::Collected => Some(TrialPhase::TornDown),
            TrialPhase::TornDown => None,
        }
    }
}

/// Timed-phase outcome before it is folded into a [`TrialResult`]
struct Execution {
    elapsed: Duration,
    per_worker: Vec<WorkerCounters>,
    slices: Vec<std::ops::Range<usize>>,
    set: LinkedSet,
}

/// One trial of a configuration
#[derive(Debug)]
pub struct Trial<'a> {
    spec: &'a TrialSpec,
    rng: SmallRng,
    phase: TrialPhase,
    stack_size: Option<usize>,
}

impl<'a> Trial<'a> {
    /// Create a trial that draws all its randomness from `seed`
    pub fn new(spec: &'a TrialSpec, seed: u64) -> Self {
        Self {
            spec,
            rng: SmallRng::seed_from_u64(seed),
            phase: TrialPhase::Building,
            stack_size: None,
        }
    }

    /// Stack size in bytes for worker threads; platform default when unset
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Current phase
    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    fn advance(&mut self, next: TrialPhase) {
        debug_assert_eq!(self.phase.next(), Some(next));
        trace!(from = ?self.phase, to = ?next, "trial phase");
        self.phase = next;
    }

    /// Run every phase and return the measurement. A trial runs once.
    pub fn run(&mut self) -> Result<TrialResult> {
        if self.phase != TrialPhase::Building {
            return Err(SetBenchError::BenchmarkError(format!(
                "Trial already ran (phase {:?})",
                self.phase
            )));
        }
        self.spec.validate()?;

        let set = self.build();
        let initial_size = set.len();

        self.advance(TrialPhase::GeneratingOps);
        let ops = generate(self.spec.operations, &self.spec.mix, &mut self.rng);

        self.advance(TrialPhase::AwaitingStart);
        let execution = match self.spec.strategy {
            Strategy::Serial => self.execute_serial(set, &ops),
            Strategy::Mutex => self.execute_threaded(set, &ops)?,
        };

        self.advance(TrialPhase::Collected);
        let result = TrialResult {
            elapsed: execution.elapsed,
            threads: self.spec.threads,
            counters: WorkerCounters::sum(&execution.per_worker),
            slices: execution.slices,
            initial_size,
            final_size: execution.set.len(),
        };

        drop(execution.set);
        drop(ops);
        self.advance(TrialPhase::TornDown);

        Ok(result)
    }

    // Collisions just draw again; validation guarantees n < key_space.
    fn build(&mut self) -> LinkedSet {
        let target = self.spec.initial_size;
        let mut set = LinkedSet::with_capacity(target);
        while set.len() < target {
            let key = self.rng.gen_range(0..self.spec.key_space);
            set.insert(key);
        }
        set
    }

    fn execute_serial(&mut self, mut set: LinkedSet, ops: &[Operation]) -> Execution {
        let worker = Worker::new(0, 0..ops.len(), self.spec.key_space);

        self.advance(TrialPhase::Running);
        let start = Instant::now();
        let counters = worker.drain(ops, &mut set, &mut self.rng);
        let elapsed = start.elapsed();
        // nothing to wait for on one thread
        self.advance(TrialPhase::Draining);

        Execution {
            elapsed,
            per_worker: vec![counters],
            slices: vec![worker.slice],
            set,
        }
    }

    fn execute_threaded(&mut self, set: LinkedSet, ops: &[Operation]) -> Result<Execution> {
        let threads = self.spec.threads;
        let workers: Vec<Worker> = partition(ops.len(), threads)
            .into_iter()
            .enumerate()
            .map(|(id, slice)| Worker::new(id, slice, self.spec.key_space))
            .collect();
        let seeds: Vec<u64> = workers.iter().map(|_| self.rng.gen()).collect();

        let stack_size = self.stack_size;
        let guarded = GuardedSet::new(set);
        let barrier = Barrier::new(threads + 1);

        let (elapsed, joined) = thread::scope(|s| {
            let handles: Vec<_> = workers
                .iter()
                .zip(seeds)
                .map(|(worker, seed)| {
                    let guarded = &guarded;
                    let barrier = &barrier;
                    let mut builder =
                        thread::Builder::new().name(format!("setbench-worker-{}", worker.id));
                    if let Some(bytes) = stack_size {
                        builder = builder.stack_size(bytes);
                    }
                    let spawned = builder.spawn_scoped(s, move || {
                        let mut rng = SmallRng::seed_from_u64(seed);
                        let mut target = guarded;
                        barrier.wait();
                        worker.drain(ops, &mut target, &mut rng)
                    });
                    match spawned {
                        Ok(handle) => handle,
                        Err(e) => worker_spawn_failed(worker.id, &e),
                    }
                })
                .collect();

            // Thread creation stays outside the measured interval
            self.advance(TrialPhase::Running);
            let start = Instant::now();
            barrier.wait();

            self.advance(TrialPhase::Draining);
            let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
            (start.elapsed(), joined)
        });

        Ok(Execution {
            elapsed,
            per_worker: collect_counters(joined)?,
            slices: workers.into_iter().map(|w| w.slice).collect(),
            set: guarded.into_inner(),
        })
    }
}

// Workers spawned so far are parked on a barrier that can no longer fill, so
// the trial can neither proceed nor unwind.
fn worker_spawn_failed(id: usize, err: &io::Error) -> ! {
    error!(worker = id, error = %err, "failed to spawn worker thread");
    std::process::abort()
}

/// Per-worker counters in worker order, or the first worker's panic
fn collect_counters(joined: Vec<thread::Result<WorkerCounters>>) -> Result<Vec<WorkerCounters>> {
    joined
        .into_iter()
        .enumerate()
        .map(|(id, outcome)| {
            outcome.map_err(|payload| {
                SetBenchError::WorkerError(format!(
                    "Worker {} panicked: {}",
                    id,
                    panic_message(payload.as_ref())
                ))
            })
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
