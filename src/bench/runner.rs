//! Experiment runner
//!
//! Walks every configuration of an [`ExperimentConfig`], runs the
//! configured number of independent trials for each, and aggregates the
//! elapsed times. Progress is reported between trials over an optional
//! channel so that rendering never overlaps a timed phase.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::mpsc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::bench::trial::Trial;
use crate::config::{ExperimentConfig, TrialSpec};
use crate::models::{ConfigurationResult, ExperimentReport, TrialResult};
use crate::util::units::format_ms;
use crate::Result;

/// Progress event sent while an experiment runs
#[derive(Debug, Clone)]
pub enum ProgressUpdate {
    /// A configuration is about to run its first trial
    ConfigurationStarted {
        /// Zero-based configuration index
        index: usize,
        /// Number of configurations in the experiment
        total: usize,
        /// The configuration
        spec: TrialSpec,
        /// Trials that will run
        trials: usize,
    },
    /// One trial finished
    TrialCompleted {
        /// Zero-based configuration index
        index: usize,
        /// Zero-based trial index within the configuration
        trial: usize,
        /// The trial's measurement
        result: TrialResult,
    },
    /// All trials of a configuration finished
    ConfigurationCompleted {
        /// Zero-based configuration index
        index: usize,
        /// Aggregated result
        result: ConfigurationResult,
    },
}

/// Drives trials and collects results
#[derive(Debug)]
pub struct ExperimentRunner {
    config: ExperimentConfig,
    seed: u64,
    rng: StdRng,
}

impl ExperimentRunner {
    /// Create a runner; the master random source is seeded once here
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(seed_from_clock);
        debug!(seed, "master random source seeded");

        Ok(Self {
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Seed of the master random source
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration the runner was created with
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run one trial of `spec` with a fresh seed from the master source
    pub fn run_trial(&mut self, spec: &TrialSpec) -> Result<TrialResult> {
        let seed = self.rng.gen();
        Trial::new(spec, seed).run()
    }

    /// Run `trials` independent trials of one configuration
    pub fn run_configuration(
        &mut self,
        spec: &TrialSpec,
        trials: usize,
    ) -> Result<ConfigurationResult> {
        self.run_configuration_inner(spec, trials, 0, None)
    }

    /// Run every configuration without progress reporting
    pub fn run(&mut self) -> Result<ExperimentReport> {
        self.run_inner(None)
    }

    /// Run every configuration, sending progress over `progress_tx`.
    /// A dropped receiver only stops the updates, not the experiment.
    pub fn run_with_progress(
        &mut self,
        progress_tx: mpsc::Sender<ProgressUpdate>,
    ) -> Result<ExperimentReport> {
        self.run_inner(Some(&progress_tx))
    }

    fn run_inner(
        &mut self,
        progress_tx: Option<&mpsc::Sender<ProgressUpdate>>,
    ) -> Result<ExperimentReport> {
        let timestamp = Utc::now();
        let started = Instant::now();
        let specs = self.config.trial_specs();
        let trials = self.config.trials;

        info!(
            configurations = specs.len(),
            trials,
            seed = self.seed,
            "starting experiment"
        );

        let mut results = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            notify(
                progress_tx,
                ProgressUpdate::ConfigurationStarted {
                    index,
                    total: specs.len(),
                    spec: spec.clone(),
                    trials,
                },
            );

            let result = self.run_configuration_inner(spec, trials, index, progress_tx)?;

            notify(
                progress_tx,
                ProgressUpdate::ConfigurationCompleted {
                    index,
                    result: result.clone(),
                },
            );
            results.push(result);
        }

        let total_elapsed = started.elapsed();
        info!(
            elapsed = %humantime::format_duration(total_elapsed),
            "experiment finished"
        );

        Ok(ExperimentReport {
            timestamp,
            seed: self.seed,
            config: self.config.clone(),
            total_elapsed,
            results,
        })
    }

    fn run_configuration_inner(
        &mut self,
        spec: &TrialSpec,
        trials: usize,
        index: usize,
        progress_tx: Option<&mpsc::Sender<ProgressUpdate>>,
    ) -> Result<ConfigurationResult> {
        debug!(configuration = %spec.label(), trials, "running configuration");

        let mut outcomes = Vec::with_capacity(trials);
        for trial in 0..trials {
            let result = self.run_trial(spec)?;
            notify(
                progress_tx,
                ProgressUpdate::TrialCompleted {
                    index,
                    trial,
                    result: result.clone(),
                },
            );
            outcomes.push(result);
        }

        let result =
            ConfigurationResult::from_trials(spec.strategy, spec.mix.clone(), spec.threads, &outcomes);
        debug!(
            configuration = %spec.label(),
            mean = %format_ms(result.stats.mean_ms),
            std_dev = %format_ms(result.stats.std_dev_ms),
            "configuration finished"
        );
        Ok(result)
    }
}

fn notify(progress_tx: Option<&mpsc::Sender<ProgressUpdate>>, update: ProgressUpdate) {
    if let Some(tx) = progress_tx {
        // Receiver dropped: keep running without progress
        let _ = tx.send(update);
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
