//! Configuration management module
//!
//! Handles the compiled-in experiment defaults and loading and validation
//! of an optional TOML override file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::workload::WorkloadMix;
use crate::{Result, SetBenchError, APP_NAME, CONFIG_ENV_VAR, CONFIG_FILE};

/// Upper bound on worker threads per trial
pub const MAX_THREADS: usize = 256;

/// Experiment configuration containing all test parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Keys are drawn from `[0, key_space)`
    pub key_space: u32,
    /// Set size at the start of every trial (n)
    pub initial_size: usize,
    /// Operations per trial (m)
    pub operations: usize,
    /// Repeated trials per configuration
    pub trials: usize,
    /// Thread counts evaluated for threaded strategies
    pub thread_counts: Vec<usize>,
    /// Seed for the master random source; taken from the clock when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// How the report is written to stdout
    pub output: OutputFormat,
    /// Execution strategies to compare
    pub strategies: Vec<Strategy>,
    /// Workload mixes to evaluate
    pub mixes: Vec<WorkloadMix>,
}

/// How the set is shared during the timed phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Runner thread drains the whole sequence against the unguarded set
    Serial,
    /// Worker threads share the set behind one global mutex
    Mutex,
}

/// Report format written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable banners and summary lines
    #[default]
    Text,
    /// The full report as pretty-printed JSON
    Json,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            key_space: 65_536,
            initial_size: 1_000,
            operations: 10_000,
            trials: 100,
            thread_counts: vec![1, 2, 4, 8],
            seed: None,
            output: OutputFormat::Text,
            strategies: vec![Strategy::Serial, Strategy::Mutex],
            mixes: WorkloadMix::standard_cases(),
        }
    }
}

/// Everything one trial needs, fixed for every trial of a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    /// Execution strategy
    pub strategy: Strategy,
    /// Workload mix
    pub mix: WorkloadMix,
    /// Worker thread count (1 for serial)
    pub threads: usize,
    /// Keys are drawn from `[0, key_space)`
    pub key_space: u32,
    /// Set size before the timed phase
    pub initial_size: usize,
    /// Length of the operation sequence
    pub operations: usize,
}

impl TrialSpec {
    /// Reject specs a trial cannot run
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(SetBenchError::ConfigError(
                "Thread count must be greater than 0".to_string(),
            ));
        }
        if self.strategy == Strategy::Serial && self.threads != 1 {
            return Err(SetBenchError::ConfigError(format!(
                "Serial strategy runs on one thread, got {}",
                self.threads
            )));
        }
        if self.key_space == 0 {
            return Err(SetBenchError::ConfigError(
                "Key space must be greater than 0".to_string(),
            ));
        }
        // n == key_space would leave no free key for an Insert to find
        if self.initial_size >= self.key_space as usize {
            return Err(SetBenchError::ConfigError(format!(
                "Initial size {} must be smaller than the key space {}",
                self.initial_size, self.key_space
            )));
        }
        self.mix.validate()
    }

    /// Short label used in progress output
    pub fn label(&self) -> String {
        format!(
            "{} {} T={}",
            self.mix.name,
            self.strategy.description(),
            self.threads
        )
    }
}

impl ExperimentConfig {
    /// Create a new experiment configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SetBenchError::ConfigError(
                "Trial count must be greater than 0".to_string(),
            ));
        }

        if self.strategies.is_empty() {
            return Err(SetBenchError::ConfigError(
                "At least one strategy is required".to_string(),
            ));
        }

        if self.mixes.is_empty() {
            return Err(SetBenchError::ConfigError(
                "At least one workload mix is required".to_string(),
            ));
        }

        if self.strategies.contains(&Strategy::Mutex) && self.thread_counts.is_empty() {
            return Err(SetBenchError::ConfigError(
                "At least one thread count is required for the mutex strategy".to_string(),
            ));
        }

        for &threads in &self.thread_counts {
            if threads == 0 || threads > MAX_THREADS {
                return Err(SetBenchError::ConfigError(format!(
                    "Thread count must be between 1 and {}, got {}",
                    MAX_THREADS, threads
                )));
            }
        }

        // Every trial spec covers the key space and mix checks
        for spec in self.trial_specs() {
            spec.validate()?;
        }

        Ok(())
    }

    /// Expand into one trial spec per configuration, in run order:
    /// strategies, then mixes, then thread counts. Serial runs once per mix.
    pub fn trial_specs(&self) -> Vec<TrialSpec> {
        let mut specs = Vec::new();
        for &strategy in &self.strategies {
            for mix in &self.mixes {
                let thread_counts: &[usize] = match strategy {
                    Strategy::Serial => &[1],
                    Strategy::Mutex => &self.thread_counts,
                };
                for &threads in thread_counts {
                    specs.push(TrialSpec {
                        strategy,
                        mix: mix.clone(),
                        threads,
                        key_space: self.key_space,
                        initial_size: self.initial_size,
                        operations: self.operations,
                    });
                }
            }
        }
        specs
    }

    /// Set the key space
    pub fn with_key_space(mut self, key_space: u32) -> Self {
        self.key_space = key_space;
        self
    }

    /// Set the initial set size
    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    /// Set the number of operations per trial
    pub fn with_operations(mut self, operations: usize) -> Self {
        self.operations = operations;
        self
    }

    /// Set the number of trials per configuration
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Set the thread counts
    pub fn with_thread_counts(mut self, thread_counts: Vec<usize>) -> Self {
        self.thread_counts = thread_counts;
        self
    }

    /// Set the strategies
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Set the workload mixes
    pub fn with_mixes(mut self, mixes: Vec<WorkloadMix>) -> Self {
        self.mixes = mixes;
        self
    }

    /// Fix the master seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the output format
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Load configuration from `$SETBENCH_CONFIG` or the standard location.
    /// Returns the compiled-in defaults if no file exists at the standard
    /// location; a missing file named by the environment variable is an error.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load_from(Path::new(&path));
        }

        let config_path = match Self::config_file_path() {
            Ok(path) => path,
            Err(_) => return Ok(Self::default()),
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate configuration from a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SetBenchError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            SetBenchError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        // Validate the loaded configuration
        config.validate()?;

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            SetBenchError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/setbench/setbench.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            SetBenchError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

impl Strategy {
    /// Check if this strategy spawns worker threads
    pub fn is_threaded(&self) -> bool {
        matches!(self, Strategy::Mutex)
    }

    /// Get a human-readable description of the strategy
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Serial => "serial",
            Strategy::Mutex => "mutex",
        }
    }
}
