use std::sync::mpsc;
use std::thread;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use setbench::bench::{ExperimentRunner, ProgressUpdate};
use setbench::config::{ExperimentConfig, OutputFormat};
use setbench::report::render_text;
use setbench::util::units::format_ms;
use setbench::{Result, SetBenchError};

fn main() -> Result<()> {
    // stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ExperimentConfig::load()?;
    let output = config.output;
    let total_trials = (config.trial_specs().len() * config.trials) as u64;

    let pb = ProgressBar::new(total_trials);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .map_err(|e| SetBenchError::OutputError(e.to_string()))?,
    );

    let mut runner = ExperimentRunner::new(config)?;
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || runner.run_with_progress(tx));

    // Redraw once per configuration rather than once per trial
    let mut pending = 0u64;
    for update in rx {
        match update {
            ProgressUpdate::ConfigurationStarted {
                index, total, spec, ..
            } => {
                pb.set_message(format!("[{}/{}] {}", index + 1, total, spec.label()));
            }
            ProgressUpdate::TrialCompleted { .. } => pending += 1,
            ProgressUpdate::ConfigurationCompleted { result, .. } => {
                pb.inc(std::mem::take(&mut pending));
                tracing::debug!(
                    mix = %result.mix.name,
                    strategy = result.strategy.description(),
                    threads = result.threads,
                    mean = %format_ms(result.stats.mean_ms),
                    "configuration done"
                );
            }
        }
    }
    pb.finish_and_clear();

    let report = handle
        .join()
        .map_err(|_| SetBenchError::BenchmarkError("Experiment thread panicked".to_string()))??;

    match output {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
