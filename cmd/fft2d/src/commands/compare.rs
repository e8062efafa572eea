//! `fft2d compare`: checks the parallel engine against the serial one.

use std::time::Instant;

use clap::Args;
use serde::Serialize;
use spectral_fft::{CancellationToken, Complex64, Fft2dOutput, Matrix};
use tracing::info;

use super::{build_engine, get_run_file, max_deviation, millis, print_report};
use crate::Cli;
use crate::config::Engine;
use crate::pattern::{Pattern, generate};

#[derive(Args)]
pub struct CompareCommand {
    /// Image width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Input pattern
    #[arg(short = 'p', long, value_enum)]
    pattern: Option<Pattern>,

    /// Seed for the noise pattern
    #[arg(long)]
    seed: Option<u64>,

    /// Worker counts to check, comma separated
    #[arg(short = 'w', long, value_delimiter = ',')]
    workers: Vec<usize>,

    /// Largest accepted element-wise deviation from the serial result
    #[arg(long)]
    tolerance: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CompareRow {
    requested_workers: usize,
    /// Workers that actually ran, after capping at the available parallelism.
    workers: usize,
    forward_ms: f64,
    max_deviation: f64,
    intermediate_deviation: f64,
    ok: bool,
}

#[derive(Debug, Serialize)]
struct CompareReport {
    pattern: Pattern,
    width: usize,
    height: usize,
    tolerance: f64,
    serial_ms: f64,
    runs: Vec<CompareRow>,
}

impl CompareCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let file = get_run_file(cli)?;
        let width = self.width.unwrap_or(file.width);
        let height = self.height.unwrap_or(file.height);
        let pattern = self.pattern.unwrap_or(file.pattern);
        let tolerance = self.tolerance.unwrap_or(file.tolerance);
        let worker_counts = if self.workers.is_empty() {
            file.compare_workers.clone()
        } else {
            self.workers.clone()
        };

        let image = generate(pattern, width, height, self.seed.unwrap_or(file.seed));
        let cancel = CancellationToken::new();

        let serial = timed_forward(Engine::Serial, &image, 0, &cancel)?;
        let serial_ms = serial.forward_ms;

        let mut runs = Vec::with_capacity(worker_counts.len());
        for requested in worker_counts {
            let run = timed_forward(Engine::Parallel, &image, requested, &cancel)?;
            let row = compare_outputs(requested, &run, &serial.output, tolerance);
            info!(
                "workers={} (requested {}) deviation={:.3e} ({:.3} ms)",
                row.workers, requested, row.max_deviation, row.forward_ms
            );
            runs.push(row);
        }

        let report = CompareReport {
            pattern,
            width,
            height,
            tolerance,
            serial_ms,
            runs,
        };

        print_report(cli, &report, || {
            println!(
                "{:?} {}x{}, serial {:.3} ms",
                report.pattern, report.width, report.height, report.serial_ms
            );
            println!(
                "{:>9}  {:>7}  {:>10}  {:>12}  {}",
                "REQUESTED", "WORKERS", "MS", "DEVIATION", "OK"
            );
            for row in &report.runs {
                println!(
                    "{:>9}  {:>7}  {:>10.3}  {:>12.3e}  {}",
                    row.requested_workers,
                    row.workers,
                    row.forward_ms,
                    row.max_deviation,
                    if row.ok { "yes" } else { "NO" }
                );
            }
        })?;

        let failed: Vec<usize> = report
            .runs
            .iter()
            .filter(|r| !r.ok)
            .map(|r| r.requested_workers)
            .collect();
        if !failed.is_empty() {
            anyhow::bail!(
                "parallel result deviates beyond {} for workers {:?}",
                tolerance,
                failed
            );
        }
        Ok(())
    }
}

/// One forward transform and what it ran with.
struct TimedRun {
    output: Fft2dOutput,
    workers: usize,
    forward_ms: f64,
}

fn timed_forward(
    engine: Engine,
    image: &Matrix<Complex64>,
    workers: usize,
    cancel: &CancellationToken,
) -> anyhow::Result<TimedRun> {
    let built = build_engine(engine, image.width(), image.height(), workers, cancel)?;
    let started = Instant::now();
    let output = built.engine.forward(image)?;
    Ok(TimedRun {
        output,
        workers: built.workers,
        forward_ms: millis(started.elapsed()),
    })
}

fn compare_outputs(
    requested_workers: usize,
    run: &TimedRun,
    serial: &Fft2dOutput,
    tolerance: f64,
) -> CompareRow {
    let max_dev = max_deviation(&run.output.result, &serial.result);
    let intermediate_dev = max_deviation(&run.output.intermediate, &serial.intermediate);
    CompareRow {
        requested_workers,
        workers: run.workers,
        forward_ms: run.forward_ms,
        max_deviation: max_dev,
        intermediate_deviation: intermediate_dev,
        ok: max_dev <= tolerance && intermediate_dev <= tolerance,
    }
}
