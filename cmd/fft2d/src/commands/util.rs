//! Utility functions shared by the commands.

use std::thread;
use std::time::Duration;

use serde::Serialize;
use spectral_fft::{
    CancellationToken, Complex64, Fft2d, Matrix, ParallelConfig, ParallelFft2d, Transform2d,
};
use tracing::{debug, warn};

use crate::Cli;
use crate::config::{Engine, RunFile, load_run_file};

/// Loads the run file named by `--config`, or the defaults.
pub fn get_run_file(cli: &Cli) -> anyhow::Result<RunFile> {
    load_run_file(cli.config.as_deref())
}

/// A built engine and the worker count it actually runs with.
pub struct BuiltEngine {
    pub engine: Box<dyn Transform2d>,
    /// Effective workers per phase after capping; 1 for the serial engine.
    pub workers: usize,
}

/// Builds the requested engine for a `width x height` input.
///
/// Both engines stop with `Cancelled` once `cancel` fires.
pub fn build_engine(
    engine: Engine,
    width: usize,
    height: usize,
    workers: usize,
    cancel: &CancellationToken,
) -> anyhow::Result<BuiltEngine> {
    Ok(match engine {
        Engine::Serial => BuiltEngine {
            engine: Box::new(Fft2d::new(width, height)?.with_cancel(cancel.clone())),
            workers: 1,
        },
        Engine::Parallel => {
            let cfg = ParallelConfig::default()
                .with_workers(workers)
                .with_cancel(cancel.clone());
            let engine = ParallelFft2d::new(width, height, cfg)?;
            debug!("parallel engine with {} workers", engine.workers());
            BuiltEngine {
                workers: engine.workers(),
                engine: Box::new(engine),
            }
        }
    })
}

/// Cancels `token` once `timeout_ms` has elapsed.
pub fn spawn_watchdog(token: CancellationToken, timeout_ms: u64) {
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(timeout_ms));
        if !token.is_cancelled() {
            warn!("deadline of {}ms reached, cancelling", timeout_ms);
            token.cancel();
        }
    });
}

/// Largest element-wise distance between two matrices of the same shape.
pub fn max_deviation(a: &Matrix<Complex64>, b: &Matrix<Complex64>) -> f64 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Prints `value` as pretty JSON, or `human` otherwise.
pub fn print_report<T: Serialize>(cli: &Cli, value: &T, human: impl FnOnce()) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

pub fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
