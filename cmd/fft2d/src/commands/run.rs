//! `fft2d run`: transform one synthetic image.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use spectral_fft::CancellationToken;
use spectral_fft::spectrum::{display_spectrum, recenter};
use tracing::info;

use super::{build_engine, get_run_file, max_deviation, millis, print_report, spawn_watchdog};
use crate::Cli;
use crate::config::Engine;
use crate::pattern::{Pattern, generate};

#[derive(Args)]
pub struct RunCommand {
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

    /// Engine to run
    #[arg(short = 'e', long, value_enum)]
    engine: Option<Engine>,

    /// Workers per phase (0 = available parallelism)
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Shift the zero frequency to the centre of the spectrum
    #[arg(long)]
    recenter: bool,

    /// Invert the spectrum and report the reconstruction error
    #[arg(long)]
    roundtrip: bool,

    /// Cancel the transform after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write the display-normalized magnitude spectrum as JSON rows
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    engine: Engine,
    workers: usize,
    pattern: Pattern,
    width: usize,
    height: usize,
    padded_width: usize,
    padded_height: usize,
    forward_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    inverse_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_roundtrip_error: Option<f64>,
    dc: [f64; 2],
}

impl RunCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let file = get_run_file(cli)?;
        let width = self.width.unwrap_or(file.width);
        let height = self.height.unwrap_or(file.height);
        let pattern = self.pattern.unwrap_or(file.pattern);
        let engine_kind = self.engine.unwrap_or(file.engine);
        let workers = self.workers.unwrap_or(file.workers);
        let do_recenter = self.recenter || file.recenter;
        let do_roundtrip = self.roundtrip || file.roundtrip;

        let cancel = CancellationToken::new();
        if let Some(ms) = self.timeout_ms.or(file.timeout_ms) {
            spawn_watchdog(cancel.clone(), ms);
        }

        let original = generate(pattern, width, height, self.seed.unwrap_or(file.seed));
        let mut image = original.clone();
        if do_recenter {
            recenter(&mut image);
        }

        let built = build_engine(engine_kind, width, height, workers, &cancel)?;
        let engine = built.engine;
        info!("transforming {}x{} {:?} image", width, height, pattern);

        let started = Instant::now();
        let spectrum = engine.forward(&image).context("forward transform failed")?;
        let forward_ms = millis(started.elapsed());

        let (inverse_ms, max_roundtrip_error) = if do_roundtrip {
            let started = Instant::now();
            let mut back = engine
                .inverse(&spectrum.result)
                .context("inverse transform failed")?
                .result;
            let inverse_ms = millis(started.elapsed());
            if do_recenter {
                recenter(&mut back);
            }
            let mut padded = original;
            padded.resize(back.width(), back.height());
            (Some(inverse_ms), Some(max_deviation(&back, &padded)))
        } else {
            (None, None)
        };

        if let Some(path) = &self.output {
            let shown = display_spectrum(&spectrum.result);
            let rows: Vec<&[f64]> = shown.rows().collect();
            let json = serde_json::to_string(&rows)?;
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        let dc = spectrum.result.as_slice().first().copied().unwrap_or_default();
        let report = RunReport {
            engine: engine_kind,
            workers: built.workers,
            pattern,
            width,
            height,
            padded_width: spectrum.result.width(),
            padded_height: spectrum.result.height(),
            forward_ms,
            inverse_ms,
            max_roundtrip_error,
            dc: [dc.re, dc.im],
        };

        print_report(cli, &report, || {
            println!(
                "{:?} {}x{} (padded {}x{}) with {:?} engine, {} workers",
                report.pattern,
                report.width,
                report.height,
                report.padded_width,
                report.padded_height,
                report.engine,
                report.workers
            );
            println!("  forward:  {:.3} ms", report.forward_ms);
            if let (Some(ms), Some(err)) = (report.inverse_ms, report.max_roundtrip_error) {
                println!("  inverse:  {:.3} ms (max error {:.3e})", ms, err);
            }
            println!("  dc:       {:.6} {:+.6}i", report.dc[0], report.dc[1]);
        })
    }
}
