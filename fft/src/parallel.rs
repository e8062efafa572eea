//! Band-parallel separable 2-D transform.
//!
//! The row pass and the column pass each split their lines into contiguous
//! bands, one scoped worker per band. A worker owns a private copy of its
//! band and returns its transformed band by value; only the orchestrating
//! thread writes the destination matrices, after joining every worker of the
//! phase. Bands are merged in ascending index order, so the output does not
//! depend on which worker finishes first.

use std::ops::Range;
use std::thread;

use num_complex::Complex64;
use spectral_matrix::Matrix;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::FftError;
use crate::fft1d::Fft1d;
use crate::fft2d::{Axis, Fft2d, Fft2dOutput, Transform2d, check_cancelled, transform_lines};

/// Controls parallel execution.
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    /// Workers per phase, capped at the available parallelism.
    /// Default: 0 (use the available parallelism).
    pub workers: usize,

    /// Checked before dispatch, before every line, and before merging.
    pub cancel: Option<CancellationToken>,
}

impl ParallelConfig {
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn with_defaults(mut self) -> Self {
        let available = available_parallelism();
        if self.workers == 0 {
            self.workers = available;
        } else if self.workers > available {
            warn!(
                "requested {} workers, capping at available parallelism {}",
                self.workers, available
            );
            self.workers = available;
        }
        self
    }
}

fn available_parallelism() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Splits `[0, len)` into contiguous ascending ranges of `ceil(len / workers)`
/// lines; the last range may be shorter. Never yields an empty range.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let band = len.div_ceil(workers.max(1));
    (0..len)
        .step_by(band)
        .map(|first| first..(first + band).min(len))
        .collect()
}

/// Contiguous lines handed to one worker, with a private copy of their data.
struct Band {
    index: usize,
    range: Range<usize>,
    data: Matrix<Complex64>,
}

/// Parallel 2-D transform planned for a fixed input shape.
///
/// Produces bit-identical output to [`Fft2d`] for any worker count.
#[derive(Debug, Clone)]
pub struct ParallelFft2d {
    plan: Fft2d,
    cfg: ParallelConfig,
}

impl ParallelFft2d {
    pub fn new(width: usize, height: usize, cfg: ParallelConfig) -> Result<Self, FftError> {
        Ok(Self {
            plan: Fft2d::new(width, height)?,
            cfg: cfg.with_defaults(),
        })
    }

    /// Effective worker count after capping.
    pub fn workers(&self) -> usize {
        self.cfg.workers
    }

    /// Transforms every line of `source` along `axis` into `dest`.
    ///
    /// Returns only after every band has been joined and merged.
    fn run_phase(
        &self,
        axis: Axis,
        plan: &Fft1d,
        source: &Matrix<Complex64>,
        dest: &mut Matrix<Complex64>,
    ) -> Result<(), FftError> {
        let cancel = self.cfg.cancel.as_ref();
        check_cancelled(cancel)?;

        let lines = match axis {
            Axis::Rows => source.height(),
            Axis::Cols => source.width(),
        };
        let bands = partition(lines, self.cfg.workers)
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                let data = match axis {
                    Axis::Rows => source.row_band(range.clone())?,
                    Axis::Cols => source.col_band(range.clone())?,
                };
                Ok(Band { index, range, data })
            })
            .collect::<Result<Vec<_>, FftError>>()?;
        debug!("{} pass: {} bands over {} lines", axis, bands.len(), lines);

        let joined = run_bands(bands, axis, |_, data| transform_lines(plan, data, axis, cancel));
        merge_bands(joined, axis, dest, cancel)
    }
}

/// Output of one joined worker: band index, line range, transformed band.
type Joined = (usize, Range<usize>, Result<Matrix<Complex64>, FftError>);

/// Runs `work` on every band, one scoped worker each, and joins them all.
///
/// Results come back in band order. A panicking worker yields
/// `WorkerPanicked` for its band.
fn run_bands<F>(bands: Vec<Band>, axis: Axis, work: F) -> Vec<Joined>
where
    F: Fn(usize, &Matrix<Complex64>) -> Result<Matrix<Complex64>, FftError> + Sync,
{
    let work = &work;
    thread::scope(|s| {
        let handles: Vec<_> = bands
            .into_iter()
            .map(|band| {
                let Band { index, range, data } = band;
                trace!("dispatching {} band {} ({:?})", axis, index, range);
                let handle = s.spawn(move || work(index, &data));
                (index, range, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(index, range, handle)| {
                let output = handle
                    .join()
                    .unwrap_or_else(|_| Err(FftError::WorkerPanicked { band: index }));
                (index, range, output)
            })
            .collect()
    })
}

/// Writes joined bands into `dest` in ascending order.
///
/// Nothing is written when the phase was cancelled or any band failed.
fn merge_bands(
    joined: Vec<Joined>,
    axis: Axis,
    dest: &mut Matrix<Complex64>,
    cancel: Option<&CancellationToken>,
) -> Result<(), FftError> {
    check_cancelled(cancel)?;
    let outputs = joined
        .into_iter()
        .map(|(index, range, output)| output.map(|band| (index, range, band)))
        .collect::<Result<Vec<_>, FftError>>()?;

    for (index, range, band) in outputs {
        trace!("merging {} band {} ({:?})", axis, index, range);
        match axis {
            Axis::Rows => dest.write_row_band(range.start, &band)?,
            Axis::Cols => dest.write_col_band(range.start, &band)?,
        }
    }
    Ok(())
}

impl Transform2d for ParallelFft2d {
    fn forward(&self, data: &Matrix<Complex64>) -> Result<Fft2dOutput, FftError> {
        let extended = self.plan.extend(data)?;
        let (width, height) = (extended.width(), extended.height());

        let mut intermediate = Matrix::new(width, height);
        self.run_phase(Axis::Rows, self.plan.row_plan(), &extended, &mut intermediate)?;

        // Every column depends on every transformed row: the row phase has
        // been fully merged at this point.
        let mut result = Matrix::new(width, height);
        self.run_phase(Axis::Cols, self.plan.col_plan(), &intermediate, &mut result)?;

        Ok(Fft2dOutput {
            result,
            intermediate,
        })
    }
}

/// Parallel forward 2-D transform of `data` with up to `workers` workers
/// per phase (0 uses the available parallelism).
pub fn parallel_fft2d(data: &Matrix<Complex64>, workers: usize) -> Result<Fft2dOutput, FftError> {
    let cfg = ParallelConfig::default().with_workers(workers);
    ParallelFft2d::new(data.width(), data.height(), cfg)?.forward(data)
}
