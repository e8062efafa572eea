//! Serial separable 2-D transform.

use std::fmt;

use num_complex::Complex64;
use spectral_matrix::Matrix;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::FftError;
use crate::fft1d::Fft1d;
use crate::tables::next_power_of_two;

/// Output of a 2-D transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fft2dOutput {
    /// Rows-then-columns transform of the padded input.
    pub result: Matrix<Complex64>,

    /// Row pass only, before any column was transformed.
    pub intermediate: Matrix<Complex64>,
}

/// Engine able to run a separable 2-D transform.
pub trait Transform2d {
    /// Forward transform, padding the input to power-of-two extents.
    fn forward(&self, data: &Matrix<Complex64>) -> Result<Fft2dOutput, FftError>;

    /// Inverse transform computed as `conj(forward(conj(x))) / (W * H)`.
    ///
    /// `intermediate` holds the inverse of every row of `spectrum` (scaled by
    /// `1 / W`), before any column was inverted.
    fn inverse(&self, spectrum: &Matrix<Complex64>) -> Result<Fft2dOutput, FftError> {
        let conj = spectrum.map(|v| v.conj());
        let mut out = self.forward(&conj)?;
        let scale = 1.0 / out.result.len().max(1) as f64;
        out.result.transform(|v| v.conj() * scale);
        let row_scale = 1.0 / out.intermediate.width().max(1) as f64;
        out.intermediate.transform(|v| v.conj() * row_scale);
        Ok(out)
    }
}

/// Direction a pass walks the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Cols,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "row"),
            Axis::Cols => write!(f, "column"),
        }
    }
}

/// Serial 2-D transform planned for a fixed input shape.
#[derive(Debug, Clone)]
pub struct Fft2d {
    width: usize,
    height: usize,
    rows: Fft1d,
    cols: Fft1d,
    cancel: Option<CancellationToken>,
}

impl Fft2d {
    /// Plans a transform for inputs up to `width x height`; both extents are
    /// rounded up to the next power of two.
    pub fn new(width: usize, height: usize) -> Result<Self, FftError> {
        let padded_w = next_power_of_two(width);
        let padded_h = next_power_of_two(height);
        debug!(
            "planning 2-D transform {}x{} (padded {}x{})",
            width, height, padded_w, padded_h
        );
        Ok(Self {
            width: padded_w,
            height: padded_h,
            rows: Fft1d::new(padded_w)?,
            cols: Fft1d::new(padded_h)?,
            cancel: None,
        })
    }

    /// Checks `cancel` before every row and column.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Padded width: the length of every row transform.
    pub fn padded_width(&self) -> usize {
        self.width
    }

    /// Padded height: the length of every column transform.
    pub fn padded_height(&self) -> usize {
        self.height
    }

    pub(crate) fn row_plan(&self) -> &Fft1d {
        &self.rows
    }

    pub(crate) fn col_plan(&self) -> &Fft1d {
        &self.cols
    }

    /// Copies `data` into a zero-padded matrix of the planned shape.
    pub(crate) fn extend(&self, data: &Matrix<Complex64>) -> Result<Matrix<Complex64>, FftError> {
        if data.width() > self.width {
            return Err(FftError::DimensionMismatch {
                expected: self.width,
                got: data.width(),
            });
        }
        if data.height() > self.height {
            return Err(FftError::DimensionMismatch {
                expected: self.height,
                got: data.height(),
            });
        }
        let mut extended = data.clone();
        extended.resize(self.width, self.height);
        Ok(extended)
    }
}

impl Transform2d for Fft2d {
    fn forward(&self, data: &Matrix<Complex64>) -> Result<Fft2dOutput, FftError> {
        let cancel = self.cancel.as_ref();
        let extended = self.extend(data)?;
        let intermediate = transform_lines(&self.rows, &extended, Axis::Rows, cancel)?;
        let result = transform_lines(&self.cols, &intermediate, Axis::Cols, cancel)?;
        Ok(Fft2dOutput {
            result,
            intermediate,
        })
    }
}

/// Serial forward 2-D transform of `data`, padded to power-of-two extents.
pub fn fft2d(data: &Matrix<Complex64>) -> Result<Fft2dOutput, FftError> {
    Fft2d::new(data.width(), data.height())?.forward(data)
}

/// Transforms every row (or column) of `data` into a new matrix of the same
/// shape. `plan.len()` must equal the line length.
pub(crate) fn transform_lines(
    plan: &Fft1d,
    data: &Matrix<Complex64>,
    axis: Axis,
    cancel: Option<&CancellationToken>,
) -> Result<Matrix<Complex64>, FftError> {
    let mut out = Matrix::new(data.width(), data.height());
    match axis {
        Axis::Rows => {
            for y in 0..data.height() {
                check_cancelled(cancel)?;
                out.set_row(y, &plan.process(&data.row(y)?)?)?;
            }
        }
        Axis::Cols => {
            for x in 0..data.width() {
                check_cancelled(cancel)?;
                out.set_col(x, &plan.process(&data.col(x)?)?)?;
            }
        }
    }
    Ok(out)
}

pub(crate) fn check_cancelled(cancel: Option<&CancellationToken>) -> Result<(), FftError> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(FftError::Cancelled),
        _ => Ok(()),
    }
}
