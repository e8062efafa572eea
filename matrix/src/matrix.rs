use std::fmt;
use std::ops::Range;

use num_traits::Float;

use crate::error::MatrixError;

/// Dense 2-D container stored in row-major order.
///
/// Element `(x, y)` lives at `data[y * width + x]`; `data.len() == width * height`
/// holds after every operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Matrix<T> {
    /// Wraps existing row-major data.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, MatrixError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(MatrixError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a matrix by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Number of elements per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of elements per column.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn at(&self, x: usize, y: usize) -> Result<&T, MatrixError> {
        let idx = self.offset(x, y)?;
        Ok(&self.data[idx])
    }

    pub fn at_mut(&mut self, x: usize, y: usize) -> Result<&mut T, MatrixError> {
        let idx = self.offset(x, y)?;
        Ok(&mut self.data[idx])
    }

    /// Raw row-major storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width.max(1))
    }

    /// Applies `f` to every element in place.
    pub fn transform(&mut self, mut f: impl FnMut(&T) -> T) {
        for v in self.data.iter_mut() {
            *v = f(v);
        }
    }

    /// Visits every element mutably together with its `(x, y)` position.
    pub fn update(&mut self, mut f: impl FnMut(usize, usize, &mut T)) {
        let width = self.width.max(1);
        for (i, v) in self.data.iter_mut().enumerate() {
            f(i % width, i / width, v);
        }
    }

    /// Applies `f` to every element, writing into a new matrix of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            data: self.data.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, MatrixError> {
        check_index(x, self.width)?;
        check_index(y, self.height)?;
        Ok(y * self.width + x)
    }
}

impl<T: Clone> Matrix<T> {
    /// Returns a copy of row `y`.
    pub fn row(&self, y: usize) -> Result<Vec<T>, MatrixError> {
        check_index(y, self.height)?;
        let start = y * self.width;
        Ok(self.data[start..start + self.width].to_vec())
    }

    /// Returns a copy of column `x`.
    pub fn col(&self, x: usize) -> Result<Vec<T>, MatrixError> {
        check_index(x, self.width)?;
        Ok(self
            .data
            .iter()
            .skip(x)
            .step_by(self.width)
            .cloned()
            .collect())
    }

    /// Overwrites row `y` with `values`.
    ///
    /// A sequence shorter than the row only replaces the leading cells.
    pub fn set_row(&mut self, y: usize, values: &[T]) -> Result<(), MatrixError> {
        check_index(y, self.height)?;
        if values.len() > self.width {
            return Err(MatrixError::DimensionMismatch {
                expected: self.width,
                got: values.len(),
            });
        }
        let start = y * self.width;
        self.data[start..start + values.len()].clone_from_slice(values);
        Ok(())
    }

    /// Overwrites column `x` with `values`.
    ///
    /// A sequence shorter than the column only replaces the leading cells.
    pub fn set_col(&mut self, x: usize, values: &[T]) -> Result<(), MatrixError> {
        check_index(x, self.width)?;
        if values.len() > self.height {
            return Err(MatrixError::DimensionMismatch {
                expected: self.height,
                got: values.len(),
            });
        }
        for (y, v) in values.iter().enumerate() {
            self.data[y * self.width + x] = v.clone();
        }
        Ok(())
    }

    /// Copies the rows in `rows` into a new `width x rows.len()` matrix.
    pub fn row_band(&self, rows: Range<usize>) -> Result<Self, MatrixError> {
        check_range(&rows, self.height)?;
        let data = self.data[rows.start * self.width..rows.end * self.width].to_vec();
        Ok(Self {
            data,
            width: self.width,
            height: rows.len(),
        })
    }

    /// Copies the columns in `cols` into a new `cols.len() x height` matrix.
    pub fn col_band(&self, cols: Range<usize>) -> Result<Self, MatrixError> {
        check_range(&cols, self.width)?;
        let mut data = Vec::with_capacity(cols.len() * self.height);
        for row in self.rows() {
            data.extend_from_slice(&row[cols.clone()]);
        }
        Ok(Self {
            data,
            width: cols.len(),
            height: self.height,
        })
    }

    /// Writes `band` over the rows starting at `first`.
    pub fn write_row_band(&mut self, first: usize, band: &Matrix<T>) -> Result<(), MatrixError> {
        if band.width != self.width {
            return Err(MatrixError::DimensionMismatch {
                expected: self.width,
                got: band.width,
            });
        }
        let end = first + band.height;
        check_range(&(first..end), self.height)?;
        self.data[first * self.width..end * self.width].clone_from_slice(&band.data);
        Ok(())
    }

    /// Writes `band` over the columns starting at `first`.
    pub fn write_col_band(&mut self, first: usize, band: &Matrix<T>) -> Result<(), MatrixError> {
        if band.height != self.height {
            return Err(MatrixError::DimensionMismatch {
                expected: self.height,
                got: band.height,
            });
        }
        let end = first + band.width;
        check_range(&(first..end), self.width)?;
        if band.width == 0 {
            return Ok(());
        }
        for (y, src) in band.data.chunks(band.width).enumerate() {
            let start = y * self.width;
            self.data[start + first..start + end].clone_from_slice(src);
        }
        Ok(())
    }
}

impl<T: Clone + Default> Matrix<T> {
    /// Creates a `width x height` matrix filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![T::default(); width * height],
            width,
            height,
        }
    }

    /// Reallocates to the new extents.
    ///
    /// The top-left `min(old, new)` rectangle is preserved, new cells are
    /// default-filled.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        if new_width == self.width && new_height == self.height {
            return;
        }
        let mut data = vec![T::default(); new_width * new_height];
        let keep_w = new_width.min(self.width);
        let keep_h = new_height.min(self.height);
        for y in 0..keep_h {
            let src = y * self.width;
            let dst = y * new_width;
            data[dst..dst + keep_w].clone_from_slice(&self.data[src..src + keep_w]);
        }
        self.data = data;
        self.width = new_width;
        self.height = new_height;
    }
}

impl<T: Float> Matrix<T> {
    /// Rescales every element into `[0, 1]` using the observed min/max.
    ///
    /// Leaves the matrix untouched when the value range is within epsilon.
    pub fn normalize(&mut self) {
        let bounds = self.data.iter().fold(None, |acc: Option<(T, T)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
        let Some((lowest, highest)) = bounds else {
            return;
        };
        let range = highest - lowest;
        if range <= T::epsilon() {
            return;
        }
        self.transform(|&v| (v - lowest) / range);
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (i, v) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_index(index: usize, bound: usize) -> Result<(), MatrixError> {
    if index >= bound {
        return Err(MatrixError::OutOfRange { index, bound });
    }
    Ok(())
}

fn check_range(range: &Range<usize>, bound: usize) -> Result<(), MatrixError> {
    if range.start > range.end || range.end > bound {
        return Err(MatrixError::OutOfRange {
            index: range.end.max(range.start),
            bound,
        });
    }
    Ok(())
}
