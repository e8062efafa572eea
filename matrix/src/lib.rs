//! Dense row-major matrix used by the spectral transforms.
//!
//! [`Matrix<T>`] stores `width * height` elements with `(x, y)` at
//! `y * width + x`. Besides element access it supports whole-row and
//! whole-column extraction/injection and contiguous *bands* of rows or
//! columns, which is how the parallel transform hands private copies of
//! data to its workers.
//!
//! # Example
//!
//! ```
//! use spectral_matrix::Matrix;
//!
//! let mut m = Matrix::from_fn(3, 2, |x, y| (x + y) as f64);
//! m.resize(4, 4);
//! assert_eq!(m.row(0).unwrap(), vec![0.0, 1.0, 2.0, 0.0]);
//!
//! m.normalize();
//! assert_eq!(*m.at(2, 1).unwrap(), 1.0);
//! ```

mod error;
mod matrix;

pub use error::MatrixError;
pub use matrix::Matrix;
