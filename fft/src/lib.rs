//! Radix-2 Cooley-Tukey FFT with a separable, band-parallel 2-D transform.
//!
//! The building blocks, leaves first:
//!
//! - [`BitReversalTable`] / [`TwiddleTable`]: precomputed permutation and unit roots
//! - [`apply_butterfly`]: the iterative decimation-in-time stages
//! - [`Fft1d`]: a reusable 1-D plan composing the above
//! - [`Fft2d`]: pad to power-of-two extents, transform every row, then every column
//! - [`ParallelFft2d`]: the same two passes split into bands over scoped workers
//!
//! # Usage
//!
//! ```
//! use spectral_fft::{Complex64, Matrix, fft2d, parallel_fft2d};
//!
//! let image = Matrix::from_fn(6, 5, |x, y| Complex64::new(((x + y) % 2) as f64, 0.0));
//!
//! let serial = fft2d(&image).unwrap();
//! let parallel = parallel_fft2d(&image, 4).unwrap();
//!
//! assert_eq!(serial.result.width(), 8);
//! assert_eq!(serial, parallel);
//! ```
//!
//! # Design
//!
//! Workers never share mutable state: each receives a private copy of its
//! band and returns the transformed band by value. The orchestrator joins all
//! workers of the row pass and merges their bands before any column work is
//! dispatched.

mod butterfly;
mod error;
mod fft1d;
mod fft2d;
mod parallel;
pub mod spectrum;
mod tables;

pub use butterfly::apply_butterfly;
pub use error::FftError;
pub use fft1d::{Fft1d, fft, fft_padded, ifft};
pub use fft2d::{Axis, Fft2d, Fft2dOutput, Transform2d, fft2d};
pub use parallel::{ParallelConfig, ParallelFft2d, parallel_fft2d, partition};
pub use tables::{BitReversalTable, TwiddleTable, next_power_of_two};

pub use num_complex::Complex64;
pub use spectral_matrix::{Matrix, MatrixError};
pub use tokio_util::sync::CancellationToken;
