use thiserror::Error;

/// Errors returned by matrix accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("index {index} out of range (bound {bound})")]
    OutOfRange { index: usize, bound: usize },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
