use spectral_matrix::MatrixError;
use thiserror::Error;

/// Errors returned by the transform engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FftError {
    /// A length that must be a power of two is not, or the input is shorter
    /// than the planned transform length.
    #[error("invalid length: {len}")]
    InvalidLength { len: usize },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("index {index} out of range (bound {bound})")]
    OutOfRange { index: usize, bound: usize },

    #[error("transform cancelled")]
    Cancelled,

    #[error("worker for band {band} panicked")]
    WorkerPanicked { band: usize },
}

impl From<MatrixError> for FftError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::OutOfRange { index, bound } => FftError::OutOfRange { index, bound },
            MatrixError::DimensionMismatch { expected, got } => {
                FftError::DimensionMismatch { expected, got }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_errors_keep_their_kind() {
        let err: FftError = MatrixError::OutOfRange { index: 4, bound: 4 }.into();
        assert_eq!(err, FftError::OutOfRange { index: 4, bound: 4 });

        let err: FftError = MatrixError::DimensionMismatch { expected: 2, got: 3 }.into();
        assert_eq!(err.to_string(), "dimension mismatch: expected 2, got 3");
    }

    #[test]
    fn display() {
        assert_eq!(FftError::InvalidLength { len: 6 }.to_string(), "invalid length: 6");
        assert_eq!(
            FftError::WorkerPanicked { band: 2 }.to_string(),
            "worker for band 2 panicked"
        );
    }
}
