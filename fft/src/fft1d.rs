//! One-dimensional forward and inverse transforms.

use num_complex::Complex64;

use crate::butterfly::apply_butterfly;
use crate::error::FftError;
use crate::tables::{BitReversalTable, TwiddleTable, next_power_of_two};

/// Reusable transform plan for a fixed power-of-two length `N`.
///
/// The plan owns its bit-reversal and twiddle tables, so one plan can be
/// shared read-only by any number of threads.
#[derive(Debug, Clone)]
pub struct Fft1d {
    bitrev: BitReversalTable,
    twiddle: TwiddleTable,
}

impl Fft1d {
    /// Plans a transform of length `n`.
    pub fn new(n: usize) -> Result<Self, FftError> {
        let bitrev = BitReversalTable::new(n)?;
        let twiddle = TwiddleTable::new(n / 2);
        Ok(Self { bitrev, twiddle })
    }

    /// Builds a plan from tables generated elsewhere.
    pub fn from_tables(bitrev: BitReversalTable, twiddle: TwiddleTable) -> Result<Self, FftError> {
        if bitrev.len() / 2 != twiddle.len() {
            return Err(FftError::InvalidLength {
                len: twiddle.len() * 2,
            });
        }
        Ok(Self { bitrev, twiddle })
    }

    /// Transform length `N`.
    pub fn len(&self) -> usize {
        self.bitrev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitrev.is_empty()
    }

    /// Forward DFT of the first `N` samples of `input`.
    pub fn process(&self, input: &[Complex64]) -> Result<Vec<Complex64>, FftError> {
        let mut data = self.bitrev.permute(input)?;
        apply_butterfly(&mut data, &self.twiddle)?;
        Ok(data)
    }

    /// Inverse DFT of the first `N` samples of `input`, scaled by `1/N`.
    ///
    /// Computed as `conj(fft(conj(x))) / N`.
    pub fn inverse(&self, input: &[Complex64]) -> Result<Vec<Complex64>, FftError> {
        let n = self.len();
        if input.len() < n {
            return Err(FftError::InvalidLength { len: input.len() });
        }
        let conj: Vec<Complex64> = input[..n].iter().map(|v| v.conj()).collect();
        let scale = 1.0 / n as f64;
        Ok(self
            .process(&conj)?
            .into_iter()
            .map(|v| v.conj() * scale)
            .collect())
    }
}

/// Forward transform of a sequence whose length is a power of two.
pub fn fft(input: &[Complex64]) -> Result<Vec<Complex64>, FftError> {
    Fft1d::new(input.len())?.process(input)
}

/// Forward transform after zero-padding to the next power of two.
pub fn fft_padded(input: &[Complex64]) -> Result<Vec<Complex64>, FftError> {
    let n = next_power_of_two(input.len());
    let mut padded = input.to_vec();
    padded.resize(n, Complex64::default());
    Fft1d::new(n)?.process(&padded)
}

/// Inverse transform of a sequence whose length is a power of two.
pub fn ifft(input: &[Complex64]) -> Result<Vec<Complex64>, FftError> {
    Fft1d::new(input.len())?.inverse(input)
}
