//! Precomputed bit-reversal permutations and twiddle factors.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::FftError;

/// Smallest power of two `>= v` (`1` for `v == 0`).
pub fn next_power_of_two(v: usize) -> usize {
    v.next_power_of_two()
}

/// Index permutation that reorders input for an iterative
/// decimation-in-time transform.
///
/// Entry `i` holds `i` with its low `log2(N)` bits reversed. The table is its
/// own inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitReversalTable {
    indices: Vec<usize>,
}

impl BitReversalTable {
    /// Builds the table for `n`, which must be a power of two.
    pub fn new(n: usize) -> Result<Self, FftError> {
        if !n.is_power_of_two() {
            return Err(FftError::InvalidLength { len: n });
        }
        let bits = n.trailing_zeros();
        let indices = (0..n).map(|i| reverse_low_bits(i, bits)).collect();
        Ok(Self { indices })
    }

    /// Transform length `N` this table was built for.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the first `N` samples of `input` in bit-reversed order.
    pub fn permute<T: Copy>(&self, input: &[T]) -> Result<Vec<T>, FftError> {
        if input.len() < self.indices.len() {
            return Err(FftError::InvalidLength { len: input.len() });
        }
        Ok(self.indices.iter().map(|&j| input[j]).collect())
    }
}

fn reverse_low_bits(i: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    i.reverse_bits() >> (usize::BITS - bits)
}

/// Unit roots `exp(-i*pi*k/half_n)` for `k` in `[0, half_n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TwiddleTable {
    factors: Vec<Complex64>,
}

impl TwiddleTable {
    pub fn new(half_n: usize) -> Self {
        let factors = (0..half_n)
            .map(|k| Complex64::from_polar(1.0, -(k as f64) * PI / half_n as f64))
            .collect();
        Self { factors }
    }

    /// Number of factors, `N / 2`.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_power_of_two_is_canonical() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(7), 8);
        assert_eq!(next_power_of_two(11), 16);
        assert_eq!(next_power_of_two(256), 256);
        assert_eq!(next_power_of_two(257), 512);
    }

    #[test]
    fn bit_reversal_of_eight() {
        let table = BitReversalTable::new(8).unwrap();
        assert_eq!(table.as_slice(), &[0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn bit_reversal_trivial_sizes() {
        assert_eq!(BitReversalTable::new(1).unwrap().as_slice(), &[0]);
        assert_eq!(BitReversalTable::new(2).unwrap().as_slice(), &[0, 1]);
    }

    #[test]
    fn bit_reversal_rejects_non_power_of_two() {
        assert_eq!(
            BitReversalTable::new(0),
            Err(FftError::InvalidLength { len: 0 })
        );
        assert_eq!(
            BitReversalTable::new(12),
            Err(FftError::InvalidLength { len: 12 })
        );
    }

    #[test]
    fn bit_reversal_is_self_inverse() {
        for shift in 0..12 {
            let n = 1usize << shift;
            let table = BitReversalTable::new(n).unwrap();
            let identity: Vec<usize> = (0..n).collect();
            let once = table.permute(&identity).unwrap();
            let twice = table.permute(&once).unwrap();
            assert_eq!(twice, identity, "n = {n}");
        }
    }

    #[test]
    fn permute_needs_enough_samples() {
        let table = BitReversalTable::new(4).unwrap();
        assert_eq!(
            table.permute(&[1, 2, 3]),
            Err(FftError::InvalidLength { len: 3 })
        );
        assert_eq!(table.permute(&[1, 2, 3, 4, 5]).unwrap(), vec![1, 3, 2, 4]);
    }

    #[test]
    fn twiddles_are_unit_roots() {
        let table = TwiddleTable::new(2);
        let w = table.as_slice();
        assert!((w[0] - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        assert!((w[1] - Complex64::new(0.0, -1.0)).norm() < 1e-12);

        for w in TwiddleTable::new(64).as_slice() {
            assert!((w.norm() - 1.0).abs() < 1e-12);
            assert!(w.im <= 1e-12, "twiddles sit on the lower half circle");
        }
        assert!(TwiddleTable::new(0).is_empty());
    }
}
