//! Iterative radix-2 decimation-in-time butterfly stages.

use num_complex::Complex64;

use crate::error::FftError;
use crate::tables::TwiddleTable;

/// Runs every butterfly stage over `data` in place.
///
/// `data` must already be in bit-reversed order and hold exactly twice as
/// many samples as `twiddle` has factors. After the `log2(N)` stages it holds
/// the DFT of the original (unpermuted) sequence.
pub fn apply_butterfly(data: &mut [Complex64], twiddle: &TwiddleTable) -> Result<(), FftError> {
    let n = data.len();
    if !n.is_power_of_two() {
        return Err(FftError::InvalidLength { len: n });
    }
    if n / 2 != twiddle.len() {
        return Err(FftError::DimensionMismatch {
            expected: twiddle.len() * 2,
            got: n,
        });
    }
    let w = twiddle.as_slice();

    let mut block_size = 2;
    while block_size <= n {
        let half = block_size / 2;
        let stride = n / block_size;
        for block in data.chunks_exact_mut(block_size) {
            let (lo, hi) = block.split_at_mut(half);
            for (i, (top, bot)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                let t = *top;
                let b = *bot * w[i * stride];
                *top = t + b;
                *bot = t - b;
            }
        }
        block_size <<= 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn two_point_stage() {
        let mut data = vec![c(1.0, 0.0), c(3.0, 0.0)];
        apply_butterfly(&mut data, &TwiddleTable::new(1)).unwrap();
        assert_eq!(data, vec![c(4.0, 0.0), c(-2.0, 0.0)]);
    }

    #[test]
    fn mismatched_twiddles_leave_data_untouched() {
        let mut data = vec![c(1.0, 0.0); 8];
        let err = apply_butterfly(&mut data, &TwiddleTable::new(2)).unwrap_err();
        assert_eq!(err, FftError::DimensionMismatch { expected: 4, got: 8 });
        assert!(data.iter().all(|&v| v == c(1.0, 0.0)));
    }

    #[test]
    fn non_power_of_two_is_rejected() {
        let mut data = vec![c(1.0, 0.0); 3];
        assert_eq!(
            apply_butterfly(&mut data, &TwiddleTable::new(1)),
            Err(FftError::InvalidLength { len: 3 })
        );
    }

    #[test]
    fn single_sample_is_identity() {
        let mut data = vec![c(2.5, -1.0)];
        apply_butterfly(&mut data, &TwiddleTable::new(0)).unwrap();
        assert_eq!(data, vec![c(2.5, -1.0)]);
    }

    #[test]
    fn permuted_impulse_spreads_flat() {
        // An impulse at index 0 is a fixed point of the bit-reversal.
        let mut data = vec![c(0.0, 0.0); 16];
        data[0] = c(1.0, 0.0);
        apply_butterfly(&mut data, &TwiddleTable::new(8)).unwrap();
        for v in data {
            assert!((v - c(1.0, 0.0)).norm() < 1e-12);
        }
    }
}
