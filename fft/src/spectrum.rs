//! Helpers for preparing images for, and spectra after, a 2-D transform.

use num_complex::Complex64;
use spectral_matrix::Matrix;

/// Gain used by [`display_spectrum`].
pub const DEFAULT_LOG_GAIN: f64 = 1000.0;

/// Negates every element whose `x + y` is odd.
///
/// Multiplying the input by `(-1)^(x+y)` moves the zero frequency of its
/// transform to the centre of the spectrum. Applying it again after an
/// inverse transform undoes the shift.
pub fn recenter(data: &mut Matrix<Complex64>) {
    data.update(|x, y, v| {
        if (x + y) & 1 == 1 {
            *v = -*v;
        }
    });
}

/// Per-element modulus.
pub fn magnitude(data: &Matrix<Complex64>) -> Matrix<f64> {
    data.map(|v| v.norm())
}

/// Compresses the dynamic range with `ln(v * gain + 1) / ln(gain + 1)`, then
/// rescales into `[0, 1]`.
pub fn log_compress(data: &mut Matrix<f64>, gain: f64) {
    if gain > 0.0 {
        let denom = (gain + 1.0).ln();
        data.transform(|&v| (v * gain + 1.0).ln() / denom);
    }
    data.normalize();
}

/// Magnitude spectrum ready for display: log-compressed and normalized.
pub fn display_spectrum(data: &Matrix<Complex64>) -> Matrix<f64> {
    let mut mag = magnitude(data);
    log_compress(&mut mag, DEFAULT_LOG_GAIN);
    mag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft2d::fft2d;

    #[test]
    fn recenter_checkerboard() {
        let mut m = Matrix::from_fn(3, 2, |_, _| Complex64::new(1.0, 1.0));
        recenter(&mut m);
        let signs: Vec<f64> = m.as_slice().iter().map(|v| v.re).collect();
        assert_eq!(signs, vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0]);

        recenter(&mut m);
        assert!(m.as_slice().iter().all(|&v| v == Complex64::new(1.0, 1.0)));
    }

    #[test]
    fn recentered_constant_peaks_in_middle() {
        let mut m = Matrix::from_fn(8, 8, |_, _| Complex64::new(1.0, 0.0));
        recenter(&mut m);
        let out = fft2d(&m).unwrap();
        let mag = magnitude(&out.result);
        assert!((mag.at(4, 4).unwrap() - 64.0).abs() < 1e-9);
        assert!(mag.at(0, 0).unwrap().abs() < 1e-9);
    }

    #[test]
    fn display_spectrum_is_unit_range() {
        let m = Matrix::from_vec(
            2,
            2,
            vec![
                Complex64::new(0.0, 0.0),
                Complex64::new(3.0, 4.0),
                Complex64::new(100.0, 0.0),
                Complex64::new(0.5, 0.0),
            ],
        )
        .unwrap();
        let shown = display_spectrum(&m);
        assert_eq!(*shown.at(0, 0).unwrap(), 0.0);
        assert_eq!(*shown.at(0, 1).unwrap(), 1.0);
        let mid = *shown.at(1, 0).unwrap();
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn log_compress_without_gain_only_normalizes() {
        let mut m = Matrix::from_vec(2, 1, vec![2.0, 4.0]).unwrap();
        log_compress(&mut m, 0.0);
        assert_eq!(m.as_slice(), &[0.0, 1.0]);
    }
}
