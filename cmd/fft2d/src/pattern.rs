//! Synthetic input images.
//!
//! Every pattern has real parts in `[0, 1]` and zero imaginary parts, the
//! same form a grayscale image takes after ingestion.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use spectral_fft::{Complex64, Matrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Bright square covering the middle half of the image
    #[default]
    Square,
    /// Single bright vertical line through the centre
    Line,
    /// One bright pixel at the origin
    Impulse,
    /// Uniform pseudo-random noise
    Noise,
}

/// Builds a `width x height` image of the given pattern.
pub fn generate(pattern: Pattern, width: usize, height: usize, seed: u64) -> Matrix<Complex64> {
    match pattern {
        Pattern::Square => {
            let (x0, x1) = (width / 4, width - width / 4);
            let (y0, y1) = (height / 4, height - height / 4);
            Matrix::from_fn(width, height, |x, y| {
                gray((x0..x1).contains(&x) && (y0..y1).contains(&y))
            })
        }
        Pattern::Line => {
            let center = width / 2;
            Matrix::from_fn(width, height, |x, _| gray(x == center))
        }
        Pattern::Impulse => Matrix::from_fn(width, height, |x, y| gray(x == 0 && y == 0)),
        Pattern::Noise => {
            let mut rng = StdRng::seed_from_u64(seed);
            Matrix::from_fn(width, height, |_, _| Complex64::new(rng.r#gen::<f64>(), 0.0))
        }
    }
}

fn gray(on: bool) -> Complex64 {
    Complex64::new(if on { 1.0 } else { 0.0 }, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_real_unit_range() {
        for pattern in [Pattern::Square, Pattern::Line, Pattern::Impulse, Pattern::Noise] {
            let m = generate(pattern, 9, 7, 42);
            assert_eq!(m.width(), 9);
            assert_eq!(m.height(), 7);
            for v in m.as_slice() {
                assert_eq!(v.im, 0.0);
                assert!((0.0..=1.0).contains(&v.re), "{pattern:?}: {v}");
            }
        }
    }

    #[test]
    fn square_covers_middle_half() {
        let m = generate(Pattern::Square, 8, 8, 0);
        let lit = m.as_slice().iter().filter(|v| v.re == 1.0).count();
        assert_eq!(lit, 16);
        assert_eq!(m.at(2, 2).unwrap().re, 1.0);
        assert_eq!(m.at(1, 2).unwrap().re, 0.0);
    }

    #[test]
    fn noise_is_seeded() {
        assert_eq!(
            generate(Pattern::Noise, 4, 4, 7),
            generate(Pattern::Noise, 4, 4, 7)
        );
        assert_ne!(
            generate(Pattern::Noise, 4, 4, 7),
            generate(Pattern::Noise, 4, 4, 8)
        );
    }

    #[test]
    fn noise_draws_from_seeded_std_rng() {
        let m = generate(Pattern::Noise, 3, 2, 99);
        let mut rng = StdRng::seed_from_u64(99);
        for v in m.as_slice() {
            assert_eq!(v.re, rng.r#gen::<f64>());
        }
        assert!(m.as_slice().iter().any(|v| v.re != m.as_slice()[0].re));
    }

    #[test]
    fn parses_from_yaml() {
        let p: Pattern = serde_yaml::from_str("line").unwrap();
        assert_eq!(p, Pattern::Line);
    }
}
