//! Property tests for the transform engines.
//!
//! Reproduce a failure: `PROPTEST_SEED=<seed> cargo test -p spectral-fft --test properties`

use proptest::prelude::*;
use spectral_fft::{
    BitReversalTable, Complex64, Matrix, ParallelConfig, ParallelFft2d, Transform2d, fft, fft2d,
    ifft, parallel_fft2d,
};

fn complex_vec(len: usize) -> impl Strategy<Value = Vec<Complex64>> {
    prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), len)
        .prop_map(|pairs| pairs.into_iter().map(|(re, im)| Complex64::new(re, im)).collect())
}

fn power_of_two_vec() -> impl Strategy<Value = Vec<Complex64>> {
    (0u32..9).prop_flat_map(|shift| complex_vec(1 << shift))
}

fn complex_matrix() -> impl Strategy<Value = Matrix<Complex64>> {
    (1usize..20, 1usize..20).prop_flat_map(|(w, h)| {
        complex_vec(w * h).prop_map(move |data| Matrix::from_vec(w, h, data).unwrap())
    })
}

fn max_norm(values: &[Complex64]) -> f64 {
    values.iter().map(|v| v.norm()).fold(0.0, f64::max)
}

// ═══════════════════════════════════════════════════════════════
// 1-D laws
// ═══════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn inverse_undoes_forward(x in power_of_two_vec()) {
        let back = ifft(&fft(&x).unwrap()).unwrap();
        let scale = max_norm(&x).max(1.0);
        for (a, e) in back.iter().zip(&x) {
            prop_assert!((a - e).norm() <= 1e-6 * scale, "{a} !~= {e}");
        }
    }

    #[test]
    fn forward_is_linear(
        (x, y) in (0u32..8).prop_flat_map(|shift| (complex_vec(1 << shift), complex_vec(1 << shift))),
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
    ) {
        let combined: Vec<Complex64> = x.iter().zip(&y).map(|(&p, &q)| p * a + q * b).collect();
        let lhs = fft(&combined).unwrap();
        let fx = fft(&x).unwrap();
        let fy = fft(&y).unwrap();
        let scale = max_norm(&lhs).max(1.0);
        for ((l, p), q) in lhs.iter().zip(&fx).zip(&fy) {
            let rhs = *p * a + *q * b;
            prop_assert!((*l - rhs).norm() <= 1e-9 * scale, "{l} !~= {rhs}");
        }
    }

    #[test]
    fn bit_reversal_twice_is_identity(shift in 0u32..14) {
        let n = 1usize << shift;
        let table = BitReversalTable::new(n).unwrap();
        let identity: Vec<usize> = (0..n).collect();
        let twice = table.permute(&table.permute(&identity).unwrap()).unwrap();
        prop_assert_eq!(twice, identity);
    }
}

// ═══════════════════════════════════════════════════════════════
// 2-D: parallel engine agrees with the serial one
// ═══════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parallel_matches_serial(m in complex_matrix()) {
        let serial = fft2d(&m).unwrap();
        for workers in [1, 2, 4, 8] {
            let parallel = parallel_fft2d(&m, workers).unwrap();
            for (p, s) in parallel.result.as_slice().iter().zip(serial.result.as_slice()) {
                prop_assert!((p - s).norm() <= 1e-6, "workers={workers}: {p} !~= {s}");
            }
            prop_assert_eq!(&parallel.intermediate, &serial.intermediate);
        }
    }

    #[test]
    fn parallel_inverse_recovers_input(m in complex_matrix()) {
        let engine = ParallelFft2d::new(m.width(), m.height(), ParallelConfig::default().with_workers(3)).unwrap();
        let spectrum = engine.forward(&m).unwrap();
        let back = engine.inverse(&spectrum.result).unwrap();

        let mut padded = m.clone();
        padded.resize(back.result.width(), back.result.height());
        let scale = max_norm(padded.as_slice()).max(1.0);
        for (a, e) in back.result.as_slice().iter().zip(padded.as_slice()) {
            prop_assert!((a - e).norm() <= 1e-6 * scale);
        }
    }
}
