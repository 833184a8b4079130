//! Polynomial helpers for spectral factorization.
//!
//! Coefficient slices are in ascending powers: `c[0] + c[1]·x + c[2]·x² + …`.
//!
//! Roots are seeded by the eigenvalues of the companion matrix and then refined
//! simultaneously with Aberth–Ehrlich iterations, which also repairs seeds that
//! the Schur decomposition returns with reduced accuracy for the larger degrees
//! (the binomial coefficients of the Daubechies polynomial span many orders of
//! magnitude).

use nalgebra::{Complex, DMatrix};

type C64 = Complex<f64>;

const ABERTH_MAX_ITERS: usize = 200;
const ABERTH_RTOL: f64 = 1e-15;

/// Binomial coefficient `C(n, k)` as `f64`.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut acc = 1.0;
    for i in 0..k {
        acc = acc * (n - i) as f64 / (i + 1) as f64;
    }
    acc
}

/// Evaluate `p(z)` and `p'(z)` with Horner's scheme.
pub fn eval_with_derivative(coeffs: &[f64], z: C64) -> (C64, C64) {
    let mut p = C64::new(0.0, 0.0);
    let mut dp = C64::new(0.0, 0.0);
    for &c in coeffs.iter().rev() {
        dp = dp * z + p;
        p = p * z + C64::new(c, 0.0);
    }
    (p, dp)
}

/// All complex roots of a real polynomial.
///
/// Trailing zero coefficients (vanishing leading terms) are ignored. Constant
/// polynomials have no roots.
pub fn poly_roots(coeffs: &[f64]) -> Vec<C64> {
    let Some(degree) = coeffs.iter().rposition(|c| *c != 0.0) else {
        return Vec::new();
    };
    let coeffs = &coeffs[..=degree];

    match degree {
        0 => Vec::new(),
        1 => vec![C64::new(-coeffs[0] / coeffs[1], 0.0)],
        _ => {
            let lead = coeffs[degree];
            let companion = DMatrix::from_fn(degree, degree, |r, c| {
                if c == degree - 1 {
                    -coeffs[r] / lead
                } else if r == c + 1 {
                    1.0
                } else {
                    0.0
                }
            });
            let seeds: Vec<C64> = companion.complex_eigenvalues().iter().copied().collect();
            aberth_refine(coeffs, seeds)
        }
    }
}

/// Simultaneous root refinement (Aberth–Ehrlich).
fn aberth_refine(coeffs: &[f64], mut roots: Vec<C64>) -> Vec<C64> {
    // Coincident or non-finite seeds stall the correction term; spread them.
    for i in 0..roots.len() {
        let duplicate = roots[..i].iter().any(|r| (*r - roots[i]).norm() < 1e-12);
        if duplicate || !roots[i].re.is_finite() || !roots[i].im.is_finite() {
            let angle = 0.4 + i as f64;
            roots[i] = C64::new(angle.cos(), angle.sin()) * (1.0 + 1e-3 * i as f64);
        }
    }

    for _ in 0..ABERTH_MAX_ITERS {
        let mut max_step: f64 = 0.0;
        for i in 0..roots.len() {
            let (p, dp) = eval_with_derivative(coeffs, roots[i]);
            if p.norm() == 0.0 {
                continue;
            }
            let ratio = p / dp;
            let repulsion: C64 = roots
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, r)| C64::new(1.0, 0.0) / (roots[i] - *r))
                .sum();
            let step = ratio / (C64::new(1.0, 0.0) - ratio * repulsion);
            if !(step.re.is_finite() && step.im.is_finite()) {
                continue;
            }
            roots[i] -= step;
            max_step = max_step.max(step.norm() / roots[i].norm().max(1.0));
        }
        if max_step < ABERTH_RTOL {
            break;
        }
    }

    roots
}

/// Multiply `poly` by the linear factor `a + b·x`.
pub fn mul_linear(poly: &[C64], a: C64, b: C64) -> Vec<C64> {
    let mut out = vec![C64::new(0.0, 0.0); poly.len() + 1];
    for (k, &c) in poly.iter().enumerate() {
        out[k] += c * a;
        out[k + 1] += c * b;
    }
    out
}
