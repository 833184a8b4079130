//! Fixed point as the null vector of `A`.
//!
//! Only meaningful for the homogeneous objective (`b = 0`): the minimizer is
//! the right singular vector of the smallest singular value, rescaled so that
//! its entries sum to one.

use nalgebra::DVector;
use tracing::debug;

use crate::domain::{LinearSystem, SolverMethod};
use crate::error::InitError;

/// Largest `σ_min / σ_max` still treated as a zero singular value.
const SINGULAR_RTOL: f64 = 1e-8;

pub fn solve(system: &LinearSystem) -> Result<(DVector<f64>, usize), InitError> {
    let fail = |reason: String| InitError::convergence(SolverMethod::NullSpace, reason);

    if system.b.iter().any(|v| *v != 0.0) {
        return Err(fail("objective offset b is non-zero".into()));
    }

    let svd = system.a.clone().svd(false, true);
    let v_t = svd
        .v_t
        .as_ref()
        .ok_or_else(|| fail("SVD did not produce right singular vectors".into()))?;

    let (idx, sigma_min) = svd
        .singular_values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, s)| if s < best.1 { (i, s) } else { best });
    let sigma_max = svd.singular_values.max();
    debug!(sigma_min, sigma_max, "singular value range of A");

    if sigma_min > SINGULAR_RTOL * sigma_max.max(1.0) {
        return Err(fail(format!(
            "A is not singular (smallest singular value {sigma_min:.3e})"
        )));
    }

    let v: DVector<f64> = v_t.row(idx).transpose();
    let total = v.sum();
    if total.abs() < f64::EPSILON.sqrt() {
        return Err(fail(format!("null vector sums to {total:.3e}, cannot normalize")));
    }

    Ok((v / total, 1))
}
