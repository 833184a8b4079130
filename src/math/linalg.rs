//! Dense least squares and conditioning helpers.
//!
//! The constrained problem is reduced to ordinary least squares problems of the
//! form
//!
//! ```text
//! minimize ‖X·β − y‖²
//! ```
//!
//! which we solve through an SVD so that rank-deficient and tall designs are
//! handled the same way as square ones.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no tolerance produces a finite solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Singular values below `tol` are treated as zero; loosen it if the strict
    // solve blows up.
    for &tol in &[1e-13, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Smallest and largest singular values of `a`, in that order.
pub fn singular_value_range(a: &DMatrix<f64>) -> (f64, f64) {
    let values = a.singular_values();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(0.0, f64::max);
    (min, max)
}
