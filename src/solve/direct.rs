//! Constraint elimination.
//!
//! Every feasible point is `x = x0 + Z·y` with `x0 = (1/M)·1`, the projection
//! of the zero initial guess onto the plane, and `Z = [e_j − e_{M−1}]` spanning
//! `{v : Σv = 0}`. The remaining problem
//!
//! ```text
//! minimize ‖(A·Z)·y − (b − A·x0)‖²
//! ```
//!
//! is unconstrained and goes through the SVD least squares solver without
//! squaring the condition number of `A`.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::domain::{LinearSystem, SolverMethod};
use crate::error::InitError;
use crate::math::solve_least_squares;

pub fn solve(system: &LinearSystem) -> Result<(DVector<f64>, usize), InitError> {
    let m = system.dim();
    let x0 = DVector::from_element(m, 1.0 / m as f64);
    if m == 1 {
        return Ok((x0, 0));
    }

    let z = DMatrix::from_fn(m, m - 1, |r, c| {
        if r == c {
            1.0
        } else if r == m - 1 {
            -1.0
        } else {
            0.0
        }
    });
    let az = &system.a * &z;
    let rhs = &system.b - &system.a * &x0;
    trace!("reduced system {}x{}", az.nrows(), az.ncols());

    let y = solve_least_squares(&az, &rhs).ok_or_else(|| {
        InitError::convergence(SolverMethod::Direct, "reduced least squares problem is too ill-conditioned")
    })?;

    Ok((x0 + z * y, 1))
}
