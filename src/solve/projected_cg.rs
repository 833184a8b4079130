//! Iterative minimizer on the constraint plane.
//!
//! Conjugate gradient applied to the normal equations `AᵀA·x = Aᵀb`, with every
//! gradient projected onto `{v : Σv = 0}` so the iterates never leave the plane
//! `Σx = 1`. The start is the zero vector projected onto the plane. On the
//! plane the reduced Hessian is positive definite whenever the null vector of
//! `A` does not sum to zero, so the iteration finishes in about `M` steps.

use nalgebra::DVector;
use tracing::trace;

use super::project_onto_plane;
use crate::domain::{LinearSystem, SolverMethod};
use crate::error::InitError;

/// Returns the iterate and the number of CG steps taken.
///
/// Stops once the projected gradient norm drops below
/// `tolerance · max(1, initial norm)`.
pub fn solve(
    system: &LinearSystem,
    tolerance: f64,
    max_iterations: usize,
) -> Result<(DVector<f64>, usize), InitError> {
    let a = &system.a;
    let m = system.dim();

    let mut x = DVector::from_element(m, 1.0 / m as f64);
    // Negative projected half-gradient of ‖A·x − b‖².
    let mut r = -project_onto_plane(&(a.transpose() * (a * &x - &system.b)));
    let mut p = r.clone();
    let mut rr = r.norm_squared();
    let stop = tolerance * rr.sqrt().max(1.0);

    for iteration in 0..max_iterations {
        if rr.sqrt() <= stop {
            return Ok((x, iteration));
        }

        let q = a.transpose() * (a * &p);
        let curvature = p.dot(&q);
        if !(curvature > 0.0) {
            return Err(InitError::convergence(
                SolverMethod::ProjectedCg,
                format!("non-positive curvature {curvature:.3e} at step {iteration}"),
            ));
        }

        let alpha = rr / curvature;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &project_onto_plane(&q), 1.0);

        let rr_next = r.norm_squared();
        p = &r + &p * (rr_next / rr);
        rr = rr_next;
        trace!(iteration, gradient = rr.sqrt(), "cg step");
    }

    if rr.sqrt() <= stop {
        return Ok((x, max_iterations));
    }
    Err(InitError::convergence(
        SolverMethod::ProjectedCg,
        format!(
            "no convergence after {max_iterations} iterations (gradient norm {:.3e})",
            rr.sqrt()
        ),
    ))
}
