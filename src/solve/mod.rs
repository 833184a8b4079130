//! Constrained minimization of `‖A·x − b‖²` subject to `Σx = 1`.
//!
//! `A` is singular by construction, so the objective alone does not pin down a
//! point; the constraint selects the normalized fixed point. Each method
//! returns a raw vector, and [`solve`] applies one acceptance check to all of
//! them.

pub mod direct;
pub mod null_space;
pub mod projected_cg;

use nalgebra::DVector;
use tracing::{debug, info};

use crate::domain::{LinearSystem, Solution, SolverMethod, SolverOptions};
use crate::error::InitError;

/// Run the configured method and verify the result.
pub fn solve(system: &LinearSystem, opts: &SolverOptions) -> Result<Solution, InitError> {
    if system.dim() == 0 {
        return Err(InitError::convergence(opts.method, "empty system"));
    }

    let (x, iterations) = match opts.method {
        SolverMethod::Direct => direct::solve(system)?,
        SolverMethod::NullSpace => null_space::solve(system)?,
        SolverMethod::ProjectedCg => projected_cg::solve(system, opts.tolerance, opts.max_iterations)?,
    };

    let solution = accept(system, x, iterations, opts)?;
    info!(
        method = %opts.method,
        dim = system.dim(),
        iterations = solution.iterations,
        residual = solution.residual_norm,
        "solved interior system"
    );
    Ok(solution)
}

fn accept(
    system: &LinearSystem,
    x: DVector<f64>,
    iterations: usize,
    opts: &SolverOptions,
) -> Result<Solution, InitError> {
    if x.len() != system.dim() {
        return Err(InitError::convergence(
            opts.method,
            format!("solution has length {}, expected {}", x.len(), system.dim()),
        ));
    }
    if !x.iter().all(|v| v.is_finite()) {
        return Err(InitError::convergence(opts.method, "solution has non-finite entries"));
    }

    let constraint_violation = (x.sum() - 1.0).abs();
    if constraint_violation > opts.constraint_tolerance {
        return Err(InitError::convergence(
            opts.method,
            format!(
                "sum(x) misses 1 by {constraint_violation:.3e} (tolerance {:.1e})",
                opts.constraint_tolerance
            ),
        ));
    }

    let residual_norm = (&system.a * &x - &system.b).norm();
    debug!(constraint_violation, residual_norm, "accepted solution");

    Ok(Solution {
        x,
        residual_norm,
        constraint_violation,
        iterations,
        method: opts.method,
    })
}

/// Orthogonal projection onto `{v : Σv = 0}`.
pub(crate) fn project_onto_plane(v: &DVector<f64>) -> DVector<f64> {
    let mean = v.mean();
    v.map(|e| e - mean)
}
