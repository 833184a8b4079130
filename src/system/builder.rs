//! Build `A = T − I`, where `T[row][col] = c[2·row − col]` is the down-sampling
//! operator of the two-scale relation
//!
//! ```text
//! φ(n) = Σ_k c_k · φ(2n − k)
//! ```
//!
//! restricted to the interior integers `1..L-1`. The boundary values `φ(0)` and
//! `φ(L-1)` vanish for a compactly supported scaling function, so their rows
//! and columns are dropped.
//!
//! Every column of `T` sums to `Σ c_even = Σ c_odd = 1`, hence `1ᵀ·A = 0` and
//! `A` is singular for any filter with a zero at `ω = π`.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{LinearSystem, SystemVariant};
use crate::error::InitError;

/// Shortest filter with a non-empty interior.
pub const MIN_FILTER_LEN: usize = 4;

/// Check that `raw` can define an interior system.
pub fn validate_filter(raw: &[f64]) -> Result<(), InitError> {
    let len = raw.len();
    if len < MIN_FILTER_LEN {
        return Err(InitError::invalid_filter(
            len,
            format!("need at least {MIN_FILTER_LEN} taps"),
        ));
    }
    if len % 2 != 0 {
        return Err(InitError::invalid_filter(len, "length must be even"));
    }
    if let Some(i) = raw.iter().position(|v| !v.is_finite()) {
        return Err(InitError::invalid_filter(len, format!("tap {i} is not finite")));
    }
    let sum: f64 = raw.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return Err(InitError::invalid_filter(len, format!("taps sum to {sum}")));
    }
    Ok(())
}

/// Rescale the taps by dividing by `1 / Σraw`, i.e. multiplying by the sum.
///
/// This is not the usual "divide by the sum". It maps the orthonormal
/// convention (`Σh = √2`) onto the two-scale convention (`Σc = 2`), which is
/// what the table provides; other inputs end up with `Σc = (Σraw)²`.
pub fn normalize_filter(raw: &[f64]) -> Result<Vec<f64>, InitError> {
    validate_filter(raw)?;
    let sum: f64 = raw.iter().sum();
    Ok(raw.iter().map(|v| v / (1.0 / sum)).collect())
}

/// Build the interior system for `raw` taps.
pub fn build_system(raw: &[f64], variant: SystemVariant) -> Result<LinearSystem, InitError> {
    let c = normalize_filter(raw)?;
    let m = variant.interior_dim(c.len());

    let t = DMatrix::from_fn(m, m, |r, col| map_index(&c, r + 1, col + 1));
    let a = t - DMatrix::<f64>::identity(m, m);
    let b = DVector::zeros(m);

    debug!(variant = %variant, filter_len = c.len(), dim = m, "built interior system");
    debug!("A = {a}");

    Ok(LinearSystem {
        variant,
        filter_len: c.len(),
        coefficients: c,
        a,
        b,
    })
}

/// `c[2·row − col]`, or zero outside the filter support.
fn map_index(c: &[f64], row: usize, col: usize) -> f64 {
    (2 * row)
        .checked_sub(col)
        .and_then(|idx| c.get(idx))
        .copied()
        .unwrap_or(0.0)
}
