//! Daubechies scaling filters.
//!
//! The filters are generated rather than tabulated. For `N` vanishing moments,
//!
//! ```text
//! |H(ω)|² ∝ cos^{2N}(ω/2) · P(sin²(ω/2)),   P(y) = Σ_{k<N} C(N-1+k, k) y^k
//! ```
//!
//! and each root `y` of `P` contributes a reciprocal pair `x, 1/x` through
//! `x + 1/x = 2 − 4y`. Keeping the member with `|x| ≥ 1` for every pair gives
//! the extremal-phase filter with its energy at the front, i.e. the published
//! ordering (`db2 = [0.48296, 0.83652, 0.22414, −0.12941]`).
//!
//! Taps are returned in the orthonormal convention (`Σh = √2`).

use std::collections::BTreeMap;
use std::f64::consts::SQRT_2;

use nalgebra::Complex;
use tracing::debug;

use crate::domain::WaveletId;
use crate::error::InitError;
use crate::math::{binomial, mul_linear, poly_roots};

/// Source of raw scaling coefficients keyed by wavelet identifier.
pub trait CoefficientProvider {
    fn scaling_coefficients(&self, id: WaveletId) -> Result<Vec<f64>, InitError>;

    /// Parse `name` and look it up.
    fn by_name(&self, name: &str) -> Result<Vec<f64>, InitError> {
        let id: WaveletId = name.parse()?;
        self.scaling_coefficients(id)
    }
}

/// Lookup table holding `db2 ..= db25`, generated once at construction.
#[derive(Debug, Clone)]
pub struct DaubechiesTable {
    filters: BTreeMap<WaveletId, Vec<f64>>,
}

impl DaubechiesTable {
    pub fn new() -> Self {
        let filters: BTreeMap<WaveletId, Vec<f64>> = WaveletId::all()
            .map(|id| (id, daubechies_filter(id.order())))
            .collect();
        debug!(count = filters.len(), "generated Daubechies filter table");
        Self { filters }
    }

    pub fn ids(&self) -> impl Iterator<Item = WaveletId> + '_ {
        self.filters.keys().copied()
    }
}

impl Default for DaubechiesTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CoefficientProvider for DaubechiesTable {
    fn scaling_coefficients(&self, id: WaveletId) -> Result<Vec<f64>, InitError> {
        self.filters
            .get(&id)
            .cloned()
            .ok_or_else(|| InitError::UnknownWavelet(id.to_string()))
    }
}

/// Orthonormal extremal-phase scaling filter with `order` vanishing moments
/// (`2 * order` taps).
pub fn daubechies_filter(order: usize) -> Vec<f64> {
    let one = Complex::new(1.0, 0.0);

    let p: Vec<f64> = (0..order).map(|k| binomial(order - 1 + k, k)).collect();

    let mut poly = vec![one];
    for _ in 0..order {
        poly = mul_linear(&poly, one, one);
    }
    for y in poly_roots(&p) {
        poly = mul_linear(&poly, -outer_root(y), one);
    }

    let taps: Vec<f64> = poly.iter().map(|c| c.re).collect();
    let scale = SQRT_2 / taps.iter().sum::<f64>();
    taps.iter().map(|t| t * scale).collect()
}

/// Member of `{x : x + 1/x = 2 − 4y}` with `|x| ≥ 1`.
fn outer_root(y: Complex<f64>) -> Complex<f64> {
    let s = Complex::new(2.0, 0.0) - y * 4.0;
    let d = (s * s - 4.0).sqrt();
    let (plus, minus) = (s + d, s - d);
    if plus.norm() >= minus.norm() {
        plus / 2.0
    } else {
        minus / 2.0
    }
}

/// Wavelet (high-pass) filter by the quadrature-mirror relation: negate the
/// even-indexed taps, then reverse.
pub fn wavelet_filter(scaling: &[f64]) -> Vec<f64> {
    scaling
        .iter()
        .enumerate()
        .map(|(i, h)| if i % 2 == 0 { -h } else { *h })
        .rev()
        .collect()
}
