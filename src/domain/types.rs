//! Shared domain types.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

use crate::error::InitError;

/// Lowest Daubechies order in the coefficient table (`db2`, 4 taps).
pub const MIN_ORDER: usize = 2;
/// Highest Daubechies order in the coefficient table (`db25`, 50 taps).
pub const MAX_ORDER: usize = 25;

/// Identifier of a Daubechies wavelet, `db<N>` with `N` vanishing moments.
///
/// Parsing is case-insensitive and only accepts orders in
/// `MIN_ORDER..=MAX_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveletId {
    order: usize,
}

impl WaveletId {
    pub fn daubechies(order: usize) -> Result<Self, InitError> {
        if (MIN_ORDER..=MAX_ORDER).contains(&order) {
            Ok(Self { order })
        } else {
            Err(InitError::UnknownWavelet(format!("db{order}")))
        }
    }

    /// Number of vanishing moments.
    pub fn order(self) -> usize {
        self.order
    }

    /// Number of scaling taps (`2 * order`).
    pub fn filter_len(self) -> usize {
        2 * self.order
    }

    /// Every identifier in the table, in ascending order.
    pub fn all() -> impl Iterator<Item = WaveletId> {
        (MIN_ORDER..=MAX_ORDER).map(|order| WaveletId { order })
    }
}

impl FromStr for WaveletId {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || InitError::UnknownWavelet(s.to_string());
        let lower = s.trim().to_ascii_lowercase();
        let digits = lower.strip_prefix("db").ok_or_else(unknown)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unknown());
        }
        let order: usize = digits.parse().map_err(|_| unknown())?;
        WaveletId::daubechies(order).map_err(|_| unknown())
    }
}

impl fmt::Display for WaveletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "db{}", self.order)
    }
}

/// How the interior system is dimensioned.
///
/// Both variants agree for every even-length filter; `General` additionally
/// carries the (zero) offset vector `b` in its objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SystemVariant {
    /// `M = L - 2`, rows and columns `1..L-1`.
    #[default]
    Even,
    /// `N = L / 2`, `M = 2N - 2`, rows and columns `1..2N-1`.
    General,
}

impl SystemVariant {
    pub fn display_name(self) -> &'static str {
        match self {
            SystemVariant::Even => "even",
            SystemVariant::General => "general",
        }
    }

    /// Interior dimension `M` for a filter of `filter_len` taps.
    pub fn interior_dim(self, filter_len: usize) -> usize {
        match self {
            SystemVariant::Even => filter_len.saturating_sub(2),
            SystemVariant::General => (2 * (filter_len / 2)).saturating_sub(2),
        }
    }
}

impl fmt::Display for SystemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which constrained minimizer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SolverMethod {
    /// Eliminate `sum(x) = 1` and solve the reduced least squares problem by SVD.
    #[default]
    Direct,
    /// Null vector of `A` (smallest singular value) rescaled to sum to one.
    NullSpace,
    /// Conjugate gradient on the constraint plane, starting from the uniform vector.
    ProjectedCg,
}

impl SolverMethod {
    pub fn display_name(self) -> &'static str {
        match self {
            SolverMethod::Direct => "direct",
            SolverMethod::NullSpace => "null-space",
            SolverMethod::ProjectedCg => "projected-cg",
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Solver knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub method: SolverMethod,
    /// Stopping tolerance on the projected gradient (`projected-cg`).
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Accepted `|sum(x) - 1|` for any method.
    pub constraint_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: SolverMethod::Direct,
            tolerance: 1e-10,
            max_iterations: 1000,
            constraint_tolerance: 1e-8,
        }
    }
}

/// Report knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Decimal places for matrix and vector entries.
    pub precision: usize,
    /// Append the normalized scaling taps and the wavelet taps.
    pub show_filters: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            precision: 8,
            show_filters: false,
        }
    }
}

impl ReportOptions {
    /// Largest precision that still carries information for an `f64`.
    pub const MAX_PRECISION: usize = 17;

    pub fn validate(&self) -> Result<(), InitError> {
        validate_precision(self.precision)
    }
}

/// Reject precisions beyond [`ReportOptions::MAX_PRECISION`].
pub fn validate_precision(precision: usize) -> Result<(), InitError> {
    if precision > ReportOptions::MAX_PRECISION {
        return Err(InitError::InvalidConfig(format!(
            "precision must be at most {}, got {precision}",
            ReportOptions::MAX_PRECISION
        )));
    }
    Ok(())
}

/// Fully resolved configuration of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveConfig {
    pub wavelet: WaveletId,
    pub variant: SystemVariant,
    pub solver: SolverOptions,
    pub report: ReportOptions,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            wavelet: WaveletId { order: 4 },
            variant: SystemVariant::Even,
            solver: SolverOptions::default(),
            report: ReportOptions::default(),
        }
    }
}

impl SolveConfig {
    /// Reject values the solver cannot work with.
    pub fn validate(&self) -> Result<(), InitError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(InitError::InvalidConfig(format!("{name} must be positive and finite, got {v}")))
            }
        };
        positive("tolerance", self.solver.tolerance)?;
        positive("constraint_tolerance", self.solver.constraint_tolerance)?;
        if self.solver.max_iterations == 0 {
            return Err(InitError::InvalidConfig("max_iterations must be at least 1".into()));
        }
        self.report.validate()
    }
}

/// Interior system `A·x = b` for one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub variant: SystemVariant,
    /// Number of taps `L` of the filter the system was built from.
    pub filter_len: usize,
    /// Normalized taps `c` (sum 2) the matrix was built from.
    pub coefficients: Vec<f64>,
    /// Down-sampling operator restricted to the interior, minus the identity.
    pub a: DMatrix<f64>,
    /// Objective offset; always zero.
    pub b: DVector<f64>,
}

impl LinearSystem {
    /// Interior dimension `M`.
    pub fn dim(&self) -> usize {
        self.a.nrows()
    }
}

/// Output of a constrained solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub x: DVector<f64>,
    /// `‖A·x − b‖`.
    pub residual_norm: f64,
    /// `|sum(x) − 1|`.
    pub constraint_violation: f64,
    pub iterations: usize,
    pub method: SolverMethod,
}

impl Solution {
    pub fn sum(&self) -> f64 {
        self.x.sum()
    }
}

/// Scaling-function values at the integers, the seed of the cascade algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialValues {
    pub wavelet: WaveletId,
    pub solution: Solution,
}

impl InitialValues {
    /// Interior values `φ(1..L-1)`.
    pub fn interior(&self) -> &[f64] {
        self.solution.x.as_slice()
    }

    /// `φ(0..L)` with the compact-support boundary zeros in place.
    pub fn padded(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.solution.x.len() + 2);
        out.push(0.0);
        out.extend(self.solution.x.iter().copied());
        out.push(0.0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifiers_case_insensitively() {
        assert_eq!("db4".parse::<WaveletId>().unwrap().order(), 4);
        assert_eq!("DB12".parse::<WaveletId>().unwrap().order(), 12);
        assert_eq!(" db2 ".parse::<WaveletId>().unwrap().filter_len(), 4);
        assert_eq!("db25".parse::<WaveletId>().unwrap().filter_len(), 50);
    }

    #[test]
    fn rejects_unknown_identifiers() {
        for name in ["db1", "db26", "db", "haar", "sym4", "", "db+4", "db04x"] {
            let err = name.parse::<WaveletId>().unwrap_err();
            assert!(
                matches!(err, InitError::UnknownWavelet(ref s) if s == name),
                "{name}: {err:?}"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for id in WaveletId::all() {
            assert_eq!(id.to_string().parse::<WaveletId>().unwrap(), id);
        }
        assert_eq!(WaveletId::all().count(), MAX_ORDER - MIN_ORDER + 1);
    }

    #[test]
    fn interior_dims_agree_for_even_lengths() {
        for len in (4..=50).step_by(2) {
            assert_eq!(SystemVariant::Even.interior_dim(len), len - 2);
            assert_eq!(SystemVariant::General.interior_dim(len), len - 2);
        }
        // Odd lengths are rejected before this is reached; General rounds down.
        assert_eq!(SystemVariant::General.interior_dim(7), 4);
    }

    #[test]
    fn default_config_is_valid() {
        let config = SolveConfig::default();
        assert_eq!(config.wavelet.to_string(), "db4");
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_knobs() {
        let mut config = SolveConfig::default();
        config.solver.tolerance = 0.0;
        assert!(matches!(config.validate(), Err(InitError::InvalidConfig(_))));

        let mut config = SolveConfig::default();
        config.solver.max_iterations = 0;
        assert!(matches!(config.validate(), Err(InitError::InvalidConfig(_))));

        let mut config = SolveConfig::default();
        config.solver.constraint_tolerance = f64::NAN;
        assert!(matches!(config.validate(), Err(InitError::InvalidConfig(_))));
    }

    #[test]
    fn precision_is_bounded() {
        assert!(validate_precision(ReportOptions::MAX_PRECISION).is_ok());
        for precision in [18, 70_000, usize::MAX] {
            let err = validate_precision(precision).unwrap_err();
            assert!(matches!(err, InitError::InvalidConfig(_)), "{precision}");
        }

        let mut config = SolveConfig::default();
        config.report.precision = 18;
        assert!(matches!(config.validate(), Err(InitError::InvalidConfig(_))));
    }

    #[test]
    fn padded_adds_boundary_zeros() {
        let values = InitialValues {
            wavelet: WaveletId::daubechies(2).unwrap(),
            solution: Solution {
                x: DVector::from_vec(vec![1.25, -0.25]),
                residual_norm: 0.0,
                constraint_violation: 0.0,
                iterations: 1,
                method: SolverMethod::Direct,
            },
        };
        assert_eq!(values.padded(), vec![0.0, 1.25, -0.25, 0.0]);
        assert_eq!(values.interior(), &[1.25, -0.25]);
        assert!((values.solution.sum() - 1.0).abs() < 1e-15);
    }
}
