//! Reporting: sweep summaries and formatted terminal output.
//!
//! Formatting functions only build strings; `app` decides where they go.

pub mod format;

pub use format::*;

use crate::domain::WaveletId;
use crate::error::InitError;

/// One line of the all-wavelets sweep.
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub wavelet: WaveletId,
    pub filter_len: usize,
    pub dim: usize,
    pub outcome: Result<SweepStats, InitError>,
}

/// Figures of a successful sweep run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepStats {
    pub sum: f64,
    pub residual_norm: f64,
    /// Smallest singular value of `A`.
    pub sigma_min: f64,
    pub iterations: usize,
}
