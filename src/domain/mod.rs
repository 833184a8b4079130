//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - wavelet identifiers (`WaveletId`)
//! - configuration enums (`SystemVariant`, `SolverMethod`) and `SolveConfig`
//! - the interior linear system (`LinearSystem`)
//! - solver outputs (`Solution`, `InitialValues`)

pub mod types;

pub use types::*;
