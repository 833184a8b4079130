//! `daub-seed` library crate.
//!
//! Computes the values of a Daubechies scaling function at the integers, the
//! seed vector of the cascade algorithm. The values are the normalized fixed
//! point of the two-scale relation restricted to the interior of the support:
//!
//! ```text
//! minimize ‖A·x − b‖²  subject to  Σx = 1
//! ```
//!
//! The binary (`daub`) is a thin wrapper around this library so that the core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
pub mod solve;
pub mod system;
