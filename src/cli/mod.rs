//! Command-line parsing for the cascade seed calculator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! linear algebra. Every option is optional here so that unset flags fall back
//! to the configuration file and then to the built-in defaults.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{SolverMethod, SystemVariant};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "daub",
    version,
    about = "Integer-point initial values of Daubechies scaling functions"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// TOML configuration file (defaults to ./daub.toml when present).
    #[arg(short, long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve for one wavelet and print the matrix, the initial values and their sum.
    Solve(SolveArgs),
    /// Solve every supported wavelet (db2 .. db25) and print a summary table.
    Sweep(SweepArgs),
    /// Print the scaling, normalized and wavelet coefficients of one wavelet.
    Filters(FiltersArgs),
}

/// Options shared by everything that builds and solves a system.
#[derive(Debug, Args, Clone, Default)]
pub struct SolverArgs {
    /// System layout (`even`: M = L-2, `general`: M = 2N-2 with N = L/2).
    #[arg(long, value_enum)]
    pub variant: Option<SystemVariant>,

    /// Constrained minimizer.
    #[arg(short, long, value_enum)]
    pub method: Option<SolverMethod>,

    /// Projected-gradient stopping tolerance (projected-cg).
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Iteration limit (projected-cg).
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Accepted |sum(x) - 1|.
    #[arg(long)]
    pub constraint_tolerance: Option<f64>,
}

/// Options for `solve`.
#[derive(Debug, Args, Clone, Default)]
pub struct SolveArgs {
    /// Wavelet identifier, db2 .. db25.
    #[arg(short, long, env = "DAUB_WAVELET")]
    pub wavelet: Option<String>,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Decimal places in the report.
    #[arg(short, long)]
    pub precision: Option<usize>,

    /// Append the scaling and wavelet coefficients to the report.
    #[arg(long)]
    pub show_filters: bool,
}

/// Options for `sweep`.
#[derive(Debug, Args, Clone, Default)]
pub struct SweepArgs {
    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Options for `filters`.
#[derive(Debug, Args, Clone, Default)]
pub struct FiltersArgs {
    /// Wavelet identifier, db2 .. db25.
    #[arg(short, long, env = "DAUB_WAVELET")]
    pub wavelet: Option<String>,

    /// Decimal places.
    #[arg(short, long)]
    pub precision: Option<usize>,
}
