//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - merges CLI flags, environment and the config file into a `SolveConfig`
//! - runs the pipeline and prints the report

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command, FiltersArgs, SolveArgs, SolverArgs, SweepArgs};
use crate::data::{CoefficientProvider, DaubechiesTable};
use crate::domain::{
    ReportOptions, SolveConfig, SolverOptions, SystemVariant, WaveletId, validate_precision,
};
use crate::error::{AppError, InitError};
use crate::io::{ConfigFile, load_config};
use crate::report::{format_filters, format_solution, format_system, format_sweep};
use crate::system::normalize_filter;

pub mod pipeline;

/// Entry point for the `daub` binary.
pub fn run() -> Result<(), AppError> {
    // `DAUB_WAVELET` may come from a `.env` file; it must be loaded before clap
    // reads the environment.
    let _ = dotenvy::dotenv();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    crate::logging::init(cli.verbose);

    let file = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Solve(args) => handle_solve(&args, &file),
        Command::Sweep(args) => handle_sweep(&args, &file),
        Command::Filters(args) => handle_filters(&args, &file),
    }
}

fn handle_solve(args: &SolveArgs, file: &ConfigFile) -> Result<(), AppError> {
    let config = solve_config(args, file)?;
    debug!(?config, "resolved configuration");

    solve_and_report(&DaubechiesTable::new(), &config, &mut |text| print!("{text}"))?;
    Ok(())
}

/// Emit `A`, solve, then emit the rest of the report.
///
/// The matrix is emitted before the solve starts, so it is still shown when the
/// solve fails.
pub fn solve_and_report<P: CoefficientProvider + ?Sized>(
    provider: &P,
    config: &SolveConfig,
    emit: &mut dyn FnMut(&str),
) -> Result<(), InitError> {
    let prepared = pipeline::prepare_with(provider, config)?;
    emit(&format_system(&prepared.system, config.report.precision));

    let run = pipeline::solve_prepared(prepared, &config.solver)?;
    emit(&format_solution(
        &run.values,
        &run.system,
        &run.raw,
        run.reference_deviation,
        &config.report,
    ));
    Ok(())
}

fn handle_sweep(args: &SweepArgs, file: &ConfigFile) -> Result<(), AppError> {
    let variant = resolve_variant(&args.solver, file);
    let opts = solver_options(&args.solver, file)?;

    let rows = pipeline::run_sweep(variant, &opts);
    print!("{}", format_sweep(&rows));

    // The table is printed either way; a failed row still fails the command.
    if let Some(err) = rows.iter().find_map(|row| row.outcome.as_ref().err()) {
        return Err(AppError::from(err.clone()));
    }
    Ok(())
}

fn handle_filters(args: &FiltersArgs, file: &ConfigFile) -> Result<(), AppError> {
    let id = resolve_wavelet(args.wavelet.as_deref(), file)?;
    let precision = filters_precision(args, file)?;

    let raw = DaubechiesTable::new().scaling_coefficients(id)?;
    let normalized = normalize_filter(&raw)?;
    print!("{}", format_filters(id, &raw, &normalized, precision));
    Ok(())
}

fn filters_precision(args: &FiltersArgs, file: &ConfigFile) -> Result<usize, InitError> {
    let precision = args
        .precision
        .or(file.report.precision)
        .unwrap_or(ReportOptions::default().precision);
    validate_precision(precision)?;
    Ok(precision)
}

/// Merge `solve` flags over the config file over the defaults.
pub fn solve_config(args: &SolveArgs, file: &ConfigFile) -> Result<SolveConfig, InitError> {
    let defaults = SolveConfig::default();
    let config = SolveConfig {
        wavelet: resolve_wavelet(args.wavelet.as_deref(), file)?,
        variant: resolve_variant(&args.solver, file),
        solver: solver_options(&args.solver, file)?,
        report: ReportOptions {
            precision: args
                .precision
                .or(file.report.precision)
                .unwrap_or(defaults.report.precision),
            show_filters: args.show_filters || file.report.show_filters.unwrap_or(false),
        },
    };
    config.validate()?;
    Ok(config)
}

fn resolve_wavelet(arg: Option<&str>, file: &ConfigFile) -> Result<WaveletId, InitError> {
    match arg.or(file.wavelet.as_deref()) {
        Some(name) => name.parse(),
        None => Ok(SolveConfig::default().wavelet),
    }
}

fn resolve_variant(args: &SolverArgs, file: &ConfigFile) -> SystemVariant {
    args.variant.or(file.variant).unwrap_or_default()
}

fn solver_options(args: &SolverArgs, file: &ConfigFile) -> Result<SolverOptions, InitError> {
    let defaults = SolverOptions::default();
    let opts = SolverOptions {
        method: args.method.or(file.solver.method).unwrap_or(defaults.method),
        tolerance: args
            .tolerance
            .or(file.solver.tolerance)
            .unwrap_or(defaults.tolerance),
        max_iterations: args
            .max_iterations
            .or(file.solver.max_iterations)
            .unwrap_or(defaults.max_iterations),
        constraint_tolerance: args
            .constraint_tolerance
            .or(file.solver.constraint_tolerance)
            .unwrap_or(defaults.constraint_tolerance),
    };
    SolveConfig {
        solver: opts.clone(),
        ..SolveConfig::default()
    }
    .validate()?;
    Ok(opts)
}

/// Rewrite argv so `daub` defaults to `daub solve`.
///
/// Leading global flags (`-v`, `--config <path>`) are skipped before looking
/// for a subcommand, so `daub -v sweep` stays as is while `daub -v` and
/// `daub -c daub.toml -w db6` get `solve` inserted after them. Top-level
/// help/version pass through untouched.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let mut pos = 1;
    while let Some(arg) = argv.get(pos).map(String::as_str) {
        pos += match arg {
            "-c" | "--config" => 2,
            _ if is_verbose_flag(arg) || is_inline_config(arg) => 1,
            _ => break,
        };
    }

    let insert_solve = match argv.get(pos).map(String::as_str) {
        None => true,
        Some("-h" | "--help" | "-V" | "--version" | "help") => false,
        Some("solve" | "sweep" | "filters") => false,
        Some(first) => first.starts_with('-'),
    };
    if insert_solve {
        argv.insert(pos.min(argv.len()), "solve".to_string());
    }
    argv
}

/// `--verbose`, `-v`, `-vv`, ...
fn is_verbose_flag(arg: &str) -> bool {
    arg == "--verbose"
        || arg
            .strip_prefix('-')
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b == b'v'))
}

/// `--config=path` or `-cpath`.
fn is_inline_config(arg: &str) -> bool {
    arg.starts_with("--config=") || (arg.starts_with("-c") && arg.len() > 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolverMethod;
    use crate::io::parse_config;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_solve() {
        assert_eq!(rewrite_args(argv(&["daub"])), argv(&["daub", "solve"]));
        assert_eq!(
            rewrite_args(argv(&["daub", "-w", "db6"])),
            argv(&["daub", "solve", "-w", "db6"])
        );
        assert_eq!(rewrite_args(argv(&["daub", "--help"])), argv(&["daub", "--help"]));
        assert_eq!(rewrite_args(argv(&["daub", "sweep"])), argv(&["daub", "sweep"]));
    }

    #[test]
    fn global_flags_before_subcommand_are_kept() {
        let cli = Cli::try_parse_from(rewrite_args(argv(&["daub", "-v", "sweep"]))).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Command::Sweep(_)));

        let rewritten = rewrite_args(argv(&["daub", "--config", "x.toml", "filters"]));
        assert_eq!(rewritten, argv(&["daub", "--config", "x.toml", "filters"]));
        let cli = Cli::try_parse_from(rewritten).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
        assert!(matches!(cli.command, Command::Filters(_)));

        let cli = Cli::try_parse_from(rewrite_args(argv(&["daub", "-vv", "solve"]))).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Solve(_)));

        let cli = Cli::try_parse_from(rewrite_args(argv(&["daub", "--config=x.toml", "sweep"]))).unwrap();
        assert!(matches!(cli.command, Command::Sweep(_)));
    }

    #[test]
    fn global_flags_alone_still_default_to_solve() {
        assert_eq!(rewrite_args(argv(&["daub", "-v"])), argv(&["daub", "-v", "solve"]));

        let rewritten = rewrite_args(argv(&["daub", "-c", "x.toml", "-w", "db6"]));
        assert_eq!(rewritten, argv(&["daub", "-c", "x.toml", "solve", "-w", "db6"]));
        let cli = Cli::try_parse_from(rewritten).unwrap();
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.wavelet.as_deref(), Some("db6"));
    }

    #[test]
    fn filters_precision_is_validated() {
        let args = FiltersArgs {
            wavelet: None,
            precision: Some(70_000),
        };
        let err = filters_precision(&args, &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, InitError::InvalidConfig(_)));

        let file = parse_config("[report]\nprecision = 40\n", "inline").unwrap();
        let err = filters_precision(&FiltersArgs::default(), &file).unwrap_err();
        assert!(matches!(err, InitError::InvalidConfig(_)));
        assert_eq!(AppError::from(err).exit_code(), 2);

        assert_eq!(filters_precision(&FiltersArgs::default(), &ConfigFile::default()).unwrap(), 8);
    }

    #[test]
    fn matrix_is_emitted_before_a_failed_solve() {
        let config = SolveConfig {
            wavelet: "db10".parse().unwrap(),
            solver: SolverOptions {
                method: SolverMethod::ProjectedCg,
                max_iterations: 2,
                ..SolverOptions::default()
            },
            ..SolveConfig::default()
        };
        let mut out = String::new();
        let err = solve_and_report(&DaubechiesTable::new(), &config, &mut |text| out.push_str(text))
            .unwrap_err();

        assert!(matches!(err, InitError::Convergence { .. }));
        assert!(out.starts_with("A:\n[["));
        assert_eq!(out.matches('\n').count(), 18 + 2);
        assert!(!out.contains("initial values"));
    }

    #[test]
    fn successful_solve_emits_the_full_report() {
        let config = SolveConfig::default();
        let mut out = String::new();
        solve_and_report(&DaubechiesTable::new(), &config, &mut |text| out.push_str(text)).unwrap();

        let a_pos = out.find("A:\n[[").unwrap();
        let values_pos = out.find("db4 initial values: [").unwrap();
        let sum_pos = out.find("sum of initial values: ").unwrap();
        assert!(a_pos < values_pos && values_pos < sum_pos);
        assert!(out.contains("- max deviation from bundled reference: "));
    }

    #[test]
    fn flags_override_file_over_defaults() {
        let file = parse_config(
            "wavelet = \"db5\"\nvariant = \"general\"\n[solver]\nmethod = \"null-space\"\n[report]\nprecision = 3\n",
            "inline",
        )
        .unwrap();

        let config = solve_config(&SolveArgs::default(), &file).unwrap();
        assert_eq!(config.wavelet.to_string(), "db5");
        assert_eq!(config.variant, SystemVariant::General);
        assert_eq!(config.solver.method, SolverMethod::NullSpace);
        assert_eq!(config.report.precision, 3);
        assert_eq!(config.solver.max_iterations, SolverOptions::default().max_iterations);

        let args = SolveArgs {
            wavelet: Some("db7".into()),
            solver: SolverArgs {
                method: Some(SolverMethod::Direct),
                ..SolverArgs::default()
            },
            precision: Some(10),
            show_filters: true,
        };
        let config = solve_config(&args, &file).unwrap();
        assert_eq!(config.wavelet.to_string(), "db7");
        assert_eq!(config.variant, SystemVariant::General);
        assert_eq!(config.solver.method, SolverMethod::Direct);
        assert_eq!(config.report.precision, 10);
        assert!(config.report.show_filters);
    }

    #[test]
    fn defaults_without_file() {
        let config = solve_config(&SolveArgs::default(), &ConfigFile::default()).unwrap();
        assert_eq!(config, SolveConfig::default());
    }

    #[test]
    fn bad_values_are_rejected() {
        let args = SolveArgs {
            wavelet: Some("db30".into()),
            ..SolveArgs::default()
        };
        let err = solve_config(&args, &ConfigFile::default()).unwrap_err();
        assert_eq!(err, InitError::UnknownWavelet("db30".into()));

        let args = SolveArgs {
            solver: SolverArgs {
                tolerance: Some(-1.0),
                ..SolverArgs::default()
            },
            ..SolveArgs::default()
        };
        let err = solve_config(&args, &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, InitError::InvalidConfig(_)));
    }
}
