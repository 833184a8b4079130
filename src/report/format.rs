//! Formatted terminal output.

use nalgebra::DMatrix;

use crate::data::wavelet_filter;
use crate::domain::{InitialValues, LinearSystem, ReportOptions, WaveletId};
use crate::report::SweepRow;

/// Format a matrix as bracketed rows, one per line.
///
/// ```text
/// [[ 0.18301270  0.68301270]
///  [-0.18301270 -0.68301270]]
/// ```
pub fn format_matrix(a: &DMatrix<f64>, precision: usize) -> String {
    if a.nrows() == 0 {
        return "[]".to_string();
    }
    let precision = clamp_precision(precision);
    let width = precision + 4;
    let mut out = String::new();
    for r in 0..a.nrows() {
        out.push_str(if r == 0 { "[[" } else { " [" });
        let cells: Vec<String> = a
            .row(r)
            .iter()
            .map(|v| format!("{v:>width$.precision$}"))
            .collect();
        out.push_str(&cells.join(" "));
        out.push(']');
        if r + 1 == a.nrows() {
            out.push(']');
        } else {
            out.push('\n');
        }
    }
    out
}

/// The system matrix block printed ahead of the solve.
pub fn format_system(system: &LinearSystem, precision: usize) -> String {
    format!("A:\n{}\n\n", format_matrix(&system.a, precision))
}

/// Full report for one wavelet: matrix, initial values, their sum, diagnostics.
pub fn format_solve_report(
    values: &InitialValues,
    system: &LinearSystem,
    raw: &[f64],
    reference_deviation: Option<f64>,
    opts: &ReportOptions,
) -> String {
    let mut out = format_system(system, opts.precision);
    out.push_str(&format_solution(values, system, raw, reference_deviation, opts));
    out
}

/// Everything after the matrix: initial values, their sum, diagnostics.
pub fn format_solution(
    values: &InitialValues,
    system: &LinearSystem,
    raw: &[f64],
    reference_deviation: Option<f64>,
    opts: &ReportOptions,
) -> String {
    let p = clamp_precision(opts.precision);
    let sol = &values.solution;
    let mut out = String::new();

    out.push_str(&format!(
        "{} initial values: {}\n\n",
        values.wavelet,
        fmt_vec(values.interior(), p)
    ));
    out.push_str(&format!("sum of initial values: {:?}\n", sol.sum()));

    out.push_str("\nDiagnostics:\n");
    out.push_str(&format!(
        "- variant: {} (L = {}, M = {})\n",
        system.variant,
        system.filter_len,
        system.dim()
    ));
    out.push_str(&format!(
        "- method: {} (iterations = {})\n",
        sol.method, sol.iterations
    ));
    out.push_str(&format!("- residual |A·x - b|: {:.3e}\n", sol.residual_norm));
    out.push_str(&format!("- constraint violation: {:.3e}\n", sol.constraint_violation));

    let padded = values.padded();
    out.push_str(&format!(
        "- phi(0..{}): {}\n",
        padded.len() - 1,
        fmt_vec(&padded, p)
    ));
    if let Some(dev) = reference_deviation {
        out.push_str(&format!("- max deviation from bundled reference: {dev:.3e}\n"));
    }

    if opts.show_filters {
        out.push('\n');
        out.push_str(&format_filters(values.wavelet, raw, &system.coefficients, p));
    }

    out
}

/// Coefficient listing: raw taps, normalized taps, wavelet taps.
///
/// `normalized` is passed in rather than recomputed so the listing shows the
/// exact taps the system was built from.
pub fn format_filters(id: WaveletId, raw: &[f64], normalized: &[f64], precision: usize) -> String {
    let precision = clamp_precision(precision);
    let sum: f64 = raw.iter().sum();
    let wavelet = wavelet_filter(raw);

    let mut out = String::new();
    out.push_str(&format!(
        "{id} scaling coefficients (sum = {sum:.prec$}):\n",
        prec = precision
    ));
    out.push_str(&fmt_taps("h", raw, precision));
    out.push_str(&format!(
        "\n{id} normalized scaling coefficients (multiplied by sum, sum = {:.prec$}):\n",
        normalized.iter().sum::<f64>(),
        prec = precision
    ));
    out.push_str(&fmt_taps("c", normalized, precision));
    out.push_str(&format!("\n{id} wavelet coefficients (quadrature mirror):\n"));
    out.push_str(&fmt_taps("g", &wavelet, precision));
    out
}

/// Table of the sweep across all wavelets.
pub fn format_sweep(rows: &[SweepRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<8} {:>4} {:>4} {:>20} {:>12} {:>12} {:>6}",
            "wavelet", "L", "M", "sum", "residual", "sigma_min", "iters"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<8} {:-<4} {:-<4} {:-<20} {:-<12} {:-<12} {:-<6}",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for row in rows {
        let line = match &row.outcome {
            Ok(stats) => format!(
                "{:<8} {:>4} {:>4} {:>20.16} {:>12.3e} {:>12.3e} {:>6}",
                row.wavelet.to_string(),
                row.filter_len,
                row.dim,
                stats.sum,
                stats.residual_norm,
                stats.sigma_min,
                stats.iterations
            ),
            Err(err) => format!(
                "{:<8} {:>4} {:>4} error: {err}",
                row.wavelet.to_string(),
                row.filter_len,
                row.dim
            ),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Callers validate precision; this only keeps `format!` in range.
fn clamp_precision(precision: usize) -> usize {
    precision.min(ReportOptions::MAX_PRECISION)
}

fn fmt_vec(v: &[f64], precision: usize) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.precision$}")).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_taps(label: &str, taps: &[f64], precision: usize) -> String {
    let width = precision + 4;
    let index_width = taps.len().saturating_sub(1).to_string().len();
    taps.iter()
        .enumerate()
        .map(|(k, v)| format!("  {label}[{k:>index_width$}] = {v:>width$.precision$}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    use crate::domain::{Solution, SolverMethod, SystemVariant};
    use crate::error::InitError;
    use crate::report::SweepStats;
    use crate::system::build_system;

    fn db2_fixture() -> (InitialValues, LinearSystem, Vec<f64>) {
        let s3 = 3f64.sqrt();
        let x = DVector::from_vec(vec![(1.0 + s3) / 2.0, (1.0 - s3) / 2.0]);
        let raw = crate::data::daubechies_filter(2);
        let system = build_system(&raw, SystemVariant::Even).unwrap();
        let values = InitialValues {
            wavelet: WaveletId::daubechies(2).unwrap(),
            solution: Solution {
                x,
                residual_norm: 1e-16,
                constraint_violation: 0.0,
                iterations: 1,
                method: SolverMethod::Direct,
            },
        };
        (values, system, raw)
    }

    fn system_id() -> WaveletId {
        WaveletId::daubechies(2).unwrap()
    }

    #[test]
    fn matrix_layout() {
        let a = DMatrix::from_row_slice(2, 2, &[0.25, -0.5, 1.0, -1.25]);
        assert_eq!(format_matrix(&a, 2), "[[  0.25  -0.50]\n [  1.00  -1.25]]");
        assert_eq!(format_matrix(&DMatrix::<f64>::zeros(0, 0), 3), "[]");
    }

    #[test]
    fn report_sections_in_order() {
        let (values, system, raw) = db2_fixture();
        let text = format_solve_report(&values, &system, &raw, Some(4.2e-4), &ReportOptions::default());

        let a_pos = text.find("A:\n[[").unwrap();
        let values_pos = text.find("db2 initial values: [1.36602540, -0.36602540]").unwrap();
        let sum_pos = text.find("sum of initial values: ").unwrap();
        let diag_pos = text.find("Diagnostics:").unwrap();
        assert!(a_pos < values_pos && values_pos < sum_pos && sum_pos < diag_pos);

        assert!(text.contains("- variant: even (L = 4, M = 2)"));
        assert!(text.contains("- method: direct (iterations = 1)"));
        assert!(text.contains("- phi(0..3): [0.00000000, 1.36602540, -0.36602540, 0.00000000]"));
        assert!(text.contains("- max deviation from bundled reference: 4.200e-4"));
        assert!(!text.contains("wavelet coefficients"));
    }

    #[test]
    fn report_can_include_filters() {
        let (values, system, raw) = db2_fixture();
        let opts = ReportOptions {
            precision: 5,
            show_filters: true,
        };
        let text = format_solve_report(&values, &system, &raw, None, &opts);
        assert!(text.contains("db2 scaling coefficients (sum = 1.41421):"));
        assert!(text.contains("  h[0] =   0.48296"));
        assert!(text.contains("  c[1] =   1.18301"));
        assert!(text.contains("  g[0] =  -0.12941"));
        assert!(!text.contains("bundled reference"));
    }

    #[test]
    fn filter_listing_shows_the_system_taps() {
        let (_, system, raw) = db2_fixture();
        let text = format_filters(system_id(), &raw, &system.coefficients, 17);
        for (k, c) in system.coefficients.iter().enumerate() {
            assert!(text.contains(&format!("  c[{k}] = {c:>21.17}")), "c[{k}]");
        }
    }

    #[test]
    fn oversized_precision_is_clamped() {
        let (values, system, raw) = db2_fixture();
        let text = format_filters(system_id(), &raw, &system.coefficients, 70_000);
        assert_eq!(text, format_filters(system_id(), &raw, &system.coefficients, 17));

        let opts = ReportOptions {
            precision: usize::MAX,
            show_filters: true,
        };
        let text = format_solve_report(&values, &system, &raw, None, &opts);
        assert!(text.contains("A:\n[["));
    }

    #[test]
    fn system_block_precedes_solution() {
        let (values, system, raw) = db2_fixture();
        let opts = ReportOptions::default();
        let header = format_system(&system, opts.precision);
        assert!(header.starts_with("A:\n[["));
        assert!(header.ends_with("]]\n\n"));
        assert_eq!(
            format_solve_report(&values, &system, &raw, None, &opts),
            header + &format_solution(&values, &system, &raw, None, &opts)
        );
    }

    #[test]
    fn sweep_table_rows() {
        let rows = vec![
            SweepRow {
                wavelet: WaveletId::daubechies(2).unwrap(),
                filter_len: 4,
                dim: 2,
                outcome: Ok(SweepStats {
                    sum: 1.0,
                    residual_norm: 1e-16,
                    sigma_min: 2e-17,
                    iterations: 1,
                }),
            },
            SweepRow {
                wavelet: WaveletId::daubechies(3).unwrap(),
                filter_len: 6,
                dim: 4,
                outcome: Err(InitError::convergence("projected-cg", "iteration limit reached")),
            },
        ];
        let text = format_sweep(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("wavelet"));
        assert!(lines[2].starts_with("db2"));
        assert!(lines[2].contains("1.0000000000000000"));
        assert!(lines[3].contains("error: projected-cg solver failed: iteration limit reached"));
    }
}
