//! Evaluation of reference cases and textual summaries.
//!
//! Each case is evaluated on its own: a failure is logged and recorded in the
//! outcome, and the remaining cases still run.

use std::fmt::Write as _;
use std::io::{self, Write};

use tracing::{info, warn};

use crate::catalog::ReferenceCase;
use crate::circuits::analysis::{analyze, Equivalent, SolveMethod};
use crate::circuits::network::ResistorNetwork;
use crate::config::ReducerConfig;
use crate::errors::NetworkResult;
use crate::math::Scalar;

/// Relative deviation above which a case with an expected value is flagged.
pub const DEFAULT_RELATIVE_TOLERANCE: Scalar = 1.0e-6;

/// Evaluation result for one reference case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    /// Case name.
    pub name: String,
    /// Source terminal.
    pub a: String,
    /// Sink terminal.
    pub b: String,
    /// Number of resistors in the input.
    pub resistor_count: usize,
    /// Independently known value, if any.
    pub expected: Option<Scalar>,
    /// Computed equivalent, or the error that stopped this case.
    pub result: NetworkResult<Equivalent>,
}

impl CaseOutcome {
    /// Relative deviation from the expected value, when both exist.
    #[must_use]
    pub fn deviation(&self) -> Option<Scalar> {
        let expected = self.expected?;
        let eq = self.result.as_ref().ok()?;
        Some(((eq.ohms - expected) / expected).abs())
    }

    /// True when the case computed a value within `tolerance` of its expectation
    /// (or computed any value, if no expectation is known).
    #[must_use]
    pub fn passed(&self, tolerance: Scalar) -> bool {
        match (&self.result, self.deviation()) {
            (Err(_), _) => false,
            (Ok(_), Some(dev)) => dev <= tolerance,
            (Ok(_), None) => true,
        }
    }
}

/// Evaluates every case with `config`.
#[must_use]
pub fn evaluate(cases: &[ReferenceCase], config: &ReducerConfig) -> Vec<CaseOutcome> {
    cases
        .iter()
        .map(|case| {
            let result = ResistorNetwork::from_resistors(case.resistors.iter().cloned())
                .and_then(|network| analyze(&network, &case.a, &case.b, config));
            match &result {
                Ok(eq) => info!(
                    case = %case.name,
                    ohms = eq.ohms,
                    method = ?eq.method,
                    steps = eq.steps.len(),
                    "evaluated"
                ),
                Err(err) => warn!(case = %case.name, error = %err, "case failed"),
            }
            CaseOutcome {
                name: case.name.clone(),
                a: case.a.clone(),
                b: case.b.clone(),
                resistor_count: case.resistors.len(),
                expected: case.expected,
                result,
            }
        })
        .collect()
}

fn method_name(method: SolveMethod) -> &'static str {
    match method {
        SolveMethod::SeriesParallel => "series-parallel",
        SolveMethod::Laplacian => "laplacian",
    }
}

/// Writes outcomes as CSV: one row per case, errors in the last column.
pub fn write_summary_csv<W: Write>(mut w: W, outcomes: &[CaseOutcome]) -> io::Result<()> {
    writeln!(w, "case,a,b,resistors,expected_ohms,ohms,method,steps,error")?;
    for o in outcomes {
        let expected = o.expected.map(|e| format!("{e:.12e}")).unwrap_or_default();
        match &o.result {
            Ok(eq) => writeln!(
                w,
                "{},{},{},{},{},{:.12e},{},{},",
                o.name,
                o.a,
                o.b,
                o.resistor_count,
                expected,
                eq.ohms,
                method_name(eq.method),
                eq.steps.len()
            )?,
            Err(err) => writeln!(
                w,
                "{},{},{},{},{},,,,\"{}\"",
                o.name,
                o.a,
                o.b,
                o.resistor_count,
                expected,
                err.to_string().replace('"', "'")
            )?,
        }
    }
    Ok(())
}

/// Renders outcomes as a fixed-width text table.
#[must_use]
pub fn render_table(outcomes: &[CaseOutcome], tolerance: Scalar) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:>5} {:>14} {:>14} {:<16} {}",
        "case", "R", "expected Ω", "computed Ω", "method", "status"
    );
    for o in outcomes {
        let expected = o.expected.map_or_else(|| "-".to_owned(), |e| format!("{e:.6}"));
        let _ = match &o.result {
            Ok(eq) => writeln!(
                out,
                "{:<26} {:>5} {:>14} {:>14.6} {:<16} {}",
                o.name,
                o.resistor_count,
                expected,
                eq.ohms,
                method_name(eq.method),
                if o.passed(tolerance) { "ok" } else { "MISMATCH" }
            ),
            Err(err) => writeln!(
                out,
                "{:<26} {:>5} {:>14} {:>14} {:<16} error: {err}",
                o.name, o.resistor_count, expected, "-", "-"
            ),
        };
    }
    out
}
