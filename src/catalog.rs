//! Reference resistor networks with known equivalent resistances.
//!
//! Builders return plain resistor lists so that invalid values surface as
//! errors when a case is evaluated rather than when it is declared.

use crate::circuits::component::Resistor;
use crate::math::Scalar;

/// Label of the source terminal used by every builder.
pub const SOURCE: &str = "A";
/// Label of the sink terminal used by every builder.
pub const SINK: &str = "B";

/// A named network, its terminals, and the value it should reduce to.
#[derive(Debug, Clone)]
pub struct ReferenceCase {
    /// Short identifier shown in reports.
    pub name: String,
    /// Resistors making up the network.
    pub resistors: Vec<Resistor>,
    /// Source terminal.
    pub a: String,
    /// Sink terminal.
    pub b: String,
    /// Independently known equivalent resistance, if any.
    pub expected: Option<Scalar>,
}

impl ReferenceCase {
    /// Case measured between [`SOURCE`] and [`SINK`].
    #[must_use]
    pub fn new(name: impl Into<String>, resistors: Vec<Resistor>, expected: Option<Scalar>) -> Self {
        Self {
            name: name.into(),
            resistors,
            a: SOURCE.to_owned(),
            b: SINK.to_owned(),
            expected,
        }
    }
}

/// Resistors chained `A – N1 – … – B`.
#[must_use]
pub fn series_chain(values: &[Scalar]) -> Vec<Resistor> {
    let label = |i: usize| match i {
        0 => SOURCE.to_owned(),
        i if i == values.len() => SINK.to_owned(),
        i => format!("N{i}"),
    };
    values
        .iter()
        .enumerate()
        .map(|(i, &r)| Resistor::new(format!("R{}", i + 1), label(i), label(i + 1), r))
        .collect()
}

/// Resistors all connected directly between `A` and `B`.
#[must_use]
pub fn parallel_bank(values: &[Scalar]) -> Vec<Resistor> {
    values
        .iter()
        .enumerate()
        .map(|(i, &r)| Resistor::new(format!("R{}", i + 1), SOURCE, SINK, r))
        .collect()
}

/// Wheatstone bridge `A–C`, `C–B`, `A–D`, `D–B` with the bridging arm `C–D`.
#[must_use]
pub fn wheatstone_bridge(r_ac: Scalar, r_cb: Scalar, r_ad: Scalar, r_db: Scalar, r_cd: Scalar) -> Vec<Resistor> {
    vec![
        Resistor::new("R1", SOURCE, "C", r_ac),
        Resistor::new("R2", "C", SINK, r_cb),
        Resistor::new("R3", SOURCE, "D", r_ad),
        Resistor::new("R4", "D", SINK, r_db),
        Resistor::new("R5", "C", "D", r_cd),
    ]
}

/// Series pair `A – M – B` in parallel with a direct `A – B` resistor.
#[must_use]
pub fn nested_series_parallel(r1: Scalar, r2: Scalar, r_direct: Scalar) -> Vec<Resistor> {
    vec![
        Resistor::new("R1", SOURCE, "M", r1),
        Resistor::new("R2", "M", SINK, r2),
        Resistor::new("R3", SOURCE, SINK, r_direct),
    ]
}

/// Ladder of `sections` L-sections: series arms along `A – T1 – … – Tn`, and
/// a shunt from every `Ti` to the return rail `B`.
///
/// As `sections` grows with equal arms the value tends to `R·(1 + √5)/2`.
#[must_use]
pub fn ladder(sections: usize, r_series: Scalar, r_shunt: Scalar) -> Vec<Resistor> {
    let mut out = Vec::with_capacity(2 * sections);
    let tap = |i: usize| if i == 0 { SOURCE.to_owned() } else { format!("T{i}") };
    for i in 0..sections {
        out.push(Resistor::new(format!("Rs{}", i + 1), tap(i), tap(i + 1), r_series));
        out.push(Resistor::new(format!("Rp{}", i + 1), tap(i + 1), SINK, r_shunt));
    }
    out
}

/// Rectangular mesh of `rows × cols` nodes with equal resistors on every
/// lattice edge. The terminals are the opposite corners.
///
/// Meshes of 3×3 nodes or larger are not series/parallel reducible.
#[must_use]
pub fn grid(rows: usize, cols: usize, r: Scalar) -> Vec<Resistor> {
    let last = (rows.saturating_sub(1), cols.saturating_sub(1));
    let label = |i: usize, j: usize| match (i, j) {
        (0, 0) => SOURCE.to_owned(),
        p if p == last => SINK.to_owned(),
        _ => format!("G{i}_{j}"),
    };
    let mut out = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            if i + 1 < rows {
                out.push(Resistor::between(label(i, j), label(i + 1, j), r));
            }
            if j + 1 < cols {
                out.push(Resistor::between(label(i, j), label(i, j + 1), r));
            }
        }
    }
    out
}

/// The four report networks: series chain, parallel bank, Wheatstone bridge,
/// and a series block nested in parallel.
#[must_use]
pub fn reference_cases() -> Vec<ReferenceCase> {
    vec![
        ReferenceCase::new("series chain", series_chain(&[100.0, 200.0, 300.0]), Some(600.0)),
        ReferenceCase::new(
            "parallel bank",
            parallel_bank(&[100.0, 200.0, 300.0]),
            Some(600.0 / 11.0),
        ),
        ReferenceCase::new(
            "wheatstone bridge",
            wheatstone_bridge(100.0, 100.0, 200.0, 200.0, 300.0),
            Some(400.0 / 3.0),
        ),
        ReferenceCase::new(
            "nested series/parallel",
            nested_series_parallel(100.0, 200.0, 300.0),
            Some(150.0),
        ),
    ]
}
