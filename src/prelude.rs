//! Convenience re-exports for building and solving resistor networks.

pub use crate::catalog::{
    grid, ladder, nested_series_parallel, parallel_bank, reference_cases, series_chain,
    wheatstone_bridge, ReferenceCase,
};
pub use crate::circuits::{
    analysis::{analyze, equivalent_resistance, resistance_table, Equivalent, ResistanceTable, SolveMethod},
    component::Resistor,
    laplacian::ConductanceLaplacian,
    network::{NodeId, ResistorNetwork},
    reduce::{reduce, ReductionStep, Reducer},
    spice::{parse_netlist, Netlist},
};
pub use crate::config::{LaplacianSolver, ReducerConfig, ReductionStrategy};
pub use crate::errors::{NetworkError, NetworkResult};
pub use crate::math::{parallel, series, Scalar};
pub use crate::report::{evaluate, render_table, write_summary_csv, CaseOutcome};
