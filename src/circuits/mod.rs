//! Resistor networks and the equivalent-resistance solver.

/// Equivalent-resistance analysis entry points.
pub mod analysis;
/// Lumped resistor definition.
pub mod component;
/// Conductance Laplacian and effective resistances.
pub mod laplacian;
/// Resistor multigraph with stable node and edge identifiers.
pub mod network;
/// Series/parallel (and optional Δ–Y) reduction.
pub mod reduce;
/// SPICE-style resistor netlist import.
pub mod spice;

pub use analysis::{analyze, equivalent_resistance, resistance_table, Equivalent, ResistanceTable, SolveMethod};
pub use component::Resistor;
pub use laplacian::ConductanceLaplacian;
pub use network::{Edge, EdgeId, Incidence, NodeId, ResistorNetwork};
pub use reduce::{reduce, ReductionStep, Reducer};
pub use spice::{parse_netlist, Netlist};
