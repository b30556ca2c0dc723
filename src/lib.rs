#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Shared numerical primitives and resistor combination rules.
pub mod math;
/// Reducer configuration.
pub mod config;
/// Resistor networks, reduction, Laplacian fallback, and netlist import.
pub mod circuits;
/// Reference networks with known equivalent resistances.
pub mod catalog;
/// Case evaluation and textual summaries.
pub mod report;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
