//! Shared error types used across submodules.

use thiserror::Error;

use crate::math::Scalar;

/// Convenience alias for results produced by this crate.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Top-level error type for the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// A resistor was given a value that is not a finite, strictly positive number.
    #[error("invalid resistance {value} between `{a}` and `{b}` (must be finite and > 0)")]
    InvalidResistance {
        /// First terminal label of the offending resistor.
        a: String,
        /// Second terminal label of the offending resistor.
        b: String,
        /// Rejected value in ohms.
        value: Scalar,
    },
    /// A requested terminal is not a node of the network.
    #[error("unknown node `{0}`")]
    UnknownNode(String),
    /// Both terminals name the same node.
    #[error("terminals must differ, got `{0}` twice")]
    IdenticalTerminals(String),
    /// No conducting path joins the two terminals.
    #[error("no conducting path between `{a}` and `{b}`")]
    DisconnectedNetwork {
        /// Source terminal label.
        a: String,
        /// Sink terminal label.
        b: String,
    },
    /// A netlist card could not be interpreted.
    #[error("netlist line {line}: {message}")]
    Netlist {
        /// One-based line number in the netlist text.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// Raised when a linear-algebra routine fails.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

impl NetworkError {
    pub(crate) fn invalid_resistance(a: &str, b: &str, value: Scalar) -> Self {
        Self::InvalidResistance {
            a: a.to_owned(),
            b: b.to_owned(),
            value,
        }
    }

    pub(crate) fn disconnected(a: &str, b: &str) -> Self {
        Self::DisconnectedNetwork {
            a: a.to_owned(),
            b: b.to_owned(),
        }
    }
}
