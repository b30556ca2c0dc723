use std::collections::HashMap;

use nalgebra::DMatrix;
use tracing::debug;

use crate::config::{LaplacianSolver, ReducerConfig, ReductionStrategy};
use crate::errors::{NetworkError, NetworkResult};
use crate::math::{RMatrix, Scalar};

use super::component::Resistor;
use super::laplacian::ConductanceLaplacian;
use super::network::{NodeId, ResistorNetwork};
use super::reduce::{ReductionStep, Reducer};

/// How the final value was obtained.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    /// Reduction rules collapsed the network to a single resistor.
    SeriesParallel,
    /// The residual network was solved through its conductance Laplacian.
    Laplacian,
}

/// Result of an equivalent-resistance computation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Equivalent {
    /// Equivalent resistance between the terminals, in ohms.
    pub ohms: Scalar,
    /// Path that produced `ohms`.
    pub method: SolveMethod,
    /// Reduction steps in application order.
    pub steps: Vec<ReductionStep>,
    /// Nodes left after reduction (2 when fully collapsed).
    pub residual_nodes: usize,
    /// Resistors left after reduction (1 when fully collapsed).
    pub residual_edges: usize,
}

/// Equivalent resistance between `a` and `b` of the network described by
/// `(node, node, ohms)` triples, using the default configuration.
///
/// ```
/// use resistor_networks::circuits::analysis::equivalent_resistance;
///
/// let r = equivalent_resistance([("A", "M", 100.0), ("M", "B", 200.0)], "A", "B").unwrap();
/// assert!((r - 300.0).abs() < 1e-9);
/// ```
pub fn equivalent_resistance<I, R>(resistors: I, a: &str, b: &str) -> NetworkResult<Scalar>
where
    I: IntoIterator<Item = R>,
    R: Into<Resistor>,
{
    let network = ResistorNetwork::from_resistors(resistors)?;
    analyze(&network, a, b, &ReducerConfig::default()).map(|eq| eq.ohms)
}

/// Computes the equivalent resistance seen between `a` and `b`.
///
/// The caller's network is left untouched: only the connected component
/// holding the terminals is copied and reduced. The reduced copy is then read
/// out directly when it is a single `a`–`b` resistor, or handed to the
/// Laplacian fallback otherwise.
pub fn analyze(
    network: &ResistorNetwork,
    a: &str,
    b: &str,
    config: &ReducerConfig,
) -> NetworkResult<Equivalent> {
    let (na, nb) = terminals(network, a, b)?;
    let component = network.component_of(na);
    if component.binary_search(&nb).is_err() {
        return Err(NetworkError::disconnected(a, b));
    }

    let mut working = network.subnetwork(&component);
    let wa = working.require_node(a)?;
    let wb = working.require_node(b)?;

    let steps = match config.strategy {
        ReductionStrategy::LaplacianOnly => Vec::new(),
        ReductionStrategy::SeriesParallel => Reducer::new(&mut working, wa, wb).run()?,
        ReductionStrategy::SeriesParallelDeltaWye => {
            let budget = working.edge_count();
            Reducer::new(&mut working, wa, wb).with_delta_wye(budget).run()?
        }
    };
    let residual_nodes = working.node_count();
    let residual_edges = working.edge_count();

    if residual_nodes == 2 && residual_edges == 1 {
        let ohms = working
            .edges()
            .next()
            .map(|(_, e)| e.resistance)
            .ok_or_else(|| NetworkError::Numerical("collapsed network lost its edge".into()))?;
        debug!(a, b, ohms, steps = steps.len(), "collapsed by reduction");
        return Ok(Equivalent {
            ohms,
            method: SolveMethod::SeriesParallel,
            steps,
            residual_nodes,
            residual_edges,
        });
    }

    debug!(
        a,
        b,
        residual_nodes,
        residual_edges,
        "reduction stalled, solving through the Laplacian"
    );
    let laplacian = ConductanceLaplacian::from_whole(&working);
    let ohms = match config.solver {
        LaplacianSolver::Elimination => laplacian.effective_resistance(wa, wb)?,
        LaplacianSolver::DensePseudoInverse => {
            laplacian.pseudo_inverse_resistance(wa, wb, config.pinv_tolerance)?
        }
        #[cfg(feature = "sparse")]
        LaplacianSolver::SparseCholesky => laplacian.grounded_resistance(wa, wb)?,
    };
    Ok(Equivalent {
        ohms,
        method: SolveMethod::Laplacian,
        steps,
        residual_nodes,
        residual_edges,
    })
}

fn terminals(network: &ResistorNetwork, a: &str, b: &str) -> NetworkResult<(NodeId, NodeId)> {
    let na = network.require_node(a)?;
    let nb = network.require_node(b)?;
    if na == nb {
        return Err(NetworkError::IdenticalTerminals(a.to_owned()));
    }
    Ok((na, nb))
}

/// All-pairs effective resistances of a network.
#[derive(Debug, Clone)]
pub struct ResistanceTable {
    /// Node labels in row/column order.
    pub labels: Vec<String>,
    /// `values[(i, j)]` is the resistance between `labels[i]` and `labels[j]`;
    /// `+∞` across disconnected components.
    pub values: RMatrix,
}

impl ResistanceTable {
    /// Looks up the resistance between two labels.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<Scalar> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[(i, j)])
    }
}

/// Computes every pairwise effective resistance, one pseudoinverse per
/// connected component.
pub fn resistance_table(network: &ResistorNetwork, config: &ReducerConfig) -> NetworkResult<ResistanceTable> {
    let nodes: Vec<NodeId> = network.nodes().collect();
    let position: HashMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let labels = nodes.iter().map(|&n| network.label(n).to_owned()).collect();
    let n = nodes.len();
    let mut values = DMatrix::from_element(n, n, Scalar::INFINITY);
    let mut assigned = vec![false; n];

    for &start in &nodes {
        if assigned[position[&start]] {
            continue;
        }
        let component = network.component_of(start);
        let laplacian = ConductanceLaplacian::from_network(network, &component);
        let local = laplacian.resistance_matrix(config.pinv_tolerance)?;
        for (li, &ni) in component.iter().enumerate() {
            let gi = position[&ni];
            assigned[gi] = true;
            for (lj, &nj) in component.iter().enumerate() {
                values[(gi, position[&nj])] = local[(li, lj)];
            }
        }
    }
    Ok(ResistanceTable { labels, values })
}
