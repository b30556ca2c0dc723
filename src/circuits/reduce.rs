//! Series/parallel reduction of a resistor multigraph to a fixpoint.
//!
//! The reducer keeps a worklist of dirty nodes. A node is dirty when its set of
//! incident edges changed since it was last inspected; inspecting a node
//! applies at most one series contraction (or drops it as dangling) and merges
//! every parallel bundle around it. The fixpoint is reached when the worklist
//! drains, so a second run over the same graph finds nothing to do.
//!
//! When series/parallel rules stall, an optional Δ–Y pass replaces one
//! resistor triangle by an equivalent star and the worklist resumes.
//!
//! Every derived resistance is checked before it is written back; a sum that
//! overflows or a parallel/star value that underflows to zero stops the run
//! with [`NetworkError::Numerical`] and leaves the graph as it was before that
//! rewrite.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

use crate::errors::{NetworkError, NetworkResult};
use crate::math::{is_valid_resistance, parallel, series, Scalar};

use super::network::{EdgeId, NodeId, ResistorNetwork};

/// Prefix for star nodes introduced by Δ–Y transforms.
const STAR_PREFIX: &str = "Y";

/// One rewrite applied by the reducer, in the order it happened.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum ReductionStep {
    /// Several resistors between the same pair of nodes became one.
    Parallel {
        /// First node of the pair.
        a: String,
        /// Second node of the pair.
        b: String,
        /// Values that were combined, in ohms.
        merged: Vec<Scalar>,
        /// Combined value.
        result: Scalar,
    },
    /// A degree-2 node was contracted.
    Series {
        /// Removed intermediate node.
        node: String,
        /// Neighbor on the first side.
        a: String,
        /// Neighbor on the second side.
        b: String,
        /// Resistance towards `a`.
        r1: Scalar,
        /// Resistance towards `b`.
        r2: Scalar,
        /// `r1 + r2`.
        result: Scalar,
    },
    /// Both edges of a degree-2 node led to the same neighbor; no current flows.
    DeadLoop {
        /// Removed node.
        node: String,
        /// The single neighbor.
        neighbor: String,
    },
    /// A non-terminal node with at most one edge was removed.
    Dangling {
        /// Removed node.
        node: String,
        /// Neighbor it hung from, if any.
        neighbor: Option<String>,
    },
    /// A triangle was replaced by a star around a new node.
    DeltaWye {
        /// Triangle corners.
        corners: [String; 3],
        /// Label of the new star node.
        star: String,
        /// Star arm resistances, aligned with `corners`.
        arms: [Scalar; 3],
    },
}

impl fmt::Display for ReductionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel { a, b, merged, result } => {
                let parts: Vec<String> = merged.iter().map(|r| format!("{r:.4}")).collect();
                write!(f, "parallel {a}–{b}: {} = {result:.4} Ω", parts.join(" ‖ "))
            }
            Self::Series { node, a, b, r1, r2, result } => {
                write!(f, "series via {node}: {a}–{b} = {r1:.4} + {r2:.4} = {result:.4} Ω")
            }
            Self::DeadLoop { node, neighbor } => {
                write!(f, "dead loop {node} on {neighbor} removed")
            }
            Self::Dangling { node, neighbor: Some(n) } => {
                write!(f, "dangling {node} (hung from {n}) removed")
            }
            Self::Dangling { node, neighbor: None } => write!(f, "isolated {node} removed"),
            Self::DeltaWye { corners, star, arms } => write!(
                f,
                "Δ–Y on {}/{}/{}: star {star} arms {:.4}, {:.4}, {:.4} Ω",
                corners[0], corners[1], corners[2], arms[0], arms[1], arms[2]
            ),
        }
    }
}

/// In-place series/parallel reducer over a working copy of a network.
pub struct Reducer<'n> {
    network: &'n mut ResistorNetwork,
    terminals: [NodeId; 2],
    queue: VecDeque<NodeId>,
    queued: Vec<bool>,
    delta_wye_budget: usize,
    steps: Vec<ReductionStep>,
}

impl<'n> Reducer<'n> {
    /// Creates a reducer that will never remove `a` or `b`.
    pub fn new(network: &'n mut ResistorNetwork, a: NodeId, b: NodeId) -> Self {
        let mut reducer = Self {
            network,
            terminals: [a, b],
            queue: VecDeque::new(),
            queued: Vec::new(),
            delta_wye_budget: 0,
            steps: Vec::new(),
        };
        let all: Vec<NodeId> = reducer.network.nodes().collect();
        for node in all {
            reducer.mark_dirty(node);
        }
        reducer
    }

    /// Allows up to `budget` Δ–Y transforms once series/parallel rules stall.
    #[must_use]
    pub fn with_delta_wye(mut self, budget: usize) -> Self {
        self.delta_wye_budget = budget;
        self
    }

    /// Runs to fixpoint and returns the applied steps.
    pub fn run(mut self) -> NetworkResult<Vec<ReductionStep>> {
        loop {
            while let Some(node) = self.queue.pop_front() {
                self.queued[node.index()] = false;
                self.process(node)?;
            }
            if self.delta_wye_budget == 0 || self.is_collapsed() {
                break;
            }
            if !self.apply_delta_wye()? {
                break;
            }
            self.delta_wye_budget -= 1;
        }
        Ok(self.steps)
    }

    fn is_terminal(&self, node: NodeId) -> bool {
        self.terminals.contains(&node)
    }

    fn is_collapsed(&self) -> bool {
        self.network.node_count() <= 2 && self.network.edge_count() <= 1
    }

    fn mark_dirty(&mut self, node: NodeId) {
        let i = node.index();
        if i >= self.queued.len() {
            self.queued.resize(i + 1, false);
        }
        if !self.queued[i] {
            trace!(node = self.network.label(node), "queued");
            self.queued[i] = true;
            self.queue.push_back(node);
        }
    }

    fn record(&mut self, step: ReductionStep) {
        debug!(%step, "reduction");
        self.steps.push(step);
    }

    fn label(&self, node: NodeId) -> String {
        self.network.label(node).to_owned()
    }

    fn derived(&self, rule: &str, u: NodeId, v: NodeId, value: Scalar) -> NetworkResult<Scalar> {
        if is_valid_resistance(value) {
            Ok(value)
        } else {
            Err(NetworkError::Numerical(format!(
                "{rule} between `{}` and `{}` gives {value} Ω",
                self.network.label(u),
                self.network.label(v)
            )))
        }
    }

    fn process(&mut self, node: NodeId) -> NetworkResult<()> {
        loop {
            if !self.network.contains_node(node) {
                return Ok(());
            }
            if !self.is_terminal(node) {
                match self.network.degree(node) {
                    0 => {
                        self.network.remove_node(node);
                        let step = ReductionStep::Dangling { node: self.label(node), neighbor: None };
                        self.record(step);
                        return Ok(());
                    }
                    1 => {
                        let neighbor = self.network.incidences(node)[0].neighbor;
                        self.network.remove_node(node);
                        self.mark_dirty(neighbor);
                        let step = ReductionStep::Dangling {
                            node: self.label(node),
                            neighbor: Some(self.label(neighbor)),
                        };
                        self.record(step);
                        return Ok(());
                    }
                    2 => return self.contract_series(node),
                    _ => {}
                }
            }
            if !self.merge_parallel_at(node)? {
                return Ok(());
            }
        }
    }

    fn contract_series(&mut self, node: NodeId) -> NetworkResult<()> {
        let [first, second] = [self.network.incidences(node)[0], self.network.incidences(node)[1]];
        let (u, v) = (first.neighbor, second.neighbor);
        if u == v {
            self.network.remove_node(node);
            self.mark_dirty(u);
            let step = ReductionStep::DeadLoop { node: self.label(node), neighbor: self.label(u) };
            self.record(step);
            return Ok(());
        }
        let r1 = self.edge_resistance(first.edge);
        let r2 = self.edge_resistance(second.edge);
        let result = self.derived("series", u, v, series([r1, r2]))?;
        let bundle = self.network.edges_between(u, v);
        if !bundle.is_empty() {
            let existing = bundle.iter().map(|&e| self.edge_resistance(e));
            self.derived("parallel", u, v, parallel(existing.chain([result])))?;
        }
        self.network.remove_node(node);
        self.network.insert_edge(u, v, result);
        let step = ReductionStep::Series {
            node: self.label(node),
            a: self.label(u),
            b: self.label(v),
            r1,
            r2,
            result,
        };
        self.record(step);
        let bundle = self.network.edges_between(u, v);
        self.combine(u, v, bundle)?;
        self.mark_dirty(u);
        self.mark_dirty(v);
        Ok(())
    }

    fn edge_resistance(&self, edge: EdgeId) -> Scalar {
        self.network
            .edge(edge)
            .map_or(Scalar::INFINITY, |e| e.resistance)
    }

    /// Merges every parallel bundle around `node`. Returns true if anything changed.
    fn merge_parallel_at(&mut self, node: NodeId) -> NetworkResult<bool> {
        let mut bundles: Vec<(NodeId, Vec<EdgeId>)> = Vec::new();
        for inc in self.network.incidences(node) {
            match bundles.iter_mut().find(|(n, _)| *n == inc.neighbor) {
                Some((_, edges)) => edges.push(inc.edge),
                None => bundles.push((inc.neighbor, vec![inc.edge])),
            }
        }
        let mut changed = false;
        for (neighbor, edges) in bundles {
            if self.combine(node, neighbor, edges)? {
                self.mark_dirty(neighbor);
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Replaces a bundle of edges between `u` and `v` with its lowest-id member.
    fn combine(&mut self, u: NodeId, v: NodeId, mut edges: Vec<EdgeId>) -> NetworkResult<bool> {
        if edges.len() < 2 {
            return Ok(false);
        }
        edges.sort_unstable();
        let merged: Vec<Scalar> = edges.iter().map(|&e| self.edge_resistance(e)).collect();
        let result = self.derived("parallel", u, v, parallel(merged.iter().copied()))?;
        let keep = edges[0];
        for &extra in &edges[1..] {
            self.network.remove_edge(extra);
        }
        self.network.set_resistance(keep, result);
        let step = ReductionStep::Parallel {
            a: self.label(u),
            b: self.label(v),
            merged,
            result,
        };
        self.record(step);
        Ok(true)
    }

    /// First triangle in registry order: corners `[u, v, w]` and edges `[uv, uw, vw]`.
    fn find_triangle(&self) -> Option<([NodeId; 3], [EdgeId; 3])> {
        let nodes: Vec<NodeId> = self.network.nodes().collect();
        for &u in &nodes {
            let higher: Vec<(NodeId, EdgeId)> = self
                .network
                .incidences(u)
                .iter()
                .filter(|inc| inc.neighbor > u)
                .map(|inc| (inc.neighbor, inc.edge))
                .collect();
            for (i, &(v, e_uv)) in higher.iter().enumerate() {
                for &(w, e_uw) in &higher[i + 1..] {
                    if let Some(&e_vw) = self.network.edges_between(v, w).first() {
                        return Some(([u, v, w], [e_uv, e_uw, e_vw]));
                    }
                }
            }
        }
        None
    }

    fn apply_delta_wye(&mut self) -> NetworkResult<bool> {
        let Some(([u, v, w], [e_uv, e_uw, e_vw])) = self.find_triangle() else {
            return Ok(false);
        };
        let r_uv = self.edge_resistance(e_uv);
        let r_uw = self.edge_resistance(e_uw);
        let r_vw = self.edge_resistance(e_vw);
        let sum = r_uv + r_uw + r_vw;
        let arms = [
            self.derived("Δ–Y arm", u, v, r_uv * r_uw / sum)?,
            self.derived("Δ–Y arm", v, w, r_uv * r_vw / sum)?,
            self.derived("Δ–Y arm", u, w, r_uw * r_vw / sum)?,
        ];

        for edge in [e_uv, e_uw, e_vw] {
            self.network.remove_edge(edge);
        }
        let star = self.network.add_internal_node(STAR_PREFIX);
        for (corner, arm) in [u, v, w].into_iter().zip(arms) {
            self.network.insert_edge(star, corner, arm);
            self.mark_dirty(corner);
        }
        self.mark_dirty(star);

        let step = ReductionStep::DeltaWye {
            corners: [self.label(u), self.label(v), self.label(w)],
            star: self.label(star),
            arms,
        };
        self.record(step);
        Ok(true)
    }
}

/// Reduces `network` in place by series/parallel rules, keeping `a` and `b`.
pub fn reduce(
    network: &mut ResistorNetwork,
    a: NodeId,
    b: NodeId,
) -> NetworkResult<Vec<ReductionStep>> {
    Reducer::new(network, a, b).run()
}
