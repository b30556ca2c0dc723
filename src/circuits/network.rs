use std::collections::{HashMap, VecDeque};
use std::fmt;

use tracing::debug;

use crate::errors::{NetworkError, NetworkResult};
use crate::math::{is_valid_resistance, Scalar};

use super::component::Resistor;

/// Stable identifier of a node inside a [`ResistorNetwork`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Registry index of the node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable identifier of a resistor edge inside a [`ResistorNetwork`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Registry index of the edge.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Resistor edge between two nodes. Orientation carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// First endpoint.
    pub a: NodeId,
    /// Second endpoint.
    pub b: NodeId,
    /// Resistance in ohms, always finite and > 0.
    pub resistance: Scalar,
}

impl Edge {
    /// Conductance in siemens.
    #[must_use]
    pub fn conductance(&self) -> Scalar {
        1.0 / self.resistance
    }
}

/// Entry of a node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    /// Node on the other side of the edge.
    pub neighbor: NodeId,
    /// Edge registry key.
    pub edge: EdgeId,
}

#[derive(Debug, Clone)]
struct NodeSlot {
    label: String,
    alive: bool,
    incidences: Vec<Incidence>,
}

/// Resistor multigraph: a node registry, an edge registry keyed by [`EdgeId`],
/// and a tagged adjacency list per node.
///
/// Removed nodes and edges leave tombstones so identifiers stay stable while a
/// reduction mutates the graph. Iteration is always in identifier order.
#[derive(Debug, Clone, Default)]
pub struct ResistorNetwork {
    nodes: Vec<NodeSlot>,
    edges: Vec<Option<Edge>>,
    by_label: HashMap<String, NodeId>,
    live_nodes: usize,
    live_edges: usize,
}

impl ResistorNetwork {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from resistors or `(node, node, ohms)` triples.
    ///
    /// Every value is validated before the network is returned.
    pub fn from_resistors<I, R>(resistors: I) -> NetworkResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Resistor>,
    {
        let mut network = Self::new();
        for resistor in resistors {
            network.add(&resistor.into())?;
        }
        Ok(network)
    }

    /// Adds a resistor component.
    pub fn add(&mut self, resistor: &Resistor) -> NetworkResult<Option<EdgeId>> {
        let (a, b) = resistor.terminals();
        self.add_resistor(a, b, resistor.resistance())
    }

    /// Adds a resistor between labelled nodes, registering the nodes on first use.
    ///
    /// Returns `None` for a self-loop, which is accepted but carries no current.
    pub fn add_resistor(
        &mut self,
        a: &str,
        b: &str,
        resistance: Scalar,
    ) -> NetworkResult<Option<EdgeId>> {
        if !is_valid_resistance(resistance) {
            return Err(NetworkError::invalid_resistance(a, b, resistance));
        }
        let na = self.add_node(a);
        let nb = self.add_node(b);
        if na == nb {
            debug!(node = a, resistance, "dropping self-loop resistor");
            return Ok(None);
        }
        Ok(Some(self.insert_edge(na, nb, resistance)))
    }

    /// Registers a node label, returning the existing id if already present.
    pub fn add_node(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.by_label.get(label) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeSlot {
            label: label.to_owned(),
            alive: true,
            incidences: Vec::new(),
        });
        self.by_label.insert(label.to_owned(), id);
        self.live_nodes += 1;
        id
    }

    /// Registers a fresh internal node whose label starts with `prefix`.
    pub(crate) fn add_internal_node(&mut self, prefix: &str) -> NodeId {
        let mut n = self.nodes.len();
        loop {
            let label = format!("{prefix}{n}");
            if !self.by_label.contains_key(&label) {
                return self.add_node(&label);
            }
            n += 1;
        }
    }

    /// Looks up a live node by label.
    #[must_use]
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.by_label
            .get(label)
            .copied()
            .filter(|&id| self.contains_node(id))
    }

    /// Looks up a live node by label, failing with [`NetworkError::UnknownNode`].
    pub fn require_node(&self, label: &str) -> NetworkResult<NodeId> {
        self.node_id(label)
            .ok_or_else(|| NetworkError::UnknownNode(label.to_owned()))
    }

    /// Label of a node (also valid for removed nodes).
    #[must_use]
    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id.0].label
    }

    /// True if `id` names a node that has not been removed.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|slot| slot.alive)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    /// Number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Returns true when no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_nodes == 0
    }

    /// Live node ids in registry order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(i, _)| NodeId(i))
    }

    /// Live edges in registry order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId(i), e)))
    }

    /// Edge by id, `None` once removed.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0).and_then(Option::as_ref)
    }

    /// Adjacency list of a node.
    #[must_use]
    pub fn incidences(&self, id: NodeId) -> &[Incidence] {
        &self.nodes[id.0].incidences
    }

    /// Number of edges incident to a node (parallel edges counted separately).
    #[must_use]
    pub fn degree(&self, id: NodeId) -> usize {
        self.nodes[id.0].incidences.len()
    }

    /// All edges joining `u` and `v`, in adjacency order.
    #[must_use]
    pub fn edges_between(&self, u: NodeId, v: NodeId) -> Vec<EdgeId> {
        self.incidences(u)
            .iter()
            .filter(|inc| inc.neighbor == v)
            .map(|inc| inc.edge)
            .collect()
    }

    pub(crate) fn insert_edge(&mut self, a: NodeId, b: NodeId, resistance: Scalar) -> EdgeId {
        debug_assert!(a != b, "self-loops are never stored");
        debug_assert!(is_valid_resistance(resistance));
        let id = EdgeId(self.edges.len());
        self.edges.push(Some(Edge { a, b, resistance }));
        self.nodes[a.0].incidences.push(Incidence { neighbor: b, edge: id });
        self.nodes[b.0].incidences.push(Incidence { neighbor: a, edge: id });
        self.live_edges += 1;
        id
    }

    pub(crate) fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.0)?.take()?;
        for end in [edge.a, edge.b] {
            let list = &mut self.nodes[end.0].incidences;
            if let Some(pos) = list.iter().position(|inc| inc.edge == id) {
                list.swap_remove(pos);
            }
        }
        self.live_edges -= 1;
        Some(edge)
    }

    pub(crate) fn set_resistance(&mut self, id: EdgeId, resistance: Scalar) {
        if let Some(edge) = self.edges.get_mut(id.0).and_then(Option::as_mut) {
            edge.resistance = resistance;
        }
    }

    /// Removes a node together with any edges still attached to it.
    pub(crate) fn remove_node(&mut self, id: NodeId) {
        if !self.contains_node(id) {
            return;
        }
        let attached: Vec<EdgeId> = self.nodes[id.0].incidences.iter().map(|inc| inc.edge).collect();
        for edge in attached {
            self.remove_edge(edge);
        }
        self.nodes[id.0].alive = false;
        self.live_nodes -= 1;
    }

    /// Nodes reachable from `start`, in registry order.
    #[must_use]
    pub fn component_of(&self, start: NodeId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        seen[start.0] = true;
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for inc in self.incidences(node) {
                if !seen[inc.neighbor.0] {
                    seen[inc.neighbor.0] = true;
                    queue.push_back(inc.neighbor);
                }
            }
        }
        seen.iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Copies the given nodes and every edge between them into a fresh network.
    ///
    /// Labels are preserved; identifiers are reassigned.
    #[must_use]
    pub fn subnetwork(&self, keep: &[NodeId]) -> Self {
        let mut sub = Self::new();
        let mut kept = vec![false; self.nodes.len()];
        for &id in keep {
            if self.contains_node(id) {
                kept[id.0] = true;
                sub.add_node(self.label(id));
            }
        }
        for (_, edge) in self.edges() {
            if kept[edge.a.0] && kept[edge.b.0] {
                let a = sub.add_node(self.label(edge.a));
                let b = sub.add_node(self.label(edge.b));
                sub.insert_edge(a, b, edge.resistance);
            }
        }
        sub
    }

    /// True when a conducting path joins `a` and `b`.
    #[must_use]
    pub fn connected(&self, a: NodeId, b: NodeId) -> bool {
        self.component_of(a).binary_search(&b).is_ok()
    }

    /// Equivalent resistance between two labelled nodes with the default configuration.
    pub fn equivalent_resistance(&self, a: &str, b: &str) -> NetworkResult<Scalar> {
        super::analysis::analyze(self, a, b, &crate::config::ReducerConfig::default())
            .map(|eq| eq.ohms)
    }
}

impl fmt::Display for ResistorNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} nodes, {} resistors", self.live_nodes, self.live_edges)?;
        for (_, edge) in self.edges() {
            writeln!(
                f,
                "  {} -- {} : {} Ω",
                self.label(edge.a),
                self.label(edge.b),
                edge.resistance
            )?;
        }
        Ok(())
    }
}
