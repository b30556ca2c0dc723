//! Conductance Laplacian of a resistor network and its effective resistances.
//!
//! For a connected network the Laplacian `L` is symmetric positive
//! semi-definite with a one-dimensional null space (the constant vector). The
//! effective resistance between nodes `i` and `j` is
//! `R_ij = L⁺[i,i] + L⁺[j,j] − 2·L⁺[i,j]`, where `L⁺` is the Moore–Penrose
//! pseudoinverse.
//!
//! The same value is the reciprocal of the `i`–`j` conductance left after
//! eliminating every other node (the Schur complement of `L` onto `{i, j}`).
//! [`ConductanceLaplacian::effective_resistance`] computes it that way: each
//! elimination is a star–mesh transform on the off-diagonal conductances and
//! never subtracts, so conductances spanning many decades keep full relative
//! precision. The SVD pseudoinverse truncates small singular values and loses
//! digits on such networks.
//!
//! # References
//!
//! - Klein & Randić (1993). "Resistance distance". J. Math. Chem. 12, 81–95.

use std::collections::HashMap;

use nalgebra::DMatrix;
use tracing::debug;

use crate::errors::{NetworkError, NetworkResult};
use crate::math::{RMatrix, Scalar};

use super::network::{NodeId, ResistorNetwork};

/// Conductance Laplacian over a chosen set of nodes.
#[derive(Debug, Clone)]
pub struct ConductanceLaplacian {
    labels: Vec<String>,
    index: HashMap<NodeId, usize>,
    /// `(i, j, g)` conductance stamps, one per edge.
    stamps: Vec<(usize, usize, Scalar)>,
}

impl ConductanceLaplacian {
    /// Stamps every edge whose endpoints are both in `nodes`.
    ///
    /// Matrix indices follow the order of `nodes`.
    #[must_use]
    pub fn from_network(network: &ResistorNetwork, nodes: &[NodeId]) -> Self {
        let index: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let labels = nodes.iter().map(|&n| network.label(n).to_owned()).collect();
        let stamps = network
            .edges()
            .filter_map(|(_, e)| match (index.get(&e.a), index.get(&e.b)) {
                (Some(&i), Some(&j)) => Some((i, j, e.conductance())),
                _ => None,
            })
            .collect();
        Self {
            labels,
            index,
            stamps,
        }
    }

    /// Laplacian over all live nodes of `network`.
    #[must_use]
    pub fn from_whole(network: &ResistorNetwork) -> Self {
        let nodes: Vec<NodeId> = network.nodes().collect();
        Self::from_network(network, &nodes)
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.labels.len()
    }

    /// Node labels in matrix order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Matrix index of a node, if it was included.
    #[must_use]
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).copied()
    }

    /// Assembles the dense matrix.
    #[must_use]
    pub fn matrix(&self) -> RMatrix {
        let n = self.dimension();
        let mut l = DMatrix::zeros(n, n);
        for &(i, j, g) in &self.stamps {
            l[(i, i)] += g;
            l[(j, j)] += g;
            l[(i, j)] -= g;
            l[(j, i)] -= g;
        }
        l
    }

    /// Row sums of the matrix; all zero up to rounding (Kirchhoff's current law).
    #[must_use]
    pub fn row_sums(&self) -> Vec<Scalar> {
        self.matrix().row_iter().map(|row| row.sum()).collect()
    }

    /// Moore–Penrose pseudoinverse via SVD.
    ///
    /// Singular values below `tolerance * max|L|` are treated as zero.
    pub fn pseudo_inverse(&self, tolerance: Scalar) -> NetworkResult<RMatrix> {
        let l = self.matrix();
        let eps = tolerance * l.amax();
        debug!(dimension = self.dimension(), eps, "pseudoinverse");
        l.pseudo_inverse(eps)
            .map_err(|e| NetworkError::Numerical(e.to_owned()))
    }

    /// Off-diagonal conductance matrix: `G[i,j]` is the total conductance
    /// joining `i` and `j`, with a zero diagonal.
    #[must_use]
    pub fn conductances(&self) -> RMatrix {
        let n = self.dimension();
        let mut g = DMatrix::zeros(n, n);
        for &(i, j, c) in &self.stamps {
            g[(i, j)] += c;
            g[(j, i)] += c;
        }
        g
    }

    /// Two-point effective resistance between `a` and `b` by eliminating
    /// every other node.
    ///
    /// Eliminating node `k` with total conductance `g_k` adds
    /// `g_ik · g_kj / g_k` between each pair of its remaining neighbors.
    pub fn effective_resistance(&self, a: NodeId, b: NodeId) -> NetworkResult<Scalar> {
        let (ia, ib) = self.indices(a, b)?;
        let n = self.dimension();
        let mut g = self.conductances();
        let mut alive = vec![true; n];
        for k in 0..n {
            if k == ia || k == ib {
                continue;
            }
            alive[k] = false;
            let reach: Vec<usize> = (0..n).filter(|&j| alive[j] && g[(k, j)] > 0.0).collect();
            let total: Scalar = reach.iter().map(|&j| g[(k, j)]).sum();
            if total <= 0.0 {
                continue;
            }
            for (p, &i) in reach.iter().enumerate() {
                for &j in &reach[p + 1..] {
                    let added = g[(i, k)] * g[(k, j)] / total;
                    g[(i, j)] += added;
                    g[(j, i)] += added;
                }
            }
        }
        let g_ab = g[(ia, ib)];
        debug!(dimension = n, g_ab, "eliminated to terminal pair");
        if g_ab > 0.0 {
            finite(1.0 / g_ab)
        } else {
            Err(NetworkError::Numerical(format!(
                "no conductance left between `{}` and `{}` after elimination",
                self.labels[ia], self.labels[ib]
            )))
        }
    }

    /// Two-point effective resistance from the SVD pseudoinverse.
    ///
    /// The caller is responsible for `a` and `b` lying in one connected
    /// component; otherwise the value is finite but meaningless.
    pub fn pseudo_inverse_resistance(
        &self,
        a: NodeId,
        b: NodeId,
        tolerance: Scalar,
    ) -> NetworkResult<Scalar> {
        let (i, j) = self.indices(a, b)?;
        let pinv = self.pseudo_inverse(tolerance)?;
        finite(pair_resistance(&pinv, i, j))
    }

    /// All-pairs effective resistances from a single pseudoinverse.
    pub fn resistance_matrix(&self, tolerance: Scalar) -> NetworkResult<RMatrix> {
        let pinv = self.pseudo_inverse(tolerance)?;
        let n = self.dimension();
        Ok(DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                0.0
            } else {
                pair_resistance(&pinv, i, j)
            }
        }))
    }

    /// Effective resistance by grounding `b`, injecting 1 A at `a`, and solving
    /// the reduced system with a sparse Cholesky factorization.
    #[cfg(feature = "sparse")]
    pub fn grounded_resistance(&self, a: NodeId, b: NodeId) -> NetworkResult<Scalar> {
        use nalgebra_sparse::{coo::CooMatrix, factorization::CscCholesky, CscMatrix};

        let (ia, ground) = self.indices(a, b)?;
        let n = self.dimension() - 1;
        let reduced = |i: usize| if i < ground { i } else { i - 1 };

        let mut coo = CooMatrix::new(n, n);
        for &(i, j, g) in &self.stamps {
            match (i == ground, j == ground) {
                (false, false) => {
                    let (ri, rj) = (reduced(i), reduced(j));
                    coo.push(ri, ri, g);
                    coo.push(rj, rj, g);
                    coo.push(ri, rj, -g);
                    coo.push(rj, ri, -g);
                }
                (false, true) => coo.push(reduced(i), reduced(i), g),
                (true, false) => coo.push(reduced(j), reduced(j), g),
                (true, true) => {}
            }
        }
        let csc = CscMatrix::from(&coo);
        let cholesky = CscCholesky::factor(&csc)
            .map_err(|e| NetworkError::Numerical(format!("cholesky: {e:?}")))?;
        let mut rhs = DMatrix::zeros(n, 1);
        rhs[(reduced(ia), 0)] = 1.0;
        let v = cholesky.solve(&rhs);
        finite(v[(reduced(ia), 0)])
    }

    fn indices(&self, a: NodeId, b: NodeId) -> NetworkResult<(usize, usize)> {
        let lookup = |n: NodeId| {
            self.index_of(n)
                .ok_or_else(|| NetworkError::Numerical(format!("node {} not in Laplacian", n.index())))
        };
        Ok((lookup(a)?, lookup(b)?))
    }
}

fn pair_resistance(pinv: &RMatrix, i: usize, j: usize) -> Scalar {
    (pinv[(i, i)] + pinv[(j, j)] - 2.0 * pinv[(i, j)]).max(0.0)
}

fn finite(value: Scalar) -> NetworkResult<Scalar> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NetworkError::Numerical(format!("non-finite resistance {value}")))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn bridge() -> ResistorNetwork {
        ResistorNetwork::from_resistors([
            ("A", "C", 100.0),
            ("C", "B", 100.0),
            ("A", "D", 200.0),
            ("D", "B", 200.0),
            ("C", "D", 300.0),
        ])
        .unwrap()
    }

    #[test]
    fn rows_sum_to_zero() {
        let lap = ConductanceLaplacian::from_whole(&bridge());
        for s in lap.row_sums() {
            assert_relative_eq!(s, 0.0, epsilon = 1.0e-15);
        }
    }

    #[test]
    fn matrix_is_symmetric_with_expected_entries() {
        let net = ResistorNetwork::from_resistors([("A", "B", 2.0), ("A", "B", 2.0)]).unwrap();
        let l = ConductanceLaplacian::from_whole(&net).matrix();
        assert_relative_eq!(l[(0, 0)], 1.0);
        assert_relative_eq!(l[(0, 1)], -1.0);
        assert_relative_eq!(l[(1, 0)], -1.0);
        assert_relative_eq!(l[(1, 1)], 1.0);
    }

    #[test]
    fn laplacian_of_connected_graph_has_rank_n_minus_one() {
        let l = ConductanceLaplacian::from_whole(&bridge()).matrix();
        assert_eq!(l.rank(1.0e-12), 3);
    }

    #[test]
    fn bridge_resistance_from_pseudoinverse() {
        let net = bridge();
        let lap = ConductanceLaplacian::from_whole(&net);
        let a = net.node_id("A").unwrap();
        let b = net.node_id("B").unwrap();
        let r = lap.pseudo_inverse_resistance(a, b, 1.0e-10).unwrap();
        assert_relative_eq!(r, 400.0 / 3.0, max_relative = 1.0e-9);
    }

    #[test]
    fn bridge_resistance_by_elimination() {
        let net = bridge();
        let lap = ConductanceLaplacian::from_whole(&net);
        let a = net.node_id("A").unwrap();
        let b = net.node_id("B").unwrap();
        assert_relative_eq!(lap.effective_resistance(a, b).unwrap(), 400.0 / 3.0, max_relative = 1.0e-12);
        assert_relative_eq!(lap.effective_resistance(b, a).unwrap(), 400.0 / 3.0, max_relative = 1.0e-12);
    }

    /// Bridge whose arms differ by `hi / lo`; the value is the Δ–Y closed form.
    fn wide_bridge(lo: Scalar, hi: Scalar) -> (ResistorNetwork, Scalar) {
        let net = ResistorNetwork::from_resistors([
            ("A", "C", lo),
            ("C", "B", hi),
            ("A", "D", hi),
            ("D", "B", lo),
            ("C", "D", hi),
        ])
        .unwrap();
        let sum = lo + hi + hi;
        let (arm_a, arm_c, arm_d) = (lo * hi / sum, lo * hi / sum, hi * hi / sum);
        let upper = arm_c + hi;
        let lower = arm_d + lo;
        (net, arm_a + upper * lower / (upper + lower))
    }

    #[test]
    fn elimination_keeps_precision_across_decades() {
        for (lo, hi) in [(1.0, 1.0e9), (1.0, 1.0e11), (1.0e-3, 1.0e9)] {
            let (net, expected) = wide_bridge(lo, hi);
            let lap = ConductanceLaplacian::from_whole(&net);
            let a = net.node_id("A").unwrap();
            let b = net.node_id("B").unwrap();
            let r = lap.effective_resistance(a, b).unwrap();
            assert_relative_eq!(r, expected, max_relative = 1.0e-9);
        }
    }

    #[test]
    fn elimination_reports_missing_path() {
        let net = ResistorNetwork::from_resistors([("A", "C", 1.0), ("B", "D", 1.0)]).unwrap();
        let lap = ConductanceLaplacian::from_whole(&net);
        let a = net.node_id("A").unwrap();
        let b = net.node_id("B").unwrap();
        assert!(matches!(lap.effective_resistance(a, b), Err(NetworkError::Numerical(_))));
    }

    #[test]
    fn resistance_matrix_is_symmetric_with_zero_diagonal() {
        let lap = ConductanceLaplacian::from_whole(&bridge());
        let r = lap.resistance_matrix(1.0e-10).unwrap();
        for i in 0..4 {
            assert_eq!(r[(i, i)], 0.0);
            for j in 0..4 {
                assert_relative_eq!(r[(i, j)], r[(j, i)], max_relative = 1.0e-9);
            }
        }
        let net = bridge();
        let a = lap.index_of(net.node_id("A").unwrap()).unwrap();
        let c = lap.index_of(net.node_id("C").unwrap()).unwrap();
        let direct = lap
            .pseudo_inverse_resistance(net.node_id("A").unwrap(), net.node_id("C").unwrap(), 1.0e-10)
            .unwrap();
        assert_relative_eq!(r[(a, c)], direct, max_relative = 1.0e-12);
        let eliminated = lap
            .effective_resistance(net.node_id("A").unwrap(), net.node_id("C").unwrap())
            .unwrap();
        assert_relative_eq!(r[(a, c)], eliminated, max_relative = 1.0e-9);
    }

    #[cfg(feature = "sparse")]
    #[test]
    fn grounded_cholesky_matches_pseudoinverse() {
        let net = bridge();
        let lap = ConductanceLaplacian::from_whole(&net);
        let a = net.node_id("A").unwrap();
        let b = net.node_id("B").unwrap();
        let r = lap.grounded_resistance(a, b).unwrap();
        assert_relative_eq!(r, 400.0 / 3.0, max_relative = 1.0e-9);
    }
}
