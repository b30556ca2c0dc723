//! End-to-end checks of the equivalent-resistance solver.
//!
//! Covers the reference report networks, the error taxonomy, and randomized
//! agreement between the reduction rules and the Laplacian path.

use approx::assert_relative_eq;
use proptest::prelude::*;

use resistor_networks::prelude::*;

fn config(strategy: ReductionStrategy) -> ReducerConfig {
    ReducerConfig::default().with_strategy(strategy)
}

#[test]
fn reference_cases_match_expected_values() {
    for case in reference_cases() {
        let network = ResistorNetwork::from_resistors(case.resistors.clone()).unwrap();
        let eq = analyze(&network, &case.a, &case.b, &ReducerConfig::default()).unwrap();
        assert_relative_eq!(eq.ohms, case.expected.unwrap(), max_relative = 1.0e-9);
    }
}

#[test]
fn only_the_bridge_needs_the_fallback() {
    let outcomes = evaluate(&reference_cases(), &ReducerConfig::default());
    let fallback: Vec<&str> = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Ok(eq) if eq.method == SolveMethod::Laplacian))
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(fallback, vec!["wheatstone bridge"]);
}

#[test]
fn strategies_agree_on_meshes() {
    let network = ResistorNetwork::from_resistors(grid(4, 5, 47.0)).unwrap();
    let base = analyze(&network, "A", "B", &config(ReductionStrategy::LaplacianOnly)).unwrap();
    for strategy in [ReductionStrategy::SeriesParallel, ReductionStrategy::SeriesParallelDeltaWye] {
        let eq = analyze(&network, "A", "B", &config(strategy)).unwrap();
        assert_relative_eq!(eq.ohms, base.ohms, max_relative = 1.0e-8);
    }
}

#[test]
fn netlist_round_trip_through_solver() {
    let text = "\
* unbalanced bridge with a dangling probe lead
R1 in mid1 1k
R2 mid1 out 2k
R3 in mid2 2k
R4 mid2 out 1k
R5 mid1 mid2 500
Rprobe out probe 10meg
C1 in out 1n
.end
";
    let network = parse_netlist(text).unwrap();
    let eq = analyze(&network, "in", "out", &ReducerConfig::default()).unwrap();
    let dy = analyze(&network, "in", "out", &config(ReductionStrategy::SeriesParallelDeltaWye)).unwrap();
    assert_eq!(eq.method, SolveMethod::Laplacian);
    assert_eq!(dy.method, SolveMethod::SeriesParallel);
    assert_relative_eq!(eq.ohms, dy.ohms, max_relative = 1.0e-9);
    // Nodal analysis by hand: V(mid1) = 6/11 V(in), V(in) = 1375 V at 1 A.
    assert_relative_eq!(eq.ohms, 1_375.0, max_relative = 1.0e-9);
}

#[test]
fn error_taxonomy() {
    let bridge = wheatstone_bridge(100.0, 100.0, 200.0, 200.0, 300.0);
    assert!(matches!(
        equivalent_resistance(bridge.clone(), "A", "Q"),
        Err(NetworkError::UnknownNode(n)) if n == "Q"
    ));

    let mut islands = bridge.clone();
    islands.push(Resistor::between("Q", "R", 1.0));
    assert!(matches!(
        equivalent_resistance(islands, "A", "Q"),
        Err(NetworkError::DisconnectedNetwork { .. })
    ));

    let mut zero = bridge;
    zero.push(Resistor::between("C", "Z", 0.0));
    assert!(matches!(
        equivalent_resistance(zero, "A", "B"),
        Err(NetworkError::InvalidResistance { .. })
    ));
}

#[test]
fn fallback_holds_precision_when_arms_span_many_decades() {
    for (lo, hi) in [(1.0, 1.0e9), (1.0, 1.0e11), (1.0e-3, 1.0e9)] {
        let network = ResistorNetwork::from_resistors(wheatstone_bridge(lo, hi, hi, lo, hi)).unwrap();
        let eq = analyze(&network, "A", "B", &ReducerConfig::default()).unwrap();
        let dy = analyze(&network, "A", "B", &config(ReductionStrategy::SeriesParallelDeltaWye)).unwrap();
        assert_eq!(eq.method, SolveMethod::Laplacian);
        assert_eq!(dy.method, SolveMethod::SeriesParallel);
        assert_relative_eq!(eq.ohms, dy.ohms, max_relative = 1.0e-9);
    }
}

#[test]
fn overflowing_resistances_surface_as_numerical_errors() {
    let chain = [("A", "M", 1.0e308), ("M", "B", 1.0e308)];
    assert!(matches!(
        equivalent_resistance(chain, "A", "B"),
        Err(NetworkError::Numerical(_))
    ));
    let network = ResistorNetwork::from_resistors(chain).unwrap();
    assert!(matches!(
        analyze(&network, "A", "B", &ReducerConfig::laplacian_only()),
        Err(NetworkError::Numerical(_))
    ));
}

#[cfg(feature = "sparse")]
#[test]
fn sparse_solver_agrees_with_elimination() {
    let network = ResistorNetwork::from_resistors(grid(5, 6, 33.0)).unwrap();
    let sparse = ReducerConfig::default().with_solver(LaplacianSolver::SparseCholesky);
    let dense = analyze(&network, "A", "B", &ReducerConfig::default()).unwrap();
    let eq = analyze(&network, "A", "B", &sparse).unwrap();
    assert_eq!(eq.method, SolveMethod::Laplacian);
    assert_relative_eq!(eq.ohms, dense.ohms, max_relative = 1.0e-9);
}

#[test]
fn pseudo_inverse_solver_agrees_on_moderate_networks() {
    let network = ResistorNetwork::from_resistors(grid(4, 4, 10.0)).unwrap();
    let pinv = ReducerConfig::default().with_solver(LaplacianSolver::DensePseudoInverse);
    let dense = analyze(&network, "A", "B", &ReducerConfig::default()).unwrap();
    let eq = analyze(&network, "A", "B", &pinv).unwrap();
    assert_relative_eq!(eq.ohms, dense.ohms, max_relative = 1.0e-9);
}

/// Random connected network: a spanning tree over `n` nodes plus extra edges.
fn connected_network() -> impl Strategy<Value = (usize, Vec<(String, String, f64)>)> {
    (3_usize..9).prop_flat_map(|n| {
        let tree = proptest::collection::vec((any::<prop::sample::Index>(), 1.0_f64..1.0e3), n - 1);
        let extra = proptest::collection::vec((0..n, 0..n, 1.0_f64..1.0e3), 0..2 * n);
        (Just(n), tree, extra).prop_map(|(n, tree, extra)| {
            let mut edges = Vec::new();
            for (i, (parent, r)) in tree.into_iter().enumerate() {
                let child = i + 1;
                edges.push((format!("n{}", parent.index(child)), format!("n{child}"), r));
            }
            for (u, v, r) in extra {
                edges.push((format!("n{u}"), format!("n{v}"), r));
            }
            (n, edges)
        })
    })
}

proptest! {
    #[test]
    fn reduction_matches_laplacian((n, edges) in connected_network()) {
        let network = ResistorNetwork::from_resistors(edges).unwrap();
        let a = "n0";
        let b = format!("n{}", n - 1);
        let reduced = analyze(&network, a, &b, &ReducerConfig::default()).unwrap();
        let direct = analyze(&network, a, &b, &ReducerConfig::laplacian_only()).unwrap();
        prop_assert!((reduced.ohms - direct.ohms).abs() <= 1.0e-7 * direct.ohms.max(1.0));
    }

    #[test]
    fn resistance_is_symmetric((n, edges) in connected_network()) {
        let network = ResistorNetwork::from_resistors(edges).unwrap();
        let b = format!("n{}", n - 1);
        let forward = network.equivalent_resistance("n0", &b).unwrap();
        let backward = network.equivalent_resistance(&b, "n0").unwrap();
        prop_assert!((forward - backward).abs() <= 1.0e-9 * forward.max(1.0));
        prop_assert!(forward > 0.0);
    }

    #[test]
    fn delta_wye_matches_default((n, edges) in connected_network()) {
        let network = ResistorNetwork::from_resistors(edges).unwrap();
        let b = format!("n{}", n - 1);
        let plain = analyze(&network, "n0", &b, &ReducerConfig::default()).unwrap();
        let dy = analyze(&network, "n0", &b, &config(ReductionStrategy::SeriesParallelDeltaWye)).unwrap();
        prop_assert!((plain.ohms - dy.ohms).abs() <= 1.0e-7 * plain.ohms.max(1.0));
    }

    #[test]
    fn second_reduction_is_a_no_op((n, edges) in connected_network()) {
        let mut network = ResistorNetwork::from_resistors(edges).unwrap();
        let a = network.node_id("n0").unwrap();
        let b = network.node_id(&format!("n{}", n - 1)).unwrap();
        reduce(&mut network, a, b).unwrap();
        prop_assert!(reduce(&mut network, a, b).unwrap().is_empty());
    }
}
