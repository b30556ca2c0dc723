//! Reducer configuration.

/// Which reduction rules run before the Laplacian fallback.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionStrategy {
    /// Series and parallel rules only; anything left goes to the Laplacian.
    #[default]
    SeriesParallel,
    /// Series and parallel rules plus Δ–Y transforms when they stall.
    SeriesParallelDeltaWye,
    /// Skip reduction and solve the whole terminal component by the Laplacian.
    LaplacianOnly,
}

/// Linear-algebra backend used when reduction does not collapse the network.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaplacianSolver {
    /// Node-by-node elimination down to the terminal pair.
    #[default]
    Elimination,
    /// Dense Moore–Penrose pseudoinverse via SVD.
    DensePseudoInverse,
    /// Grounded sparse Cholesky solve (feature = "sparse").
    #[cfg(feature = "sparse")]
    SparseCholesky,
}

/// Parameters controlling an equivalent-resistance computation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReducerConfig {
    /// Reduction rules to apply.
    pub strategy: ReductionStrategy,
    /// Backend for the fallback path.
    pub solver: LaplacianSolver,
    /// Singular values below `tolerance * max|L|` are treated as zero
    /// (pseudoinverse paths only).
    pub pinv_tolerance: f64,
}

impl ReducerConfig {
    /// Default series/parallel configuration with the elimination fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that skips reduction entirely.
    #[must_use]
    pub fn laplacian_only() -> Self {
        Self {
            strategy: ReductionStrategy::LaplacianOnly,
            ..Self::default()
        }
    }

    /// Returns a copy with a different reduction strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ReductionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns a copy with a different fallback backend.
    #[must_use]
    pub fn with_solver(mut self, solver: LaplacianSolver) -> Self {
        self.solver = solver;
        self
    }
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            strategy: ReductionStrategy::SeriesParallel,
            solver: LaplacianSolver::Elimination,
            pinv_tolerance: 1.0e-10,
        }
    }
}
