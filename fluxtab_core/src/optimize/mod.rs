//! Module for the optimization problem handed to an external LP solver

pub mod problem;

use indexmap::IndexMap;

/// Struct representing the solution to an optimization problem
///
/// Produced by whichever external solver consumes a
/// [`FluxBalanceProblem`](problem::FluxBalanceProblem); this crate only builds
/// problems, it never solves them.
#[derive(Debug, Clone)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the optimization was
    /// completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if the optimization was completed successfully, None otherwise
    pub objective_value: Option<f64>,
    /// Optimal flux through each reaction
    ///
    /// Some(IndexMap), keyed by reaction abbreviation, if the problem could be
    /// solved, None otherwise
    pub fluxes: Option<IndexMap<String, f64>>,
    /// Dual values of the mass-balance constraints
    ///
    /// Some(IndexMap), keyed by metabolite name, if the problem could be solved
    /// and the solver supports retrieving the dual values, None otherwise
    pub shadow_prices: Option<IndexMap<String, f64>>,
}

impl ProblemSolution {
    /// Whether the solver reached an optimum
    pub fn is_optimal(&self) -> bool {
        self.status == OptimizationStatus::Optimal
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OptimizationStatus {
    /// Problem has not yet attempted to be optimized
    Unoptimized,
    /// Problem has been optimized
    Optimal,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
}
