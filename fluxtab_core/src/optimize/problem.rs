//! Provides struct representing the assembled flux balance problem
use indexmap::IndexMap;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::io::eqn_parse::arrow::ArrowPattern;
use crate::metabolic_model::expanded::{ExpandError, ExpandedModel};
use crate::metabolic_model::table::ReactionTable;

/// A solver-ready flux balance problem
///
/// Maximize `objective . v` subject to `stoichiometry . v = rhs` and
/// `lower_bounds <= v <= upper_bounds`, where `v` is the flux vector with one
/// entry per reaction. The exact field names a solver expects differ between
/// solvers; this struct carries the semantic content and leaves the final
/// translation to the solver binding.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxBalanceProblem {
    /// Stoichiometric matrix, one row per metabolite and one column per reaction
    pub stoichiometry: CscMatrix<f64>,
    /// Row labels: metabolite names, sorted lexicographically
    pub metabolites: Vec<String>,
    /// Column labels: reaction abbreviations, in table order
    pub reactions: Vec<String>,
    /// Objective coefficient of each reaction, in column order
    pub objective: Vec<f64>,
    /// Lower flux bound of each reaction, in column order
    pub lower_bounds: Vec<f64>,
    /// Upper flux bound of each reaction, in column order
    pub upper_bounds: Vec<f64>,
    /// Right hand side of each mass-balance constraint, all zero at steady state
    pub rhs: Vec<f64>,
    /// Sense of every constraint row
    pub constraint_sense: ConstraintSense,
    /// Direction of optimization
    pub objective_sense: ObjectiveSense,
}

impl FluxBalanceProblem {
    /// Assemble the sparse constraint system from an expanded model
    ///
    /// Rows follow the lexicographic metabolite ordering (re-sorted here, so a
    /// hand-edited expanded model is re-canonicalized) and columns follow the
    /// reaction order. Duplicate (metabolite, reaction) pairs are summed:
    /// assembly goes through triplet form, whose conversion to compressed
    /// storage adds coincident entries together, which is what net
    /// stoichiometry requires.
    ///
    /// # Errors
    /// Returns a [`ProblemError`] if a stoichiometric entry references a
    /// reaction or metabolite missing from the expanded model's lists.
    pub fn from_expanded(model: &ExpandedModel) -> Result<Self, ProblemError> {
        let mut metabolites = model.metabolites.clone();
        metabolites.sort();
        metabolites.dedup();
        let reactions: Vec<String> = model.reactions.iter().map(|r| r.id.clone()).collect();
        let met_index: IndexMap<&str, usize> = metabolites
            .iter()
            .enumerate()
            .map(|(row, m)| (m.as_str(), row))
            .collect();
        let rxn_index: IndexMap<&str, usize> = reactions
            .iter()
            .enumerate()
            .map(|(col, r)| (r.as_str(), col))
            .collect();

        let mut triplets = CooMatrix::new(metabolites.len(), reactions.len());
        for entry in &model.stoich {
            let row = *met_index
                .get(entry.metabolite.as_str())
                .ok_or_else(|| ProblemError::UnknownMetabolite(entry.metabolite.clone()))?;
            let col = *rxn_index
                .get(entry.reaction.as_str())
                .ok_or_else(|| ProblemError::UnknownReaction(entry.reaction.clone()))?;
            triplets.push(row, col, entry.coefficient);
        }

        Ok(FluxBalanceProblem {
            stoichiometry: CscMatrix::from(&triplets),
            rhs: vec![0.0; metabolites.len()],
            metabolites,
            reactions,
            objective: model
                .reactions
                .iter()
                .map(|r| r.objective_coefficient)
                .collect(),
            lower_bounds: model.reactions.iter().map(|r| r.lower_bound).collect(),
            upper_bounds: model.reactions.iter().map(|r| r.upper_bound).collect(),
            constraint_sense: ConstraintSense::Equal,
            objective_sense: ObjectiveSense::Maximize,
        })
    }

    /// Expand `table` and assemble the problem in one call
    ///
    /// # Examples
    /// ```rust
    /// use fluxtab_core::io::eqn_parse::arrow::ArrowPattern;
    /// use fluxtab_core::metabolic_model::reaction::ReactionBuilder;
    /// use fluxtab_core::metabolic_model::table::ReactionTable;
    /// use fluxtab_core::optimize::problem::FluxBalanceProblem;
    /// let mut table = ReactionTable::new();
    /// table.add_reaction(
    ///     ReactionBuilder::default()
    ///         .id("R1")
    ///         .equation("A <=> B")
    ///         .build()
    ///         .unwrap(),
    /// );
    /// let problem = FluxBalanceProblem::from_reaction_table(&table, &ArrowPattern::default()).unwrap();
    /// assert_eq!(problem.coefficient("A", "R1"), Some(-1.0));
    /// ```
    pub fn from_reaction_table(
        table: &ReactionTable,
        arrow: &ArrowPattern,
    ) -> Result<Self, FormulateError> {
        let expanded = table.expand(arrow)?;
        Ok(Self::from_expanded(&expanded)?)
    }

    pub fn num_metabolites(&self) -> usize {
        self.metabolites.len()
    }

    pub fn num_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Row index of a metabolite, if present
    pub fn metabolite_index(&self, metabolite: &str) -> Option<usize> {
        self.metabolites
            .binary_search_by(|m| m.as_str().cmp(metabolite))
            .ok()
    }

    /// Column index of a reaction, if present
    pub fn reaction_index(&self, reaction: &str) -> Option<usize> {
        self.reactions.iter().position(|r| r == reaction)
    }

    /// Net stoichiometric coefficient of `metabolite` in `reaction`
    ///
    /// Zero for pairs with no explicit entry, None for unknown labels.
    pub fn coefficient(&self, metabolite: &str, reaction: &str) -> Option<f64> {
        let row = self.metabolite_index(metabolite)?;
        let col = self.reaction_index(reaction)?;
        self.stoichiometry
            .get_entry(row, col)
            .map(|entry| entry.into_value())
    }

    /// Check whether a flux assignment satisfies the flux bounds and the
    /// mass-balance constraints, within the configured numeric tolerance
    ///
    /// Intended for sanity-checking a solution returned by an external solver.
    /// Missing reactions in `fluxes` count as infeasible.
    pub fn is_feasible(&self, fluxes: &IndexMap<String, f64>) -> bool {
        let tolerance = CONFIGURATION.read().unwrap().tolerance;
        let mut values = Vec::with_capacity(self.reactions.len());
        for (col, reaction) in self.reactions.iter().enumerate() {
            let flux = match fluxes.get(reaction) {
                Some(flux) => *flux,
                None => return false,
            };
            if flux < self.lower_bounds[col] - tolerance || flux > self.upper_bounds[col] + tolerance
            {
                return false;
            }
            values.push(flux);
        }
        let mut residual = vec![0.0; self.metabolites.len()];
        for (row, col, coefficient) in self.stoichiometry.triplet_iter() {
            residual[row] += *coefficient * values[col];
        }
        residual
            .iter()
            .zip(&self.rhs)
            .all(|(lhs, rhs)| (lhs - rhs).abs() <= tolerance)
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

/// Relation between each constraint row and its right hand side
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintSense {
    /// Row value must equal the right hand side (steady-state mass balance)
    Equal,
    /// Row value must not exceed the right hand side
    LessEqual,
    /// Row value must not fall below the right hand side
    GreaterEqual,
}

/// Errors associated with assembling the problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// A stoichiometric entry references a reaction absent from the reaction list
    #[error("stoichiometry references reaction '{0}' which is not in the reaction table")]
    UnknownReaction(String),
    /// A stoichiometric entry references a metabolite absent from the metabolite list
    #[error("stoichiometry references metabolite '{0}' which is not in the metabolite list")]
    UnknownMetabolite(String),
}

/// Errors raised while formulating a problem straight from a reaction table
#[derive(Error, Debug)]
pub enum FormulateError {
    /// Error while expanding the reaction table
    #[error(transparent)]
    ExpandError(#[from] ExpandError),
    /// Error while assembling the matrix
    #[error(transparent)]
    ProblemError(#[from] ProblemError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::expanded::StoichEntry;
    use crate::metabolic_model::reaction::ReactionBuilder;

    fn small_table() -> ReactionTable {
        let mut table = ReactionTable::new();
        table.add_reaction(
            ReactionBuilder::default()
                .id("R1")
                .equation("A + 2 B -> C")
                .lower_bound(0.0)
                .upper_bound(1000.0)
                .build()
                .unwrap(),
        );
        table.add_reaction(
            ReactionBuilder::default()
                .id("EX_a")
                .equation(" -> A")
                .build()
                .unwrap(),
        );
        table.add_reaction(
            ReactionBuilder::default()
                .id("EX_c")
                .equation("C -> ")
                .objective_coefficient(1.0)
                .build()
                .unwrap(),
        );
        table
    }

    #[test]
    fn dimensions_and_labels() {
        let problem =
            FluxBalanceProblem::from_reaction_table(&small_table(), &ArrowPattern::default())
                .unwrap();
        assert_eq!(problem.num_metabolites(), 3);
        assert_eq!(problem.num_reactions(), 3);
        assert_eq!(problem.stoichiometry.nrows(), 3);
        assert_eq!(problem.stoichiometry.ncols(), 3);
        assert_eq!(problem.metabolites, ["A", "B", "C"]);
        assert_eq!(problem.reactions, ["R1", "EX_a", "EX_c"]);
    }

    #[test]
    fn entries_are_signed_coefficients() {
        let problem =
            FluxBalanceProblem::from_reaction_table(&small_table(), &ArrowPattern::default())
                .unwrap();
        assert_eq!(problem.coefficient("A", "R1"), Some(-1.0));
        assert_eq!(problem.coefficient("B", "R1"), Some(-2.0));
        assert_eq!(problem.coefficient("C", "R1"), Some(1.0));
        assert_eq!(problem.coefficient("A", "EX_a"), Some(1.0));
        assert_eq!(problem.coefficient("C", "EX_c"), Some(-1.0));
        // Absent pair is an explicit zero, unknown label is None
        assert_eq!(problem.coefficient("B", "EX_a"), Some(0.0));
        assert_eq!(problem.coefficient("Z", "EX_a"), None);
    }

    #[test]
    fn column_nonzeros_match_term_counts() {
        let problem =
            FluxBalanceProblem::from_reaction_table(&small_table(), &ArrowPattern::default())
                .unwrap();
        let mut per_column = vec![0usize; problem.num_reactions()];
        for (_, col, _) in problem.stoichiometry.triplet_iter() {
            per_column[col] += 1;
        }
        assert_eq!(per_column, [3, 1, 1]);
    }

    #[test]
    fn vectors_follow_column_order() {
        let problem =
            FluxBalanceProblem::from_reaction_table(&small_table(), &ArrowPattern::default())
                .unwrap();
        assert_eq!(problem.objective, [0.0, 0.0, 1.0]);
        assert_eq!(problem.lower_bounds, [0.0, -1000.0, -1000.0]);
        assert_eq!(problem.upper_bounds, [1000.0, 1000.0, 1000.0]);
        assert_eq!(problem.rhs, [0.0, 0.0, 0.0]);
        assert_eq!(problem.constraint_sense, ConstraintSense::Equal);
        assert_eq!(problem.objective_sense, ObjectiveSense::Maximize);
    }

    #[test]
    fn duplicate_metabolite_entries_accumulate() {
        let mut table = ReactionTable::new();
        table.add_reaction(
            ReactionBuilder::default()
                .id("R1")
                .equation("A + A -> B")
                .build()
                .unwrap(),
        );
        let problem =
            FluxBalanceProblem::from_reaction_table(&table, &ArrowPattern::default()).unwrap();
        assert_eq!(problem.coefficient("A", "R1"), Some(-2.0));
        // The two occurrences collapse into one stored entry
        assert_eq!(problem.stoichiometry.nnz(), 2);
    }

    #[test]
    fn dangling_stoich_reference_fails() {
        let table = small_table();
        let mut expanded = table.expand(&ArrowPattern::default()).unwrap();
        expanded.stoich.push(StoichEntry {
            reaction: "missing".to_string(),
            metabolite: "A".to_string(),
            coefficient: 1.0,
        });
        match FluxBalanceProblem::from_expanded(&expanded) {
            Err(ProblemError::UnknownReaction(id)) => assert_eq!(id, "missing"),
            other => panic!("expected UnknownReaction, got {:?}", other),
        }

        let mut expanded = table.expand(&ArrowPattern::default()).unwrap();
        expanded.stoich.push(StoichEntry {
            reaction: "R1".to_string(),
            metabolite: "ghost".to_string(),
            coefficient: 1.0,
        });
        match FluxBalanceProblem::from_expanded(&expanded) {
            Err(ProblemError::UnknownMetabolite(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected UnknownMetabolite, got {:?}", other),
        }
    }

    #[test]
    fn editing_the_expanded_model_before_assembly() {
        // The expanded model is the extension surface: add a sink for B and
        // the matrix picks it up
        let table = small_table();
        let mut expanded = table.expand(&ArrowPattern::default()).unwrap();
        expanded.stoich.push(StoichEntry {
            reaction: "EX_a".to_string(),
            metabolite: "B".to_string(),
            coefficient: 1.0,
        });
        let problem = FluxBalanceProblem::from_expanded(&expanded).unwrap();
        assert_eq!(problem.coefficient("B", "EX_a"), Some(1.0));
    }

    #[test]
    fn feasibility_of_a_steady_state_flux() {
        let mut table = ReactionTable::new();
        for (id, equation) in [("EX_in", " -> A"), ("R1", "A -> B"), ("EX_out", "B -> ")] {
            table.add_reaction(
                ReactionBuilder::default()
                    .id(id)
                    .equation(equation)
                    .lower_bound(0.0)
                    .upper_bound(10.0)
                    .build()
                    .unwrap(),
            );
        }
        let problem =
            FluxBalanceProblem::from_reaction_table(&table, &ArrowPattern::default()).unwrap();

        let balanced: IndexMap<String, f64> = [("EX_in", 5.0), ("R1", 5.0), ("EX_out", 5.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert!(problem.is_feasible(&balanced));

        let unbalanced: IndexMap<String, f64> = [("EX_in", 5.0), ("R1", 3.0), ("EX_out", 3.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert!(!problem.is_feasible(&unbalanced));

        let out_of_bounds: IndexMap<String, f64> = [("EX_in", 20.0), ("R1", 20.0), ("EX_out", 20.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert!(!problem.is_feasible(&out_of_bounds));

        let incomplete: IndexMap<String, f64> =
            [("EX_in", 5.0)].into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert!(!problem.is_feasible(&incomplete));
    }

    #[test]
    fn empty_table_builds_an_empty_problem() {
        let table = ReactionTable::new();
        let problem =
            FluxBalanceProblem::from_reaction_table(&table, &ArrowPattern::default()).unwrap();
        assert_eq!(problem.num_metabolites(), 0);
        assert_eq!(problem.num_reactions(), 0);
        assert_eq!(problem.stoichiometry.nnz(), 0);
    }
}
