//! Expansion of a reaction table into the long-format stoichiometry model
//!
//! Expansion is the normalization step of the pipeline: the wide table (one row
//! per reaction, stoichiometry hidden inside the equation string) becomes one
//! row per (reaction, metabolite, signed coefficient) triple, with substrates
//! negative and products positive. The expanded model is the place to make
//! programmatic edits (adding sinks, relaxing bounds, renaming metabolites)
//! before the matrix is assembled.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use crate::io::eqn_parse::arrow::{ArrowPattern, MalformedEquationError};
use crate::io::eqn_parse::{parse_terms, reject_compartment_prefix};
use crate::metabolic_model::table::{ReactionTable, SchemaError};

/// One signed stoichiometric entry of the long-format model
#[derive(Debug, Clone, PartialEq)]
pub struct StoichEntry {
    /// Abbreviation of the owning reaction
    pub reaction: String,
    /// Metabolite consumed or produced
    pub metabolite: String,
    /// Signed coefficient: negative for substrates, positive for products
    pub coefficient: f64,
}

/// A reaction row after expansion, with the equation column dropped
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedReaction {
    /// Abbreviation of the reaction
    pub id: String,
    /// Lower flux bound
    pub lower_bound: f64,
    /// Upper flux bound
    pub upper_bound: f64,
    /// Coefficient of this reaction's flux in the objective function
    pub objective_coefficient: f64,
    /// Whether the equation arrow allowed both directions
    ///
    /// Informational only: adjusting the lower bound for reversible reactions
    /// is left to the caller.
    pub reversible: bool,
    /// Additional columns from the source table, carried through untouched
    pub extra: IndexMap<String, Value>,
}

/// The long-format model produced by [`ReactionTable::expand`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedModel {
    /// Signed stoichiometry, substrates before products within each reaction,
    /// reactions in table order
    pub stoich: Vec<StoichEntry>,
    /// The reaction rows, in table order
    pub reactions: Vec<ExpandedReaction>,
    /// Every distinct metabolite referenced by any reaction, sorted
    /// lexicographically
    pub metabolites: Vec<String>,
}

impl ExpandedModel {
    /// The stoichiometric entries belonging to one reaction
    pub fn reaction_stoich(&self, id: &str) -> Vec<&StoichEntry> {
        self.stoich.iter().filter(|e| e.reaction == id).collect()
    }
}

impl ReactionTable {
    /// Expand the table into its long-format stoichiometry model
    ///
    /// Every equation is split on `arrow` and parsed into terms; each term
    /// becomes one [`StoichEntry`] with coefficient multiplied by -1 on the
    /// substrate side and +1 on the product side. Terms with a coefficient but
    /// no metabolite identifier are dropped with a warning rather than failing
    /// the batch, matching the permissive handling of empty equation sides.
    ///
    /// # Errors
    /// Fails before any parsing if a reaction abbreviation is duplicated or an
    /// equation starts with a compartment prefix, and during parsing if any
    /// equation does not contain exactly one arrow.
    ///
    /// # Examples
    /// ```rust
    /// use fluxtab_core::io::eqn_parse::arrow::ArrowPattern;
    /// use fluxtab_core::metabolic_model::reaction::ReactionBuilder;
    /// use fluxtab_core::metabolic_model::table::ReactionTable;
    /// let mut table = ReactionTable::new();
    /// table.add_reaction(
    ///     ReactionBuilder::default()
    ///         .id("R1")
    ///         .equation("A + 2 B -> C")
    ///         .build()
    ///         .unwrap(),
    /// );
    /// let expanded = table.expand(&ArrowPattern::default()).unwrap();
    /// assert_eq!(expanded.stoich.len(), 3);
    /// assert_eq!(expanded.metabolites, ["A", "B", "C"]);
    /// ```
    pub fn expand(&self, arrow: &ArrowPattern) -> Result<ExpandedModel, ExpandError> {
        // Schema and syntax preconditions, checked across the whole table
        // before any equation is parsed
        self.validate_schema()?;
        for reaction in &self.reactions {
            reject_compartment_prefix(&reaction.equation).map_err(|source| {
                ExpandError::EquationError {
                    abbreviation: reaction.id.clone(),
                    source,
                }
            })?;
        }

        let mut stoich = Vec::new();
        let mut metabolites = BTreeSet::new();
        let mut reactions = Vec::with_capacity(self.reactions.len());
        for reaction in &self.reactions {
            let split =
                arrow
                    .split(&reaction.equation)
                    .map_err(|source| ExpandError::EquationError {
                        abbreviation: reaction.id.clone(),
                        source,
                    })?;
            for (side, direction) in [(split.substrates, -1.0), (split.products, 1.0)] {
                for term in parse_terms(side) {
                    match term {
                        Ok(term) => {
                            metabolites.insert(term.metabolite.clone());
                            stoich.push(StoichEntry {
                                reaction: reaction.id.clone(),
                                metabolite: term.metabolite,
                                coefficient: direction * term.coefficient,
                            });
                        }
                        Err(err) => {
                            warn!("reaction '{}': dropping malformed term ({})", reaction.id, err)
                        }
                    }
                }
            }
            reactions.push(ExpandedReaction {
                id: reaction.id.clone(),
                lower_bound: reaction.lower_bound,
                upper_bound: reaction.upper_bound,
                objective_coefficient: reaction.objective_coefficient,
                reversible: split.reversible,
                extra: reaction.extra.clone(),
            });
        }
        debug!(
            "expanded {} reactions into {} stoichiometric entries over {} metabolites",
            reactions.len(),
            stoich.len(),
            metabolites.len()
        );
        Ok(ExpandedModel {
            stoich,
            reactions,
            metabolites: metabolites.into_iter().collect(),
        })
    }
}

/// Errors raised while expanding a reaction table
#[derive(Debug, Error)]
pub enum ExpandError {
    /// The table itself is malformed
    #[error(transparent)]
    SchemaError(#[from] SchemaError),
    /// One reaction's equation could not be split
    #[error("reaction '{abbreviation}': {source}")]
    EquationError {
        /// Abbreviation of the offending reaction
        abbreviation: String,
        source: MalformedEquationError,
    },
}
