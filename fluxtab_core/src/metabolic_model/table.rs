//! This module provides the ReactionTable struct for representing a whole reaction network
use indexmap::IndexSet;
use thiserror::Error;

use crate::metabolic_model::reaction::Reaction;

/// A reaction network in its tabular, one-row-per-reaction form
///
/// Row order is preserved throughout the pipeline: it determines the column
/// order of the assembled stoichiometric matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionTable {
    /// Reactions in input order
    pub reactions: Vec<Reaction>,
}

impl ReactionTable {
    pub fn new() -> Self {
        ReactionTable {
            reactions: Vec::new(),
        }
    }

    /// Add a reaction to the table
    ///
    /// # Examples
    /// ```rust
    /// use fluxtab_core::metabolic_model::reaction::ReactionBuilder;
    /// use fluxtab_core::metabolic_model::table::ReactionTable;
    /// let mut table = ReactionTable::new();
    /// let new_reaction = ReactionBuilder::default()
    ///     .id("new_reaction")
    ///     .equation("A -> B")
    ///     .build()
    ///     .unwrap();
    /// table.add_reaction(new_reaction);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        self.reactions.push(reaction);
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Check that every reaction id is unique
    ///
    /// Duplicates are a schema fault: they would make the abbreviation useless
    /// as a key into the stoichiometry table and the matrix columns.
    pub fn validate_schema(&self) -> Result<(), SchemaError> {
        let mut seen: IndexSet<&str> = IndexSet::with_capacity(self.reactions.len());
        for reaction in &self.reactions {
            if !seen.insert(reaction.id.as_str()) {
                return Err(SchemaError::DuplicateAbbreviation(reaction.id.clone()));
            }
        }
        Ok(())
    }
}

/// Errors in the shape of a reaction table, reported before any parsing begins
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// Two rows share the same abbreviation
    #[error("duplicate reaction abbreviation '{0}'")]
    DuplicateAbbreviation(String),
    /// A required column is absent from a serialized table
    #[error("reaction table is missing the required column '{column}'")]
    MissingColumn { column: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::reaction::ReactionBuilder;

    fn reaction(id: &str, equation: &str) -> Reaction {
        ReactionBuilder::default()
            .id(id)
            .equation(equation)
            .build()
            .unwrap()
    }

    #[test]
    fn unique_ids_pass() {
        let mut table = ReactionTable::new();
        table.add_reaction(reaction("R1", "A -> B"));
        table.add_reaction(reaction("R2", "B -> C"));
        assert!(table.validate_schema().is_ok());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn duplicate_ids_fail() {
        let mut table = ReactionTable::new();
        table.add_reaction(reaction("R1", "A -> B"));
        table.add_reaction(reaction("R1", "B -> C"));
        match table.validate_schema() {
            Err(SchemaError::DuplicateAbbreviation(id)) => assert_eq!(id, "R1"),
            other => panic!("expected DuplicateAbbreviation, got {:?}", other),
        }
    }
}
