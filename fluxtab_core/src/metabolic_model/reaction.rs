//! This module provides a struct for representing reactions
use derive_builder::Builder;
use indexmap::IndexMap;
use serde_json::Value;

use crate::configuration::CONFIGURATION;

/// Represents one row of a reaction table
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction (must be unique within a table)
    #[builder(setter(into))]
    pub id: String,
    /// Chemical equation of the reaction, e.g. `"akg + nadh -> glu"`
    ///
    /// Consumed only by equation parsing; dropped once the table is expanded.
    #[builder(setter(into))]
    pub equation: String,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    pub upper_bound: f64,
    /// Coefficient of this reaction's flux in the objective function
    #[builder(default = "0.0")]
    pub objective_coefficient: f64,
    /// Additional columns from the source table, carried through untouched
    #[builder(default = "IndexMap::new()")]
    pub extra: IndexMap<String, Value>,
}
