//! Core rust implementation of fluxtab, a crate for building Flux Balance Analysis
//! linear programs from tabular reaction networks.
//!
//! A reaction table (one row per reaction, with a chemical equation, flux bounds and
//! an objective coefficient) is expanded into a long-format stoichiometry model, which
//! is then assembled into a sparse constraint system ready to hand to an LP solver.
//!
//! # Examples
//! ```rust
//! use fluxtab_core::io::eqn_parse::arrow::ArrowPattern;
//! use fluxtab_core::metabolic_model::reaction::ReactionBuilder;
//! use fluxtab_core::metabolic_model::table::ReactionTable;
//! use fluxtab_core::optimize::problem::FluxBalanceProblem;
//!
//! let mut table = ReactionTable::new();
//! table.add_reaction(
//!     ReactionBuilder::default()
//!         .id("R1")
//!         .equation("A + 2 B -> C")
//!         .build()
//!         .unwrap(),
//! );
//! let problem = FluxBalanceProblem::from_reaction_table(&table, &ArrowPattern::default()).unwrap();
//! assert_eq!(problem.metabolites, ["A", "B", "C"]);
//! ```

pub mod io;
pub mod metabolic_model;
pub mod optimize;
mod configuration;
