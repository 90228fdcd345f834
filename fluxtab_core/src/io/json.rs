//! Module providing JSON IO for reaction tables
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::io::IoError;
use crate::metabolic_model::reaction::Reaction;
use crate::metabolic_model::table::{ReactionTable, SchemaError};

/// Columns every serialized reaction table must provide
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["abbreviation", "equation", "lowbnd", "uppbnd", "obj_coef"];

// region JSON Reaction
/// Represents a JSON serialized reaction row, used for reading and writing tables
#[derive(Serialize, Deserialize)]
struct JsonReaction {
    abbreviation: String,
    equation: String,
    lowbnd: f64,
    uppbnd: f64,
    obj_coef: f64,
    /// Any further columns, passed through untouched
    #[serde(flatten)]
    extra: IndexMap<String, Value>,
}
// endregion JSON Reaction

// region Conversions
impl From<JsonReaction> for Reaction {
    fn from(r: JsonReaction) -> Self {
        Self {
            id: r.abbreviation,
            equation: r.equation,
            lower_bound: r.lowbnd,
            upper_bound: r.uppbnd,
            objective_coefficient: r.obj_coef,
            extra: r.extra,
        }
    }
}

impl From<&Reaction> for JsonReaction {
    fn from(r: &Reaction) -> Self {
        Self {
            abbreviation: r.id.clone(),
            equation: r.equation.clone(),
            lowbnd: r.lower_bound,
            uppbnd: r.upper_bound,
            obj_coef: r.objective_coefficient,
            extra: r.extra.clone(),
        }
    }
}
// endregion Conversions

/// Read a reaction table from a JSON file
pub fn read_reaction_table<P: AsRef<Path>>(path: P) -> Result<ReactionTable, IoError> {
    let data = fs::read_to_string(path).map_err(|_| IoError::FileNotFound)?;
    reaction_table_from_str(&data)
}

/// Parse a reaction table from a JSON array of row objects
///
/// Every row must provide the columns in [`REQUIRED_COLUMNS`]; any further
/// columns are kept in the row's `extra` map and carried through expansion.
///
/// # Examples
/// ```rust
/// use fluxtab_core::io::json::reaction_table_from_str;
/// let table = reaction_table_from_str(
///     r#"[{"abbreviation": "R1", "equation": "A -> B",
///          "lowbnd": 0.0, "uppbnd": 1000.0, "obj_coef": 1.0}]"#,
/// )
/// .unwrap();
/// assert_eq!(table.len(), 1);
/// ```
pub fn reaction_table_from_str(data: &str) -> Result<ReactionTable, IoError> {
    let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_str(data)?;
    let mut table = ReactionTable::new();
    for row in rows {
        for column in REQUIRED_COLUMNS {
            if !row.contains_key(column) {
                return Err(SchemaError::MissingColumn {
                    column: column.to_string(),
                }
                .into());
            }
        }
        let reaction: JsonReaction = serde_json::from_value(Value::Object(row))?;
        table.add_reaction(reaction.into());
    }
    Ok(table)
}

/// Serialize a reaction table to a JSON string
pub fn reaction_table_to_string(table: &ReactionTable) -> Result<String, IoError> {
    let rows: Vec<JsonReaction> = table.reactions.iter().map(JsonReaction::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Write a reaction table to a JSON file
pub fn write_reaction_table<P: AsRef<Path>>(table: &ReactionTable, path: P) -> Result<(), IoError> {
    let data = reaction_table_to_string(table)?;
    fs::write(path, data).map_err(|_| IoError::FileWrite)
}
