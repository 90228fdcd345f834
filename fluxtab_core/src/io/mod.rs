//! Module for reading and writing reaction tables
pub mod eqn_parse;
pub mod json;

use thiserror::Error;

use crate::metabolic_model::table::SchemaError;

/// Errors arising while reading or writing a reaction table
#[derive(Debug, Error)]
pub enum IoError {
    /// The file could not be read
    #[error("file could not be read")]
    FileNotFound,
    /// The file could not be written
    #[error("file could not be written")]
    FileWrite,
    /// The data is not a valid JSON array of reaction rows
    #[error("failed to deserialize reaction table: {0}")]
    DeserializeError(#[from] serde_json::Error),
    /// The data does not carry the required columns
    #[error(transparent)]
    SchemaError(#[from] SchemaError),
}
