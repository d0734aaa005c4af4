//! TL JSON schema loader.
//!
//! This module reads the JSON form of a TL schema into the id-ordered
//! [`Schema`] representation.

use crate::error::ParseError;
use crate::types::{Constructor, Method, Schema};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct SchemaDocument {
    constructors: Vec<Constructor>,
    #[serde(default)]
    methods: Vec<Method>,
}

/// Parses a TL schema from a JSON string.
///
/// # Arguments
/// * `json` - JSON document with `constructors` and `methods` arrays
///
/// # Returns
/// Parsed schema with constructors and methods ordered by id.
///
/// # Errors
/// Returns `ParseError` if the document is not valid JSON or does not match
/// the expected shape. The error carries the path of the offending value.
pub fn parse_schema(json: &str) -> Result<Schema, ParseError> {
    let mut de = serde_json::Deserializer::from_str(json);
    let document: SchemaDocument = serde_path_to_error::deserialize(&mut de)?;
    de.end()?;

    tracing::debug!(
        "Loaded {} constructors and {} methods",
        document.constructors.len(),
        document.methods.len()
    );

    Ok(Schema::from_parts(document.constructors, document.methods))
}

/// Loads a TL schema from a JSON file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn load_schema(path: &Path) -> Result<Schema, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_schema(&json)
}
