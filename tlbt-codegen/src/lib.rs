//! # tlbt Codegen
//!
//! Binary-template generation from TL JSON schemas.
//!
//! This crate provides:
//! - Constructor structs with flag bitfields and conditional fields
//! - Union dispatch on constructor ids, and vector templates
//! - A shared prelude for TL strings, bytes and booleans
//! - Recursive per-type generation with dependency includes

pub mod bt;
pub mod config;
pub mod error;
pub mod generator;
pub mod output;

pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::{GenerationContext, GenerationReport, Generator, Outcome};
pub use output::{Artifact, ArtifactSink, DirectorySink, MemorySink};

/// Generates a binary template from a TL JSON schema string.
///
/// With a type name, only that type is rendered, with includes for the
/// types it references. Without one, the whole schema is rendered.
///
/// # Errors
/// Returns `CodegenError` if parsing or resolution fails.
pub fn generate_from_json(json: &str, type_name: Option<&str>) -> Result<String, CodegenError> {
    let schema = tlbt_schema::parse_schema(json)?;
    let ir = tlbt_schema::SchemaIr::from_schema(&schema)?;
    let generator = Generator::new(&ir);
    Ok(match type_name {
        Some(type_name) => generator.render_type(type_name),
        None => generator.render_schema(),
    })
}

/// Generates a binary template from a TL JSON schema file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or resolution fails.
pub fn generate_from_file(
    path: &std::path::Path,
    type_name: Option<&str>,
) -> Result<String, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_from_json(&json, type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r##"{"constructors": [
        {"id": "-1132882121", "predicate": "boolFalse", "params": [], "type": "Bool"},
        {"id": 1, "predicate": "user", "params": [
            {"name": "flags", "type": "#"},
            {"name": "name", "type": "flags.0?string"}
        ], "type": "User"}
    ]}"##;

    #[test]
    fn test_generate_from_json_whole_schema() {
        let output = generate_from_json(SCHEMA, None).expect("generate");
        assert!(output.contains("struct _boolFalse { // 0xbc799737 boolFalse\n"));
        assert!(output.contains("struct _user { // 0x1 user\n"));
        assert!(output.contains("if (id == -1132882121) // boolFalse\n"));
    }

    #[test]
    fn test_generate_from_json_single_type() {
        let output = generate_from_json(SCHEMA, Some("User")).expect("generate");
        assert!(output.contains("struct _user {"));
        assert!(!output.contains("struct _boolFalse {"));
        assert!(output.contains("    if (has_name)\n        TLString name;\n"));
    }

    #[test]
    fn test_generate_from_json_invalid() {
        let err = generate_from_json("{\"constructors\": 5}", None).expect_err("invalid");
        assert!(matches!(err, CodegenError::Parse(_)));
    }

    #[test]
    fn test_generate_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schema.json");
        std::fs::write(&path, SCHEMA).expect("write");

        let output = generate_from_file(&path, Some("User")).expect("generate");
        assert!(output.contains("struct User { // User\n"));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            generate_from_file(&missing, None),
            Err(CodegenError::Io(_))
        ));
    }
}
