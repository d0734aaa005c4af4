//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tlbt::prelude::*;
//! ```

// Schema types
pub use tlbt_schema::{
    Constructor, Method, Param, ParamPlan, ParseError, ResolvedConstructor, ResolvedParam,
    Schema, SchemaError, SchemaIr, TypeExpr, load_schema, parse_schema,
};

// Generation types
pub use tlbt_codegen::{
    Artifact, ArtifactSink, CodegenError, DirectorySink, GenerationContext, GenerationReport,
    Generator, GeneratorConfig, MemorySink, Outcome,
};
