//! # tlbt
//!
//! Generates binary templates for hex editors from the JSON form of a TL
//! schema.
//!
//! Every constructor becomes a struct, every abstract type a union that
//! dispatches on the leading constructor id, and every `Vector<T>` a
//! length-prefixed array template. Optional fields are guarded by their
//! flag bits.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::path::Path;
//! use tlbt::prelude::*;
//!
//! let schema = load_schema(Path::new("schema.json"))?;
//! let ir = SchemaIr::from_schema(&schema)?;
//! let mut sink = DirectorySink::new("templates");
//!
//! let report = Generator::new(&ir).generate_into(&["Message"], &mut sink)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - JSON schema loading, type parsing and classification
//! - [`codegen`] - Template emission and recursive generation
//! - [`cli`] - Command-line front end

pub mod cli;
pub mod prelude;

/// Schema loading and type resolution.
pub mod schema {
    pub use tlbt_schema::*;
}

/// Binary-template generation.
pub mod codegen {
    pub use tlbt_codegen::*;
}
