//! # tlbt Schema
//!
//! TL JSON schema loading and type resolution.
//!
//! This crate provides:
//! - Loading of the JSON form of a TL schema (constructors and methods, id-sorted)
//! - A parser for parameter type strings (`flags.N?T`, `Vector<T>`, `#`, ...)
//! - Classification of parameters into primitive, vector, flag and nested categories
//! - Intermediate representation for code generation

pub mod error;
pub mod ir;
pub mod parser;
pub mod type_expr;
pub mod types;

pub use error::{ParseError, SchemaError};
pub use ir::{ParamPlan, ResolvedConstructor, ResolvedParam, SchemaIr};
pub use parser::{load_schema, parse_schema};
pub use type_expr::TypeExpr;
pub use types::{Constructor, Method, Param, Schema};
