//! Intermediate representation for code generation.
//!
//! This module pairs every constructor parameter with its classified
//! [`ParamPlan`] and indexes the abstract types, so code generation never has
//! to look at raw type strings again.

use crate::error::{ParseError, SchemaError};
use crate::type_expr::TypeExpr;
use crate::types::{Constructor, Schema};
use indexmap::IndexMap;

/// Name of the repeated-field wrapper in type strings.
pub const VECTOR_TYPE: &str = "Vector";

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone, Default)]
pub struct SchemaIr {
    /// Resolved constructors in ascending id order.
    pub constructors: Vec<ResolvedConstructor>,
    /// Abstract types in order of first appearance, with the indices of
    /// their constructors in `constructors`.
    pub abstract_types: IndexMap<String, Vec<usize>>,
}

impl SchemaIr {
    /// Creates an intermediate representation from a parsed schema.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidParam` if a parameter type cannot be parsed.
    pub fn from_schema(schema: &Schema) -> Result<Self, SchemaError> {
        let mut ir = Self::default();

        for ctor in schema.constructors.values() {
            let resolved = ResolvedConstructor::from_constructor(ctor)?;
            match &resolved.type_name {
                Some(type_name) if is_type_declaration(type_name) => {
                    tracing::debug!(
                        "Skipping built-in type '{}' of {}",
                        type_name,
                        resolved.predicate
                    );
                }
                Some(type_name) => {
                    ir.abstract_types
                        .entry(type_name.clone())
                        .or_default()
                        .push(ir.constructors.len());
                }
                None => {}
            }
            ir.constructors.push(resolved);
        }

        Ok(ir)
    }

    /// Returns the constructors of an abstract type in id order.
    #[must_use]
    pub fn constructors_of(&self, type_name: &str) -> Vec<&ResolvedConstructor> {
        self.abstract_types
            .get(type_name)
            .map(|indices| indices.iter().map(|&idx| &self.constructors[idx]).collect())
            .unwrap_or_default()
    }

    /// Returns true if at least one constructor belongs to the type.
    #[must_use]
    pub fn has_type(&self, type_name: &str) -> bool {
        self.abstract_types.contains_key(type_name)
    }
}

/// Resolved constructor information.
#[derive(Debug, Clone)]
pub struct ResolvedConstructor {
    /// Constructor id.
    pub id: i32,
    /// Dotted predicate.
    pub predicate: String,
    /// Abstract type, if any.
    pub type_name: Option<String>,
    /// Template struct name.
    pub struct_name: String,
    /// Resolved parameters in declaration order.
    pub params: Vec<ResolvedParam>,
}

impl ResolvedConstructor {
    /// Creates a resolved constructor, classifying every parameter.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidParam` if a parameter type cannot be parsed.
    pub fn from_constructor(ctor: &Constructor) -> Result<Self, SchemaError> {
        let params = ctor
            .params
            .iter()
            .map(|p| {
                classify(&p.type_name)
                    .map(|plan| ResolvedParam {
                        name: p.name.clone(),
                        raw_type: p.type_name.clone(),
                        plan,
                    })
                    .map_err(|source| SchemaError::InvalidParam {
                        predicate: ctor.predicate.clone(),
                        param: p.name.clone(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            id: ctor.id,
            predicate: ctor.predicate.clone(),
            type_name: ctor.type_name.clone(),
            struct_name: format!("_{}", template_ident(&ctor.predicate)),
            params,
        })
    }

    /// Returns the low 32 bits of the id as lower-case hex.
    #[must_use]
    pub fn hex_id(&self) -> String {
        format!("{:x}", self.id as u32)
    }

    /// Returns the distinct nested types referenced by the parameters, in
    /// order of first reference.
    #[must_use]
    pub fn dependencies(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = Vec::new();
        for param in &self.params {
            if let Some(name) = param.plan.referenced_type_name.as_deref() {
                if !deps.contains(&name) {
                    deps.push(name);
                }
            }
        }
        deps
    }
}

/// Resolved parameter.
#[derive(Debug, Clone)]
pub struct ResolvedParam {
    /// Parameter name.
    pub name: String,
    /// Raw type string.
    pub raw_type: String,
    /// Classification result.
    pub plan: ParamPlan,
}

/// How a parameter is laid out in a generated template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamPlan {
    /// Template type of the field; `None` when the field occupies no bytes.
    pub emitted_type: Option<String>,
    /// Whether the field is a length-prefixed vector.
    pub is_vector: bool,
    /// Element type name of a vector, as written in the schema.
    pub vector_element_type: Option<String>,
    /// Whether the field embeds a nested abstract type by value.
    pub is_nested_reference: bool,
    /// Abstract type that must be generated for this field (nested field or
    /// nested vector element).
    pub referenced_type_name: Option<String>,
    /// Flag bit guarding the field.
    pub flag_bit: Option<u8>,
    /// Name of the flags parameter holding `flag_bit`.
    pub flags_field: Option<String>,
    /// Whether this parameter is itself a `#` flags word.
    pub is_flags_word: bool,
}

/// Classifies a raw parameter type string.
///
/// # Errors
/// Returns `ParseError` if the string is malformed or uses an unsupported
/// shape (a generic other than `Vector`, a nested vector, a conditional `#`).
pub fn classify(raw: &str) -> Result<ParamPlan, ParseError> {
    let expr = TypeExpr::parse(raw)?;
    let (condition, inner) = expr.split_condition();

    let mut plan = match inner {
        TypeExpr::FlagsWord if condition.is_some() => {
            return Err(ParseError::invalid_type(raw, 0, "conditional flags word"));
        }
        TypeExpr::FlagsWord => ParamPlan {
            is_flags_word: true,
            ..ParamPlan::default()
        },
        TypeExpr::Named(name) => classify_named(name),
        TypeExpr::Generic { name, arg } if name.eq_ignore_ascii_case(VECTOR_TYPE) => match arg.as_ref() {
            TypeExpr::Named(element) => classify_vector(element),
            _ => return Err(ParseError::invalid_type(raw, 0, "unsupported vector element")),
        },
        TypeExpr::Generic { name, .. } => {
            return Err(ParseError::invalid_type(
                raw,
                0,
                format!("unsupported generic type '{}'", name),
            ));
        }
        TypeExpr::Conditional { .. } => {
            return Err(ParseError::invalid_type(raw, 0, "nested condition"));
        }
    };

    if let Some((flags, bit)) = condition {
        plan.flags_field = Some(flags.to_string());
        plan.flag_bit = Some(bit);
    }
    Ok(plan)
}

/// Maps a bare TL type to its prelude template type.
///
/// Returns `Some(None)` for zero-width types (`true`, `false`), `Some(Some(_))`
/// for primitives and `None` for anything that names an abstract type.
#[must_use]
pub fn primitive_template_type(name: &str) -> Option<Option<&'static str>> {
    match name {
        "int" => Some(Some("int")),
        "long" => Some(Some("int64")),
        "double" => Some(Some("double")),
        "string" => Some(Some("TLString")),
        "bytes" => Some(Some("TLBytes")),
        "bool" | "Bool" => Some(Some("TLBool")),
        "true" | "false" => Some(None),
        _ => None,
    }
}

fn classify_named(name: &str) -> ParamPlan {
    match primitive_template_type(name) {
        Some(emitted) => ParamPlan {
            emitted_type: emitted.map(str::to_string),
            ..ParamPlan::default()
        },
        None => {
            let name = name.trim_start_matches('%');
            ParamPlan {
                emitted_type: Some(template_ident(name)),
                is_nested_reference: true,
                referenced_type_name: Some(name.to_string()),
                ..ParamPlan::default()
            }
        }
    }
}

fn classify_vector(element: &str) -> ParamPlan {
    match primitive_template_type(element) {
        Some(emitted) => ParamPlan {
            // Vector<true> carries no payload; keep it as an opaque int vector
            emitted_type: Some(vector_ident(emitted.unwrap_or("int"))),
            is_vector: true,
            vector_element_type: Some(element.to_string()),
            ..ParamPlan::default()
        },
        None => {
            let element = element.trim_start_matches('%');
            ParamPlan {
                emitted_type: Some(vector_ident(&template_ident(element))),
                is_vector: true,
                vector_element_type: Some(element.to_string()),
                referenced_type_name: Some(element.to_string()),
                ..ParamPlan::default()
            }
        }
    }
}

/// Returns true for a parameterized type declaration such as `Vector t`.
///
/// These are built into the wire format (vectors are emitted by their own
/// template) and never form a union.
#[must_use]
pub fn is_type_declaration(type_name: &str) -> bool {
    type_name.contains(char::is_whitespace)
}

/// Converts a dotted TL name into a template identifier.
///
/// Dots become `__`; any other character outside `[A-Za-z0-9_]` becomes `_`.
#[must_use]
pub fn template_ident(name: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '.' => ident.push_str("__"),
            c if c.is_ascii_alphanumeric() || c == '_' => ident.push(c),
            _ => ident.push('_'),
        }
    }
    ident
}

/// Returns the template identifier of the vector wrapper for an element type.
#[must_use]
pub fn vector_ident(element_ident: &str) -> String {
    format!("Vector_{}", element_ident)
}

/// Returns the case- and separator-normalized identity of an abstract type.
#[must_use]
pub fn type_identity(type_name: &str) -> String {
    type_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
