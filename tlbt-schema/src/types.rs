//! Schema type definitions.
//!
//! This module contains the data structures representing a TL schema as it is
//! published in JSON form: constructors, methods and their parameters.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Complete TL schema, keyed and ordered by id.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Constructors by id, ascending.
    pub constructors: BTreeMap<i32, Constructor>,
    /// Methods by id, ascending. Carried through, never generated.
    pub methods: BTreeMap<i32, Method>,
}

impl Schema {
    /// Creates a schema from unordered constructor and method lists.
    ///
    /// A later entry with an already seen id replaces the earlier one.
    #[must_use]
    pub fn from_parts(constructors: Vec<Constructor>, methods: Vec<Method>) -> Self {
        let mut schema = Self::default();
        for ctor in constructors {
            if let Some(previous) = schema.constructors.insert(ctor.id, ctor) {
                tracing::warn!(
                    "Duplicate constructor id {:#x}, replacing '{}'",
                    previous.id as u32,
                    previous.predicate
                );
            }
        }
        for method in methods {
            if let Some(previous) = schema.methods.insert(method.id, method) {
                tracing::warn!(
                    "Duplicate method id {:#x}, replacing '{}'",
                    previous.id as u32,
                    previous.method
                );
            }
        }
        schema
    }

    /// Iterates the constructors of an abstract type in id order.
    pub fn constructors_of<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a Constructor> + 'a {
        self.constructors
            .values()
            .filter(move |c| c.type_name.as_deref() == Some(type_name))
    }

    /// Looks up a constructor by predicate.
    #[must_use]
    pub fn get_constructor(&self, predicate: &str) -> Option<&Constructor> {
        self.constructors.values().find(|c| c.predicate == predicate)
    }
}

/// One concrete binary shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Constructor {
    /// Constructor id (wrapped to 32-bit signed).
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i32,
    /// Dotted constructor name, e.g. `auth.sentCode`.
    pub predicate: String,
    /// Abstract type this constructor belongs to.
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Ordered parameters.
    #[serde(default)]
    pub params: Vec<Param>,
}

impl Constructor {
    /// Returns the low 32 bits of the id as lower-case hex, without padding.
    #[must_use]
    pub fn hex_id(&self) -> String {
        format!("{:x}", self.id as u32)
    }
}

/// RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Method {
    /// Method id (wrapped to 32-bit signed).
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i32,
    /// Dotted method name.
    #[serde(alias = "predicate")]
    pub method: String,
    /// Ordered parameters.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return type.
    #[serde(default, rename = "type")]
    pub return_type: Option<String>,
}

/// Named, typed parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Raw type string, e.g. `flags.2?Vector<User>`.
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Wraps any integer to its low 32 bits, reinterpreted as signed.
#[must_use]
pub const fn wrap_id(value: i64) -> i32 {
    value as u32 as i32
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(value) => Ok(wrap_id(value)),
        RawId::Text(text) => text
            .trim()
            .parse::<i64>()
            .map(wrap_id)
            .map_err(|_| serde::de::Error::custom(format!("invalid id '{}'", text))),
    }
}
