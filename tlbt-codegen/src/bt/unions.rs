//! Tagged-union and vector wrapper emission.
//!
//! An abstract type is modelled as a [`UnionTemplate`]: the list of concrete
//! constructors that may follow its leading `id`. Rendering turns the variant
//! list into one branch per constructor and a fatal fallback for unknown ids.

use super::{VECTOR_ID, emit_fatal};
use tlbt_schema::ir::{ResolvedConstructor, template_ident, vector_ident};

/// One concrete shape of an abstract type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionVariant {
    /// Discriminator value.
    pub id: i32,
    /// Constructor predicate.
    pub predicate: String,
    /// Template struct embedded when the id matches.
    pub struct_name: String,
}

/// Abstract type selected at parse time by its leading id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionTemplate {
    /// Dotted abstract type name.
    pub type_name: String,
    /// Template struct name.
    pub struct_name: String,
    /// Variants in branch order.
    pub variants: Vec<UnionVariant>,
}

impl UnionTemplate {
    /// Creates the union of the given constructors, keeping their order.
    #[must_use]
    pub fn new<'a>(
        type_name: &str,
        constructors: impl IntoIterator<Item = &'a ResolvedConstructor>,
    ) -> Self {
        let variants = constructors
            .into_iter()
            .map(|ctor| UnionVariant {
                id: ctor.id,
                predicate: ctor.predicate.clone(),
                struct_name: ctor.struct_name.clone(),
            })
            .collect();

        Self {
            type_name: type_name.to_string(),
            struct_name: template_ident(type_name),
            variants,
        }
    }

    /// Returns the variant selected by a discriminator.
    #[must_use]
    pub fn variant(&self, id: i32) -> Option<&UnionVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Returns true if no constructor belongs to the type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Renders the union struct.
    #[must_use]
    pub fn render(&self, indent: &str) -> String {
        let mut output = String::new();
        let nested = format!("{}{}", indent, indent);

        output.push_str(&format!(
            "struct {} {{ // {}\n",
            self.struct_name, self.type_name
        ));
        output.push_str(&format!("{}int id;\n", indent));

        if self.variants.is_empty() {
            emit_fatal(&mut output, indent, "id", &self.type_name);
        } else {
            for (idx, variant) in self.variants.iter().enumerate() {
                let clause = if idx == 0 { "if" } else { "else if" };
                output.push_str(&format!(
                    "{}{} (id == {}) // {}\n",
                    indent, clause, variant.id, variant.predicate
                ));
                output.push_str(&format!("{}{} value;\n", nested, variant.struct_name));
            }
            output.push_str(&format!("{}else {{\n", indent));
            emit_fatal(&mut output, &nested, "id", &self.type_name);
            output.push_str(&format!("{}}}\n", indent));
        }

        output.push_str("};\n\n");
        output
    }
}

/// Length-prefixed vector of one element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorTemplate {
    /// Template struct name.
    pub struct_name: String,
    /// Template type of the elements.
    pub element: String,
    /// Human-readable label used in error messages.
    pub label: String,
}

impl VectorTemplate {
    /// Creates the vector wrapper of an abstract type.
    #[must_use]
    pub fn for_type(type_name: &str) -> Self {
        let element = template_ident(type_name);
        Self {
            struct_name: vector_ident(&element),
            element,
            label: format!("Vector<{}>", type_name),
        }
    }

    /// Creates the vector wrapper of a prelude primitive.
    #[must_use]
    pub fn for_primitive(element: &str, tl_name: &str) -> Self {
        Self {
            struct_name: vector_ident(element),
            element: element.to_string(),
            label: format!("Vector<{}>", tl_name),
        }
    }

    /// Renders the vector struct.
    ///
    /// Elements follow each other with no padding, so the array is declared
    /// unoptimized.
    #[must_use]
    pub fn render(&self, indent: &str) -> String {
        let mut output = String::new();
        let nested = format!("{}{}", indent, indent);

        output.push_str(&format!(
            "struct {} {{ // {}\n",
            self.struct_name, self.label
        ));
        output.push_str(&format!("{}int id;\n", indent));
        output.push_str(&format!("{}if (id != 0x{:08x}) {{\n", indent, VECTOR_ID));
        emit_fatal(&mut output, &nested, "vector id", &self.label);
        output.push_str(&format!("{}}}\n", indent));
        output.push_str(&format!("{}int size;\n", indent));
        output.push_str(&format!("{}if (size > 0)\n", indent));
        output.push_str(&format!(
            "{}{} items[size] <optimize=false>;\n",
            nested, self.element
        ));
        output.push_str("};\n\n");
        output
    }
}
