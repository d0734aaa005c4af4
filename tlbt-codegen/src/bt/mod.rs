//! Binary-template emitters.
//!
//! The generated text targets a C-like binary-template language: structs with
//! field declarations, bitfields, `if`/`else` branching on values already read,
//! arrays sized by earlier fields, `Printf` and `Exit` for fatal errors.

pub mod constructors;
pub mod prelude;
pub mod unions;

pub use constructors::{ConstructorEmitter, emit_flags_word};
pub use prelude::PreludeEmitter;
pub use unions::{UnionTemplate, UnionVariant, VectorTemplate};

/// Discriminator of a length-prefixed vector.
pub const VECTOR_ID: u32 = 0x1cb5_c415;

/// Words reserved by the template language.
const RESERVED: &[&str] = &[
    "break", "byte", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "false", "float", "for", "if", "int", "int64", "local", "long", "quad", "return",
    "short", "signed", "sizeof", "string", "struct", "switch", "true", "typedef", "ubyte",
    "uchar", "uint", "uint64", "union", "unsigned", "uquad", "ushort", "void", "while",
    "wstring",
];

/// Returns a field identifier that does not collide with a reserved word.
#[must_use]
pub fn field_ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Emits the `Printf` + `Exit` pair reporting a bad discriminator.
pub(crate) fn emit_fatal(output: &mut String, indent: &str, what: &str, label: &str) {
    output.push_str(&format!(
        "{}Printf(\"invalid {} 0x%08X for {}\\n\", id);\n",
        indent, what, label
    ));
    output.push_str(&format!("{}Exit(1);\n", indent));
}
