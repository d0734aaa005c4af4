//! Primitive prelude shared by every generated template.

use super::unions::VectorTemplate;
use crate::config::GeneratorConfig;

/// `boolTrue` constructor id.
pub const BOOL_TRUE_ID: u32 = 0x9972_75b5;
/// `boolFalse` constructor id.
pub const BOOL_FALSE_ID: u32 = 0xbc79_9737;

/// Length-prefixed primitives: template name, payload element type.
const LENGTH_PREFIXED: &[(&str, &str)] = &[("TLString", "char"), ("TLBytes", "ubyte")];

/// Vector wrappers of primitive elements: template element, TL name.
const PRIMITIVE_VECTORS: &[(&str, &str)] = &[
    ("int", "int"),
    ("int64", "long"),
    ("double", "double"),
    ("TLString", "string"),
    ("TLBytes", "bytes"),
    ("TLBool", "Bool"),
];

/// Generator for the prelude definitions.
pub struct PreludeEmitter<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> PreludeEmitter<'a> {
    /// Creates a new prelude emitter.
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generates the prelude body.
    #[must_use]
    pub fn emit(&self) -> String {
        let mut output = String::new();

        output.push_str("LittleEndian();\n");
        output.push_str("BitfieldRightToLeft();\n\n");

        for (name, element) in LENGTH_PREFIXED {
            output.push_str(&self.emit_length_prefixed(name, element));
        }
        output.push_str(&self.emit_bool());

        for (element, tl_name) in PRIMITIVE_VECTORS {
            output.push_str(&VectorTemplate::for_primitive(element, tl_name).render(&self.config.indent));
        }

        output
    }

    /// Generates a string-like struct: a 1-byte length, or 254 followed by a
    /// 3-byte length, then the payload padded to a multiple of 4 bytes.
    fn emit_length_prefixed(&self, name: &str, element: &str) -> String {
        let i = self.config.indent.as_str();
        let mut output = String::new();

        output.push_str(&format!("struct {} {{\n", name));
        output.push_str(&format!("{i}ubyte marker;\n"));
        output.push_str(&format!("{i}local int len = marker;\n"));
        output.push_str(&format!("{i}local int head = 1;\n"));
        output.push_str(&format!("{i}if (marker == 254) {{\n"));
        output.push_str(&format!("{i}{i}ubyte ext[3];\n"));
        output.push_str(&format!(
            "{i}{i}len = ext[0] | (ext[1] << 8) | (ext[2] << 16);\n"
        ));
        output.push_str(&format!("{i}{i}head = 4;\n"));
        output.push_str(&format!("{i}}}\n"));
        output.push_str(&format!("{i}if (len > 0)\n"));
        output.push_str(&format!("{i}{i}{element} data[len];\n"));
        output.push_str(&format!("{i}if ((head + len) % 4 != 0)\n"));
        output.push_str(&format!("{i}{i}ubyte padding[4 - (head + len) % 4];\n"));
        output.push_str("};\n\n");

        output
    }

    /// Generates the boolean: one of two fixed 32-bit ids.
    fn emit_bool(&self) -> String {
        let i = self.config.indent.as_str();
        let mut output = String::new();

        output.push_str("struct TLBool {\n");
        output.push_str(&format!("{i}uint id;\n"));
        output.push_str(&format!(
            "{i}if (id != 0x{:08x} && id != 0x{:08x}) {{\n",
            BOOL_TRUE_ID, BOOL_FALSE_ID
        ));
        output.push_str(&format!("{i}{i}Printf(\"invalid Bool id 0x%08X\\n\", id);\n"));
        output.push_str(&format!("{i}{i}Exit(1);\n"));
        output.push_str(&format!("{i}}}\n"));
        output.push_str(&format!("{i}local int value = id == 0x{:08x};\n", BOOL_TRUE_ID));
        output.push_str("};\n\n");

        output
    }
}
