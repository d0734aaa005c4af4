//! Constructor struct and flags-word emission.

use super::field_ident;
use crate::config::GeneratorConfig;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tlbt_schema::ir::{ResolvedConstructor, ResolvedParam};
use tlbt_schema::type_expr::MAX_FLAG_BIT;

/// Generator for the struct of one concrete constructor.
pub struct ConstructorEmitter<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ConstructorEmitter<'a> {
    /// Creates a new constructor emitter.
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generates the struct for a constructor.
    ///
    /// Fields that occupy no bytes are skipped, but their flag bits still
    /// take their position in the flags word.
    #[must_use]
    pub fn emit(&self, ctor: &ResolvedConstructor) -> String {
        let indent = self.config.indent.as_str();
        let layout = FlagLayout::new(&ctor.params, &self.config.flag_prefix);
        let mut output = String::new();

        output.push_str(&format!(
            "struct {} {{ // 0x{} {}\n",
            ctor.struct_name,
            ctor.hex_id(),
            ctor.predicate
        ));

        for holder in &layout.undeclared {
            output.push_str(&format!("{}// {} (implicit)\n", indent, holder));
            output.push_str(&emit_flags_word(&layout.words[holder], indent));
        }

        for (idx, param) in ctor.params.iter().enumerate() {
            if param.plan.is_flags_word {
                output.push_str(&format!("{}// {}\n", indent, param.name));
                output.push_str(&emit_flags_word(&layout.words[&param.name], indent));
                continue;
            }

            let Some(emitted) = param.plan.emitted_type.as_deref() else {
                continue;
            };
            let name = field_ident(&param.name);

            match &layout.guards[idx] {
                Some(guard) => {
                    output.push_str(&format!("{}if ({})\n", indent, guard));
                    output.push_str(&format!("{}{}{} {};\n", indent, indent, emitted, name));
                }
                None => {
                    output.push_str(&format!("{}{} {};\n", indent, emitted, name));
                }
            }
        }

        output.push_str("};\n\n");
        output
    }
}

/// Generates a 32-bit flags word from the named bits.
///
/// Bits are laid out in ascending order; every run of unused bits becomes one
/// anonymous padding field, so the word always totals 32 bits.
#[must_use]
pub fn emit_flags_word(flags_by_bit: &BTreeMap<u8, String>, indent: &str) -> String {
    let mut output = String::new();
    let mut empty_bits = 0u8;

    for bit in 0..=MAX_FLAG_BIT {
        match flags_by_bit.get(&bit) {
            Some(name) => {
                if empty_bits > 0 {
                    output.push_str(&format!("{}uint : {};\n", indent, empty_bits));
                    empty_bits = 0;
                }
                output.push_str(&format!("{}uint {} : 1; // bit {}\n", indent, name, bit));
            }
            None => empty_bits += 1,
        }
    }

    if empty_bits > 0 {
        output.push_str(&format!("{}uint : {};\n", indent, empty_bits));
    }

    output
}

/// Flag bits of one constructor, grouped by the `#` parameter holding them.
struct FlagLayout {
    /// Bit owners per flags word, in declaration order.
    words: IndexMap<String, BTreeMap<u8, String>>,
    /// Flags words referenced by conditions but never declared.
    undeclared: Vec<String>,
    /// Guard boolean per parameter index.
    guards: Vec<Option<String>>,
}

impl FlagLayout {
    fn new(params: &[ResolvedParam], prefix: &str) -> Self {
        let mut words: IndexMap<String, BTreeMap<u8, String>> = IndexMap::new();
        for param in params.iter().filter(|p| p.plan.is_flags_word) {
            words.entry(param.name.clone()).or_default();
        }

        let mut undeclared = Vec::new();
        let mut guards = Vec::with_capacity(params.len());

        for param in params {
            let (Some(holder), Some(bit)) = (&param.plan.flags_field, param.plan.flag_bit) else {
                guards.push(None);
                continue;
            };
            if !words.contains_key(holder) {
                undeclared.push(holder.clone());
            }
            // The first field on a bit names it; later fields share the guard.
            let owner = words
                .entry(holder.clone())
                .or_default()
                .entry(bit)
                .or_insert_with(|| format!("{}{}", prefix, param.name));
            guards.push(Some(owner.clone()));
        }

        Self {
            words,
            undeclared,
            guards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlbt_schema::ir::SchemaIr;
    use tlbt_schema::parser::parse_schema;

    fn resolve(json: &str) -> SchemaIr {
        let schema = parse_schema(json).expect("Failed to parse");
        SchemaIr::from_schema(&schema).expect("Failed to resolve")
    }

    fn sent_code_ir() -> SchemaIr {
        resolve(
            r##"{"constructors": [
            {"id": "1577067778", "predicate": "auth.sentCode", "params": [
                {"name": "flags", "type": "#"},
                {"name": "type", "type": "auth.SentCodeType"},
                {"name": "phone_code_hash", "type": "string"},
                {"name": "timeout", "type": "flags.2?int"},
                {"name": "next_type", "type": "flags.1?auth.CodeType"},
                {"name": "silent", "type": "flags.4?true"}
            ], "type": "auth.SentCode"}
        ], "methods": []}"##,
        )
    }

    fn field_lines(output: &str) -> Vec<&str> {
        output.lines().map(str::trim).collect()
    }

    #[test]
    fn test_flags_word_bits_1_and_3() {
        let mut bits = BTreeMap::new();
        bits.insert(3, "has_b".to_string());
        bits.insert(1, "has_a".to_string());

        let output = emit_flags_word(&bits, "");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "uint : 1;",
                "uint has_a : 1; // bit 1",
                "uint : 1;",
                "uint has_b : 1; // bit 3",
                "uint : 28;",
            ]
        );
    }

    #[test]
    fn test_flags_word_always_32_bits() {
        let cases: Vec<Vec<u8>> = vec![vec![], vec![0], vec![31], vec![0, 31], vec![2, 5, 6, 30]];
        for bits in cases {
            let map: BTreeMap<u8, String> =
                bits.iter().map(|&b| (b, format!("has_{}", b))).collect();
            let output = emit_flags_word(&map, "    ");
            let total: u32 = output
                .lines()
                .map(|line| {
                    line.split(':')
                        .nth(1)
                        .and_then(|rest| rest.split(';').next())
                        .and_then(|width| width.trim().parse::<u32>().ok())
                        .expect("bitfield width")
                })
                .sum();
            assert_eq!(total, 32, "bits {:?}", bits);
        }
    }

    #[test]
    fn test_flags_word_empty() {
        let output = emit_flags_word(&BTreeMap::new(), "");
        assert_eq!(output, "uint : 32;\n");
    }

    #[test]
    fn test_constructor_header_comment() {
        let ir = sent_code_ir();
        let config = GeneratorConfig::default();
        let output = ConstructorEmitter::new(&config).emit(&ir.constructors[0]);

        assert!(output.starts_with("struct _auth__sentCode { // 0x5e002502 auth.sentCode\n"));
        assert!(output.ends_with("};\n\n"));
    }

    #[test]
    fn test_constructor_fields() {
        let ir = sent_code_ir();
        let config = GeneratorConfig::default();
        let output = ConstructorEmitter::new(&config).emit(&ir.constructors[0]);
        let lines = field_lines(&output);

        // flags word in bit order, not declaration order
        let bit_line = |name: &str| {
            lines
                .iter()
                .position(|l| l.starts_with(&format!("uint {} :", name)))
                .expect("missing flag bit")
        };
        let next_type = bit_line("has_next_type");
        let timeout = bit_line("has_timeout");
        let silent = bit_line("has_silent");
        assert!(next_type < timeout && timeout < silent);

        assert!(lines.contains(&"auth__SentCodeType type;"));
        assert!(lines.contains(&"TLString phone_code_hash;"));
        assert!(lines.contains(&"if (has_timeout)"));
        assert!(lines.contains(&"int timeout;"));
        assert!(lines.contains(&"if (has_next_type)"));
        assert!(lines.contains(&"auth__CodeType next_type;"));

        // zero-width field: bit only, no body
        assert!(!lines.iter().any(|l| l.ends_with(" silent;")));
        assert!(!lines.contains(&"if (has_silent)"));
        // `#` is not a field
        assert!(!lines.iter().any(|l| l.ends_with(" flags;")));
    }

    #[test]
    fn test_true_field_only_occupies_bit() {
        let ir = resolve(
            r##"{"constructors": [
            {"id": 7, "predicate": "onlyFlags", "params": [
                {"name": "flags", "type": "#"},
                {"name": "pinned", "type": "flags.3?true"},
                {"name": "muted", "type": "false"}
            ], "type": "T"}
        ]}"##,
        );
        let config = GeneratorConfig::default();
        let output = ConstructorEmitter::new(&config).emit(&ir.constructors[0]);
        let lines = field_lines(&output);

        assert_eq!(
            lines,
            vec![
                "struct _onlyFlags { // 0x7 onlyFlags",
                "// flags",
                "uint : 3;",
                "uint has_pinned : 1; // bit 3",
                "uint : 28;",
                "};",
                "",
            ]
        );
    }

    #[test]
    fn test_shared_bit_uses_first_owner() {
        let ir = resolve(
            r##"{"constructors": [
            {"id": 8, "predicate": "geo", "params": [
                {"name": "flags", "type": "#"},
                {"name": "lat", "type": "flags.0?double"},
                {"name": "long", "type": "flags.0?double"}
            ], "type": "Geo"}
        ]}"##,
        );
        let config = GeneratorConfig::default();
        let output = ConstructorEmitter::new(&config).emit(&ir.constructors[0]);

        assert_eq!(output.matches("uint has_lat : 1;").count(), 1);
        assert!(!output.contains("has_long"));
        assert!(output.contains("double long_;"));
        assert_eq!(output.matches("if (has_lat)").count(), 2);
    }

    #[test]
    fn test_second_flags_word_in_place() {
        let ir = resolve(
            r##"{"constructors": [
            {"id": 9, "predicate": "channel", "params": [
                {"name": "flags", "type": "#"},
                {"name": "creator", "type": "flags.0?true"},
                {"name": "flags2", "type": "#"},
                {"name": "stories_hidden", "type": "flags2.1?true"},
                {"name": "id", "type": "long"}
            ], "type": "Chat"}
        ]}"##,
        );
        let config = GeneratorConfig::default();
        let output = ConstructorEmitter::new(&config).emit(&ir.constructors[0]);
        let lines = field_lines(&output);

        let first = lines.iter().position(|l| *l == "// flags").unwrap();
        let second = lines.iter().position(|l| *l == "// flags2").unwrap();
        let creator = lines.iter().position(|l| l.starts_with("uint has_creator")).unwrap();
        let hidden = lines
            .iter()
            .position(|l| l.starts_with("uint has_stories_hidden"))
            .unwrap();
        let id = lines.iter().position(|l| *l == "int64 id;").unwrap();

        assert!(first < creator && creator < second && second < hidden && hidden < id);
    }

    #[test]
    fn test_undeclared_flags_word_synthesized_first() {
        let ir = resolve(
            r##"{"constructors": [
            {"id": 10, "predicate": "legacy", "params": [
                {"name": "date", "type": "int"},
                {"name": "title", "type": "flags.0?string"}
            ], "type": "Legacy"}
        ]}"##,
        );
        let config = GeneratorConfig::default();
        let output = ConstructorEmitter::new(&config).emit(&ir.constructors[0]);
        let lines = field_lines(&output);

        assert_eq!(lines[1], "// flags (implicit)");
        assert_eq!(lines[2], "uint has_title : 1; // bit 0");
        assert_eq!(lines[3], "uint : 31;");
        assert_eq!(lines[4], "int date;");
    }

    #[test]
    fn test_custom_prefix_and_indent() {
        let ir = sent_code_ir();
        let config = GeneratorConfig::default().flag_prefix("b_").indent("\t");
        let output = ConstructorEmitter::new(&config).emit(&ir.constructors[0]);

        assert!(output.contains("\tif (b_timeout)\n\t\tint timeout;\n"));
    }
}
