//! End-to-end recursive generation into a directory.

use std::fs;
use tlbt_codegen::{CodegenError, DirectorySink, Generator, GeneratorConfig};
use tlbt_schema::{SchemaIr, parse_schema};

const SCHEMA: &str = r##"{
    "constructors": [
        {"id": "-1132882121", "predicate": "boolFalse", "params": [], "type": "Bool"},
        {"id": "-1720552011", "predicate": "boolTrue", "params": [], "type": "Bool"},
        {"id": 100, "predicate": "peerUser", "params": [{"name": "user_id", "type": "long"}], "type": "Peer"},
        {"id": 101, "predicate": "peerChat", "params": [{"name": "chat_id", "type": "long"}], "type": "Peer"},
        {"id": 200, "predicate": "message", "params": [
            {"name": "flags", "type": "#"},
            {"name": "out", "type": "flags.1?true"},
            {"name": "id", "type": "int"},
            {"name": "from_id", "type": "flags.8?Peer"},
            {"name": "peer_id", "type": "Peer"},
            {"name": "reply_to", "type": "flags.3?Message"},
            {"name": "entities", "type": "flags.7?Vector<MessageEntity>"}
        ], "type": "Message"},
        {"id": 300, "predicate": "messageEntityBold", "params": [
            {"name": "offset", "type": "int"},
            {"name": "length", "type": "int"}
        ], "type": "MessageEntity"},
        {"id": 400, "predicate": "messages.messages", "params": [
            {"name": "messages", "type": "Vector<Message>"},
            {"name": "chats", "type": "Vector<Peer>"}
        ], "type": "messages.Messages"}
    ],
    "methods": [
        {"id": 500, "method": "messages.getHistory", "params": [{"name": "peer", "type": "Peer"}], "type": "messages.Messages"}
    ]
}"##;

fn resolve() -> SchemaIr {
    let schema = parse_schema(SCHEMA).expect("Failed to parse");
    SchemaIr::from_schema(&schema).expect("Failed to resolve")
}

fn listing(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read_dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_recursive_generation_writes_dependency_closure() {
    let ir = resolve();
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("templates");
    let mut sink = DirectorySink::new(&out);

    let report = Generator::new(&ir)
        .generate_into(&["messages.Messages"], &mut sink)
        .expect("generate");

    assert_eq!(
        report.generated,
        vec![
            "tl_prelude.bt",
            "struct_peer.bt",
            "struct_messageentity.bt",
            "struct_message.bt",
            "struct_messages_messages.bt",
        ]
    );
    assert_eq!(report.skipped, vec!["struct_peer.bt"]);
    assert_eq!(
        listing(&out),
        vec![
            "struct_message.bt",
            "struct_messageentity.bt",
            "struct_messages_messages.bt",
            "struct_peer.bt",
            "tl_prelude.bt",
        ]
    );

    let root = fs::read_to_string(out.join("struct_messages_messages.bt")).expect("read");
    assert!(root.starts_with("#ifndef STRUCT_MESSAGES_MESSAGES_BT\n"));
    assert!(root.contains("#include \"struct_message.bt\"\n#include \"struct_peer.bt\"\n"));
    assert!(root.contains("struct _messages__messages { // 0x190 messages.messages\n"));
    assert!(root.contains("struct messages__Messages { // messages.Messages\n"));
    assert!(root.trim_end().ends_with("#endif // STRUCT_MESSAGES_MESSAGES_BT"));

    let message = fs::read_to_string(out.join("struct_message.bt")).expect("read");
    assert!(message.contains("    if (has_from_id)\n        Peer from_id;\n"));
    assert!(message.contains("    if (has_entities)\n        Vector_MessageEntity entities;\n"));
    assert!(message.contains("    if (has_reply_to)\n        Message reply_to;\n"));
    assert!(!message.contains("out;"));
}

#[test]
fn test_rerun_against_directory_is_noop() {
    let ir = resolve();
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = DirectorySink::new(dir.path());
    let generator = Generator::new(&ir);

    generator
        .generate_into(&["Message"], &mut sink)
        .expect("first run");
    let marker = "// edited by hand\n";
    fs::write(dir.path().join("struct_peer.bt"), marker).expect("write");

    let report = generator
        .generate_into(&["Message", "Peer"], &mut sink)
        .expect("second run");

    assert!(report.generated.is_empty());
    assert_eq!(report.skipped, vec!["struct_message.bt", "struct_peer.bt"]);
    let peer = fs::read_to_string(dir.path().join("struct_peer.bt")).expect("read");
    assert_eq!(peer, marker);
}

#[test]
fn test_force_overwrites_directory() {
    let ir = resolve();
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("struct_peer.bt"), "stale").expect("write");
    let mut sink = DirectorySink::new(dir.path());

    let report = Generator::with_config(&ir, GeneratorConfig::default().force(true))
        .generate_into(&["Peer"], &mut sink)
        .expect("generate");

    assert_eq!(report.generated, vec!["tl_prelude.bt", "struct_peer.bt"]);
    let peer = fs::read_to_string(dir.path().join("struct_peer.bt")).expect("read");
    assert!(peer.contains("if (id == 100) // peerUser\n"));
    assert!(peer.contains("else if (id == 101) // peerChat\n"));
}

#[test]
fn test_cycle_leaves_directory_untouched() {
    let schema = parse_schema(
        r##"{"constructors": [
            {"id": 1, "predicate": "a", "params": [{"name": "b", "type": "B"}], "type": "A"},
            {"id": 2, "predicate": "b", "params": [{"name": "a", "type": "Vector<A>"}], "type": "B"}
        ]}"##,
    )
    .expect("Failed to parse");
    let ir = SchemaIr::from_schema(&schema).expect("Failed to resolve");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = DirectorySink::new(dir.path());

    let err = Generator::new(&ir)
        .generate_into(&["A"], &mut sink)
        .expect_err("cycle");

    assert!(matches!(err, CodegenError::RecursionDetected { .. }));
    assert!(listing(dir.path()).is_empty());
}
