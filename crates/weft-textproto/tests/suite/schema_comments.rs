//! Schema-comment directives: references to the root message and schema
//! files, and the non-fatal diagnostic path.

use pretty_assertions::assert_eq;
use weft_core::LineColumn;
use weft_graph::{EdgeKind, FileData};
use weft_proto::{
    DescriptorPool, FieldDescriptor, FieldKind, LocationTree, MessageValue, ParsedTextproto, Value,
    NON_REPEATED_INDEX,
};
use weft_test_utils::{
    anchor_spans, diagnostics, file_name, ref_edges, schema_name, unit_with_files, FixtureFrontend,
};

use super::run;

#[test]
fn proto_message_directive_references_the_root_message() {
    let text = "# proto-message: pkg.M\nx: 1\n";
    let mut pool = DescriptorPool::new();
    let m = pool.add_message("pkg.M", "m.proto");
    pool.push_field(m, FieldDescriptor::new("x", "pkg.M.x", FieldKind::Int32, "m.proto"));

    let mut value = MessageValue::new();
    value.push("pkg.M.x", Value::Int(1));
    let mut locations = LocationTree::new();
    locations.set_location("pkg.M.x", NON_REPEATED_INDEX, LineColumn::new(1, 0));

    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto { value, locations },
        ..FixtureFrontend::default()
    };
    let unit = unit_with_files("input.textproto", &["m.proto"], &["--proto_message", "pkg.M"]);
    let files = [
        FileData::new("input.textproto", text.as_bytes()),
        FileData::new("m.proto", b"// schema source".to_vec()),
    ];
    let sink = run(&unit, &files, &frontend);

    assert_eq!(anchor_spans(&sink), vec![(17, 22), (23, 24)]);
    assert_eq!(
        ref_edges(&sink),
        vec![
            ("@17:22".to_string(), schema_name("m.proto", "pkg.M")),
            ("@23:24".to_string(), schema_name("m.proto", "pkg.M.x")),
        ]
    );
}

#[test]
fn file_and_import_directives_resolve_through_substitutions() {
    let text = "# proto-file: protos/m.proto\n# proto-import: protos/n.proto\n";
    let mut pool = DescriptorPool::new();
    pool.add_message("M", "protos/m.proto");

    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto::default(),
        ..FixtureFrontend::default()
    };
    let unit = unit_with_files(
        "input.textproto",
        &["/src/protos/m.proto", "/src/protos/n.proto"],
        &["--proto_message", "M", "-Iprotos=/src/protos"],
    );
    let files = [
        FileData::new("input.textproto", text.as_bytes()),
        FileData::new("/src/protos/m.proto", b"// schema source".to_vec()),
        FileData::new("/src/protos/n.proto", b"// schema source".to_vec()),
    ];
    let sink = run(&unit, &files, &frontend);

    // Imports are emitted before the proto-file directive.
    assert_eq!(anchor_spans(&sink), vec![(45, 59), (14, 28)]);
    assert_eq!(
        ref_edges(&sink),
        vec![
            ("@45:59".to_string(), file_name("/src/protos/n.proto")),
            ("@14:28".to_string(), file_name("/src/protos/m.proto")),
        ]
    );
}

#[test]
fn unresolvable_directive_records_a_diagnostic_and_continues() {
    let text = "# proto-file: missing.proto\nx: 1\n";
    let mut pool = DescriptorPool::new();
    let m = pool.add_message("M", "m.proto");
    pool.push_field(m, FieldDescriptor::new("x", "M.x", FieldKind::Int32, "m.proto"));

    let mut value = MessageValue::new();
    value.push("M.x", Value::Int(1));
    let mut locations = LocationTree::new();
    locations.set_location("M.x", NON_REPEATED_INDEX, LineColumn::new(1, 0));

    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto { value, locations },
        ..FixtureFrontend::default()
    };
    let unit = unit_with_files("input.textproto", &["m.proto"], &["--proto_message", "M"]);
    let files = [
        FileData::new("input.textproto", text.as_bytes()),
        FileData::new("m.proto", b"// schema source".to_vec()),
    ];
    let sink = run(&unit, &files, &frontend);

    // The directive anchor is emitted before resolution fails; the main walk
    // still runs.
    assert_eq!(anchor_spans(&sink), vec![(14, 27), (28, 29)]);
    assert_eq!(
        ref_edges(&sink),
        vec![("@28:29".to_string(), schema_name("m.proto", "M.x"))]
    );

    let recorded = diagnostics(&sink);
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "schema_comments");
    assert!(recorded[0].1.contains("missing.proto"), "{}", recorded[0].1);
    assert!(sink
        .edges
        .iter()
        .any(|edge| edge.kind == EdgeKind::Tagged
            && edge.source == file_name("input.textproto")
            && edge.target.signature == "schema_comments"));
}
