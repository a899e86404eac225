//! Dynamically-typed wrapper fields: type-URL anchoring, embedded value
//! decoding, and the direct-form fallback.

use pretty_assertions::assert_eq;
use weft_core::LineColumn;
use weft_graph::FileData;
use weft_proto::{
    DescriptorPool, FieldDescriptor, FieldKind, LocationTree, MessageValue, ParsedTextproto,
    Value, NON_REPEATED_INDEX,
};
use weft_test_utils::{anchor_spans, any_descriptor, ref_edges, schema_name, unit_with_files, FixtureFrontend};
use weft_textproto::AnalyzeError;

use super::{run, try_run};

const SCHEMAS: &[&str] = &["top.proto", "any.proto", "m.proto"];

/// `Top` with an Any-typed field `a`, plus `pkg.M { int32 x = 1; }`.
fn pool_with_any() -> DescriptorPool {
    let mut pool = DescriptorPool::new();
    let top = pool.add_message("Top", "top.proto");
    let any = any_descriptor(&mut pool, "any.proto");
    let m = pool.add_message("pkg.M", "m.proto");
    pool.push_field(m, FieldDescriptor::new("x", "pkg.M.x", FieldKind::Int32, "m.proto"));
    pool.push_field(
        top,
        FieldDescriptor::new("a", "Top.a", FieldKind::Message, "top.proto").of_message(any),
    );
    pool
}

fn any_value(type_url: &str, bytes: Option<Vec<u8>>) -> MessageValue {
    let mut value = MessageValue::new();
    value.push("google.protobuf.Any.type_url", Value::String(type_url.to_string()));
    if let Some(bytes) = bytes {
        value.push("google.protobuf.Any.value", Value::Bytes(bytes));
    }
    value
}

fn files_for(text: &str) -> Vec<FileData> {
    let mut files = vec![FileData::new("input.textproto", text.as_bytes())];
    files.extend(
        SCHEMAS
            .iter()
            .map(|path| FileData::new(*path, b"// schema source".to_vec())),
    );
    files
}

#[test]
fn literal_any_anchors_the_type_url_and_decodes_the_value() {
    let text = "a { [type.googleapis.com/pkg.M] { x: 1 } }";
    let pool = pool_with_any();

    let mut value = MessageValue::new();
    value.push(
        "Top.a",
        Value::Message(any_value("type.googleapis.com/pkg.M", Some(vec![1]))),
    );
    let mut locations = LocationTree::new();
    locations.set_location("Top.a", NON_REPEATED_INDEX, LineColumn::new(0, 0));
    locations
        .child_mut("Top.a", NON_REPEATED_INDEX)
        .set_location("pkg.M.x", NON_REPEATED_INDEX, LineColumn::new(0, 34));

    let mut decoded_inner = MessageValue::new();
    decoded_inner.push("pkg.M.x", Value::Int(1));
    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto { value, locations },
        decoded: [(vec![1], decoded_inner)].into_iter().collect(),
        ..FixtureFrontend::default()
    };

    let unit = unit_with_files("input.textproto", SCHEMAS, &["--proto_message", "Top"]);
    let sink = run(&unit, &files_for(text), &frontend);

    assert_eq!(anchor_spans(&sink), vec![(0, 1), (25, 30), (34, 35)]);
    assert_eq!(
        ref_edges(&sink),
        vec![
            ("@0:1".to_string(), schema_name("top.proto", "Top.a")),
            ("@25:30".to_string(), schema_name("m.proto", "pkg.M")),
            ("@34:35".to_string(), schema_name("m.proto", "pkg.M.x")),
        ]
    );
}

#[test]
fn comments_before_the_type_url_are_tolerated_and_empty_value_stops() {
    let text = "a {\n  # pick a type\n  [t/pkg.M] {}\n}";
    let pool = pool_with_any();

    let mut value = MessageValue::new();
    value.push("Top.a", Value::Message(any_value("t/pkg.M", None)));
    let mut locations = LocationTree::new();
    locations.set_location("Top.a", NON_REPEATED_INDEX, LineColumn::new(0, 0));

    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto { value, locations },
        ..FixtureFrontend::default()
    };

    let unit = unit_with_files("input.textproto", SCHEMAS, &["--proto_message", "Top"]);
    let sink = run(&unit, &files_for(text), &frontend);

    // The type URL is anchored and referenced; with no value bytes there is
    // nothing further to walk.
    assert_eq!(anchor_spans(&sink), vec![(0, 1), (25, 30)]);
    assert_eq!(
        ref_edges(&sink),
        vec![
            ("@0:1".to_string(), schema_name("top.proto", "Top.a")),
            ("@25:30".to_string(), schema_name("m.proto", "pkg.M")),
        ]
    );
}

#[test]
fn unknown_any_type_keeps_the_anchor_but_skips_the_reference() {
    let text = "a { [t/pkg.Unknown] {} }";
    let pool = pool_with_any();

    let mut value = MessageValue::new();
    value.push("Top.a", Value::Message(any_value("t/pkg.Unknown", None)));
    let mut locations = LocationTree::new();
    locations.set_location("Top.a", NON_REPEATED_INDEX, LineColumn::new(0, 0));

    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto { value, locations },
        ..FixtureFrontend::default()
    };

    let unit = unit_with_files("input.textproto", SCHEMAS, &["--proto_message", "Top"]);
    let sink = run(&unit, &files_for(text), &frontend);

    assert_eq!(anchor_spans(&sink), vec![(0, 1), (7, 18)]);
    assert_eq!(
        ref_edges(&sink),
        vec![("@0:1".to_string(), schema_name("top.proto", "Top.a"))]
    );
}

#[test]
fn direct_form_falls_back_to_the_message_walk() {
    let text = "a { type_url: \"t/pkg.M\" value: \"x\" }";
    let pool = pool_with_any();

    let wrapper = any_value("t/pkg.M", Some(b"x".to_vec()));
    let mut value = MessageValue::new();
    value.push("Top.a", Value::Message(wrapper));

    let mut locations = LocationTree::new();
    locations.set_location("Top.a", NON_REPEATED_INDEX, LineColumn::new(0, 0));
    let subtree = locations.child_mut("Top.a", NON_REPEATED_INDEX);
    subtree.set_location(
        "google.protobuf.Any.type_url",
        NON_REPEATED_INDEX,
        LineColumn::new(0, 4),
    );
    subtree.set_location(
        "google.protobuf.Any.value",
        NON_REPEATED_INDEX,
        LineColumn::new(0, 24),
    );

    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto { value, locations },
        ..FixtureFrontend::default()
    };

    let unit = unit_with_files("input.textproto", SCHEMAS, &["--proto_message", "Top"]);
    let sink = run(&unit, &files_for(text), &frontend);

    // No bracketed literal to scan, so the wrapper is walked like any other
    // message; the type-URL string itself is not anchored.
    assert_eq!(anchor_spans(&sink), vec![(0, 1), (4, 12), (24, 29)]);
    assert_eq!(
        ref_edges(&sink),
        vec![
            ("@0:1".to_string(), schema_name("top.proto", "Top.a")),
            (
                "@4:12".to_string(),
                schema_name("any.proto", "google.protobuf.Any.type_url")
            ),
            (
                "@24:29".to_string(),
                schema_name("any.proto", "google.protobuf.Any.value")
            ),
        ]
    );
}

#[test]
fn undecodable_value_bytes_are_fatal() {
    let text = "a { [t/pkg.M] { x: 1 } }";
    let pool = pool_with_any();

    let mut value = MessageValue::new();
    value.push("Top.a", Value::Message(any_value("t/pkg.M", Some(vec![9]))));
    let mut locations = LocationTree::new();
    locations.set_location("Top.a", NON_REPEATED_INDEX, LineColumn::new(0, 0));

    // No decoding registered for the value bytes.
    let frontend = FixtureFrontend {
        pool,
        parsed: ParsedTextproto { value, locations },
        ..FixtureFrontend::default()
    };

    let unit = unit_with_files("input.textproto", SCHEMAS, &["--proto_message", "Top"]);
    let err = try_run(&unit, &files_for(text), &frontend).unwrap_err();

    assert!(matches!(err, AnalyzeError::Parse(_)), "{err}");
}
