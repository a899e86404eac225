use std::collections::HashMap;

use weft_graph::{
    CompilationUnit, EdgeKind, FactName, MemorySink, NodeKind, NodeName, RequiredInput,
};
use weft_proto::{
    DescriptorPool, FieldDescriptor, FieldKind, FrontendError, MessageId, MessageValue,
    ParseOptions, ParsedTextproto, SchemaCompiler, SchemaSource, TextFormatParser, WireDecoder,
};

/// Corpus-local file identity used by fixtures.
pub fn file_name(path: &str) -> NodeName {
    NodeName {
        path: path.to_string(),
        corpus: "test".to_string(),
        ..NodeName::default()
    }
}

/// Identity of a schema entity declared in `path`, as the analyzer builds it.
pub fn schema_name(path: &str, signature: &str) -> NodeName {
    file_name(path)
        .with_signature(signature)
        .with_language("protobuf")
}

/// Unit with one textproto source plus schema inputs, each registered under
/// its corpus-local [`file_name`].
pub fn unit_with_files(source: &str, schemas: &[&str], arguments: &[&str]) -> CompilationUnit {
    let mut required_inputs = vec![RequiredInput {
        path: source.to_string(),
        name: file_name(source),
    }];
    required_inputs.extend(schemas.iter().map(|path| RequiredInput {
        path: path.to_string(),
        name: file_name(path),
    }));
    CompilationUnit {
        source_files: vec![source.to_string()],
        required_inputs,
        arguments: arguments.iter().map(|arg| arg.to_string()).collect(),
    }
}

/// Registers `google.protobuf.Any` with its `type_url`/`value` fields.
pub fn any_descriptor(pool: &mut DescriptorPool, file: &str) -> MessageId {
    let id = pool.add_message("google.protobuf.Any", file);
    pool.push_field(
        id,
        FieldDescriptor::new("type_url", "google.protobuf.Any.type_url", FieldKind::String, file),
    );
    pool.push_field(
        id,
        FieldDescriptor::new("value", "google.protobuf.Any.value", FieldKind::Bytes, file),
    );
    id
}

/// Frontend standing in for the schema compiler, textproto parser, and wire
/// decoder: every call returns a pre-built output.
#[derive(Debug, Default)]
pub struct FixtureFrontend {
    pub pool: DescriptorPool,
    pub parsed: ParsedTextproto,
    /// Wire decodings keyed by the exact value bytes.
    pub decoded: HashMap<Vec<u8>, MessageValue>,
    /// When set, `parse` fails with this message instead.
    pub fail_parse: Option<String>,
}

impl SchemaCompiler for FixtureFrontend {
    fn compile(&self, _sources: &[SchemaSource]) -> Result<DescriptorPool, FrontendError> {
        Ok(self.pool.clone())
    }
}

impl TextFormatParser for FixtureFrontend {
    fn parse(
        &self,
        _text: &str,
        _pool: &DescriptorPool,
        _root: MessageId,
        _options: ParseOptions,
    ) -> Result<ParsedTextproto, FrontendError> {
        match &self.fail_parse {
            Some(message) => Err(FrontendError::new(message.clone())),
            None => Ok(self.parsed.clone()),
        }
    }
}

impl WireDecoder for FixtureFrontend {
    fn decode(
        &self,
        _pool: &DescriptorPool,
        _message: MessageId,
        bytes: &[u8],
    ) -> Result<MessageValue, FrontendError> {
        self.decoded
            .get(bytes)
            .cloned()
            .ok_or_else(|| FrontendError::new("no decoded fixture registered for value bytes"))
    }
}

/// `(begin, end)` spans of the anchors recorded in `sink`, in emission
/// order, duplicates included.
pub fn anchor_spans(sink: &MemorySink) -> Vec<(usize, usize)> {
    sink.nodes_of_kind(NodeKind::Anchor)
        .into_iter()
        .filter_map(|node| parse_anchor_signature(&node.signature))
        .collect()
}

fn parse_anchor_signature(signature: &str) -> Option<(usize, usize)> {
    let (begin, end) = signature.strip_prefix('@')?.split_once(':')?;
    Some((begin.parse().ok()?, end.parse().ok()?))
}

/// `(source signature, target)` of every `ref` edge, in emission order.
pub fn ref_edges(sink: &MemorySink) -> Vec<(String, NodeName)> {
    sink.edges
        .iter()
        .filter(|edge| edge.kind == EdgeKind::Ref)
        .map(|edge| (edge.source.signature.clone(), edge.target.clone()))
        .collect()
}

/// Diagnostic nodes recorded in `sink`, as `(signature, message)` pairs.
pub fn diagnostics(sink: &MemorySink) -> Vec<(String, String)> {
    sink.nodes_of_kind(NodeKind::Diagnostic)
        .into_iter()
        .map(|node| {
            let message = sink
                .fact_value(node, FactName::Message)
                .map(|value| String::from_utf8_lossy(value).into_owned())
                .unwrap_or_default();
            (node.signature.clone(), message)
        })
        .collect()
}
