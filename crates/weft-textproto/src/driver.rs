//! Entry point wiring for one compilation unit.

use weft_graph::{CompilationUnit, FactName, FileData, GraphSink, NodeKind};
use weft_proto::{ParseOptions, SchemaCompiler, SchemaSource, TextFormatParser, WireDecoder};

use crate::analyzer::TextprotoAnalyzer;
use crate::paths::{parse_substitution_args, PathResolver};
use crate::{AnalyzeError, Result};

/// Signature of the diagnostic node recorded when schema-comment analysis
/// fails.
const SCHEMA_COMMENTS_SIGNATURE: &str = "schema_comments";

/// Value of `--proto_message` in `args`, if present.
fn proto_message_arg(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--proto_message" {
            return iter.next().map(String::as_str);
        }
    }
    None
}

/// Analyzes one compilation unit, emitting graph output into `sink`.
///
/// `files` supplies the content of the unit's single textproto source plus
/// every schema file; `frontend` supplies the schema compiler, the textproto
/// parser (invoked permissively), and the wire decoder used for Any values.
///
/// A schema-comment failure is recorded as a diagnostic on the input file
/// and does not abort the run; every other error is fatal and returned.
pub fn analyze_compilation<F>(
    unit: &CompilationUnit,
    files: &[FileData],
    frontend: &F,
    sink: &mut dyn GraphSink,
) -> Result<()>
where
    F: SchemaCompiler + TextFormatParser + WireDecoder,
{
    if unit.source_files.len() != 1 {
        return Err(AnalyzeError::Precondition(format!(
            "expected exactly one source file, got {}",
            unit.source_files.len()
        )));
    }
    if files.len() < 2 {
        return Err(AnalyzeError::Precondition(
            "need at least two files: the textproto and one or more schemas".to_string(),
        ));
    }
    let textproto_path = unit.source_files[0].as_str();

    let (substitutions, args) = parse_substitution_args(&unit.arguments);
    let message_name = proto_message_arg(&args).ok_or_else(|| {
        AnalyzeError::Precondition("unit arguments must specify --proto_message".to_string())
    })?;
    tracing::info!(root = message_name, "analyzing textproto");

    // Schema files go to the compiler under their search-path-relative
    // paths, so files imported under two spellings resolve to one entry.
    let mut resolver = PathResolver::new(unit, substitutions);
    let mut schemas = Vec::new();
    let mut textproto = None;
    for file in files {
        if file.path == textproto_path {
            textproto = Some(file);
            continue;
        }
        let relative = resolver.full_to_relative(&file.path);
        tracing::debug!(path = %file.path, relative = %relative, "adding schema source");
        schemas.push(SchemaSource {
            path: relative,
            content: file.content.clone(),
        });
    }
    let textproto = textproto.ok_or_else(|| {
        AnalyzeError::NotFound(format!("no content provided for source file {textproto_path}"))
    })?;
    let text = std::str::from_utf8(&textproto.content)
        .map_err(|err| AnalyzeError::Parse(format!("textproto is not valid UTF-8: {err}")))?;

    let pool = frontend
        .compile(&schemas)
        .map_err(|err| AnalyzeError::Parse(format!("schema compilation failed: {err}")))?;
    let root = pool.message_by_name(message_name).ok_or_else(|| {
        AnalyzeError::NotFound(format!("root message {message_name} not in descriptor pool"))
    })?;

    let options = ParseOptions {
        allow_partial: true,
        allow_unknown_extensions: true,
    };
    let parsed = frontend
        .parse(text, &pool, root, options)
        .map_err(|err| AnalyzeError::Parse(format!("textproto parse failed: {err}")))?;

    let file_name = unit.name_for_path(textproto_path).ok_or_else(|| {
        AnalyzeError::NotFound(format!("no identity registered for source file {textproto_path}"))
    })?;
    sink.fact(file_name, FactName::NodeKind, NodeKind::File.as_str().as_bytes());
    sink.fact(file_name, FactName::Text, &textproto.content);

    let root_descriptor = pool.message(root);
    let mut analyzer = TextprotoAnalyzer::new(text, resolver, &pool, frontend, sink);
    if let Err(err) = analyzer.analyze_schema_comments(file_name, root_descriptor) {
        tracing::error!(error = %err, "schema comment analysis failed");
        analyzer.emit_diagnostic(
            file_name,
            SCHEMA_COMMENTS_SIGNATURE,
            &format!("error analyzing schema comments: {err}"),
        );
    }

    analyzer.analyze_message(file_name, &parsed.value, root_descriptor, &parsed.locations)
}
