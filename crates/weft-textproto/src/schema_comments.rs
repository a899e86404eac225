//! Schema directives embedded in the leading comment block of a textproto.
//!
//! Textproto files conventionally name their own schema in comments before
//! any structured content:
//!
//! ```text
//! # proto-file: protos/config.proto
//! # proto-message: pkg.Config
//! # proto-import: protos/extra.proto
//! ```

use std::sync::LazyLock;

use regex::Regex;
use weft_core::Span;

/// Byte spans of the directive values found in the leading comment block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaComments {
    pub proto_message: Option<Span>,
    pub proto_file: Option<Span>,
    pub proto_imports: Vec<Span>,
}

impl SchemaComments {
    pub fn is_empty(&self) -> bool {
        self.proto_message.is_none() && self.proto_file.is_none() && self.proto_imports.is_empty()
    }
}

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*proto-(message|file|import)\s*:\s*(\S+)").unwrap());

/// Scans the leading run of blank and `#` comment lines for schema
/// directives. Scanning stops at the first structured-content line; a later
/// duplicate of `proto-message` or `proto-file` wins.
pub fn scan(text: &str) -> SchemaComments {
    let mut comments = SchemaComments::default();

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            break;
        }
        if let Some(captures) = DIRECTIVE.captures(line) {
            if let (Some(kind), Some(value)) = (captures.get(1), captures.get(2)) {
                let span = Span::new(offset + value.start(), offset + value.end());
                match kind.as_str() {
                    "message" => comments.proto_message = Some(span),
                    "file" => comments.proto_file = Some(span),
                    _ => comments.proto_imports.push(span),
                }
            }
        }
        offset += line.len();
    }

    comments
}
